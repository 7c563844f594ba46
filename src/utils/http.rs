use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::Proxy;

use crate::utils::system::get_system_proxy;
use crate::utils::url::join_url;

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 15;

/// Default user agent sent by the reachability probe
pub const DEFAULT_USER_AGENT: &str = "AOClientPatcher/1.0";

/// How the probe reaches the server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProxyConfig {
    /// Direct connection; `HTTP_PROXY` and friends are ignored
    #[default]
    Direct,
    /// Whatever the proxy environment variables say
    Environment,
    /// Every request goes through this proxy
    Url(String),
}

/// Parses a proxy setting: `SYSTEM`, `NONE`, empty, or a proxy URL
pub fn parse_proxy(proxy_str: &str) -> ProxyConfig {
    if proxy_str == "SYSTEM" {
        let system = get_system_proxy();
        if system.is_empty() {
            return ProxyConfig::Direct;
        }
        return ProxyConfig::Url(system);
    } else if proxy_str == "NONE" {
        return ProxyConfig::Direct;
    } else if !proxy_str.is_empty() {
        return ProxyConfig::Url(proxy_str.to_string());
    }
    ProxyConfig::Environment
}

/// Options for [`probe_server`]
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub proxy: ProxyConfig,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        ProbeOptions {
            proxy: ProxyConfig::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Makes a blocking GET request and reports the status code
///
/// # Arguments
/// * `url` - The URL to request
/// * `options` - Proxy, timeout and user agent
///
/// # Returns
/// * `Ok(u16)` - The HTTP status of the response, redirects already followed
/// * `Err(String)` - Error message if the request could not be completed
pub fn web_get_status(url: &str, options: &ProbeOptions) -> Result<u16, String> {
    let url = ::url::Url::parse(url).map_err(|e| format!("Invalid URL {}: {}", url, e))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("Unsupported scheme: {}", other)),
    }

    let mut client_builder = Client::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str());

    client_builder = match &options.proxy {
        ProxyConfig::Direct => client_builder.no_proxy(),
        ProxyConfig::Environment => client_builder,
        ProxyConfig::Url(proxy) => {
            let proxy = Proxy::all(proxy.as_str())
                .map_err(|e| format!("Failed to set proxy: {}", e))?;
            client_builder.proxy(proxy)
        }
    };

    let client = client_builder
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| format!("Failed to send request: {}", e))?;

    Ok(response.status().as_u16())
}

/// Checks whether a server answers `GET <base><rel>` with a 2xx or 3xx status
///
/// Advisory only: any transport error counts as unreachable.
pub fn probe_server(base_url: &str, rel: &str, options: &ProbeOptions) -> bool {
    let full = join_url(base_url, rel);
    match web_get_status(&full, options) {
        Ok(status) => {
            debug!("Probe {} answered with status {}", full, status);
            is_success_class(status)
        }
        Err(e) => {
            warn!("Probe {} failed: {}", full, e);
            false
        }
    }
}

fn is_success_class(status: u16) -> bool {
    (200..400).contains(&status)
}
