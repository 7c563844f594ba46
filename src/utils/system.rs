//! System utilities for cross-platform functionality

use std::env;

#[cfg(target_os = "windows")]
use winapi::{
    shared::{minwindef::HKEY, winerror::ERROR_SUCCESS},
    um::{
        winnt::KEY_READ,
        winreg::{
            RegCloseKey, RegGetValueW, RegOpenKeyExW, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE,
            RRF_RT_REG_SZ,
        },
    },
};

/// Registry hive a value is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryRoot {
    LocalMachine,
    CurrentUser,
}

/// Get environment variable value
///
/// # Arguments
///
/// * `name` - The name of the environment variable
///
/// # Returns
///
/// The value of the environment variable or empty string if not found
pub fn get_env(name: &str) -> String {
    env::var(name).unwrap_or_default()
}

/// Read a `REG_SZ` value from the Windows registry
///
/// # Arguments
///
/// * `root` - The hive to open
/// * `subkey` - Path of the key below the hive, backslash separated
/// * `name` - Name of the value
///
/// # Returns
///
/// The string value, or `None` if the key or value is missing, has another
/// type, or the platform has no registry
pub fn get_reg_str(root: RegistryRoot, subkey: &str, name: &str) -> Option<String> {
    #[cfg(target_os = "windows")]
    {
        use std::ffi::OsString;
        use std::os::windows::ffi::OsStringExt;
        use std::ptr;

        let to_wide =
            |s: &str| -> Vec<u16> { s.encode_utf16().chain(std::iter::once(0)).collect() };
        let wide_subkey = to_wide(subkey);
        let wide_name = to_wide(name);
        let hive = match root {
            RegistryRoot::LocalMachine => HKEY_LOCAL_MACHINE,
            RegistryRoot::CurrentUser => HKEY_CURRENT_USER,
        };

        unsafe {
            let mut hkey: HKEY = ptr::null_mut();
            let ret = RegOpenKeyExW(hive, wide_subkey.as_ptr(), 0, KEY_READ, &mut hkey);
            if ret as u32 != ERROR_SUCCESS {
                return None;
            }

            let mut buf = vec![0u16; 4096];
            let mut cb = (buf.len() * std::mem::size_of::<u16>()) as u32;
            let ret = RegGetValueW(
                hkey,
                ptr::null(),
                wide_name.as_ptr(),
                RRF_RT_REG_SZ,
                ptr::null_mut(),
                buf.as_mut_ptr() as *mut _,
                &mut cb,
            );
            RegCloseKey(hkey);
            if ret as u32 != ERROR_SUCCESS {
                return None;
            }

            // cb counts bytes including the terminating NUL
            let len = (cb as usize / std::mem::size_of::<u16>()).saturating_sub(1);
            let value = OsString::from_wide(&buf[..len])
                .to_string_lossy()
                .trim_end_matches('\0')
                .to_string();
            if value.is_empty() {
                None
            } else {
                Some(value)
            }
        }
    }

    #[cfg(not(target_os = "windows"))]
    {
        let _ = (root, subkey, name);
        None
    }
}

/// Get system proxy settings
///
/// # Returns
///
/// The system proxy server string or empty string if not found
pub fn get_system_proxy() -> String {
    #[cfg(target_os = "windows")]
    {
        let subkey = "Software\\Microsoft\\Windows\\CurrentVersion\\Internet Settings";
        if let Some(server) = get_reg_str(RegistryRoot::CurrentUser, subkey, "ProxyServer") {
            return server;
        }
    }

    let proxy_env = [
        "all_proxy",
        "ALL_PROXY",
        "http_proxy",
        "HTTP_PROXY",
        "https_proxy",
        "HTTPS_PROXY",
    ];

    for var in &proxy_env {
        let proxy = get_env(var);
        if !proxy.is_empty() {
            return proxy;
        }
    }

    String::new()
}
