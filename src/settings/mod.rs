//! Optional TOML settings file
//!
//! Every field has a default matching the stock game install, so a missing
//! file, section or key never stops the patcher.
//!
//! ```toml
//! [game]
//! fallback_dirs = ["D:\\Games\\Batman Arkham Origins"]
//!
//! [patch]
//! keys = ["BaseUrl"]
//! backup = true
//!
//! [probe]
//! enabled = true
//! path = "/store/catalog/general"
//! timeout_secs = 15
//! proxy = "SYSTEM"
//!
//! [server]
//! default = "arkham.example.net:8385"
//! ```

pub mod toml_settings;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use thiserror::Error;

use crate::locator::InstallLocator;
use crate::models::KeyTarget;
use crate::utils::file::read_all;
use crate::utils::http::{parse_proxy, ProbeOptions};

pub use toml_settings::{GameSettings, PatchSettings, ProbeSettings, ServerSettings, TomlSettings};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Resolved settings for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub game: GameSettings,
    pub patch: PatchSettings,
    pub probe: ProbeSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Loads settings from `path`, or returns defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let Some(path) = path else {
            debug!("No settings file given, using defaults");
            return Ok(Settings::default());
        };

        let bytes = read_all(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);
        debug!("Loading settings from {}", path.display());
        Self::from_content(&content)
    }

    /// Parses and validates settings from TOML text
    pub fn from_content(content: &str) -> Result<Self, SettingsError> {
        let parsed: TomlSettings = toml::from_str(content)?;
        let settings = Settings {
            game: parsed.game,
            patch: parsed.patch,
            probe: parsed.probe,
            server: parsed.server,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.patch.keys.is_empty() {
            return Err(SettingsError::Invalid("patch.keys is empty".to_string()));
        }
        for key in &self.patch.keys {
            KeyTarget::new(key.as_str(), "").map_err(|e| SettingsError::Invalid(e.to_string()))?;
        }
        if self.game.ini_relative_path.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "game.ini_relative_path is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Locators tried in order: the user's directory, the registry, then the
    /// fallback directories
    pub fn locators(&self, user_dir: Option<&Path>) -> Vec<InstallLocator> {
        let mut locators = Vec::with_capacity(3);
        if let Some(dir) = user_dir {
            locators.push(InstallLocator::UserProvided(dir.to_path_buf()));
        }
        locators.push(InstallLocator::Registry {
            folder_name: self.game.folder_name.clone(),
        });
        locators.push(InstallLocator::FixedPaths(
            self.game
                .fallback_dirs()
                .into_iter()
                .map(PathBuf::from)
                .collect(),
        ));
        locators
    }

    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions {
            proxy: parse_proxy(&self.probe.proxy),
            timeout: Duration::from_secs(self.probe.timeout_secs),
            user_agent: self.probe.user_agent.clone(),
        }
    }
}
