use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_KEYS, FALLBACK_STEAM_LIBRARIES, GAME_FOLDER_NAME, INI_RELATIVE_PATH, PROBE_PATH,
};
use crate::utils::http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

fn default_true() -> bool {
    true
}

fn default_none() -> String {
    "NONE".to_string()
}

/// Where the game lives and where its configuration file sits inside it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameSettings {
    pub folder_name: String,
    pub ini_relative_path: String,
    /// Game directories tried when the registry lookup finds nothing.
    /// Empty means the stock Steam library guesses.
    pub fallback_dirs: Vec<String>,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            folder_name: GAME_FOLDER_NAME.to_string(),
            ini_relative_path: INI_RELATIVE_PATH.to_string(),
            fallback_dirs: Vec::new(),
        }
    }
}

impl GameSettings {
    pub fn fallback_dirs(&self) -> Vec<String> {
        if !self.fallback_dirs.is_empty() {
            return self.fallback_dirs.clone();
        }
        FALLBACK_STEAM_LIBRARIES
            .iter()
            .map(|lib| format!("{}\\steamapps\\common\\{}", lib, self.folder_name))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PatchSettings {
    pub keys: Vec<String>,
    #[serde(default = "default_true")]
    pub backup: bool,
}

impl Default for PatchSettings {
    fn default() -> Self {
        PatchSettings {
            keys: DEFAULT_KEYS.iter().map(|k| k.to_string()).collect(),
            backup: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProbeSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub path: String,
    pub timeout_secs: u64,
    /// `NONE`, `SYSTEM` or a proxy URL
    #[serde(default = "default_none")]
    pub proxy: String,
    pub user_agent: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        ProbeSettings {
            enabled: true,
            path: PROBE_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT,
            proxy: default_none(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ServerSettings {
    /// Server used when none is given on the command line
    pub default: String,
}

/// Top-level layout of the settings file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TomlSettings {
    pub game: GameSettings,
    pub patch: PatchSettings,
    pub probe: ProbeSettings,
    pub server: ServerSettings,
}
