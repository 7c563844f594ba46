//! Finding the game install directory
//!
//! The patch engine only ever sees a resolved path. How it was found is the
//! business of the [`InstallLocator`] variants tried here, in order.

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::constants::STEAM_REGISTRY_VALUES;
use crate::utils::file::{dir_exists, file_exists};
use crate::utils::system::get_reg_str;

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("Unable to find the game folder")]
    NotFound,

    #[error("The folder does not exist: {}", .0.display())]
    NoSuchDir(PathBuf),

    #[error("Configuration file not found: {}", .0.display())]
    MissingIni(PathBuf),
}

/// One way of finding the game directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallLocator {
    /// Steam install path from the Windows registry, plus
    /// `steamapps/common/<folder_name>`
    Registry { folder_name: String },
    /// Fixed candidate directories, first existing one wins
    FixedPaths(Vec<PathBuf>),
    /// A directory given by the user
    UserProvided(PathBuf),
}

impl InstallLocator {
    pub fn name(&self) -> &'static str {
        match self {
            InstallLocator::Registry { .. } => "registry",
            InstallLocator::FixedPaths(_) => "fixed paths",
            InstallLocator::UserProvided(_) => "user path",
        }
    }

    /// Returns the game directory if this locator finds an existing one
    pub fn locate(&self) -> Option<PathBuf> {
        match self {
            InstallLocator::Registry { folder_name } => STEAM_REGISTRY_VALUES
                .iter()
                .find_map(|(root, subkey, value)| get_reg_str(*root, subkey, value))
                .map(|steam| steam_game_dir(Path::new(&steam), folder_name))
                .filter(|dir| dir_exists(dir)),
            InstallLocator::FixedPaths(candidates) => {
                candidates.iter().find(|dir| dir_exists(dir)).cloned()
            }
            InstallLocator::UserProvided(dir) => dir_exists(dir).then(|| dir.clone()),
        }
    }
}

/// `<steam>/steamapps/common/<folder_name>`
pub fn steam_game_dir(steam_root: &Path, folder_name: &str) -> PathBuf {
    steam_root.join("steamapps").join("common").join(folder_name)
}

/// Tries each locator in turn and returns the first directory found
pub fn locate_game_dir(locators: &[InstallLocator]) -> Result<PathBuf, LocateError> {
    for locator in locators {
        match locator.locate() {
            Some(dir) => {
                debug!("Game folder found via {}: {}", locator.name(), dir.display());
                return Ok(dir);
            }
            None => debug!("No game folder via {}", locator.name()),
        }
    }
    Err(LocateError::NotFound)
}

/// Joins the game directory and the configuration file's relative path
///
/// `relative` uses `/` separators regardless of platform.
pub fn ini_path_from_game_dir(game_dir: &Path, relative: &str) -> PathBuf {
    relative
        .split(&['/', '\\'][..])
        .filter(|part| !part.is_empty())
        .fold(game_dir.to_path_buf(), |path, part| path.join(part))
}

/// Resolves the configuration file below `game_dir`, failing if it is absent
pub fn existing_ini_path(game_dir: &Path, relative: &str) -> Result<PathBuf, LocateError> {
    let ini = ini_path_from_game_dir(game_dir, relative);
    if file_exists(&ini) {
        Ok(ini)
    } else {
        Err(LocateError::MissingIni(ini))
    }
}
