//! Format-preserving patch engine for `key=value` configuration files
//!
//! The engine never parses the file as a whole. It walks physical lines,
//! rewrites the ones holding a target key and copies everything else byte
//! for byte, including each line's own terminator.
//!
//! ```
//! use ao_patcher::ini::{render_patch, ConfigDocument};
//! use ao_patcher::models::KeyTarget;
//!
//! let doc = ConfigDocument::from_bytes("A=1\r\nBaseUrl=http://old:8385/\r\n");
//! let targets = KeyTarget::for_keys(["BaseUrl"], "http://new:8385/").unwrap();
//! let patch = render_patch(&doc, &targets);
//! assert_eq!(
//!     patch.content.unwrap(),
//!     b"A=1\r\nBaseUrl=\"http://new:8385/\"\r\n"
//! );
//! ```

pub mod backup;
pub mod codec;
mod document;
pub mod oracle;
pub mod patcher;

use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

use crate::constants::{EXIT_SETUP, EXIT_WRITE_FAILED};
use crate::models::{ApplyOutcome, BackupStatus, KeyTarget, PatchResult};
use crate::utils::url::normalize_base_url;

pub use backup::{backup_file, latest_backup, restore_backup, BackupError};
pub use document::ConfigDocument;
pub use oracle::ini_already_configured;
pub use patcher::{patch_ini_keys, render_patch, RenderedPatch};

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("Failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid key name: {0:?}")]
    InvalidKey(String),

    #[error("Invalid server address: {0:?}")]
    InvalidAddress(String),

    #[error("No keys to patch")]
    NoKeys,
}

impl PatchError {
    /// Process exit code the command line front end reports for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            PatchError::Read { .. } | PatchError::Write { .. } => EXIT_WRITE_FAILED,
            PatchError::InvalidKey(_) | PatchError::InvalidAddress(_) | PatchError::NoKeys => {
                EXIT_SETUP
            }
        }
    }
}

/// Rejects an address that normalizes to nothing and an empty key list
fn targets_for<S: AsRef<str>>(desired: &str, keys: &[S]) -> Result<Vec<KeyTarget>, PatchError> {
    if normalize_base_url(desired).is_empty() {
        return Err(PatchError::InvalidAddress(desired.to_string()));
    }
    if keys.is_empty() {
        return Err(PatchError::NoKeys);
    }
    KeyTarget::for_keys(keys, desired)
}

/// Whether the file at `path` already holds `desired` for every key
///
/// Fails closed: an unreadable file, an empty address, an empty key list or
/// an invalid key counts as not configured, which sends the caller down the
/// patch path where the real error surfaces.
pub fn is_configured<S: AsRef<str>>(path: &Path, desired: &str, keys: &[S]) -> bool {
    let targets = match targets_for(desired, keys) {
        Ok(targets) => targets,
        Err(e) => {
            debug!("{}", e);
            return false;
        }
    };

    match ConfigDocument::read(path) {
        Ok(doc) => ini_already_configured(&doc, &targets),
        Err(e) => {
            debug!("{}", e);
            false
        }
    }
}

/// Sets every key in `keys` to `desired` in the file at `path`
///
/// `desired` is written as given; normalize it with
/// [`normalize_base_url`](crate::utils::url::normalize_base_url) first.
/// Calling this twice with the same arguments writes at most once. An
/// address that is empty after normalization or an empty key list is
/// rejected before the file is read.
pub fn patch<S: AsRef<str>>(
    path: &Path,
    desired: &str,
    keys: &[S],
) -> Result<PatchResult, PatchError> {
    let targets = targets_for(desired, keys)?;
    patch_ini_keys(path, &targets)
}

/// Checks the file, backs it up if asked to and patches it
///
/// A configured file is left alone, backup included. A failed backup is
/// logged and reported in the outcome but never stops the patch.
pub fn apply<S: AsRef<str>>(
    path: &Path,
    desired: &str,
    keys: &[S],
    backup: bool,
) -> Result<ApplyOutcome, PatchError> {
    apply_with_stamp(path, desired, keys, backup.then(backup::now_stamp).as_deref())
}

/// [`apply`] with an explicit backup time stamp, `None` to skip the backup
pub fn apply_with_stamp<S: AsRef<str>>(
    path: &Path,
    desired: &str,
    keys: &[S],
    backup_stamp: Option<&str>,
) -> Result<ApplyOutcome, PatchError> {
    let targets = targets_for(desired, keys)?;
    if ini_already_configured(&ConfigDocument::read(path)?, &targets) {
        debug!("{} already configured", path.display());
        return Ok(ApplyOutcome::AlreadyConfigured);
    }

    let backup = match backup_stamp {
        None => BackupStatus::Skipped,
        Some(stamp) => match backup::backup_file_with_stamp(path, stamp) {
            Ok(written) => BackupStatus::Written(written),
            Err(e) => {
                warn!("{}", e);
                BackupStatus::Failed
            }
        },
    };

    let result = patch_ini_keys(path, &targets)?;
    Ok(ApplyOutcome::Patched { result, backup })
}

/// Best-effort backup, true if any backup file was written
pub fn backup(path: &Path) -> bool {
    backup_file(path).is_ok()
}
