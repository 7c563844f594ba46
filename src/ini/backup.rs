//! Sidecar backups taken before a file is patched
//!
//! A backup lives next to the original as `<file>.bak.<YYYYMMDD_HHMMSS>`.
//! When that copy cannot be made the static `<file>.bak` is (re)written
//! instead. Callers treat a failed backup as a warning and patch anyway.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{debug, info, warn};
use thiserror::Error;

use crate::utils::file::{read_all, write_atomic};

pub const BACKUP_SUFFIX: &str = ".bak";

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const STAMP_LEN: usize = 15;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Failed to copy {} to {}: {}", .from.display(), .to.display(), .source)]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No backup found for {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to restore {} from {}: {}", .path.display(), .backup.display(), .source)]
    Restore {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Local time stamp used in backup names, sortable, second resolution
pub fn now_stamp() -> String {
    Local::now().format(STAMP_FORMAT).to_string()
}

/// `<path>.bak.<stamp>`
pub fn timestamped_backup_path(path: &Path, stamp: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    name.push(".");
    name.push(stamp);
    PathBuf::from(name)
}

/// `<path>.bak`
pub fn static_backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Copies `path` to a timestamped sidecar, falling back to `<path>.bak`
///
/// # Returns
/// * `Ok(PathBuf)` - Where the backup was written
/// * `Err(BackupError)` - Neither copy succeeded
pub fn backup_file(path: &Path) -> Result<PathBuf, BackupError> {
    backup_file_with_stamp(path, &now_stamp())
}

/// [`backup_file`] with an explicit time stamp
pub fn backup_file_with_stamp(path: &Path, stamp: &str) -> Result<PathBuf, BackupError> {
    let stamped = timestamped_backup_path(path, stamp);
    match copy_new(path, &stamped) {
        Ok(()) => {
            info!("Backup written to {}", stamped.display());
            return Ok(stamped);
        }
        Err(e) => debug!("Timestamped backup {} failed: {}", stamped.display(), e),
    }

    let fallback = static_backup_path(path);
    fs::copy(path, &fallback).map_err(|source| BackupError::Copy {
        from: path.to_path_buf(),
        to: fallback.clone(),
        source,
    })?;
    warn!(
        "Timestamped backup unavailable, wrote {} instead",
        fallback.display()
    );
    Ok(fallback)
}

/// Copies `src` to `dst`, refusing to overwrite an existing `dst`
fn copy_new(src: &Path, dst: &Path) -> io::Result<()> {
    let mut input = File::open(src)?;
    let mut output = OpenOptions::new().write(true).create_new(true).open(dst)?;
    let copied = io::copy(&mut input, &mut output).and_then(|_| output.sync_all());
    if copied.is_err() {
        drop(output);
        let _ = fs::remove_file(dst);
    }
    copied
}

fn is_stamp(s: &str) -> bool {
    s.len() == STAMP_LEN
        && s.bytes()
            .enumerate()
            .all(|(i, b)| if i == 8 { b == b'_' } else { b.is_ascii_digit() })
}

/// The most recent backup of `path`, if any
///
/// Timestamped sidecars win over the static `.bak`; among them the newest
/// stamp wins.
pub fn latest_backup(path: &Path) -> Option<PathBuf> {
    let file_name = path.file_name()?.to_str()?;
    let prefix = format!("{}{}.", file_name, BACKUP_SUFFIX);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let newest = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.strip_prefix(&prefix).is_some_and(is_stamp))
        .max();

    match newest {
        Some(name) => Some(dir.join(name)),
        None => {
            let fallback = static_backup_path(path);
            fallback.is_file().then_some(fallback)
        }
    }
}

/// Replaces `path` with its most recent backup
///
/// The backup itself is kept so a restore can be repeated.
pub fn restore_backup(path: &Path) -> Result<PathBuf, BackupError> {
    let backup = latest_backup(path).ok_or_else(|| BackupError::NotFound(path.to_path_buf()))?;
    let restore_err = |source: io::Error| BackupError::Restore {
        path: path.to_path_buf(),
        backup: backup.clone(),
        source,
    };

    let content = read_all(&backup).map_err(restore_err)?;
    write_atomic(path, &content).map_err(restore_err)?;
    info!("Restored {} from {}", path.display(), backup.display());
    Ok(backup)
}
