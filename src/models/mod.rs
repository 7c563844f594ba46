//! Value types shared by the patch engine and the command line front end.

use std::path::PathBuf;

use crate::ini::PatchError;
use crate::utils::string::starts_with_insensitive;

/// A configuration key the engine enforces a value for
///
/// Key names compare ASCII case-insensitively; `key` keeps the spelling the
/// caller used, which is also the spelling written to new or rewritten lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTarget {
    pub key: String,
    pub value: String,
}

impl KeyTarget {
    /// Creates a target, rejecting key names that could never round-trip
    /// through a `key=value` line
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Result<Self, PatchError> {
        let key = key.into();
        let trimmed = crate::utils::trim(&key);
        if trimmed.is_empty()
            || trimmed.len() != key.len()
            || key.contains(&['=', '\r', '\n'][..])
        {
            return Err(PatchError::InvalidKey(key));
        }
        Ok(KeyTarget {
            key,
            value: value.into(),
        })
    }

    /// Builds one target per key, all sharing `value`
    ///
    /// Keys repeated with a different case are dropped after their first
    /// appearance.
    pub fn for_keys<I, S>(keys: I, value: &str) -> Result<Vec<KeyTarget>, PatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut targets: Vec<KeyTarget> = Vec::new();
        for key in keys {
            let target = KeyTarget::new(key.as_ref(), value)?;
            if !targets.iter().any(|t| t.matches(&target.key)) {
                targets.push(target);
            }
        }
        Ok(targets)
    }

    /// Returns true if `key` names this target, ignoring ASCII case
    pub fn matches(&self, key: &str) -> bool {
        key.len() == self.key.len() && starts_with_insensitive(key, &self.key)
    }

    /// The canonical line body written by the patcher, `key="value"`
    pub fn assignment(&self) -> String {
        format!("{}=\"{}\"", self.key, self.value)
    }
}

/// Outcome of a patch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchResult {
    /// Keys found in the document and rewritten, in document order
    pub changed: Vec<String>,
    /// Keys missing from the document and appended, in caller order
    pub added: Vec<String>,
    /// Whether the file was written at all
    pub written: bool,
}

impl PatchResult {
    pub fn is_noop(&self) -> bool {
        !self.written
    }

    /// `Changed: a, b` and `Added: c` lines, omitting empty lists
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.changed.is_empty() {
            lines.push(format!("Changed: {}", self.changed.join(", ")));
        }
        if !self.added.is_empty() {
            lines.push(format!("Added: {}", self.added.join(", ")));
        }
        lines
    }
}

/// What happened to the backup taken before a patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupStatus {
    /// Backups are turned off
    Skipped,
    Written(PathBuf),
    /// No backup could be made; the patch went ahead anyway
    Failed,
}

/// Outcome of a full check, back up and patch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Every key already held the address; nothing was backed up or written
    AlreadyConfigured,
    Patched {
        result: PatchResult,
        backup: BackupStatus,
    },
}
