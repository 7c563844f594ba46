//! Rewrites target keys in place and appends the missing ones

use std::path::Path;

use log::{debug, error, info};

use super::codec::{ends_with_terminator, parse_entry};
use super::{ConfigDocument, PatchError};
use crate::models::{KeyTarget, PatchResult};
use crate::utils::file::write_atomic;
use crate::utils::url::urls_equal;

/// The bytes a patch would produce, without touching storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPatch {
    /// New document content, `None` when it would equal the original
    pub content: Option<Vec<u8>>,
    pub changed: Vec<String>,
    pub added: Vec<String>,
}

/// Computes the patched form of `doc`
///
/// A line whose key matches a target (first target in caller order wins) is
/// replaced by `key="value"` plus the line's own terminator, unless its value
/// already compares equal to the target value, in which case the line is kept
/// verbatim. Every other line is copied byte for byte. Targets never seen are
/// appended using the document's dominant line break.
///
/// Quoting is only normalized on lines that change: `BaseUrl=http://x/` stays
/// unquoted and out of `changed` when the target is `http://x/`.
pub fn render_patch(doc: &ConfigDocument, targets: &[KeyTarget]) -> RenderedPatch {
    let eol = doc.dominant_eol().as_bytes();
    let mut out = Vec::with_capacity(doc.len() + 256);
    let mut seen = vec![false; targets.len()];
    let mut changed: Vec<String> = Vec::new();
    let mut added = Vec::new();

    for line in doc.lines() {
        let hit = parse_entry(line.content).and_then(|entry| {
            targets
                .iter()
                .position(|t| t.matches(&entry.key))
                .map(|idx| (idx, entry))
        });

        let Some((idx, entry)) = hit else {
            out.extend_from_slice(line.raw);
            continue;
        };

        let target = &targets[idx];
        seen[idx] = true;
        // an equal value keeps its quoting, even when other keys are rewritten
        if urls_equal(&entry.value, &target.value) {
            out.extend_from_slice(line.raw);
            continue;
        }

        debug!("Rewriting {} (was {:?})", target.key, entry.value);
        out.extend_from_slice(target.assignment().as_bytes());
        out.extend_from_slice(line.eol.as_bytes());
        if !changed.contains(&target.key) {
            changed.push(target.key.clone());
        }
    }

    for (target, _) in targets.iter().zip(&seen).filter(|(_, seen)| !**seen) {
        if !ends_with_terminator(&out) {
            out.extend_from_slice(eol);
        }
        debug!("Appending {}", target.key);
        out.extend_from_slice(target.assignment().as_bytes());
        out.extend_from_slice(eol);
        added.push(target.key.clone());
    }

    if out == doc.as_bytes() {
        return RenderedPatch::default();
    }

    RenderedPatch {
        content: Some(out),
        changed,
        added,
    }
}

/// Patches the file at `path` so every target key holds its target value
///
/// The file is read, rendered with [`render_patch`] and written back only if
/// the bytes actually differ; a no-op patch leaves content and modification
/// time alone and reports empty `changed`/`added` lists.
pub fn patch_ini_keys(path: &Path, targets: &[KeyTarget]) -> Result<PatchResult, PatchError> {
    let doc = ConfigDocument::read(path)?;
    let rendered = render_patch(&doc, targets);

    let Some(content) = rendered.content else {
        info!("{} already up to date", path.display());
        return Ok(PatchResult::default());
    };

    write_atomic(path, &content).map_err(|source| {
        error!("Failed to write {}: {}", path.display(), source);
        PatchError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;

    Ok(PatchResult {
        changed: rendered.changed,
        added: rendered.added,
        written: true,
    })
}
