//! Read-only check whether a document already holds the target values

use log::debug;

use super::codec::parse_entry;
use super::ConfigDocument;
use crate::models::KeyTarget;
use crate::utils::url::normalize_url_for_compare;

/// Returns true if every target key is present and holds its target value
///
/// Values are compared after [`normalize_url_for_compare`] on both sides, so
/// `BaseUrl='x:8385'` counts as configured for `http://x:8385/`. A key that
/// appears several times must match on every occurrence; the first mismatch
/// ends the scan. A key that never appears means an append is needed, so the
/// document is not configured.
///
/// This never touches storage.
pub fn ini_already_configured(doc: &ConfigDocument, targets: &[KeyTarget]) -> bool {
    let wanted: Vec<String> = targets
        .iter()
        .map(|t| normalize_url_for_compare(&t.value))
        .collect();
    let mut seen = vec![false; targets.len()];

    for line in doc.lines() {
        let Some(entry) = parse_entry(line.content) else {
            continue;
        };
        let Some(idx) = targets.iter().position(|t| t.matches(&entry.key)) else {
            continue;
        };

        seen[idx] = true;
        if normalize_url_for_compare(&entry.value) != wanted[idx] {
            debug!(
                "Key {} holds {:?}, expected {:?}",
                targets[idx].key, entry.value, wanted[idx]
            );
            return false;
        }
    }

    match targets.iter().zip(&seen).find(|(_, seen)| !**seen) {
        Some((missing, _)) => {
            debug!("Key {} is missing", missing.key);
            false
        }
        None => true,
    }
}
