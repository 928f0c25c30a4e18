//! Tag reconciliation.
//!
//! Computes the set difference between desired and observed tag maps and
//! issues the minimal add/remove calls, never a full replace. Removal runs
//! before addition to avoid transient duplicate-intent states. Identical
//! maps produce zero remote calls.

use tracing::{debug, instrument};

use controltower_client::directory::DirectoryClient;
use controltower_client::ids::AccountId;
use controltower_client::types::TagMap;

use crate::error::{LifecycleError, LifecycleResult};

/// The minimal set of tag mutations turning one map into another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    /// Keys present in the old map but not the new one.
    pub removed: Vec<String>,
    /// Entries new or changed in the new map.
    pub updated: TagMap,
}

impl TagDiff {
    /// Diff two tag maps. Keys are case-sensitive.
    #[must_use]
    pub fn between(old: &TagMap, new: &TagMap) -> Self {
        let mut removed: Vec<String> = old
            .keys()
            .filter(|k| !new.contains_key(*k))
            .cloned()
            .collect();
        removed.sort_unstable();

        let updated: TagMap = new
            .iter()
            .filter(|(k, v)| old.get(*k) != Some(v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self { removed, updated }
    }

    /// Whether the diff requires no remote calls at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.updated.is_empty()
    }
}

/// Apply the minimal tag diff to an account.
///
/// Untags first, then tags; no-op when old and new are equal. Idempotent on
/// repeated identical input.
#[instrument(skip(directory, old, new))]
pub async fn reconcile_tags(
    directory: &dyn DirectoryClient,
    account_id: &AccountId,
    old: &TagMap,
    new: &TagMap,
) -> LifecycleResult<()> {
    let diff = TagDiff::between(old, new);
    if diff.is_empty() {
        return Ok(());
    }

    debug!(
        removed = diff.removed.len(),
        updated = diff.updated.len(),
        "Reconciling account tags"
    );

    if !diff.removed.is_empty() {
        directory
            .untag_resource(account_id, diff.removed)
            .await
            .map_err(|e| {
                LifecycleError::transport("untagging", account_id.as_str().to_string(), e)
            })?;
    }

    if !diff.updated.is_empty() {
        directory
            .tag_resource(account_id, diff.updated)
            .await
            .map_err(|e| {
                LifecycleError::transport("tagging", account_id.as_str().to_string(), e)
            })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> TagMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_diff_removed_and_updated() {
        let old = tags(&[("a", "1"), ("b", "2")]);
        let new = tags(&[("b", "2"), ("c", "3")]);

        let diff = TagDiff::between(&old, &new);
        assert_eq!(diff.removed, vec!["a".to_string()]);
        assert_eq!(diff.updated, tags(&[("c", "3")]));
    }

    #[test]
    fn test_diff_detects_changed_values() {
        let old = tags(&[("env", "dev")]);
        let new = tags(&[("env", "prod")]);

        let diff = TagDiff::between(&old, &new);
        assert!(diff.removed.is_empty());
        assert_eq!(diff.updated, tags(&[("env", "prod")]));
    }

    #[test]
    fn test_diff_no_op_on_equal_maps() {
        let map = tags(&[("a", "1"), ("b", "2")]);
        assert!(TagDiff::between(&map, &map).is_empty());
        assert!(TagDiff::between(&TagMap::new(), &TagMap::new()).is_empty());
    }

    #[test]
    fn test_diff_round_trip_reconstructs_new_map() {
        let cases = vec![
            (tags(&[("a", "1"), ("b", "2")]), tags(&[("b", "2"), ("c", "3")])),
            (TagMap::new(), tags(&[("x", "y")])),
            (tags(&[("x", "y")]), TagMap::new()),
            (tags(&[("k", "old")]), tags(&[("k", "new")])),
        ];

        for (old, new) in cases {
            let diff = TagDiff::between(&old, &new);
            let mut applied = old.clone();
            for key in &diff.removed {
                applied.remove(key);
            }
            for (k, v) in &diff.updated {
                applied.insert(k.clone(), v.clone());
            }
            assert_eq!(applied, new);
        }
    }

    #[test]
    fn test_removed_keys_are_sorted() {
        let old = tags(&[("z", "1"), ("a", "1"), ("m", "1")]);
        let diff = TagDiff::between(&old, &TagMap::new());
        assert_eq!(diff.removed, vec!["a", "m", "z"]);
    }
}
