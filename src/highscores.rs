//! High score persistence
//!
//! One number per game key, stored through any [`KeyValueStore`]. A stored
//! value only ever goes up: writes that don't beat it are dropped. Anything
//! unreadable counts as zero.

use crate::persistence::KeyValueStore;

/// Prefix applied to every game key in the backing store
pub const KEY_PREFIX: &str = "zyngrid_high_score_";

/// The high-score contract the session talks to
pub trait ScoreStore {
    /// Stored score for `key`, or 0 if there is none
    fn get(&self, key: &str) -> u64;
    /// Store `value` if it beats the current entry. Returns true if written.
    fn set(&mut self, key: &str, value: u64) -> bool;
}

/// [`ScoreStore`] on top of a key-value backend
#[derive(Debug, Clone, Default)]
pub struct HighScores<S> {
    store: S,
}

impl<S: KeyValueStore> HighScores<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Forget the score for `key`
    pub fn clear(&mut self, key: &str) {
        if let Err(e) = self.store.remove_item(&storage_key(key)) {
            log::warn!("Failed to clear high score '{}': {}", key, e);
        }
    }
}

fn storage_key(key: &str) -> String {
    format!("{}{}", KEY_PREFIX, key)
}

impl<S: KeyValueStore> ScoreStore for HighScores<S> {
    fn get(&self, key: &str) -> u64 {
        match self.store.get_item(&storage_key(key)) {
            Ok(Some(raw)) => serde_json::from_str(raw.trim()).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable high score for '{}': {}", key, e);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Failed to read high score '{}': {}", key, e);
                0
            }
        }
    }

    fn set(&mut self, key: &str, value: u64) -> bool {
        let current = self.get(key);
        if value <= current {
            return false;
        }
        match self.store.set_item(&storage_key(key), &value.to_string()) {
            Ok(()) => {
                log::info!("New high score for '{}': {} (was {})", key, value, current);
                true
            }
            Err(e) => {
                log::warn!("Failed to save high score '{}': {}", key, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_missing_score_is_zero() {
        let scores = HighScores::new(MemoryStore::new());
        assert_eq!(scores.get("pixeljumper_endless"), 0);
    }

    #[test]
    fn test_only_higher_scores_are_written() {
        let mut scores = HighScores::new(MemoryStore::new());
        assert!(!scores.set("game", 0));
        assert!(scores.set("game", 50));
        assert!(!scores.set("game", 50));
        assert!(!scores.set("game", 20));
        assert_eq!(scores.get("game"), 50);
        assert!(scores.set("game", 51));
        assert_eq!(scores.get("game"), 51);
    }

    #[test]
    fn test_keys_are_independent() {
        let mut scores = HighScores::new(MemoryStore::new());
        scores.set("a", 10);
        scores.set("b", 20);
        assert_eq!(scores.get("a"), 10);
        assert_eq!(scores.get("b"), 20);
        scores.clear("a");
        assert_eq!(scores.get("a"), 0);
    }

    #[test]
    fn test_garbage_value_reads_as_zero() {
        let mut store = MemoryStore::new();
        store.set_item("zyngrid_high_score_game", "lots").unwrap();
        let mut scores = HighScores::new(store);
        assert_eq!(scores.get("game"), 0);
        // And can be overwritten by a real score
        assert!(scores.set("game", 5));
        assert_eq!(scores.get("game"), 5);
    }

    #[test]
    fn test_reads_scores_saved_by_site() {
        let mut store = MemoryStore::new();
        store
            .set_item("zyngrid_high_score_pixeljumper_endless", "120")
            .unwrap();
        let mut scores = HighScores::new(store);
        assert_eq!(scores.get("pixeljumper_endless"), 120);
        assert!(scores.set("pixeljumper_endless", 130));
        assert_eq!(
            scores
                .store()
                .get_item("zyngrid_high_score_pixeljumper_endless")
                .unwrap()
                .as_deref(),
            Some("130")
        );
    }

    #[test]
    fn test_unavailable_storage_is_normalised() {
        let mut scores = HighScores::new(MemoryStore::unavailable());
        assert_eq!(scores.get("game"), 0);
        assert!(!scores.set("game", 100));
    }

    proptest! {
        #[test]
        fn stored_score_is_running_maximum(values in prop::collection::vec(0u64..1_000_000, 0..40)) {
            let mut scores = HighScores::new(MemoryStore::new());
            let mut previous = 0;
            for v in &values {
                scores.set("k", *v);
                let now = scores.get("k");
                prop_assert!(now >= previous);
                previous = now;
            }
            prop_assert_eq!(previous, values.iter().copied().max().unwrap_or(0));
        }
    }
}
