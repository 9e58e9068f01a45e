//! Best score tracking
//!
//! Persisted as a plain decimal string under [`HighScore::STORAGE_KEY`].

use crate::persistence::KeyValueStore;

/// Best score keeper backed by a [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct HighScore<K: KeyValueStore> {
    store: K,
    best: u32,
}

impl<K: KeyValueStore> HighScore<K> {
    /// Storage key for the best score
    pub const STORAGE_KEY: &'static str = "neonGlideHighScore";

    /// Load the stored best. Missing or unparsable values count as 0.
    pub fn load(store: K) -> Self {
        let best = match store.get(Self::STORAGE_KEY) {
            Some(raw) => parse_score(&raw).unwrap_or_else(|| {
                log::warn!("Ignoring unreadable best score {:?}", raw);
                0
            }),
            None => {
                log::info!("No best score found, starting fresh");
                0
            }
        };
        Self { store, best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Whether a finished run would set a new best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Record a finished run. Returns true (and persists) on a new best.
    pub fn record(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        self.store.set(Self::STORAGE_KEY, &score.to_string());
        log::info!("New best score: {}", score);
        true
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut K {
        &mut self.store
    }

    /// Give the backing store back (for reloading)
    pub fn into_store(self) -> K {
        self.store
    }
}

/// Parse a stored score. Accepts a leading integer the way the browser's
/// `parseInt` does, so "12.0" and " 7" still load.
fn parse_score(raw: &str) -> Option<u32> {
    let trimmed = raw.trim_start();
    let digits: &str = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    digits.parse().ok()
}
