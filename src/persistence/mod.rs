//! Score, statistics and settings persistence
//!
//! Features:
//! - `ScoreStore` trait with in-memory and JSON file backends
//! - Versioned JSON document
//! - Atomic writes (tmp → save)
//! - `Records`: tolerant facade that never lets a storage fault reach gameplay

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::highscores::{HighScoreEntry, HighScores, Statistics};

/// Current on-disk document version
pub const STORE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored data is malformed: {0}")]
    Format(#[from] serde_json::Error),

    #[error("unsupported store version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Backing store for round results and settings
pub trait ScoreStore {
    /// Append a finished game and fold it into the statistics
    fn save_score(&mut self, entry: HighScoreEntry) -> Result<(), StoreError>;

    /// Best `limit` scores, highest first, newest first among equals
    fn high_scores(&self, limit: usize) -> Result<Vec<HighScoreEntry>, StoreError>;

    /// Rank `score` would take if saved now, ties going to the newer score
    fn potential_rank(&self, score: u32) -> Result<usize, StoreError>;

    /// `None` until the first game is saved
    fn statistics(&self) -> Result<Option<Statistics>, StoreError>;

    fn save_setting(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    fn load_setting(&self, key: &str) -> Result<Option<Value>, StoreError>;
}

/// Everything a store keeps, as one serializable document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreData {
    pub version: u32,
    pub scores: HighScores,
    pub statistics: Option<Statistics>,
    pub settings: BTreeMap<String, Value>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            scores: HighScores::new(),
            statistics: None,
            settings: BTreeMap::new(),
        }
    }
}

impl StoreData {
    pub fn save_score(&mut self, entry: HighScoreEntry) {
        self.statistics
            .get_or_insert_with(Statistics::default)
            .record(entry.score, entry.timestamp);
        self.scores.add(entry);
    }

    pub fn high_scores(&self, limit: usize) -> Vec<HighScoreEntry> {
        self.scores.top(limit).to_vec()
    }

    fn check_version(&self) -> Result<(), StoreError> {
        if self.version != STORE_VERSION {
            return Err(StoreError::Version {
                found: self.version,
                expected: STORE_VERSION,
            });
        }
        Ok(())
    }
}

/// Wall-clock time as Unix milliseconds
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Tolerant view over a store.
///
/// Writes that fail are logged and dropped; reads that fail return empty or
/// default values.
#[derive(Debug)]
pub struct Records<S: ScoreStore> {
    store: S,
}

impl<S: ScoreStore> Records<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save a finished game stamped with the current time
    pub fn save_score(&mut self, name: &str, score: u32, level: u32) -> bool {
        let entry = HighScoreEntry::new(name, score, level, now_ms());
        match self.store.save_score(entry) {
            Ok(()) => {
                log::info!("Saved score {} (level {}) for {}", score, level, name);
                true
            }
            Err(e) => {
                log::warn!("Could not save score {} for {}: {}", score, name, e);
                false
            }
        }
    }

    pub fn high_scores(&self, limit: usize) -> Vec<HighScoreEntry> {
        self.store.high_scores(limit).unwrap_or_else(|e| {
            log::warn!("High scores unavailable: {}", e);
            Vec::new()
        })
    }

    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        self.store
            .potential_rank(score)
            .inspect_err(|e| log::warn!("Rank for {} unavailable: {}", score, e))
            .ok()
    }

    pub fn statistics(&self) -> Statistics {
        match self.store.statistics() {
            Ok(stats) => stats.unwrap_or_default(),
            Err(e) => {
                log::warn!("Statistics unavailable: {}", e);
                Statistics::default()
            }
        }
    }

    pub fn save_setting<T: Serialize>(&mut self, key: &str, value: &T) -> bool {
        let result = serde_json::to_value(value)
            .map_err(StoreError::from)
            .and_then(|json| self.store.save_setting(key, json));
        if let Err(e) = result {
            log::warn!("Could not save setting {}: {}", key, e);
            return false;
        }
        true
    }

    /// Stored value for `key`, or `default` if missing, unreadable or of the wrong shape
    pub fn load_setting<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.store.load_setting(key) {
            Ok(Some(json)) => serde_json::from_value(json).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed setting {}: {}", key, e);
                default
            }),
            Ok(None) => default,
            Err(e) => {
                log::warn!("Setting {} unavailable: {}", key, e);
                default
            }
        }
    }
}
