//! In-memory store, for tests and sessions that should not touch disk

use serde_json::Value;

use super::{ScoreStore, StoreData, StoreError};
use crate::highscores::{HighScoreEntry, Statistics};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: StoreData,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }
}

impl ScoreStore for MemoryStore {
    fn save_score(&mut self, entry: HighScoreEntry) -> Result<(), StoreError> {
        self.data.save_score(entry);
        Ok(())
    }

    fn high_scores(&self, limit: usize) -> Result<Vec<HighScoreEntry>, StoreError> {
        Ok(self.data.high_scores(limit))
    }

    fn potential_rank(&self, score: u32) -> Result<usize, StoreError> {
        Ok(self.data.scores.potential_rank(score))
    }

    fn statistics(&self) -> Result<Option<Statistics>, StoreError> {
        Ok(self.data.statistics.clone())
    }

    fn save_setting(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.data.settings.insert(key.to_string(), value);
        Ok(())
    }

    fn load_setting(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.data.settings.get(key).cloned())
    }
}
