//! High score records and play statistics
//!
//! Scores are append-only; ordering is by score, then most recent first.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// How many entries the menu and game over screens show
pub const SHOWN_HIGH_SCORES: usize = 5;

/// A single saved score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Insertion order, assigned by the store
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub score: u32,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

impl HighScoreEntry {
    pub fn new(name: impl Into<String>, score: u32, level: u32, timestamp: u64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            score,
            level,
            timestamp,
        }
    }

    /// Leaderboard order: higher score first, then newer first
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(other.timestamp.cmp(&self.timestamp))
            .then(other.id.cmp(&self.id))
    }
}

/// Leaderboard of every saved score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    #[serde(default)]
    next_id: u64,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, keeping leaderboard order. Returns its 1-based rank.
    pub fn add(&mut self, mut entry: HighScoreEntry) -> usize {
        self.next_id += 1;
        entry.id = self.next_id;

        let pos = self
            .entries
            .iter()
            .position(|e| entry.rank_cmp(e) == Ordering::Less)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        pos + 1
    }

    /// The best `limit` entries
    pub fn top(&self, limit: usize) -> &[HighScoreEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// Rank a new score would take if saved now (ties go to the newer score)
    pub fn potential_rank(&self, score: u32) -> usize {
        self.entries.iter().take_while(|e| e.score > score).count() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Restore order after loading entries from an external source
    pub fn normalize_order(&mut self) {
        self.entries.sort_by(HighScoreEntry::rank_cmp);
        self.next_id = self.entries.iter().map(|e| e.id).max().unwrap_or(0);
    }
}

/// Aggregate play statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub games_played: u32,
    pub total_score: u64,
    pub best_score: u32,
    /// Unix timestamp (ms) of the last saved game
    pub last_played: Option<u64>,
}

impl Statistics {
    /// Fold one finished game into the totals
    pub fn record(&mut self, score: u32, timestamp: u64) {
        self.games_played += 1;
        self.total_score += u64::from(score);
        self.best_score = self.best_score.max(score);
        self.last_played = Some(timestamp);
    }

    pub fn average_score(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.total_score as f32 / self.games_played as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_by_score_then_recency() {
        let mut scores = HighScores::new();
        scores.add(HighScoreEntry::new("ann", 5, 1, 100));
        scores.add(HighScoreEntry::new("bob", 12, 2, 200));
        scores.add(HighScoreEntry::new("cat", 5, 1, 300));
        let rank = scores.add(HighScoreEntry::new("dan", 12, 2, 150));

        assert_eq!(rank, 2);
        let names: Vec<&str> = scores.top(10).iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["bob", "dan", "cat", "ann"]);
        assert_eq!(scores.top(2).len(), 2);
        assert_eq!(scores.top_score(), Some(12));
    }

    #[test]
    fn test_same_timestamp_newest_insert_first() {
        let mut scores = HighScores::new();
        scores.add(HighScoreEntry::new("first", 3, 1, 50));
        scores.add(HighScoreEntry::new("second", 3, 1, 50));
        assert_eq!(scores.entries[0].name, "second");
        assert_eq!(scores.entries[0].id, 2);
    }

    #[test]
    fn test_potential_rank() {
        let mut scores = HighScores::new();
        assert_eq!(scores.potential_rank(0), 1);
        scores.add(HighScoreEntry::new("a", 10, 1, 1));
        scores.add(HighScoreEntry::new("b", 4, 1, 2));
        assert_eq!(scores.potential_rank(11), 1);
        assert_eq!(scores.potential_rank(10), 1);
        assert_eq!(scores.potential_rank(5), 2);
        assert_eq!(scores.potential_rank(1), 3);
    }

    #[test]
    fn test_normalize_order_restores_ids() {
        let mut scores = HighScores {
            entries: vec![
                HighScoreEntry { id: 4, ..HighScoreEntry::new("low", 1, 1, 10) },
                HighScoreEntry { id: 9, ..HighScoreEntry::new("high", 8, 1, 5) },
            ],
            next_id: 0,
        };
        scores.normalize_order();
        assert_eq!(scores.entries[0].name, "high");
        scores.add(HighScoreEntry::new("new", 0, 1, 11));
        assert_eq!(scores.entries[2].id, 10);
    }

    #[test]
    fn test_statistics_record() {
        let mut stats = Statistics::default();
        stats.record(7, 1000);
        stats.record(3, 2000);
        assert_eq!(
            stats,
            Statistics {
                games_played: 2,
                total_score: 10,
                best_score: 7,
                last_played: Some(2000),
            }
        );
        assert_eq!(stats.average_score(), 5.0);
    }
}
