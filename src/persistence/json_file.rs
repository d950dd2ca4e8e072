//! Single-document JSON file store
//!
//! The whole document is rewritten on every change: serialized to a sibling
//! `.tmp` file, then renamed over the save so a crash never leaves a torn file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{ScoreStore, StoreData, StoreError};
use crate::highscores::{HighScoreEntry, Statistics};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: StoreData,
}

impl JsonFileStore {
    /// Open `path`, starting empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(json) => {
                let mut data: StoreData = serde_json::from_str(&json)?;
                data.check_version()?;
                data.scores.normalize_order();
                log::info!(
                    "Loaded {} scores from {}",
                    data.scores.entries.len(),
                    path.display()
                );
                data
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No save file at {}, starting fresh", path.display());
                StoreData::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the document and keep it only once it is
    /// on disk
    fn commit(&mut self, change: impl FnOnce(&mut StoreData)) -> Result<(), StoreError> {
        let mut next = self.data.clone();
        change(&mut next);

        let json = serde_json::to_string_pretty(&next)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        self.data = next;
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn save_score(&mut self, entry: HighScoreEntry) -> Result<(), StoreError> {
        self.commit(|data| data.save_score(entry))
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
        self.commit(|data| {
            data.settings.insert(key.to_string(), value);
        })
    }

    fn load_setting(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.data.settings.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_path(name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!(
            "flappy-core-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_reopen_keeps_scores_and_settings() {
        let path = temp_path("reopen");
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store
                .save_score(HighScoreEntry::new("ann", 3, 1, 100))
                .unwrap();
            store
                .save_score(HighScoreEntry::new("bob", 8, 2, 200))
                .unwrap();
            store
                .save_setting("volume", serde_json::json!(0.25))
                .unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        let top = store.high_scores(10).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "bob");
        assert_eq!(store.statistics().unwrap().unwrap().games_played, 2);
        assert_eq!(
            store.load_setting("volume").unwrap(),
            Some(serde_json::json!(0.25))
        );
        assert!(!path.with_extension("tmp").exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_write_leaves_document_unchanged() {
        let dir = env::temp_dir().join(format!("flappy-core-gone-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let mut store = JsonFileStore::open(dir.join("scores.json")).unwrap();
        assert_eq!(store.path().parent(), Some(dir.as_path()));

        fs::remove_dir_all(&dir).unwrap();
        assert!(store.save_score(HighScoreEntry::new("ann", 7, 2, 100)).is_err());
        assert!(store.save_setting("volume", serde_json::json!(0.5)).is_err());
        assert!(store.high_scores(10).unwrap().is_empty());
        assert_eq!(store.statistics().unwrap(), None);
        assert_eq!(store.load_setting("volume").unwrap(), None);

        // The failed game must not ride along with the next successful write
        fs::create_dir_all(&dir).unwrap();
        store.save_score(HighScoreEntry::new("bob", 3, 1, 200)).unwrap();
        let reopened = JsonFileStore::open(store.path()).unwrap();
        let top = reopened.high_scores(10).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "bob");
        assert_eq!(reopened.statistics().unwrap().unwrap().games_played, 1);
        assert_eq!(reopened.potential_rank(5).unwrap(), 1);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::Format(_))
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_future_version_rejected() {
        let path = temp_path("version");
        let mut data = StoreData::default();
        data.version = 99;
        fs::write(&path, serde_json::to_string(&data).unwrap()).unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::Version { found: 99, .. })
        ));
        let _ = fs::remove_file(&path);
    }
}
