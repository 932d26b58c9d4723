//! Leaderboard storage.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("nickname is empty")]
    EmptyNickname,
    #[error("leaderboard I/O on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode leaderboard: {0}")]
    Encode(#[from] ron::Error),
    #[error("could not decode leaderboard: {0}")]
    Decode(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    /// Unix time in milliseconds.
    pub recorded_at: u64,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u32, recorded_at: u64) -> Self {
        Self {
            name: name.into(),
            score,
            recorded_at,
        }
    }

    /// Entry stamped with the current wall-clock time.
    pub fn now(name: impl Into<String>, score: u32) -> Self {
        Self::new(name, score, unix_millis())
    }
}

pub fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Where finished games are recorded.
///
/// `submit` returns `Ok(false)` for an exact duplicate, which is ignored.
/// Entries are never overwritten.
pub trait ScoreStore {
    fn submit(&mut self, entry: ScoreEntry) -> Result<bool, ScoreError>;

    /// Best `n` entries, highest score first, newest first on ties.
    fn top_n(&self, n: usize) -> Result<Vec<ScoreEntry>, ScoreError>;
}

fn validate(entry: &ScoreEntry) -> Result<(), ScoreError> {
    if entry.name.trim().is_empty() {
        log::debug!("Rejecting score {} with empty nickname", entry.score);
        return Err(ScoreError::EmptyNickname);
    }
    Ok(())
}

fn insert_sorted(entries: &mut Vec<ScoreEntry>, entry: ScoreEntry) -> bool {
    if entries.contains(&entry) {
        return false;
    }
    entries.push(entry);
    entries.sort_by(|a, b| b.score.cmp(&a.score).then(b.recorded_at.cmp(&a.recorded_at)));
    true
}

#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    entries: Vec<ScoreEntry>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn submit(&mut self, entry: ScoreEntry) -> Result<bool, ScoreError> {
        validate(&entry)?;
        Ok(insert_sorted(&mut self.entries, entry))
    }

    fn top_n(&self, n: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(self.entries.iter().take(n).cloned().collect())
    }
}

/// Leaderboard kept in a RON file, rewritten on every submission.
#[derive(Debug)]
pub struct RonScoreStore {
    path: PathBuf,
    entries: Vec<ScoreEntry>,
}

impl RonScoreStore {
    /// Open the leaderboard at `path`. A missing file is an empty board.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScoreError> {
        let path = path.as_ref().to_path_buf();
        let mut entries = if path.exists() {
            let data = std::fs::read_to_string(&path).map_err(|source| ScoreError::Io {
                path: path.clone(),
                source,
            })?;
            ron::from_str::<Vec<ScoreEntry>>(&data)?
        } else {
            Vec::new()
        };
        entries.sort_by(|a, b| b.score.cmp(&a.score).then(b.recorded_at.cmp(&a.recorded_at)));
        log::debug!("Leaderboard {:?} opened with {} entries", path, entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), ScoreError> {
        let text = ron::ser::to_string_pretty(&self.entries, ron::ser::PrettyConfig::default())?;
        std::fs::write(&self.path, text).map_err(|source| ScoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ScoreStore for RonScoreStore {
    fn submit(&mut self, entry: ScoreEntry) -> Result<bool, ScoreError> {
        validate(&entry)?;
        if !insert_sorted(&mut self.entries, entry) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn top_n(&self, n: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(self.entries.iter().take(n).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_submitted_entry_is_fetched() {
        let mut store = MemoryScoreStore::new();
        store.submit(ScoreEntry::new("Ace", 420, 1)).unwrap();
        let top = store.top_n(10).unwrap();
        assert_eq!(top, vec![ScoreEntry::new("Ace", 420, 1)]);
    }

    #[test]
    fn score_sorted_descending_ties_newest_first() {
        let mut store = MemoryScoreStore::new();
        store.submit(ScoreEntry::new("a", 100, 1)).unwrap();
        store.submit(ScoreEntry::new("b", 300, 2)).unwrap();
        store.submit(ScoreEntry::new("c", 100, 3)).unwrap();
        let names: Vec<_> = store.top_n(3).unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["b", "c", "a"]);
        assert_eq!(store.top_n(1).unwrap().len(), 1);
    }

    #[test]
    fn score_duplicates_are_ignored() {
        let mut store = MemoryScoreStore::new();
        let entry = ScoreEntry::new("Ace", 200, 7);
        assert!(store.submit(entry.clone()).unwrap());
        assert!(!store.submit(entry).unwrap());
        // Same name and score at a different time is a new run.
        assert!(store.submit(ScoreEntry::new("Ace", 200, 8)).unwrap());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn score_empty_nickname_rejected() {
        let mut store = MemoryScoreStore::new();
        assert!(matches!(
            store.submit(ScoreEntry::new("  ", 50, 1)),
            Err(ScoreError::EmptyNickname)
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn score_ron_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.ron");
        {
            let mut store = RonScoreStore::open(&path).unwrap();
            assert!(store.top_n(10).unwrap().is_empty());
            store.submit(ScoreEntry::new("Ace", 500, 10)).unwrap();
            store.submit(ScoreEntry::new("Bee", 700, 11)).unwrap();
        }
        let store = RonScoreStore::open(&path).unwrap();
        let top = store.top_n(10).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Bee");
        assert_eq!(top[1], ScoreEntry::new("Ace", 500, 10));
    }

    #[test]
    fn score_ron_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.ron");
        std::fs::write(&path, "[(name: ").unwrap();
        assert!(matches!(RonScoreStore::open(&path), Err(ScoreError::Decode(_))));
    }
}
