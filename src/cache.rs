// 🗃️ Dataset Cache - memoized loads keyed by file path; word tables also by highlight set
// Source files are static for the process lifetime, so entries are never
// invalidated implicitly. Failed loads are not cached.

use crate::dataset::{load_artists, load_word_frequencies, ArtistTable, LoadOptions, WordTable};
use crate::error::LoadError;
use crate::present::HighlightSet;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Path-keyed store of immutable snapshots.
#[derive(Debug)]
struct Memo<K, T> {
    entries: RwLock<HashMap<K, Arc<T>>>,
}

impl<K: Eq + Hash + Clone, T> Memo<K, T> {
    fn new() -> Self {
        Memo {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn get_or_try_insert<F>(&self, key: &K, load: F) -> Result<Arc<T>, LoadError>
    where
        F: FnOnce() -> Result<T, LoadError>,
    {
        if let Some(hit) = self.entries.read().unwrap_or_else(PoisonError::into_inner).get(key) {
            return Ok(Arc::clone(hit));
        }

        let loaded = Arc::new(load()?);

        // Another caller may have raced us; keep whichever landed first
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(key.clone()).or_insert(loaded);
        Ok(Arc::clone(entry))
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Memoized loader for both dataset kinds. Safe to share between threads.
#[derive(Debug)]
pub struct DatasetCache {
    artists: Memo<(PathBuf, LoadOptions), ArtistTable>,
    words: Memo<(PathBuf, Vec<String>), WordTable>,
}

impl DatasetCache {
    pub fn new() -> Self {
        DatasetCache {
            artists: Memo::new(),
            words: Memo::new(),
        }
    }

    /// Artist table for `path`, read from disk only on the first request
    pub fn artists(&self, path: &Path, options: &LoadOptions) -> Result<Arc<ArtistTable>, LoadError> {
        let key = (path.to_path_buf(), options.clone());
        self.artists.get_or_try_insert(&key, || {
            debug!(path = %path.display(), "artist cache miss");
            load_artists(path, options)
        })
    }

    /// Word-frequency table for `path`, flagged against `highlight`
    pub fn words(&self, path: &Path, highlight: &HighlightSet) -> Result<Arc<WordTable>, LoadError> {
        let key = (path.to_path_buf(), highlight.words().to_vec());
        self.words.get_or_try_insert(&key, || {
            debug!(path = %path.display(), "word cache miss");
            load_word_frequencies(path, highlight)
        })
    }

    /// Number of cached snapshots across both kinds
    pub fn len(&self) -> usize {
        self.artists.len() + self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every snapshot; the next request re-reads storage
    pub fn clear(&self) {
        self.artists.clear();
        self.words.clear();
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_repeat_request_returns_same_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artists.csv");
        fs::write(&path, "Name,Nationality\nA,American\n").unwrap();
        let cache = DatasetCache::new();

        let first = cache.artists(&path, &LoadOptions::combined()).unwrap();
        // Storage changes are not observed until the cache is cleared
        fs::write(&path, "Name,Nationality\nA,American\nB,French\n").unwrap();
        let second = cache.artists(&path, &LoadOptions::combined()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
        assert_eq!(cache.len(), 1);

        cache.clear();
        let third = cache.artists(&path, &LoadOptions::combined()).unwrap();
        assert_eq!(third.len(), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");
        let cache = DatasetCache::new();

        assert!(matches!(
            cache.artists(&path, &LoadOptions::combined()),
            Err(LoadError::NotFound { .. })
        ));
        assert!(cache.is_empty());

        fs::write(&path, "Name,Nationality\nA,Kenyan\n").unwrap();
        assert_eq!(cache.artists(&path, &LoadOptions::combined()).unwrap().len(), 1);
    }

    #[test]
    fn test_highlight_set_is_part_of_the_word_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.csv");
        fs::write(&path, "Words,Frequency\ncommunity,15\nequity,9\n").unwrap();
        let cache = DatasetCache::new();
        let community = HighlightSet::new(["community"]);

        let first = cache.words(&path, &community).unwrap();
        let again = cache.words(&path, &HighlightSet::new(["Community"])).unwrap();
        let equity = cache.words(&path, &HighlightSet::new(["equity"])).unwrap();

        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &equity));
        assert!(first.entries[0].highlighted);
        assert!(!first.entries[1].highlighted);
        assert!(!equity.entries[0].highlighted);
        assert!(equity.entries[1].highlighted);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_options_are_part_of_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        fs::write(&path, "Name,Nationality,Gender,Museum,SmallMuseum\nA,Kenyan,Female,Frye,TRUE\n").unwrap();
        let cache = DatasetCache::new();

        let with_header = cache.artists(&path, &LoadOptions::combined()).unwrap();
        let skipped = cache.artists(&path, &LoadOptions::small_museums()).unwrap();

        assert!(!Arc::ptr_eq(&with_header, &skipped));
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped.records()[0].small_museum, Some(true));
        assert_eq!(cache.len(), 2);
    }
}
