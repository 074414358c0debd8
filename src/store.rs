//! Persistence for the two movie lists.
//!
//! [`Storage`] is the string-keyed port (browser `localStorage`, a directory of
//! files, or a hash map in tests). [`MovieStore`] layers the JSON encoding of
//! the lists on top of it. Reads never fail: absent or unparseable data is an
//! empty list, and a record that does not parse is skipped on its own. Writes
//! replace the whole list.

use crate::model::{ListKind, Movie};
use foldhash::HashMap;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode list: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// String key/value storage, the shape of the browser's `localStorage`.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

/// In-memory storage. Used by tests and by previews that must not touch disk.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value, for asserting on the persisted text.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Reads and writes whole lists as JSON arrays.
#[derive(Debug, Default)]
pub struct MovieStore<S> {
    storage: S,
}

impl<S: Storage> MovieStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Loads a list. Missing, unreadable or malformed data yields an empty list.
    pub fn load(&self, list: ListKind) -> Vec<Movie> {
        let key = list.storage_key();
        let raw = match self.storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(key, error = %err, "could not read list, using empty list");
                return Vec::new();
            }
        };

        let records = match serde_json::from_str::<Option<Vec<Value>>>(&raw) {
            Ok(records) => records.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(key, error = %err, "stored list is not an array, using empty list");
                return Vec::new();
            }
        };

        records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<Movie>(record) {
                Ok(movie) => Some(movie),
                Err(err) => {
                    tracing::warn!(key, index, error = %err, "skipping malformed movie record");
                    None
                }
            })
            .collect()
    }

    /// Replaces the stored list with `movies`.
    pub fn save(&mut self, list: ListKind, movies: &[Movie]) -> Result<()> {
        let encoded = serde_json::to_string(movies)?;
        self.storage.set_item(list.storage_key(), &encoded)?;
        tracing::debug!(key = list.storage_key(), len = movies.len(), "saved list");
        Ok(())
    }

    /// Removes the stored list entirely; the next load sees an empty list.
    pub fn clear(&mut self, list: ListKind) -> Result<()> {
        self.storage.remove_item(list.storage_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dune() -> Movie {
        Movie::new("Dune", "Spice", Some("/d.jpg".to_string()))
    }

    #[test]
    fn test_load_absent_key_is_empty() {
        let store = MovieStore::new(MemoryStorage::new());
        assert!(store.load(ListKind::Watchlist).is_empty());
        assert!(store.load(ListKind::TopFive).is_empty());
    }

    #[test]
    fn test_save_writes_json_array_under_key() {
        let mut store = MovieStore::new(MemoryStorage::new());
        store.save(ListKind::Watchlist, &[dune()]).unwrap();

        let raw = store.storage().raw("watchlist").unwrap();
        let value: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(
            value,
            json!([{"title": "Dune", "overview": "Spice", "poster_path": "/d.jpg"}])
        );
        assert!(store.storage().raw("topFive").is_none());
    }

    #[test]
    fn test_save_replaces_previous_content() {
        let mut store = MovieStore::new(MemoryStorage::new());
        store.save(ListKind::TopFive, &[dune(), dune()]).unwrap();
        store.save(ListKind::TopFive, &[]).unwrap();
        assert!(store.load(ListKind::TopFive).is_empty());
        assert_eq!(store.storage().raw("topFive"), Some("[]"));
    }

    #[test]
    fn test_corrupt_data_loads_as_empty() {
        let mut storage = MemoryStorage::new();
        storage.set_item("watchlist", "{not json").unwrap();
        storage.set_item("topFive", r#"{"title": "Dune"}"#).unwrap();
        let store = MovieStore::new(storage);
        assert!(store.load(ListKind::Watchlist).is_empty());
        assert!(store.load(ListKind::TopFive).is_empty());
    }

    #[test]
    fn test_malformed_record_is_skipped_alone() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                "watchlist",
                r#"[{"title": "Dune"}, {"title": 42}, "Heat", {"title": "Alien", "overview": null}]"#,
            )
            .unwrap();
        let store = MovieStore::new(storage);
        let titles: Vec<String> = store
            .load(ListKind::Watchlist)
            .into_iter()
            .map(|movie| movie.title)
            .collect();
        assert_eq!(titles, vec!["Dune", "Alien"]);
    }

    #[test]
    fn test_null_loads_as_empty() {
        let mut storage = MemoryStorage::new();
        storage.set_item("watchlist", "null").unwrap();
        let store = MovieStore::new(storage);
        assert!(store.load(ListKind::Watchlist).is_empty());
    }

    #[test]
    fn test_clear_removes_key() {
        let mut store = MovieStore::new(MemoryStorage::new());
        store.save(ListKind::Watchlist, &[dune()]).unwrap();
        store.clear(ListKind::Watchlist).unwrap();
        assert!(store.storage().raw("watchlist").is_none());
        assert!(store.load(ListKind::Watchlist).is_empty());
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Err(StoreError::Backend("unavailable".to_string()))
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(StoreError::Backend("quota exceeded".to_string()))
        }

        fn remove_item(&mut self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_read_error_loads_as_empty_and_write_error_propagates() {
        let mut store = MovieStore::new(FailingStorage);
        assert!(store.load(ListKind::Watchlist).is_empty());
        let err = store.save(ListKind::Watchlist, &[dune()]).unwrap_err();
        assert!(matches!(err, StoreError::Backend(msg) if msg == "quota exceeded"));
    }
}
