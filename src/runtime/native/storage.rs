//! Directory-backed [`Storage`]: one `<key>.json` file per key.

use crate::store::{Result, Storage};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// The directory is created lazily on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        // Temp file plus rename: readers see the old list or the new one.
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        tracing::trace!(path = %path.display(), bytes = value.len(), "wrote list file");
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListKind, Movie};
    use crate::store::MovieStore;

    #[test]
    fn test_missing_file_reads_as_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path().join("never-created"));
        assert_eq!(storage.get_item("watchlist").unwrap(), None);
    }

    #[test]
    fn test_set_creates_dir_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("data");
        let mut storage = FileStorage::new(&dir);
        storage.set_item("topFive", "[]").unwrap();

        assert_eq!(fs::read_to_string(dir.join("topFive.json")).unwrap(), "[]");
        assert_eq!(storage.get_item("topFive").unwrap().as_deref(), Some("[]"));
        assert!(!dir.join("topFive.json.tmp").exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(tmp.path());
        storage.set_item("watchlist", "[]").unwrap();
        storage.remove_item("watchlist").unwrap();
        storage.remove_item("watchlist").unwrap();
        assert_eq!(storage.get_item("watchlist").unwrap(), None);
    }

    #[test]
    fn test_lists_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let dune = Movie::new("Dune", "Spice", Some("/d.jpg".to_string()));

        let mut store = MovieStore::new(FileStorage::new(tmp.path()));
        store.save(ListKind::Watchlist, &[dune.clone()]).unwrap();

        let reopened = MovieStore::new(FileStorage::new(tmp.path()));
        assert_eq!(reopened.load(ListKind::Watchlist), vec![dune]);
        assert!(reopened.load(ListKind::TopFive).is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("watchlist.json"), "{not json").unwrap();
        let store = MovieStore::new(FileStorage::new(tmp.path()));
        assert!(store.load(ListKind::Watchlist).is_empty());
    }
}
