use crate::error::SafepragError;
use crate::store::KeyValueStore;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// One `<key>.json` file per key under a root directory.
///
/// Writes go to a temporary file in the same directory and are renamed
/// into place, so a crash never leaves a half-written value.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SafepragError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(DirStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, SafepragError> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !valid {
            return Err(SafepragError::Store {
                key: key.to_string(),
                reason: "keys may only contain letters, digits, '_' and '-'".into(),
            });
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, SafepragError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SafepragError> {
        let path = self.path_for(key)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|e| SafepragError::Store {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), SafepragError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, SafepragError> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn backend_name(&self) -> &str {
        "directory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStore::open(dir.path().join("data")).unwrap();
        assert_eq!(store.get("safeprag_clients").unwrap(), None);

        store.set("safeprag_clients", "[]").unwrap();
        store.set("safeprag_clients", "[{\"code\":\"1\"}]").unwrap();
        assert_eq!(
            store.get("safeprag_clients").unwrap().as_deref(),
            Some("[{\"code\":\"1\"}]")
        );
        assert_eq!(store.keys().unwrap(), vec!["safeprag_clients".to_string()]);

        store.delete("safeprag_clients").unwrap();
        store.delete("safeprag_clients").unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.set("../escape", "1"),
            Err(SafepragError::Store { .. })
        ));
    }

    #[test]
    fn test_ignores_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        let store = DirStore::open(dir.path()).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
