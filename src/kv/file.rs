//! FileKv - file-per-key store under a data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, KvError};

/// File-backed key-value store. Each key maps to `<dir>/<key>.json`.
///
/// Writes go through a temp file and rename, so readers never observe a
/// half-written value.
#[derive(Clone)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, KvError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| KvError::Storage(e.to_string()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KvError::Storage(e.to_string())),
        }
    }

    fn put(&self, key: &str, value: String) -> Result<(), KvError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.tmp", key));
        fs::write(&tmp, value).map_err(|e| KvError::Storage(e.to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| KvError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::new(dir.path()).unwrap();
        assert_eq!(kv.get("products").unwrap(), None);
    }

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::new(dir.path()).unwrap();
        kv.put("products", "[{\"id\":\"1\"}]".to_string()).unwrap();
        assert_eq!(
            kv.get("products").unwrap().as_deref(),
            Some("[{\"id\":\"1\"}]")
        );
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let kv = FileKv::new(dir.path()).unwrap();
            kv.put("history", "[]".to_string()).unwrap();
        }
        let kv = FileKv::new(dir.path()).unwrap();
        assert_eq!(kv.get("history").unwrap().as_deref(), Some("[]"));
    }
}
