use std::path::{Path, PathBuf};
use tokio::fs;

use super::MenuCache;

/// Keeps the menu as a json file.
#[derive(Debug)]
pub struct FileStore(PathBuf);

impl FileStore {
    pub fn open(p: impl AsRef<Path>) -> Self {
        Self(p.as_ref().to_owned())
    }

    pub async fn load(&self) -> crate::Result<Option<MenuCache>> {
        if !fs::try_exists(&self.0).await? {
            return Ok(None);
        }
        let bytes = fs::read(&self.0).await?;
        match serde_json::from_slice(&bytes) {
            Ok(cache) => Ok(Some(cache)),
            Err(e) => {
                log::warn!("Ignoring unreadable menu cache {}: {e}", self.0.display());
                Ok(None)
            }
        }
    }

    pub async fn save(&self, value: &MenuCache) -> crate::Result<()> {
        let json = serde_json::to_vec_pretty(value)?;
        fs::write(&self.0, json).await?;
        log::debug!("Saved menu cache to {}", self.0.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::italy_catalog;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pizza_finder_{}_{name}.json", std::process::id()))
    }

    #[tokio::test]
    async fn test_missing_file() {
        let store = FileStore::open(temp_path("missing"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let store = FileStore::open(&path);
        let cache = MenuCache::new(italy_catalog());
        store.save(&cache).await.unwrap();
        // a shorter second write must not leave trailing bytes behind
        let smaller = MenuCache::default();
        store.save(&smaller).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(smaller));
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_ignored() {
        let path = temp_path("corrupt");
        std::fs::write(&path, b"{ not json").unwrap();
        let store = FileStore::open(&path);
        assert!(store.load().await.unwrap().is_none());
        std::fs::remove_file(path).unwrap();
    }
}
