//! Cache for recognized text, keyed by image content

use carpark_types::{CacheError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

/// Recognition result as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRecognition {
    /// Reader backend that produced the text
    pub reader: String,
    pub text: String,
}

/// Cache manager for recognition results
pub struct RecognitionCache {
    cache_dir: PathBuf,
}

impl RecognitionCache {
    /// Create a new cache manager
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    /// SHA-256 of the image bytes
    pub fn cache_key(bytes: &[u8]) -> String {
        let hash = Sha256::digest(bytes);
        format!("{:x}", hash)
    }

    fn entry_path(&self, bytes: &[u8]) -> PathBuf {
        self.cache_dir.join(format!("{}.json", Self::cache_key(bytes)))
    }

    /// Get cached text for an image
    pub fn get(&self, bytes: &[u8]) -> Result<Option<CachedRecognition>> {
        let cache_path = self.entry_path(bytes);

        if !cache_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&cache_path)?;
        let cached = serde_json::from_str(&content).map_err(|e| {
            CacheError::Corrupted(format!("{}: {e}", cache_path.display()))
        })?;
        Ok(Some(cached))
    }

    /// Store recognized text in cache
    pub fn set(&self, bytes: &[u8], reader: &str, text: &str) -> Result<()> {
        let entry = CachedRecognition {
            reader: reader.to_string(),
            text: text.to_string(),
        };
        let content = serde_json::to_string_pretty(&entry)?;
        fs::write(self.entry_path(bytes), content)
            .map_err(|e| CacheError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Clear all cached results
    pub fn clear(&self) -> Result<usize> {
        let mut count = 0;

        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                fs::remove_file(&path)?;
                count += 1;
            }
        }

        Ok(count)
    }

    /// Number of cached entries
    pub fn len(&self) -> Result<usize> {
        let mut count = 0;
        for entry in fs::read_dir(&self.cache_dir)? {
            if entry?.path().extension().is_some_and(|e| e == "json") {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carpark_types::Error;
    use tempfile::tempdir;

    #[test]
    fn test_set_then_get() {
        let dir = tempdir().unwrap();
        let cache = RecognitionCache::new(dir.path().to_path_buf()).unwrap();

        assert!(cache.get(b"image").unwrap().is_none());
        cache.set(b"image", "gemini", "MH12AB1234").unwrap();

        let cached = cache.get(b"image").unwrap().unwrap();
        assert_eq!(cached.text, "MH12AB1234");
        assert_eq!(cached.reader, "gemini");
        assert!(cache.get(b"other image").unwrap().is_none());
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let cache = RecognitionCache::new(dir.path().to_path_buf()).unwrap();
        cache.set(b"one", "command", "A").unwrap();
        cache.set(b"two", "command", "B").unwrap();

        assert_eq!(cache.len().unwrap(), 2);
        assert_eq!(cache.clear().unwrap(), 2);
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn test_corrupted_entry() {
        let dir = tempdir().unwrap();
        let cache = RecognitionCache::new(dir.path().to_path_buf()).unwrap();
        let key = RecognitionCache::cache_key(b"image");
        fs::write(dir.path().join(format!("{key}.json")), "garbage").unwrap();

        let err = cache.get(b"image").unwrap_err();
        assert!(matches!(err, Error::Cache(CacheError::Corrupted(_))));
    }
}
