//! File-per-key response store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::hash::compute_cache_key;
use crate::Error;

/// On-disk response cache rooted at a directory.
///
/// Entries live at `<root>/<sha256-hex(url)>` and hold the raw response bytes
/// with no sidecar metadata. Entries are never rewritten or evicted, so a hit
/// always wins over the network.
#[derive(Clone, Debug)]
pub struct ResponseCache {
    root: PathBuf,
}

impl ResponseCache {
    /// Create a cache handle. The root directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the cache.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry for `url`, whether or not it exists.
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.root.join(compute_cache_key(url))
    }

    /// Look up the cached bytes for `url`.
    ///
    /// Returns `None` only when no entry file exists. An empty entry comes back
    /// as `Some(vec![])`.
    pub async fn get(&self, url: &str) -> Result<Option<Vec<u8>>, Error> {
        let path = self.path_for(url);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    /// Store the bytes for `url`.
    ///
    /// The entry is staged next to its final path and renamed into place, so an
    /// interrupted write never leaves a truncated entry behind.
    pub async fn put(&self, url: &str, bytes: &[u8]) -> Result<(), Error> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Error::io(&self.root, e))?;

        let path = self.path_for(url);
        let staging = path.with_extension("partial");
        tokio::fs::write(&staging, bytes)
            .await
            .map_err(|e| Error::io(&staging, e))?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|e| Error::io(&path, e))?;

        tracing::trace!(url, bytes = bytes.len(), "cache entry written");
        Ok(())
    }

    /// Whether an entry exists for `url`.
    pub async fn contains(&self, url: &str) -> bool {
        tokio::fs::try_exists(self.path_for(url)).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_missing() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(dir.path().join("cache"));
        assert!(cache.get("https://example.com/a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_returns_same_bytes() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(dir.path().join("cache"));
        let body = b"<html>\x00\xff binary-safe</html>".to_vec();

        cache.put("https://example.com/a", &body).await.unwrap();

        assert_eq!(cache.get("https://example.com/a").await.unwrap(), Some(body));
        assert!(cache.contains("https://example.com/a").await);
    }

    #[tokio::test]
    async fn test_empty_entry_is_present() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(dir.path().join("cache"));

        cache.put("https://example.com/empty", b"").await.unwrap();

        assert_eq!(cache.get("https://example.com/empty").await.unwrap(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_root_created_lazily() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested").join("cache");
        let cache = ResponseCache::new(&root);
        assert!(!root.exists());

        cache.put("https://example.com/a", b"x").await.unwrap();

        assert!(root.is_dir());
        assert_eq!(cache.path_for("https://example.com/a").parent(), Some(root.as_path()));
    }

    #[tokio::test]
    async fn test_textually_different_urls_are_distinct() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(dir.path());

        cache.put("https://example.com/a", b"one").await.unwrap();

        assert!(cache.get("https://example.com/a/").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_no_staging_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(dir.path());

        cache.put("https://example.com/a", b"one").await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec![super::compute_cache_key("https://example.com/a")]);
    }
}
