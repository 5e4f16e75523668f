//! Crawl list persistence: one URL per line, no header.

use std::path::Path;

use crate::Error;

/// Overwrite `path` with `urls`, one per line.
pub async fn write_url_list(path: &Path, urls: &[String]) -> Result<(), Error> {
    let mut text = urls.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    tokio::fs::write(path, text).await.map_err(|e| Error::io(path, e))
}

/// Read the crawl list in order.
///
/// Lines are kept verbatim, including blank ones, so positions stay aligned
/// with the order the crawl wrote them.
pub async fn read_url_list(path: &Path) -> Result<Vec<String>, Error> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| Error::io(path, e))?;
    Ok(text.lines().map(str::to_owned).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read_preserves_order_and_duplicates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.txt");
        let urls: Vec<String> = ["https://e.com/b", "https://e.com/a", "https://e.com/b"]
            .into_iter()
            .map(String::from)
            .collect();

        write_url_list(&path, &urls).await.unwrap();

        assert_eq!(read_url_list(&path).await.unwrap(), urls);
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.txt");
        write_url_list(&path, &["https://e.com/old".to_string(), "https://e.com/older".to_string()])
            .await
            .unwrap();

        write_url_list(&path, &["https://e.com/new".to_string()]).await.unwrap();

        assert_eq!(read_url_list(&path).await.unwrap(), vec!["https://e.com/new".to_string()]);
    }

    #[tokio::test]
    async fn test_read_without_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.txt");
        std::fs::write(&path, "https://e.com/a\nhttps://e.com/b").unwrap();

        assert_eq!(read_url_list(&path).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.txt");
        write_url_list(&path, &[]).await.unwrap();
        assert!(read_url_list(&path).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = read_url_list(&dir.path().join("absent.txt")).await;
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
