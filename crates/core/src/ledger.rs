//! CSV ledger of downloaded illustrations.
//!
//! The ledger is the source of truth for how far a download run has
//! progressed and for image filenames. Every append rewrites the whole file so
//! that row `i` always carries `id == i`; the rewrite goes through a staging
//! file and a rename so an interrupted write never truncates the ledger.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Error;

/// One downloaded illustration.
///
/// Field order is the column order on disk, and field names are the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IllustrationRecord {
    pub id: u64,
    pub artist_name: String,
    pub caption: String,
    pub url: String,
    pub description: String,
}

/// A record that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIllustration {
    pub artist_name: String,
    pub caption: String,
    /// Detail-page URL the record was extracted from.
    pub url: String,
    pub description: String,
    /// Resolved high-resolution image URL. Not persisted.
    pub image_url: String,
}

impl NewIllustration {
    fn into_record(self, id: u64) -> IllustrationRecord {
        IllustrationRecord {
            id,
            artist_name: self.artist_name,
            caption: self.caption,
            url: self.url,
            description: self.description,
        }
    }
}

/// Handle on the ledger CSV file.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of rows, used as the resume offset.
    ///
    /// An absent file counts as 0. So does a file that cannot be parsed; that
    /// case is logged because the next append will refuse to overwrite it.
    pub fn len(&self) -> usize {
        match self.records() {
            Ok(records) => records.len(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ledger unreadable; treating as empty");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read every row. An absent file yields no rows.
    pub fn records(&self) -> Result<Vec<IllustrationRecord>, Error> {
        let mut reader = match csv::Reader::from_path(&self.path) {
            Ok(reader) => reader,
            Err(e) => {
                if let csv::ErrorKind::Io(io) = e.kind()
                    && io.kind() == ErrorKind::NotFound
                {
                    return Ok(Vec::new());
                }
                return Err(e.into());
            }
        };

        let records = reader.deserialize().collect::<Result<Vec<IllustrationRecord>, _>>()?;
        Ok(records)
    }

    /// Source URLs already recorded.
    pub fn urls(&self) -> Result<HashSet<String>, Error> {
        Ok(self.records()?.into_iter().map(|r| r.url).collect())
    }

    /// Append a row and renumber every row by position.
    ///
    /// Returns the stored record, whose `id` is the previous row count. An
    /// existing file that fails to parse is an error rather than being
    /// replaced.
    pub fn append(&self, item: NewIllustration) -> Result<IllustrationRecord, Error> {
        let mut records = self.records()?;
        records.push(item.into_record(0));

        for (position, record) in records.iter_mut().enumerate() {
            record.id = position as u64;
        }

        self.rewrite(&records)?;

        let stored = records.pop().ok_or_else(|| Error::Ledger("ledger empty after append".into()))?;
        tracing::debug!(id = stored.id, url = %stored.url, "ledger row appended");
        Ok(stored)
    }

    /// Add `offset` to every id and rewrite the file.
    ///
    /// This deliberately leaves ids out of step with positions; the next
    /// [`Ledger::append`] renumbers them. Returns the number of rows touched.
    pub fn renumber(&self, offset: i64) -> Result<usize, Error> {
        let mut records = self.records()?;

        for record in &mut records {
            let shifted = i64::try_from(record.id)
                .ok()
                .and_then(|id| id.checked_add(offset))
                .and_then(|id| u64::try_from(id).ok())
                .ok_or_else(|| Error::Ledger(format!("id {} cannot be shifted by {offset}", record.id)))?;
            record.id = shifted;
        }

        if !records.is_empty() {
            self.rewrite(&records)?;
        }
        Ok(records.len())
    }

    fn rewrite(&self, records: &[IllustrationRecord]) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let staging = staging_path(&self.path);
        {
            let mut writer = csv::Writer::from_path(&staging)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush().map_err(|e| Error::io(&staging, e))?;
        }

        std::fs::rename(&staging, &self.path).map_err(|e| Error::io(&self.path, e))
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn item(url: &str) -> NewIllustration {
        NewIllustration {
            artist_name: "Gustave Doré".into(),
            caption: format!("Caption for {url}"),
            url: url.into(),
            description: "First paragraph.\nSecond, with \"quotes\".".into(),
            image_url: format!("{url}/high.jpg"),
        }
    }

    #[test]
    fn test_absent_ledger_is_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(dir.path().join("illustrations.csv"));
        assert_eq!(ledger.len(), 0);
        assert!(ledger.is_empty());
        assert!(ledger.records().unwrap().is_empty());
    }

    #[test]
    fn test_append_assigns_dense_ids() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(dir.path().join("illustrations.csv"));

        for i in 0..4 {
            let stored = ledger.append(item(&format!("https://example.com/i/{i}"))).unwrap();
            assert_eq!(stored.id, i);
        }

        let records = ledger.records().unwrap();
        assert_eq!(records.len(), 4);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.id, i as u64);
        }
        assert_eq!(ledger.len(), 4);
    }

    #[test]
    fn test_header_and_column_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("illustrations.csv");
        let ledger = Ledger::new(&path);

        ledger.append(item("https://example.com/i/a")).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("id,artist_name,caption,url,description\n"));
        assert!(!text.contains("high.jpg"));
    }

    #[test]
    fn test_multiline_description_round_trips() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(dir.path().join("illustrations.csv"));

        ledger.append(item("https://example.com/i/a")).unwrap();
        ledger.append(item("https://example.com/i/b")).unwrap();

        let records = ledger.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].description, "First paragraph.\nSecond, with \"quotes\".");
        assert_eq!(records[1].url, "https://example.com/i/b");
    }

    #[test]
    fn test_append_repairs_gapped_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("illustrations.csv");
        std::fs::write(
            &path,
            "id,artist_name,caption,url,description\n5,A,c,https://example.com/x,d\n9,B,c,https://example.com/y,d\n",
        )
        .unwrap();
        let ledger = Ledger::new(&path);

        let stored = ledger.append(item("https://example.com/z")).unwrap();

        assert_eq!(stored.id, 2);
        let ids: Vec<u64> = ledger.records().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_unparseable_ledger_len_zero_but_append_refuses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("illustrations.csv");
        std::fs::write(&path, "id,artist_name,caption,url,description\nnot-a-number,A,c,u,d\n").unwrap();
        let ledger = Ledger::new(&path);

        assert_eq!(ledger.len(), 0);
        assert!(ledger.append(item("https://example.com/z")).is_err());
        assert!(std::fs::read_to_string(&path).unwrap().contains("not-a-number"));
    }

    #[test]
    fn test_renumber_shifts_ids() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(dir.path().join("illustrations.csv"));
        ledger.append(item("https://example.com/i/a")).unwrap();
        ledger.append(item("https://example.com/i/b")).unwrap();

        assert_eq!(ledger.renumber(1).unwrap(), 2);

        let ids: Vec<u64> = ledger.records().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_renumber_below_zero_fails() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(dir.path().join("illustrations.csv"));
        ledger.append(item("https://example.com/i/a")).unwrap();

        assert!(matches!(ledger.renumber(-1), Err(Error::Ledger(_))));
        assert_eq!(ledger.records().unwrap()[0].id, 0);
    }

    #[test]
    fn test_renumber_absent_ledger() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("illustrations.csv");
        let ledger = Ledger::new(&path);
        assert_eq!(ledger.renumber(1).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_urls() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(dir.path().join("illustrations.csv"));
        ledger.append(item("https://example.com/i/a")).unwrap();

        let urls = ledger.urls().unwrap();
        assert!(urls.contains("https://example.com/i/a"));
        assert_eq!(urls.len(), 1);
    }
}
