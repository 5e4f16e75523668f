//! Bulk id shift over the ledger.

use gallery_core::{Error, Ledger};

/// Add `offset` to every ledger id, returning the number of rows touched.
pub fn run(ledger: &Ledger, offset: i64) -> Result<usize, Error> {
    let rows = ledger.renumber(offset)?;
    tracing::info!(rows, offset, path = %ledger.path().display(), "ledger ids shifted");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::NewIllustration;
    use tempfile::TempDir;

    fn item(n: u32) -> NewIllustration {
        NewIllustration {
            artist_name: format!("artist {n}"),
            caption: format!("caption {n}"),
            url: format!("https://e.com/{n}"),
            description: String::new(),
            image_url: format!("https://e.com/{n}.jpg"),
        }
    }

    #[test]
    fn test_renumber_shifts_ids_by_one() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(dir.path().join("illustrations.csv"));
        for n in 0..3 {
            ledger.append(item(n)).unwrap();
        }

        assert_eq!(run(&ledger, 1).unwrap(), 3);

        let ids: Vec<u64> = ledger.records().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_renumber_empty_ledger() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(dir.path().join("illustrations.csv"));

        assert_eq!(run(&ledger, 1).unwrap(), 0);
        assert!(!ledger.path().exists());
    }

    #[test]
    fn test_renumber_below_zero_is_rejected() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(dir.path().join("illustrations.csv"));
        ledger.append(item(0)).unwrap();

        assert!(matches!(run(&ledger, -1), Err(Error::Ledger(_))));
        assert_eq!(ledger.records().unwrap()[0].id, 0);
    }
}
