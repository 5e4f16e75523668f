//! Report of crawled URLs that never made it into the ledger.

use std::collections::HashSet;
use std::path::Path;

use gallery_core::{Error, Ledger, read_url_list};

/// URLs of `urls` with no ledger row, in list order, each listed once.
pub fn missing_urls(urls: &[String], recorded: &HashSet<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.iter()
        .filter(|url| !url.is_empty() && !recorded.contains(*url) && seen.insert(url.as_str()))
        .cloned()
        .collect()
}

/// Compare the crawl list against the ledger. Read-only.
pub async fn report(urls_file: &Path, ledger: &Ledger) -> Result<Vec<String>, Error> {
    let urls = read_url_list(urls_file).await?;
    let recorded = ledger.urls()?;
    let missing = missing_urls(&urls, &recorded);

    tracing::info!(listed = urls.len(), recorded = recorded.len(), missing = missing.len(), "missing report");
    for url in &missing {
        tracing::info!(url = %url, "not recorded");
    }
    Ok(missing)
}
