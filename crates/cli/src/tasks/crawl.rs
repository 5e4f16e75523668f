//! Gallery crawl: pages 1..=N into the URL list.

use std::path::Path;

use url::Url;

use gallery_client::fetch::page_url;
use gallery_client::{Extractor, FetchOutcome, Fetcher};
use gallery_core::{Error, write_url_list};

/// Totals from one crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub pages: u32,
    /// Pages that yielded no content.
    pub empty_pages: u32,
    pub urls: usize,
}

/// Walks the gallery listing pages sequentially.
pub struct Crawler<'a> {
    fetcher: &'a Fetcher,
    extractor: &'a dyn Extractor,
    base_url: &'a str,
    pages: u32,
}

impl<'a> Crawler<'a> {
    pub fn new(fetcher: &'a Fetcher, extractor: &'a dyn Extractor, base_url: &'a str, pages: u32) -> Self {
        Self { fetcher, extractor, base_url, pages }
    }

    /// Collect illustration URLs from every page, in page order.
    ///
    /// Duplicates are only removed within a page. A page that cannot be
    /// fetched contributes nothing; a fetched page without a gallery is a
    /// structural error; a rate limit aborts the crawl.
    pub async fn collect(&self) -> Result<(Vec<String>, CrawlReport), Error> {
        let mut urls = Vec::new();
        let mut report = CrawlReport::default();

        for page in 1..=self.pages {
            tracing::info!("Processing page {}", page);
            let url = page_url(self.base_url, page);
            report.pages += 1;

            let content = match self.fetcher.fetch(&url).await? {
                FetchOutcome::RateLimited { status } => return Err(Error::RateLimited { status }),
                FetchOutcome::Success(bytes) if !bytes.is_empty() => bytes,
                FetchOutcome::Success(_) | FetchOutcome::Empty => {
                    tracing::warn!(page, url = %url, "no content for page");
                    report.empty_pages += 1;
                    continue;
                }
            };

            let page_url = Url::parse(&url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
            let html = String::from_utf8_lossy(&content);
            let links = self.extractor.gallery_links(&html, &page_url)?;
            urls.extend(links);
        }

        report.urls = urls.len();
        Ok((urls, report))
    }

    /// Crawl and overwrite `urls_file` with the result.
    ///
    /// Nothing is written unless every page was processed.
    pub async fn run(&self, urls_file: &Path) -> Result<CrawlReport, Error> {
        let (urls, report) = self.collect().await?;
        write_url_list(urls_file, &urls).await?;
        tracing::info!(
            pages = report.pages,
            empty_pages = report.empty_pages,
            urls = report.urls,
            path = %urls_file.display(),
            "illustration list written"
        );
        Ok(report)
    }
}
