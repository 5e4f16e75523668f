//! Resumable download loop over the crawled URL list.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use gallery_client::{Extractor, FetchOutcome, Fetcher};
use gallery_core::{Error, Ledger, NewIllustration, read_url_list};

/// Totals from one download run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Ledger rows present at start, i.e. URLs skipped from the front of the list.
    pub resumed_from: usize,
    pub downloaded: usize,
    /// Detail pages that could not be fetched.
    pub skipped_empty: usize,
    /// Detail pages whose markup lacked a required element or held an unusable one.
    pub skipped_extraction: usize,
    /// Images that could not be fetched.
    pub skipped_image: usize,
    /// URLs that already have a ledger row.
    pub skipped_recorded: usize,
}

/// What happened to one URL.
enum ItemOutcome {
    Downloaded(u64),
    PageEmpty,
    Malformed,
    ImageEmpty,
}

/// Drives detail page and image downloads into the ledger and images directory.
pub struct DownloadOrchestrator<'a> {
    fetcher: &'a Fetcher,
    extractor: &'a dyn Extractor,
    ledger: &'a Ledger,
    images_dir: PathBuf,
    show_progress: bool,
}

impl<'a> DownloadOrchestrator<'a> {
    pub fn new(fetcher: &'a Fetcher, extractor: &'a dyn Extractor, ledger: &'a Ledger, images_dir: &Path) -> Self {
        Self { fetcher, extractor, ledger, images_dir: images_dir.to_path_buf(), show_progress: true }
    }

    /// Toggle the progress bar and console notices.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::hidden());
        }
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} [{elapsed_precise}<{eta_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    }

    fn notice(&self, bar: &ProgressBar, message: String) {
        if self.show_progress {
            bar.suspend(|| println!("{message}"));
        }
    }

    /// Download every URL of `urls_file` past the ledger's current length.
    ///
    /// Stops with [`Error::RateLimited`] as soon as the server asks for
    /// backoff; nothing is recorded for the URL being processed at that point.
    pub async fn run(&self, urls_file: &Path) -> Result<DownloadReport, Error> {
        let resume = self.ledger.len();
        let urls = read_url_list(urls_file).await?;
        let remaining = urls.get(resume..).unwrap_or_default();

        let mut recorded = self.ledger.urls()?;
        let mut next_id = resume as u64;
        let mut report = DownloadReport { resumed_from: resume, ..Default::default() };

        tracing::info!(resume, total = urls.len(), remaining = remaining.len(), "starting downloads");

        tokio::fs::create_dir_all(&self.images_dir)
            .await
            .map_err(|e| Error::io(&self.images_dir, e))?;

        let bar = self.progress_bar(remaining.len());
        for url in remaining {
            bar.inc(1);
            if recorded.contains(url) {
                tracing::info!(url = %url, "already recorded; skipping");
                report.skipped_recorded += 1;
                continue;
            }

            match self.download_one(url, next_id, &bar).await {
                Ok(ItemOutcome::Downloaded(id)) => {
                    recorded.insert(url.clone());
                    next_id = id + 1;
                    report.downloaded += 1;
                }
                Ok(ItemOutcome::PageEmpty) => report.skipped_empty += 1,
                Ok(ItemOutcome::Malformed) => report.skipped_extraction += 1,
                Ok(ItemOutcome::ImageEmpty) => report.skipped_image += 1,
                Err(e) => {
                    bar.abandon();
                    tracing::error!(url = %url, error = %e, "download run stopped");
                    return Err(e);
                }
            }
        }
        bar.finish();

        tracing::info!(
            downloaded = report.downloaded,
            skipped_empty = report.skipped_empty,
            skipped_extraction = report.skipped_extraction,
            skipped_image = report.skipped_image,
            skipped_recorded = report.skipped_recorded,
            "downloads finished"
        );
        Ok(report)
    }

    async fn download_one(&self, url: &str, id: u64, bar: &ProgressBar) -> Result<ItemOutcome, Error> {
        let Some(page) = self.fetcher.fetch(url).await?.into_content()? else {
            tracing::warn!(url, "no content for illustration page");
            self.notice(bar, format!("Failed to download {url}"));
            return Ok(ItemOutcome::PageEmpty);
        };

        let metadata = match self.extractor.illustration(&String::from_utf8_lossy(&page)) {
            Ok(metadata) => metadata,
            Err(e) if e.is_structural() => {
                tracing::warn!(url, error = %e, "illustration page malformed; skipping");
                self.notice(bar, format!("Failed to parse {url}"));
                return Ok(ItemOutcome::Malformed);
            }
            Err(e) => return Err(e),
        };

        self.notice(bar, format!("Downloading {url}"));
        let image = match self.fetcher.fetch(&metadata.image_url).await? {
            FetchOutcome::RateLimited { status } => return Err(Error::RateLimited { status }),
            FetchOutcome::Success(bytes) if !bytes.is_empty() => bytes,
            FetchOutcome::Success(_) | FetchOutcome::Empty => {
                tracing::warn!(url, image_url = %metadata.image_url, "no content for image");
                self.notice(bar, format!("Failed to download {}", metadata.image_url));
                return Ok(ItemOutcome::ImageEmpty);
            }
        };

        // Image before row: a crash in between leaves an orphan file that the
        // next run overwrites under the same id.
        let image_path = self.images_dir.join(format!("{id}.jpg"));
        tokio::fs::write(&image_path, &image)
            .await
            .map_err(|e| Error::io(&image_path, e))?;

        let stored = self.ledger.append(NewIllustration {
            artist_name: metadata.artist_name,
            caption: metadata.caption,
            url: url.to_string(),
            description: metadata.description,
            image_url: metadata.image_url,
        })?;

        if stored.id != id {
            return Err(Error::Ledger(format!("expected id {id} for {url}, ledger assigned {}", stored.id)));
        }

        tracing::info!(id, url, bytes = image.len(), "illustration saved");
        Ok(ItemOutcome::Downloaded(id))
    }
}
