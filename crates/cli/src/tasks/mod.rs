//! Operation modes of the scraper.
//!
//! Each task builds only what it needs from [`AppConfig`]: the crawl and
//! download modes get a cached reqwest fetcher and the page schema, the ledger
//! maintenance modes only touch local files.

pub mod crawl;
pub mod download;
pub mod missing;
pub mod renumber;

use gallery_client::{FetchConfig, Fetcher, PageSchema};
use gallery_core::{AppConfig, Error, Ledger, ResponseCache};

use crate::cli::Command;

use crawl::Crawler;
use download::DownloadOrchestrator;

fn fetcher(config: &AppConfig) -> Result<Fetcher, Error> {
    Fetcher::with_reqwest(ResponseCache::new(&config.cache_dir), &FetchConfig::from(config))
}

/// Run one operation mode to completion.
pub async fn run(command: &Command, config: &AppConfig, show_progress: bool) -> Result<(), Error> {
    match command {
        Command::Crawl => {
            let fetcher = fetcher(config)?;
            let schema = PageSchema::new(&config.site_origin)?;
            let report = Crawler::new(&fetcher, &schema, &config.base_url, config.pages)
                .run(&config.urls_file)
                .await?;
            println!("Collected {} illustration URLs from {} pages", report.urls, report.pages);
        }
        Command::Download => {
            let fetcher = fetcher(config)?;
            let schema = PageSchema::new(&config.site_origin)?;
            let ledger = Ledger::new(&config.ledger_file);
            let report = DownloadOrchestrator::new(&fetcher, &schema, &ledger, &config.images_dir)
                .show_progress(show_progress)
                .run(&config.urls_file)
                .await?;
            println!(
                "Downloaded {} illustrations ({} already recorded, {} failed)",
                report.downloaded,
                report.resumed_from + report.skipped_recorded,
                report.skipped_empty + report.skipped_extraction + report.skipped_image
            );
        }
        Command::Renumber { offset } => {
            let rows = renumber::run(&Ledger::new(&config.ledger_file), *offset)?;
            println!("Shifted {rows} ledger ids by {offset}");
        }
        Command::Missing => {
            let missing = missing::report(&config.urls_file, &Ledger::new(&config.ledger_file)).await?;
            for url in &missing {
                println!("{url}");
            }
        }
    }
    Ok(())
}
