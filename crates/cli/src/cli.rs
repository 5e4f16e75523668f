//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use gallery_core::{AppConfig, Task};

/// Crawl an illustration gallery and download its images with metadata.
///
/// Settings come from built-in defaults, an optional TOML file, GALLERY_*
/// environment variables and finally these flags.
#[derive(Parser, Debug)]
#[command(name = "gallery-scraper")]
#[command(author, version, about)]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// First gallery listing page
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Number of listing pages to crawl
    #[arg(short, long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: Option<u32>,

    /// Crawl output, one URL per line
    #[arg(long, global = true)]
    pub urls_file: Option<PathBuf>,

    /// CSV ledger of downloaded illustrations
    #[arg(long, global = true)]
    pub ledger_file: Option<PathBuf>,

    /// Response cache directory
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Directory receiving <id>.jpg files
    #[arg(long, global = true)]
    pub images_dir: Option<PathBuf>,

    /// Log file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Delete the URL list and log file before crawling
    #[arg(long, global = true)]
    pub clean: bool,

    /// Minimum delay between network requests in milliseconds (max 60000)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub request_interval_ms: Option<u64>,

    /// Hide the progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Operation to run; defaults to the `task` setting
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Walk the gallery pages and rebuild the URL list
    Crawl,
    /// Resume downloading illustrations from the URL list
    Download,
    /// Shift every ledger id by an offset
    Renumber {
        /// Amount added to each id
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        offset: i64,
    },
    /// List crawled URLs that have no ledger row
    Missing,
}

impl Command {
    /// Command equivalent to a configured task.
    pub fn from_task(task: Task) -> Self {
        match task {
            Task::Crawl => Command::Crawl,
            Task::Download => Command::Download,
            Task::Renumber => Command::Renumber { offset: 1 },
            Task::Missing => Command::Missing,
        }
    }

    pub fn task(&self) -> Task {
        match self {
            Command::Crawl => Task::Crawl,
            Command::Download => Task::Download,
            Command::Renumber { .. } => Task::Renumber,
            Command::Missing => Task::Missing,
        }
    }
}

impl Args {
    /// Overlay command-line values onto loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(pages) = self.pages {
            config.pages = pages;
        }
        if let Some(path) = &self.urls_file {
            config.urls_file = path.clone();
        }
        if let Some(path) = &self.ledger_file {
            config.ledger_file = path.clone();
        }
        if let Some(path) = &self.cache_dir {
            config.cache_dir = path.clone();
        }
        if let Some(path) = &self.images_dir {
            config.images_dir = path.clone();
        }
        if let Some(path) = &self.log_file {
            config.log_file = path.clone();
        }
        if self.clean {
            config.clean = true;
        }
        if let Some(interval) = self.request_interval_ms {
            config.request_interval_ms = interval;
        }
        if let Some(command) = &self.command {
            config.task = command.task();
        }
    }

    /// The operation to run, falling back to the configured task.
    pub fn command(&self, config: &AppConfig) -> Command {
        self.command.clone().unwrap_or_else(|| Command::from_task(config.task))
    }
}
