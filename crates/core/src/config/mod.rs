//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (GALLERY_*)
//! 2. TOML config file (explicit path, or GALLERY_CONFIG_FILE)
//! 3. Built-in defaults
//!
//! Command-line overrides are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_FILE_ENV: &str = "GALLERY_CONFIG_FILE";

/// Operation the process performs on this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    /// Walk the gallery pages and rebuild the URL list.
    #[serde(alias = "prepare_illustration_list")]
    Crawl,
    /// Resume downloading illustrations from the URL list.
    #[serde(alias = "download_illustrations")]
    Download,
    /// Shift every ledger id by a fixed offset.
    #[serde(alias = "check_failed_downloads")]
    Renumber,
    /// Report crawled URLs that have no ledger row.
    Missing,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (GALLERY_*)
/// 2. TOML config file
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// First gallery listing page; later pages are `{base_url}/page/{n}`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Origin prefixed to the relative high-resolution image paths.
    #[serde(default = "default_site_origin")]
    pub site_origin: String,

    /// Number of listing pages to crawl.
    #[serde(default = "default_pages")]
    pub pages: u32,

    /// Newline-delimited crawl output.
    #[serde(default = "default_urls_file")]
    pub urls_file: PathBuf,

    /// CSV ledger of downloaded illustrations.
    #[serde(default = "default_ledger_file")]
    pub ledger_file: PathBuf,

    /// Response cache root.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Directory receiving `<id>.jpg` files.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Log stream destination.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Delete the URL list and log file before a crawl.
    #[serde(default)]
    pub clean: bool,

    /// Operation used when none is given on the command line.
    #[serde(default = "default_task")]
    pub task: Task,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via GALLERY_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects followed per request.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Minimum spacing between network requests in milliseconds (0 disables).
    #[serde(default)]
    pub request_interval_ms: u64,
}

fn default_base_url() -> String {
    "https://www.oldbookillustrations.com/illustrations".into()
}

fn default_site_origin() -> String {
    "https://www.oldbookillustrations.com".into()
}

fn default_pages() -> u32 {
    350
}

fn default_urls_file() -> PathBuf {
    PathBuf::from("urls.txt")
}

fn default_ledger_file() -> PathBuf {
    PathBuf::from("illustrations.csv")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("scraper.log")
}

fn default_task() -> Task {
    Task::Download
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_5) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/50.0.2661.102 Safari/537.36"
        .into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_redirects() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            site_origin: default_site_origin(),
            pages: default_pages(),
            urls_file: default_urls_file(),
            ledger_file: default_ledger_file(),
            cache_dir: default_cache_dir(),
            images_dir: default_images_dir(),
            log_file: default_log_file(),
            clean: false,
            task: default_task(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            request_interval_ms: 0,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Request spacing as Duration.
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    /// Load configuration from defaults, `GALLERY_CONFIG_FILE` and the environment.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::load_from`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration with an optional explicit TOML file.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `GALLERY_`
    /// 2. `config_file`, or the file named by `GALLERY_CONFIG_FILE`
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - An explicitly named configuration file does not exist
    /// - The file or environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let file = config_file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from));
        if let Some(path) = file {
            if !path.is_file() {
                return Err(ConfigError::LoadFailed(format!("config file not found: {}", path.display())));
            }
            figment = figment.merge(Toml::file(&path));
        }

        figment = figment.merge(
            Env::prefixed("GALLERY_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
