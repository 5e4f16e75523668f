//! Core types and shared functionality for the gallery scraper.
//!
//! This crate provides:
//! - Content-addressed response cache on disk
//! - CSV ledger with dense ids
//! - Crawl list persistence
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod ledger;
pub mod urls;

pub use cache::ResponseCache;
pub use config::{AppConfig, ConfigError, Task};
pub use error::Error;
pub use ledger::{IllustrationRecord, Ledger, NewIllustration};
pub use urls::{read_url_list, write_url_list};
