//! Structured extraction from gallery markup.
//!
//! ### Page schema
//! - [`PageSchema`] holds the selectors for every field the scraper reads.
//! - Lookups are required-field queries returning `Result`; nothing is assumed present.
//!
//! ### Stable abstraction
//! - The [`Extractor`] trait decouples the crawl and download tasks from the parsing engine.

pub mod links;
pub mod metadata;
pub mod schema;

pub use links::extract_gallery_links;
pub use metadata::{IllustrationMetadata, extract_metadata};
pub use schema::PageSchema;

use gallery_core::Error;
use url::Url;

/// Stable extractor trait for gallery pages.
///
/// This allows swapping the parsing engine or the site layout without
/// changing the tasks that drive it.
pub trait Extractor: Send + Sync {
    /// Illustration detail-page URLs listed on a gallery page.
    fn gallery_links(&self, html: &str, page_url: &Url) -> Result<Vec<String>, Error>;

    /// Metadata from an illustration detail page.
    fn illustration(&self, html: &str) -> Result<IllustrationMetadata, Error>;
}

impl Extractor for PageSchema {
    fn gallery_links(&self, html: &str, page_url: &Url) -> Result<Vec<String>, Error> {
        extract_gallery_links(html, page_url, self)
    }

    fn illustration(&self, html: &str) -> Result<IllustrationMetadata, Error> {
        extract_metadata(html, self)
    }
}
