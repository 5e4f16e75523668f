//! Client code for the gallery scraper.
//!
//! This crate provides the cached HTTP fetch pipeline and the structured
//! extraction of gallery listing and illustration detail pages.

pub mod extract;
pub mod fetch;

pub use extract::{
    Extractor, IllustrationMetadata, PageSchema, extract_gallery_links, extract_metadata,
};

pub use fetch::{FetchConfig, FetchOutcome, Fetcher, RawResponse, ReqwestTransport, Transport, TransportError};
