//! Disk-backed HTTP response cache.
//!
//! This module provides a content-addressed, write-once cache that makes
//! repeated crawl and download runs cheap:
//!
//! - One file per request URL, named by the SHA-256 of the exact URL string
//! - Raw response bytes, no metadata sidecar
//! - No expiry: a hit always short-circuits the network

pub mod hash;
pub mod store;

pub use crate::Error;

pub use hash::compute_cache_key;
pub use store::ResponseCache;
