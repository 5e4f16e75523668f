//! Illustration link discovery on gallery listing pages.

use scraper::Html;
use std::collections::HashSet;
use url::Url;

use gallery_core::Error;

use super::schema::PageSchema;
use crate::fetch::resolve_href;

/// Extract the detail-page URLs listed in a gallery page.
///
/// Reads the `href` of every anchor inside the gallery container, resolving
/// relative ones against `page_url`, and removes duplicates within the page
/// (first occurrence wins). A page without the container is a structural
/// failure: the listing format changed and anything scraped from it would be
/// wrong.
pub fn extract_gallery_links(html: &str, page_url: &Url, schema: &PageSchema) -> Result<Vec<String>, Error> {
    let document = Html::parse_document(html);
    let gallery = PageSchema::require(&document, &schema.gallery, "gallery")?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in gallery.select(&schema.gallery_link) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let resolved = match resolve_href(page_url, href) {
            Ok(u) => u,
            Err(e) => {
                tracing::debug!(href, error = %e, "skipping gallery link");
                continue;
            }
        };

        if seen.insert(resolved.clone()) {
            links.push(resolved);
        }
    }

    tracing::info!("Found {} illustrations", links.len());
    Ok(links)
}
