//! Per-illustration metadata extraction from detail pages.

use scraper::Html;

use gallery_core::Error;

use super::schema::{PageSchema, text_of};

/// Fields read from one illustration detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllustrationMetadata {
    pub artist_name: String,
    pub caption: String,
    /// Paragraphs of the first description block, newline-joined.
    pub description: String,
    /// Absolute URL of the high-resolution image.
    pub image_url: String,
}

/// Extract metadata from a detail page.
///
/// The high-resolution image is the second-to-last anchor of the download
/// block. Any element the schema requires that is absent fails the whole page
/// with [`Error::MissingElement`]; an image link that cannot be resolved fails
/// it with [`Error::MalformedElement`].
pub fn extract_metadata(html: &str, schema: &PageSchema) -> Result<IllustrationMetadata, Error> {
    let document = Html::parse_document(html);

    let highres = PageSchema::require(&document, &schema.highres_block, "highres_block")?;
    let anchors: Vec<_> = highres.select(&schema.highres_link).collect();
    let download = anchors
        .len()
        .checked_sub(2)
        .map(|i| anchors[i])
        .ok_or(Error::MissingElement { field: "highres_link" })?;
    let href = download
        .value()
        .attr("href")
        .ok_or(Error::MissingElement { field: "highres_link" })?;
    let image_url = schema
        .origin
        .join(href)
        .map_err(|e| Error::MalformedElement { field: "highres_link", reason: format!("{href}: {e}") })?
        .to_string();

    let artist_block = PageSchema::require(&document, &schema.artist_block, "artist_block")?;
    let artist_name = text_of(PageSchema::require_within(artist_block, &schema.artist_name, "artist_name")?);

    let caption = text_of(PageSchema::require(&document, &schema.caption, "caption")?);

    let description_block = PageSchema::require(&document, &schema.description_block, "description")?;
    let description = description_block
        .select(&schema.description_paragraph)
        .map(text_of)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(IllustrationMetadata { artist_name, caption, description, image_url })
}
