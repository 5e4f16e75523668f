//! Typed description of the gallery's markup.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use gallery_core::Error;

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

/// CSS selectors locating every field the scraper reads, plus the site origin
/// used to absolutize image links.
///
/// Each lookup is a required-field query: absence is reported as
/// [`Error::MissingElement`] naming the field, never as a default value.
#[derive(Debug, Clone)]
pub struct PageSchema {
    /// Listing-page container of illustration anchors.
    pub gallery: Selector,
    /// Anchors inside the gallery container.
    pub gallery_link: Selector,
    /// Block holding the high-resolution download links.
    pub highres_block: Selector,
    /// Anchors inside the download block; the second-to-last one is the image.
    pub highres_link: Selector,
    /// Definition block describing the artist.
    pub artist_block: Selector,
    /// Artist name inside the artist block.
    pub artist_name: Selector,
    /// Caption of the illustration's figure.
    pub caption: Selector,
    /// Blocks of descriptive prose; only the first is read.
    pub description_block: Selector,
    /// Paragraphs inside the description block, joined with newlines.
    pub description_paragraph: Selector,
    /// Origin prefixed to relative image paths.
    pub origin: Url,
}

impl PageSchema {
    /// Schema for the oldbookillustrations.com markup, rooted at `origin`.
    pub fn new(origin: &str) -> Result<Self, Error> {
        let origin = Url::parse(origin).map_err(|e| Error::InvalidUrl(format!("{origin}: {e}")))?;

        Ok(Self {
            gallery: selector("ul.archive-gallery"),
            gallery_link: selector("a[href]"),
            highres_block: selector("p#highres-dld"),
            highres_link: selector("a"),
            artist_block: selector("dd.artist-deflist"),
            artist_name: selector(r#"span[itemprop="name"]"#),
            caption: selector(r#"figcaption[itemprop="caption"]"#),
            description_block: selector("div.img-description"),
            description_paragraph: selector("p"),
            origin,
        })
    }

    /// First element of `document` matching `selector`.
    pub(crate) fn require<'a>(
        document: &'a Html,
        selector: &Selector,
        field: &'static str,
    ) -> Result<ElementRef<'a>, Error> {
        document.select(selector).next().ok_or(Error::MissingElement { field })
    }

    /// First descendant of `scope` matching `selector`.
    pub(crate) fn require_within<'a>(
        scope: ElementRef<'a>,
        selector: &Selector,
        field: &'static str,
    ) -> Result<ElementRef<'a>, Error> {
        scope.select(selector).next().ok_or(Error::MissingElement { field })
    }
}

/// Concatenated text content of an element.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}
