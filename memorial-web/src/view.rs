//! Card views: render-ready record DTOs for the gallery UI

use memorial_common::manifest::Manifest;
use memorial_common::record::Record;
use serde::Serialize;
use url::Url;

/// Width the image proxy resizes card images to.
pub const CARD_IMAGE_WIDTH: u32 = 480;

/// Default proxy recompression quality (settings override per request).
pub const DEFAULT_IMAGE_QUALITY: u8 = 80;

/// One gallery card, ready for the client to drop into the DOM.
///
/// Missing fields stay `null`: the client substitutes a placeholder
/// image and a "help find this material" call-to-action.
#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub title: String,
    pub teaser_text: String,
    /// Display date, `YYYY.M.D` (day omitted when unknown)
    pub date: String,
    pub year: i32,
    pub source: String,
    pub source_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Build the card for one record. Unknown sources keep their id as
/// the label and get no logo.
pub fn card_view(record: &Record, manifest: &Manifest, quality: u8) -> CardView {
    CardView {
        title: record.title.clone(),
        teaser_text: record.teaser_text.clone(),
        date: record.date.display(),
        year: record.year(),
        source: record.source.clone(),
        source_name: manifest.display_name(&record.source).to_string(),
        logo: manifest.icon(&record.source).map(str::to_string),
        img: record
            .img
            .as_deref()
            .map(|raw| proxied_image_url(raw, quality)),
        url: record.url.clone(),
        tags: record.tags.clone(),
    }
}

/// Rewrite an image URL to pass through the resize/recompress proxy.
/// The gallery never hotlinks full-size originals.
pub fn proxied_image_url(raw: &str, quality: u8) -> String {
    let width = CARD_IMAGE_WIDTH.to_string();
    let quality = quality.min(100).to_string();
    let params = [("url", raw), ("w", width.as_str()), ("q", quality.as_str())];
    match Url::parse_with_params("https://wsrv.nl/", params) {
        Ok(url) => url.into(),
        // A base this fixed cannot fail to parse; keep the original
        // URL rather than panicking if it somehow does.
        Err(_) => raw.to_string(),
    }
}
