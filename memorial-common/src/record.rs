//! Record model, normalization, and chronological ordering

use serde::{Deserialize, Serialize};

/// Calendar date of a record. `day == 0` means the day is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl RecordDate {
    /// Composite ordering key: year, month and day packed as one decimal
    /// magnitude (2020-05-15 → 20200515). An unknown day packs as `00`,
    /// placing it before every dated record of the same month.
    pub fn sort_key(&self) -> i64 {
        self.year as i64 * 10_000 + self.month as i64 * 100 + self.day as i64
    }

    /// Display form `YYYY.M.D`; the day is omitted when unknown.
    pub fn display(&self) -> String {
        if self.day == 0 {
            format!("{}.{}", self.year, self.month)
        } else {
            format!("{}.{}.{}", self.year, self.month, self.day)
        }
    }
}

/// One memorial entry: an archived news article or video.
///
/// Immutable after load; the record store owns the full set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    #[serde(default)]
    pub teaser_text: String,
    pub date: RecordDate,
    /// Source id, a key into the manifest's source catalog.
    #[serde(rename = "where")]
    pub source: String,
    /// Article image, if the archive kept one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// Link to the archived material. Absent when the material was lost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Record {
    /// Normalize a freshly deserialized record: trim the title and
    /// collapse empty-string `img`/`url` to `None`. Runs once at load
    /// time so the rest of the pipeline never re-checks field shapes.
    pub fn normalize(mut self) -> Record {
        self.title = self.title.trim().to_string();
        self.teaser_text = self.teaser_text.trim().to_string();
        if self.img.as_deref().is_some_and(|s| s.trim().is_empty()) {
            self.img = None;
        }
        if self.url.as_deref().is_some_and(|s| s.trim().is_empty()) {
            self.url = None;
        }
        self
    }

    pub fn year(&self) -> i32 {
        self.date.year
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Sort records most recent first.
///
/// Stable: records with equal dates keep their original relative order.
/// Applied exactly once, immediately after load completes.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(|a, b| b.date.sort_key().cmp(&a.date.sort_key()));
}
