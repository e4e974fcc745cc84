//! Filter engine: include/exclude selections evaluated per category
//!
//! Categories (source, year, tag) are evaluated independently and
//! combined with logical AND. Within a category, include entries
//! combine with OR and an exclude entry always wins. Modifier tags
//! (content format) form their own gate that ANDs against the ordinary
//! tag gate.

use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Tags describing the content format rather than the subject.
///
/// They behave as a mutually-exclusive facet: a modifier include is
/// required *in addition to* any ordinary tag includes, instead of
/// widening the ordinary OR.
pub const MODIFIER_TAGS: &[&str] = &["text", "video"];

pub fn is_modifier_tag(tag: &str) -> bool {
    MODIFIER_TAGS.contains(&tag)
}

/// Whether a filter entry selects records or removes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Include,
    Exclude,
}

/// One selected value within a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEntry {
    pub value: String,
    pub polarity: Polarity,
}

impl FilterEntry {
    pub fn include(value: impl Into<String>) -> FilterEntry {
        FilterEntry { value: value.into(), polarity: Polarity::Include }
    }

    pub fn exclude(value: impl Into<String>) -> FilterEntry {
        FilterEntry { value: value.into(), polarity: Polarity::Exclude }
    }

    pub fn is_include(&self) -> bool {
        self.polarity == Polarity::Include
    }

    pub fn is_exclude(&self) -> bool {
        self.polarity == Polarity::Exclude
    }
}

/// The active filter state, re-derived from the URL block per request.
///
/// Invariant (maintained by the query codec): a raw value appears at
/// most once per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub sources: Vec<FilterEntry>,
    pub years: Vec<FilterEntry>,
    pub tags: Vec<FilterEntry>,
    /// Missing-field facet; the only recognized value is `url`
    /// (records whose archived material was lost).
    pub missing: Vec<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
            && self.years.is_empty()
            && self.tags.is_empty()
            && self.missing.is_empty()
    }
}

/// Does `record` pass every category of `selection`?
///
/// Pure: no ordering side effects, same answer on every evaluation.
pub fn matches(record: &Record, selection: &Selection) -> bool {
    value_category_passes(&record.source, &selection.sources)
        && value_category_passes(&record.year().to_string(), &selection.years)
        && tag_category_passes(record, &selection.tags)
        && missing_passes(record, &selection.missing)
}

/// Source/year rule: empty category passes; an exclude match fails
/// immediately; otherwise pass on an include match, or when the
/// category holds no includes at all (exclusion-only lists mean
/// "everything except").
fn value_category_passes(value: &str, entries: &[FilterEntry]) -> bool {
    if entries.is_empty() {
        return true;
    }
    if entries.iter().any(|e| e.is_exclude() && e.value == value) {
        return false;
    }
    let has_includes = entries.iter().any(FilterEntry::is_include);
    !has_includes || entries.iter().any(|e| e.is_include() && e.value == value)
}

/// Tag rule: any excluded tag present on the record blocks it. The
/// include entries split into an ordinary gate and a modifier gate;
/// each gate is open when it has no entries or at least one of its
/// tags is on the record, and both must be open.
fn tag_category_passes(record: &Record, entries: &[FilterEntry]) -> bool {
    if entries
        .iter()
        .any(|e| e.is_exclude() && record.has_tag(&e.value))
    {
        return false;
    }
    include_gate_open(record, entries, false) && include_gate_open(record, entries, true)
}

fn include_gate_open(record: &Record, entries: &[FilterEntry], modifier: bool) -> bool {
    let mut includes = entries
        .iter()
        .filter(|e| e.is_include() && is_modifier_tag(&e.value) == modifier)
        .peekable();
    if includes.peek().is_none() {
        return true;
    }
    includes.any(|e| record.has_tag(&e.value))
}

fn missing_passes(record: &Record, missing: &[String]) -> bool {
    // Unrecognized field names are ignored.
    if missing.iter().any(|f| f == "url") {
        return record.url.is_none();
    }
    true
}
