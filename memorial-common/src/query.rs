//! Query codec: the URL-carried filter parameter block
//!
//! The block is a single string of `key=value,value` pairs joined by
//! `&`; excluded values carry a leading `!`. It is parsed once into an
//! ordered key/entry-list map and serialized back once; the raw string
//! is never edited in place.

use crate::filter::{is_modifier_tag, FilterEntry, Polarity, Selection};

/// Category keys within the parameter block.
pub const PARAM_SOURCE: &str = "w";
pub const PARAM_YEAR: &str = "y";
pub const PARAM_TAG: &str = "t";
pub const PARAM_MISSING: &str = "m";
/// The current page number rides in the same block.
pub const PARAM_PAGE: &str = "p";

/// Marker prefix for excluded values.
const EXCLUDE_MARK: char = '!';

/// Parsed form of the parameter block.
///
/// Keys keep their first-seen order so re-encoding is stable across
/// navigations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    params: Vec<(String, Vec<FilterEntry>)>,
}

impl QueryState {
    /// Parse a raw block. Never fails: malformed pairs are dropped,
    /// which leaves the affected category empty.
    pub fn parse(raw: &str) -> QueryState {
        let mut state = QueryState::default();
        for pair in raw.split('&') {
            let Some((key, values)) = pair.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            for value in values.split(',') {
                let value = value.trim();
                if value.is_empty() || value == "!" {
                    continue;
                }
                let entry = match value.strip_prefix(EXCLUDE_MARK) {
                    Some(rest) => FilterEntry::exclude(rest),
                    None => FilterEntry::include(value),
                };
                // First occurrence of a value wins; a later duplicate
                // (either polarity) is dropped.
                let list = state.entries_mut(key);
                if !list.iter().any(|e| e.value == entry.value) {
                    list.push(entry);
                }
            }
        }
        state
    }

    /// Canonical encoded form. Empty categories are omitted, so
    /// `parse(encode(s)) == s` up to dropped empties.
    pub fn encode(&self) -> String {
        self.params
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(key, entries)| format!("{}={}", key, encode_entries(entries)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Raw stored value for `key`, or an empty string if absent.
    pub fn get_param(&self, key: &str) -> String {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, entries)| encode_entries(entries))
            .unwrap_or_default()
    }

    /// Replace or append `key=value`, preserving the other keys.
    /// An empty value removes the key. Returns whether the stored
    /// block actually changed (callers redraw only on change).
    pub fn set_param(&mut self, key: &str, value: &str) -> bool {
        let before = self.get_param(key);
        if value.is_empty() {
            self.params.retain(|(k, _)| k != key);
            return !before.is_empty();
        }
        let parsed = QueryState::parse(&format!("{}={}", key, value));
        let entries = parsed.entries(key).to_vec();
        *self.entries_mut(key) = entries;
        self.get_param(key) != before
    }

    /// Merge one selection into `key`'s list: an opposite-polarity
    /// entry for the same value is replaced in place (polarity flip);
    /// a same-polarity entry means no change; otherwise the value is
    /// appended, or prepended when `prepend` is set (modifier tags
    /// sort first). Returns whether a change occurred.
    pub fn add(&mut self, key: &str, value: &str, exclude: bool, prepend: bool) -> bool {
        let polarity = if exclude { Polarity::Exclude } else { Polarity::Include };
        let list = self.entries_mut(key);
        if let Some(existing) = list.iter_mut().find(|e| e.value == value) {
            if existing.polarity == polarity {
                return false;
            }
            existing.polarity = polarity;
            return true;
        }
        let entry = FilterEntry { value: value.to_string(), polarity };
        if prepend {
            list.insert(0, entry);
        } else {
            list.push(entry);
        }
        true
    }

    /// Delete one value from `key`'s list regardless of polarity.
    /// Returns whether it was present.
    pub fn remove(&mut self, key: &str, value: &str) -> bool {
        let (removed, now_empty) = match self.params.iter_mut().find(|(k, _)| k == key) {
            Some((_, list)) => {
                let before = list.len();
                list.retain(|e| e.value != value);
                (list.len() != before, list.is_empty())
            }
            None => return false,
        };
        if now_empty {
            self.params.retain(|(k, _)| k != key);
        }
        removed
    }

    /// Entries stored under `key` (empty slice when absent).
    pub fn entries(&self, key: &str) -> &[FilterEntry] {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, entries)| entries.as_slice())
            .unwrap_or(&[])
    }

    fn entries_mut(&mut self, key: &str) -> &mut Vec<FilterEntry> {
        if !self.params.iter().any(|(k, _)| k == key) {
            self.params.push((key.to_string(), Vec::new()));
        }
        self.params
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, entries)| entries)
            .expect("key inserted above")
    }

    /// Typed filter selection for the engine.
    pub fn selection(&self) -> Selection {
        Selection {
            sources: self.entries(PARAM_SOURCE).to_vec(),
            years: self.entries(PARAM_YEAR).to_vec(),
            tags: self.entries(PARAM_TAG).to_vec(),
            missing: self
                .entries(PARAM_MISSING)
                .iter()
                .filter(|e| e.is_include())
                .map(|e| e.value.clone())
                .collect(),
        }
    }

    /// Current page (the `p` key), defaulting to 1; junk parses as 1.
    pub fn page(&self) -> i64 {
        self.entries(PARAM_PAGE)
            .first()
            .and_then(|e| e.value.parse::<i64>().ok())
            .unwrap_or(1)
            .max(1)
    }

    /// The same block pointed at another page. Page 1 drops the key,
    /// keeping first-page URLs canonical.
    pub fn with_page(&self, page: i64) -> QueryState {
        let mut next = self.clone();
        if page <= 1 {
            next.set_param(PARAM_PAGE, "");
        } else {
            next.set_param(PARAM_PAGE, &page.to_string());
        }
        next
    }

    /// Toggle one value: present with the same polarity → removed;
    /// otherwise added (polarity flip counts as adding). Any filter
    /// change resets the page back to 1.
    pub fn toggled(&self, key: &str, value: &str, exclude: bool) -> QueryState {
        let mut next = self.clone();
        let same_polarity_present = next
            .entries(key)
            .iter()
            .any(|e| e.value == value && e.is_exclude() == exclude);
        if same_polarity_present {
            next.remove(key, value);
        } else {
            let prepend = key == PARAM_TAG && is_modifier_tag(value);
            next.add(key, value, exclude, prepend);
        }
        next.set_param(PARAM_PAGE, "");
        next
    }

    /// The block with one whole category cleared (and the page reset).
    pub fn cleared(&self, key: &str) -> QueryState {
        let mut next = self.clone();
        next.set_param(key, "");
        next.set_param(PARAM_PAGE, "");
        next
    }
}

fn encode_entries(entries: &[FilterEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            if e.is_exclude() {
                format!("{}{}", EXCLUDE_MARK, e.value)
            } else {
                e.value.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
