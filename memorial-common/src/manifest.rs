//! Source manifest: which data files to load and how to label them
//!
//! The manifest is the closed set of sources: display names, logo
//! assets, and the record files each source contributes. User data
//! never adds sources.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One source of archived material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Display name shown in the filter dropdown and on cards
    pub name: String,
    /// Logo asset path, if the source has one
    #[serde(default)]
    pub icon: Option<String>,
    /// Record files belonging to this source, relative to the data dir
    pub files: Vec<String>,
}

/// Source id → source info. A BTreeMap keeps catalog order
/// deterministic across loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(flatten)]
    pub sources: BTreeMap<String, SourceInfo>,
}

impl Manifest {
    pub fn parse(raw: &str) -> crate::Result<Manifest> {
        let manifest: Manifest = serde_json::from_str(raw)?;
        if manifest.sources.is_empty() {
            return Err(crate::Error::Config(
                "manifest lists no sources".to_string(),
            ));
        }
        Ok(manifest)
    }

    /// Display name for a source id; unknown ids fall back to the id.
    pub fn display_name<'a>(&'a self, source_id: &'a str) -> &'a str {
        self.sources
            .get(source_id)
            .map(|s| s.name.as_str())
            .unwrap_or(source_id)
    }

    pub fn icon(&self, source_id: &str) -> Option<&str> {
        self.sources.get(source_id).and_then(|s| s.icon.as_deref())
    }

    /// Every (source id, file) pair the loader should fetch.
    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sources.iter().flat_map(|(id, info)| {
            info.files.iter().map(move |f| (id.as_str(), f.as_str()))
        })
    }
}
