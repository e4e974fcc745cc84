//! Record store: manifest-driven loading of the JSON data files
//!
//! All files load concurrently; each file's outcome is recorded
//! individually so a broken or missing file degrades the data set
//! instead of stalling startup. The loaded set is normalized and
//! sorted here, exactly once.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use memorial_common::manifest::Manifest;
use memorial_common::record::{sort_records, Record};
use tracing::{info, warn};

/// One data file that could not be loaded.
#[derive(Debug, Clone)]
pub struct FailedFile {
    pub source: String,
    pub file: String,
    pub error: String,
}

/// Aggregate outcome of the startup load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub files_attempted: usize,
    pub failed: Vec<FailedFile>,
    pub records_loaded: usize,
}

impl LoadReport {
    pub fn is_degraded(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Everything the service needs from the data directory.
#[derive(Debug)]
pub struct LoadedCatalog {
    pub manifest: Manifest,
    pub records: Vec<Record>,
    pub report: LoadReport,
}

/// Load the manifest and every record file it lists.
///
/// A missing or invalid manifest is fatal (there is nothing to
/// serve); individual file failures are logged, counted, and skipped.
pub async fn load_catalog(data_dir: &Path) -> Result<LoadedCatalog> {
    let manifest_path = data_dir.join("manifest.json");
    let raw = tokio::fs::read_to_string(&manifest_path)
        .await
        .with_context(|| format!("Failed to read manifest {}", manifest_path.display()))?;
    let manifest = Manifest::parse(&raw)
        .with_context(|| format!("Invalid manifest {}", manifest_path.display()))?;

    let fetches = manifest.files().map(|(source, file)| {
        let path = data_dir.join(file);
        async move { (source, file, load_file(&path).await) }
    });
    let outcomes = futures::future::join_all(fetches).await;

    let mut records: Vec<Record> = Vec::new();
    let mut report = LoadReport::default();
    for (source, file, outcome) in outcomes {
        report.files_attempted += 1;
        match outcome {
            Ok(batch) => records.extend(batch.into_iter().map(Record::normalize)),
            Err(e) => {
                warn!("Failed to load {} (source {}): {}", file, source, e);
                report.failed.push(FailedFile {
                    source: source.to_string(),
                    file: file.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    sort_records(&mut records);
    report.records_loaded = records.len();
    info!(
        "Loaded {} records from {} files",
        report.records_loaded,
        report.files_attempted - report.failed.len()
    );

    Ok(LoadedCatalog {
        manifest,
        records,
        report,
    })
}

async fn load_file(path: &Path) -> memorial_common::Result<Vec<Record>> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Record counts per source, year, and tag, computed once after load
/// for the filter dropdowns (the record set never changes afterwards).
#[derive(Debug, Clone, Default)]
pub struct FacetCounts {
    pub sources: BTreeMap<String, usize>,
    pub years: BTreeMap<i32, usize>,
    pub tags: BTreeMap<String, usize>,
    /// Records whose archived material has no link
    pub missing_url: usize,
}

pub fn count_facets(records: &[Record]) -> FacetCounts {
    let mut facets = FacetCounts::default();
    for record in records {
        *facets.sources.entry(record.source.clone()).or_default() += 1;
        *facets.years.entry(record.year()).or_default() += 1;
        for tag in &record.tags {
            *facets.tags.entry(tag.clone()).or_default() += 1;
        }
        if record.url.is_none() {
            facets.missing_url += 1;
        }
    }
    facets
}
