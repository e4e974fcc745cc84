//! memorial-web library - gallery web service
//!
//! Serves the memorial gallery: an embedded browser UI plus JSON APIs
//! over an immutable, manifest-driven record set loaded at startup.

use std::sync::Arc;

use axum::Router;
use memorial_common::manifest::Manifest;
use memorial_common::record::Record;

pub mod api;
pub mod config;
pub mod store;
pub mod view;

use store::{FacetCounts, LoadReport};

/// Application state shared across HTTP handlers
///
/// Everything here is immutable after startup; handlers re-derive the
/// filter state from the request's query block on every call.
#[derive(Clone)]
pub struct AppState {
    /// Full record set, sorted most recent first
    pub records: Arc<Vec<Record>>,
    /// Source catalog (display names, logos, file list)
    pub manifest: Arc<Manifest>,
    /// Per-source / per-year / per-tag record counts
    pub facets: Arc<FacetCounts>,
    /// Outcome of the startup load, surfaced via /health
    pub report: Arc<LoadReport>,
}

impl AppState {
    /// Create new application state; records must already be sorted.
    pub fn new(manifest: Manifest, records: Vec<Record>, report: LoadReport) -> Self {
        let facets = store::count_facets(&records);
        Self {
            records: Arc::new(records),
            manifest: Arc::new(manifest),
            facets: Arc::new(facets),
            report: Arc::new(report),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/static/style.css", get(api::serve_style_css))
        .route("/api/records", get(api::get_records))
        .route("/api/facets", get(api::get_facets))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
