//! Filter dropdown API: counts, selection state, and toggle targets
//!
//! Counts come from the startup facet pass over the full set (the
//! record set is immutable). Every entry carries the query block the
//! client navigates to when the user clicks it, so the include/exclude
//! merge rules live in one place, the codec.

use axum::extract::{Query, State};
use axum::Json;
use memorial_common::filter::MODIFIER_TAGS;
use memorial_common::query::{QueryState, PARAM_MISSING, PARAM_SOURCE, PARAM_TAG, PARAM_YEAR};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Query parameters for the facets endpoint
#[derive(Debug, Deserialize)]
pub struct FacetsQuery {
    /// Encoded filter block the dropdown targets are computed against
    #[serde(default)]
    pub f: String,
}

/// One dropdown entry
#[derive(Debug, Serialize)]
pub struct FacetEntry {
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub count: usize,
    /// "include", "exclude", or null when not selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<&'static str>,
    /// Block to navigate to when toggling this value as an include
    pub include_f: String,
    /// Block to navigate to when toggling this value as an exclude
    pub exclude_f: String,
    pub modifier: bool,
}

/// One dropdown: its entries plus a clear-category target
#[derive(Debug, Serialize)]
pub struct FacetCategory {
    pub entries: Vec<FacetEntry>,
    pub clear_f: String,
    /// Number of currently selected values in this category
    pub active: usize,
}

/// The "material lost" view toggle
#[derive(Debug, Serialize)]
pub struct MissingFacet {
    pub count: usize,
    pub selected: bool,
    pub toggle_f: String,
}

/// Facets response: one category per dropdown
#[derive(Debug, Serialize)]
pub struct FacetsResponse {
    pub sources: FacetCategory,
    pub years: FacetCategory,
    pub tags: FacetCategory,
    pub missing_url: MissingFacet,
}

/// GET /api/facets?f=w%3Ddtf
pub async fn get_facets(
    State(state): State<AppState>,
    Query(query): Query<FacetsQuery>,
) -> Json<FacetsResponse> {
    let query_state = QueryState::parse(&query.f);

    let sources = build_category(
        &query_state,
        PARAM_SOURCE,
        state.manifest.sources.keys().map(|id| {
            let count = state.facets.sources.get(id).copied().unwrap_or(0);
            (
                id.clone(),
                state.manifest.display_name(id).to_string(),
                state.manifest.icon(id).map(str::to_string),
                count,
                false,
            )
        }),
    );

    let years = build_category(
        &query_state,
        PARAM_YEAR,
        state
            .facets
            .years
            .iter()
            .rev()
            .map(|(year, count)| (year.to_string(), year.to_string(), None, *count, false)),
    );

    // Modifier tags first (fixed facet, shown even when unused), then
    // ordinary tags by count descending.
    let mut ordinary: Vec<(&String, &usize)> = state
        .facets
        .tags
        .iter()
        .filter(|(tag, _)| !MODIFIER_TAGS.contains(&tag.as_str()))
        .collect();
    ordinary.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let tag_rows = MODIFIER_TAGS
        .iter()
        .map(|tag| {
            let count = state.facets.tags.get(*tag).copied().unwrap_or(0);
            (tag.to_string(), tag.to_string(), None, count, true)
        })
        .chain(
            ordinary
                .into_iter()
                .map(|(tag, count)| (tag.clone(), tag.clone(), None, *count, false)),
        );
    let tags = build_category(&query_state, PARAM_TAG, tag_rows);

    let missing_selected = query_state
        .selection()
        .missing
        .iter()
        .any(|f| f == "url");
    let missing_url = MissingFacet {
        count: state.facets.missing_url,
        selected: missing_selected,
        toggle_f: query_state.toggled(PARAM_MISSING, "url", false).encode(),
    };

    Json(FacetsResponse {
        sources,
        years,
        tags,
        missing_url,
    })
}

fn build_category(
    query_state: &QueryState,
    key: &str,
    rows: impl Iterator<Item = (String, String, Option<String>, usize, bool)>,
) -> FacetCategory {
    let entries = rows
        .map(|(value, label, icon, count, modifier)| {
            let state = query_state
                .entries(key)
                .iter()
                .find(|e| e.value == value)
                .map(|e| if e.is_include() { "include" } else { "exclude" });
            FacetEntry {
                include_f: query_state.toggled(key, &value, false).encode(),
                exclude_f: query_state.toggled(key, &value, true).encode(),
                value,
                label,
                icon,
                count,
                state,
                modifier,
            }
        })
        .collect();

    FacetCategory {
        entries,
        clear_f: query_state.cleared(key).encode(),
        active: query_state.entries(key).len(),
    }
}
