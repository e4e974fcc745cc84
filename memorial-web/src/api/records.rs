//! Gallery records API: filter, paginate, and build cards
//!
//! Filtering runs once per request over the full sorted set; page
//! buttons carry precomputed query blocks so page changes only
//! re-slice on the next request.

use axum::extract::{Query, State};
use axum::Json;
use memorial_common::filter;
use memorial_common::pagination::{
    calculate_pagination, page_bounds, page_window, DEFAULT_PER_PAGE,
};
use memorial_common::query::QueryState;
use memorial_common::record::Record;
use serde::{Deserialize, Serialize};

use crate::view::{card_view, CardView, DEFAULT_IMAGE_QUALITY};
use crate::AppState;

/// Upper bound for the per-request page size
pub const MAX_PER_PAGE: i64 = 96;

/// Query parameters for the records endpoint
#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    /// Encoded filter block (the page hash on the client side)
    #[serde(default)]
    pub f: String,

    /// Page size from the client's settings
    pub per_page: Option<i64>,

    /// Image proxy quality from the client's settings
    pub quality: Option<i64>,
}

/// One page-number button
#[derive(Debug, Serialize)]
pub struct PageButton {
    pub page: i64,
    /// Filter block this button navigates to
    pub f: String,
    pub current: bool,
}

/// Records response with cards and pagination metadata
#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    /// Size of the full record set (the "all records" counter)
    pub total_records: usize,
    /// Records passing the current filter
    pub matched_records: usize,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    /// Whether first/last shortcut buttons are shown
    pub show_edges: bool,
    pub pages: Vec<PageButton>,
    pub first_f: String,
    pub last_f: String,
    pub cards: Vec<CardView>,
}

/// GET /api/records?f=w%3Ddtf%26p%3D2&per_page=24&quality=80
///
/// A malformed filter block degrades to an empty filter; the endpoint
/// itself never fails.
pub async fn get_records(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> Json<RecordsResponse> {
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let quality = query
        .quality
        .unwrap_or(DEFAULT_IMAGE_QUALITY as i64)
        .clamp(0, 100) as u8;

    let query_state = QueryState::parse(&query.f);
    let selection = query_state.selection();

    let matched: Vec<&Record> = state
        .records
        .iter()
        .filter(|r| filter::matches(r, &selection))
        .collect();

    let p = calculate_pagination(matched.len() as i64, query_state.page(), per_page);
    let (start, end) = page_bounds(matched.len(), p.page, per_page);
    let cards = matched[start..end]
        .iter()
        .map(|r| card_view(r, &state.manifest, quality))
        .collect();

    let window = page_window(p.total_pages, p.page);
    let pages = if p.total_pages > 1 {
        (window.first..=window.last)
            .map(|n| PageButton {
                page: n,
                f: query_state.with_page(n).encode(),
                current: n == p.page,
            })
            .collect()
    } else {
        Vec::new()
    };

    Json(RecordsResponse {
        total_records: state.records.len(),
        matched_records: matched.len(),
        page: p.page,
        per_page,
        total_pages: p.total_pages,
        show_edges: window.show_edges,
        pages,
        first_f: query_state.with_page(1).encode(),
        last_f: query_state.with_page(p.total_pages.max(1)).encode(),
        cards,
    })
}
