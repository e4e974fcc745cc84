//! Integration tests for memorial-web API endpoints
//!
//! Tests cover:
//! - Health endpoint, including the degraded flag
//! - Records endpoint: filtering, pagination, card construction
//! - Facets endpoint: counts, selection state, toggle targets
//! - Embedded UI serving

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use memorial_common::manifest::Manifest;
use memorial_common::record::{sort_records, Record, RecordDate};
use memorial_web::store::{FailedFile, LoadReport};
use memorial_web::{build_router, AppState};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

const MANIFEST: &str = r#"{
    "dtf": {"name": "DTF", "icon": "https://example.com/dtf.png", "files": ["dtf.json"]},
    "igromania": {"name": "Igromania", "files": ["igromania.json"]},
    "zog": {"name": "Zone of Games", "files": ["zog.json"]}
}"#;

/// Test helper: one record with the fields the filter engine looks at
fn record(title: &str, source: &str, year: i32, tags: &[&str]) -> Record {
    Record {
        title: title.to_string(),
        teaser_text: format!("teaser for {}", title),
        date: RecordDate { year, month: 6, day: 15 },
        source: source.to_string(),
        img: Some(format!("https://example.com/{}.jpg", title)),
        url: Some(format!("https://example.com/{}", title)),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// Test helper: state over an in-memory record set (clean load report)
fn setup_state(mut records: Vec<Record>) -> AppState {
    sort_records(&mut records);
    let report = LoadReport {
        files_attempted: 3,
        failed: Vec::new(),
        records_loaded: records.len(),
    };
    AppState::new(Manifest::parse(MANIFEST).unwrap(), records, report)
}

/// Test helper: create request
fn test_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: run one request against fresh copy of the app
async fn get_json(state: &AppState, uri: &str) -> Value {
    let response = build_router(state.clone())
        .oneshot(test_request(uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn hundred_records() -> Vec<Record> {
    (0..100)
        .map(|i| {
            record(
                &format!("r{}", i),
                if i % 2 == 0 { "dtf" } else { "zog" },
                2010 + (i as i32 % 10),
                &[],
            )
        })
        .collect()
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_ok() {
    let state = setup_state(vec![record("a", "dtf", 2020, &[])]);
    let body = get_json(&state, "/health").await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "memorial-web");
    assert!(body["version"].is_string());
    assert_eq!(body["records_loaded"], 1);
    assert_eq!(body["files_failed"], 0);
}

#[tokio::test]
async fn test_health_degraded_after_partial_load() {
    let mut state = setup_state(vec![record("a", "dtf", 2020, &[])]);
    state.report = std::sync::Arc::new(LoadReport {
        files_attempted: 3,
        failed: vec![FailedFile {
            source: "zog".to_string(),
            file: "zog.json".to_string(),
            error: "missing".to_string(),
        }],
        records_loaded: 1,
    });
    let body = get_json(&state, "/health").await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["files_failed"], 1);
}

// =============================================================================
// Records Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_empty_filter_renders_first_page() {
    let state = setup_state(hundred_records());
    let body = get_json(&state, "/api/records").await;

    assert_eq!(body["total_records"], 100);
    assert_eq!(body["matched_records"], 100);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 24);
    assert_eq!(body["total_pages"], 5);
    // Exactly min(per_page, 100) cards on page 1
    assert_eq!(body["cards"].as_array().unwrap().len(), 24);
}

#[tokio::test]
async fn test_filter_by_source() {
    let state = setup_state(hundred_records());
    let body = get_json(&state, "/api/records?f=w%3Ddtf").await;
    assert_eq!(body["matched_records"], 50);
    for card in body["cards"].as_array().unwrap() {
        assert_eq!(card["source"], "dtf");
    }
}

#[tokio::test]
async fn test_source_exclusion() {
    let state = setup_state(hundred_records());
    let body = get_json(&state, "/api/records?f=w%3D!dtf").await;
    assert_eq!(body["matched_records"], 50);
    for card in body["cards"].as_array().unwrap() {
        assert_eq!(card["source"], "zog");
    }
}

#[tokio::test]
async fn test_source_and_year_combine_with_and() {
    let state = setup_state(vec![
        record("match", "dtf", 2020, &[]),
        record("wrong-source", "zog", 2020, &[]),
        record("wrong-year", "dtf", 2019, &[]),
    ]);
    let body = get_json(&state, "/api/records?f=w%3Ddtf%26y%3D2020").await;
    assert_eq!(body["matched_records"], 1);
    assert_eq!(body["cards"][0]["title"], "match");
}

#[tokio::test]
async fn test_modifier_tag_requires_both_gates() {
    let state = setup_state(vec![
        record("both", "dtf", 2020, &["review", "video"]),
        record("ordinary-only", "dtf", 2020, &["review"]),
        record("modifier-only", "dtf", 2020, &["video"]),
    ]);
    let body = get_json(&state, "/api/records?f=t%3Dreview%2Cvideo").await;
    assert_eq!(body["matched_records"], 1);
    assert_eq!(body["cards"][0]["title"], "both");
}

#[tokio::test]
async fn test_last_page_slice() {
    // 50 records at 24/page: page 3 holds the final 2
    let state = setup_state(hundred_records().into_iter().take(50).collect());
    let body = get_json(&state, "/api/records?f=p%3D3").await;
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["page"], 3);
    assert_eq!(body["cards"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_page_out_of_bounds_clamps() {
    let state = setup_state(hundred_records().into_iter().take(50).collect());
    let body = get_json(&state, "/api/records?f=p%3D99").await;
    assert_eq!(body["page"], 3);
}

#[tokio::test]
async fn test_per_page_clamped() {
    let state = setup_state(hundred_records());
    let body = get_json(&state, "/api/records?per_page=10000").await;
    assert_eq!(body["per_page"], 96);
    assert_eq!(body["cards"].as_array().unwrap().len(), 96);
}

#[tokio::test]
async fn test_malformed_filter_block_degrades_to_empty() {
    let state = setup_state(hundred_records());
    let body = get_json(&state, "/api/records?f=%3D%3D%26garbage%26%26").await;
    assert_eq!(body["matched_records"], 100);
}

#[tokio::test]
async fn test_page_buttons_carry_filter_block() {
    let state = setup_state(hundred_records());
    let body = get_json(&state, "/api/records?f=w%3Ddtf").await;
    // 50 matches at 24/page = 3 pages
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["show_edges"], true);
    let pages = body["pages"].as_array().unwrap();
    assert_eq!(pages[0]["f"], "w=dtf");
    assert_eq!(pages[0]["current"], true);
    assert_eq!(pages[1]["f"], "w=dtf&p=2");
    assert_eq!(body["last_f"], "w=dtf&p=3");
}

#[tokio::test]
async fn test_single_page_hides_buttons() {
    let state = setup_state(vec![record("a", "dtf", 2020, &[])]);
    let body = get_json(&state, "/api/records").await;
    assert_eq!(body["pages"].as_array().unwrap().len(), 0);
    assert_eq!(body["show_edges"], false);
}

#[tokio::test]
async fn test_cards_use_image_proxy() {
    let state = setup_state(vec![record("a", "dtf", 2020, &[])]);
    let body = get_json(&state, "/api/records?quality=55").await;
    let img = body["cards"][0]["img"].as_str().unwrap();
    assert!(img.starts_with("https://wsrv.nl/?"));
    assert!(img.contains("q=55"));
}

#[tokio::test]
async fn test_missing_url_view() {
    let mut lost = record("lost", "dtf", 2020, &[]);
    lost.url = None;
    let state = setup_state(vec![lost, record("kept", "dtf", 2020, &[])]);
    let body = get_json(&state, "/api/records?f=m%3Durl").await;
    assert_eq!(body["matched_records"], 1);
    assert_eq!(body["cards"][0]["title"], "lost");
    assert!(body["cards"][0].get("url").is_none());
}

// =============================================================================
// Facets Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_facet_counts_and_labels() {
    let state = setup_state(vec![
        record("a", "dtf", 2020, &["review"]),
        record("b", "dtf", 2019, &[]),
        record("c", "zog", 2020, &[]),
    ]);
    let body = get_json(&state, "/api/facets").await;

    let sources = body["sources"]["entries"].as_array().unwrap();
    let dtf = sources.iter().find(|e| e["value"] == "dtf").unwrap();
    assert_eq!(dtf["label"], "DTF");
    assert_eq!(dtf["count"], 2);
    // Manifest-listed source with no records still appears
    let igromania = sources.iter().find(|e| e["value"] == "igromania").unwrap();
    assert_eq!(igromania["count"], 0);

    // Years come most recent first
    let years = body["years"]["entries"].as_array().unwrap();
    assert_eq!(years[0]["value"], "2020");
    assert_eq!(years[0]["count"], 2);
    assert_eq!(years[1]["value"], "2019");
}

#[tokio::test]
async fn test_facet_toggle_targets_round_trip() {
    let state = setup_state(vec![record("a", "dtf", 2020, &[])]);

    let body = get_json(&state, "/api/facets").await;
    let sources = body["sources"]["entries"].as_array().unwrap();
    let dtf = sources.iter().find(|e| e["value"] == "dtf").unwrap();
    assert_eq!(dtf["include_f"], "w=dtf");
    assert_eq!(dtf["exclude_f"], "w=!dtf");
    assert!(dtf["state"].is_null());

    // With dtf included, its include target now removes it
    let body = get_json(&state, "/api/facets?f=w%3Ddtf").await;
    let sources = body["sources"]["entries"].as_array().unwrap();
    let dtf = sources.iter().find(|e| e["value"] == "dtf").unwrap();
    assert_eq!(dtf["state"], "include");
    assert_eq!(dtf["include_f"], "");
    assert_eq!(dtf["exclude_f"], "w=!dtf");
    assert_eq!(body["sources"]["active"], 1);
    assert_eq!(body["sources"]["clear_f"], "");
}

#[tokio::test]
async fn test_facet_toggle_resets_page() {
    let state = setup_state(hundred_records());
    let body = get_json(&state, "/api/facets?f=w%3Ddtf%26p%3D3").await;
    let sources = body["sources"]["entries"].as_array().unwrap();
    let zog = sources.iter().find(|e| e["value"] == "zog").unwrap();
    // Adding a second source keeps the filter but drops the page
    assert_eq!(zog["include_f"], "w=dtf,zog");
}

#[tokio::test]
async fn test_modifier_tags_listed_first() {
    let state = setup_state(vec![
        record("a", "dtf", 2020, &["review", "video"]),
        record("b", "dtf", 2020, &["review"]),
    ]);
    let body = get_json(&state, "/api/facets").await;
    let tags = body["tags"]["entries"].as_array().unwrap();
    assert_eq!(tags[0]["value"], "text");
    assert_eq!(tags[0]["modifier"], true);
    assert_eq!(tags[1]["value"], "video");
    assert_eq!(tags[1]["count"], 1);
    // Ordinary tags follow, by count
    assert_eq!(tags[2]["value"], "review");
    assert_eq!(tags[2]["modifier"], false);
}

#[tokio::test]
async fn test_missing_url_facet_state() {
    let mut lost = record("lost", "dtf", 2020, &[]);
    lost.url = None;
    let state = setup_state(vec![lost]);

    let body = get_json(&state, "/api/facets").await;
    assert_eq!(body["missing_url"]["count"], 1);
    assert_eq!(body["missing_url"]["selected"], false);
    assert_eq!(body["missing_url"]["toggle_f"], "m=url");

    let body = get_json(&state, "/api/facets?f=m%3Durl").await;
    assert_eq!(body["missing_url"]["selected"], true);
    assert_eq!(body["missing_url"]["toggle_f"], "");
}

// =============================================================================
// Embedded UI Tests
// =============================================================================

#[tokio::test]
async fn test_index_served() {
    let state = setup_state(Vec::new());
    let response = build_router(state)
        .oneshot(test_request("/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("records_container"));
}

#[tokio::test]
async fn test_app_js_content_type() {
    let state = setup_state(Vec::new());
    let response = build_router(state)
        .oneshot(test_request("/static/app.js"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/javascript"
    );
}
