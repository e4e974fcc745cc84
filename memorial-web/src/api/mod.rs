//! HTTP API handlers for memorial-web

pub mod facets;
pub mod health;
pub mod records;
pub mod ui;

pub use facets::get_facets;
pub use health::health_routes;
pub use records::get_records;
pub use ui::{serve_app_js, serve_index, serve_style_css};
