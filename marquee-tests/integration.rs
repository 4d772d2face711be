//! Integration tests for Marquee
//!
//! These tests run the real HTTP clients and the full engine actor against
//! in-process emulations of the two external services: the movie catalog API
//! and the trend document store. They verify wire formats, error mapping,
//! and the end-to-end debounced search flow.

#[path = "integration/support.rs"]
mod support;

#[path = "integration/catalog_http.rs"]
mod catalog_http;

#[path = "integration/trend_store_http.rs"]
mod trend_store_http;

#[path = "integration/engine_flow.rs"]
mod engine_flow;
