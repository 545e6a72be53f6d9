//! Caching proxy that generates crossword and word search puzzles through Gemini.
//!
//! Requests are fingerprinted (SHA-256 of their canonical JSON), looked up in a
//! SQLite cache, and only forwarded to the provider on a miss.

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod prompts;
pub mod provider;
pub mod service;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use handlers::{generate_handler, health_handler, method_not_allowed, metrics_handler};
use state::AppState;

pub const GENERATE_PATH: &str = "/generate-puzzle";

// creating the router with routes
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(GENERATE_PATH, post(generate_handler).fallback(method_not_allowed))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}
