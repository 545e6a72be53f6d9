use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;

use crate::error::ApiError;
use crate::metrics::{REQUEST_LATENCY, REQUEST_TOTAL};
use crate::models::PuzzleRequest;
use crate::state::AppState;

// Parsed by hand so every bad body is a 400, whatever the content type
pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    // latency covers rejected and failed requests too
    let result = generate(&state, &body).await;
    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    result
}

async fn generate(state: &AppState, body: &[u8]) -> Result<Response, ApiError> {
    let req: PuzzleRequest =
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let generated = state.service.get_or_generate(&req).await?;

    tracing::info!(
        "served puzzle {} (cache_hit={})",
        generated.fingerprint,
        generated.cache_hit
    );

    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        generated.payload,
    )
        .into_response())
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        "Only POST requests are allowed on this endpoint.",
    )
}
