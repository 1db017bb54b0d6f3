pub mod health;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};

use crate::extract::handlers::handle_upload_cv;
use crate::state::AppState;
use crate::tailoring::handlers::handle_tailor;

/// Client-issued request number. Echoed back so a client can drop responses to
/// requests it has since superseded.
pub const REQUEST_GENERATION_HEADER: HeaderName = HeaderName::from_static("x-request-generation");

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

async fn echo_request_generation(request: Request, next: Next) -> Response {
    let generation = request
        .headers()
        .get(&REQUEST_GENERATION_HEADER)
        .filter(|v| v.to_str().is_ok_and(|s| s.parse::<u64>().is_ok()))
        .cloned();

    let mut response = next.run(request).await;
    if let Some(value) = generation {
        response
            .headers_mut()
            .insert(REQUEST_GENERATION_HEADER, value);
    }
    response
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/upload-cv",
            post(handle_upload_cv).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/tailor", post(handle_tailor))
        .layer(middleware::from_fn(echo_request_generation))
        .with_state(state)
}
