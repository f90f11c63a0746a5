//! Router for the presign server.

use std::sync::Arc;

use axum::{
    body::Bytes,
    debug_handler,
    extract::State,
    routing::get,
    Router,
};
use tracing::{info_span, Instrument};

use crate::{
    extract::{InvocationInput, ResolvedParameters},
    response::PresignEnvelope,
    state::PresignState,
};

/// Builds the router for the presign server.
///
/// `GET /presign` reads `bucket`, `method` and `key` from the query string,
/// `POST /presign` accepts a direct-invocation JSON document.
pub fn build_presign_router(state: Arc<PresignState>) -> Router {
    Router::new()
        .route("/presign", get(presign_from_query).post(presign_from_body))
        .with_state(state)
}

#[debug_handler]
async fn presign_from_query(
    State(state): State<Arc<PresignState>>,
    input: InvocationInput,
) -> PresignEnvelope {
    let span = info_span!("presign_from_query", ?input);
    state.handle_invocation(input).instrument(span).await
}

#[debug_handler]
async fn presign_from_body(State(state): State<Arc<PresignState>>, body: Bytes) -> PresignEnvelope {
    match InvocationInput::from_slice(&body) {
        Ok(input) => {
            let span = info_span!("presign_from_body", ?input);
            state.handle_invocation(input).instrument(span).await
        }
        Err(err) => PresignEnvelope::failure(err, ResolvedParameters::default()),
    }
}
