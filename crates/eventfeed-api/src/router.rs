//! Axum router construction for the Events API.
//!
//! Assembles the routes into a single [`Router`] with CORS middleware
//! enabled, so a browser page served from another origin can post events.

use std::sync::Arc;

use axum::Router;
use axum::routing::post;
use eventfeed_store::DocumentBackend;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the Events server.
///
/// The router includes:
/// - `POST /Events` -- append an event record
/// - `GET /Events?user=` -- find the first record for a user
///
/// CORS allows any origin, method, and header.
pub fn build_router<B: DocumentBackend>(state: Arc<AppState<B>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/Events",
            post(handlers::append_event::<B>).get(handlers::find_event::<B>),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
