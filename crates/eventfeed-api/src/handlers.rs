//! REST API endpoint handlers for the Events server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/Events` | Append the body object, return the full document |
//! | `GET` | `/Events?user=<name>` | First record for `user`, or `{"Error":"UserNotFound"}` |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use eventfeed_store::{DocumentBackend, EventDocument, EventRecord, Lookup};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the `GET /Events` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct EventsQuery {
    /// Exact, case-sensitive value of the `user` field to look for.
    pub user: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /Events -- append an event
// ---------------------------------------------------------------------------

/// Append the request body as a new event record.
///
/// The body must be a JSON object; anything else is a `400` and the store
/// is not touched. The stored record gets `"Manipulated": "Yes"`.
pub async fn append_event<B: DocumentBackend>(
    State(state): State<Arc<AppState<B>>>,
    payload: Result<Json<EventRecord>, JsonRejection>,
) -> Result<Json<EventDocument>, ApiError> {
    let Json(record) = payload.inspect_err(|rejection| {
        warn!(reason = %rejection.body_text(), "Rejected event body");
    })?;

    let document = state.store.append_event(record).await?;
    Ok(Json(document))
}

// ---------------------------------------------------------------------------
// GET /Events -- find an event by user
// ---------------------------------------------------------------------------

/// Return the first stored record whose `user` matches the query.
///
/// # Query Parameters
///
/// - `user`: required. A miss is still a `200` carrying
///   `{"Error": "UserNotFound"}`.
pub async fn find_event<B: DocumentBackend>(
    State(state): State<Arc<AppState<B>>>,
    params: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<Json<Lookup>, ApiError> {
    let Query(params) = params?;
    let user = params
        .user
        .ok_or_else(|| ApiError::InvalidQuery(String::from("missing `user` parameter")))?;

    let lookup = state.store.find_event_by_user(&user).await?;
    if !lookup.is_found() {
        debug!(user = %user, "No event for user");
    }
    Ok(Json(lookup))
}
