//! # Response Listing Service
//!
//! Backend logic for `GET /api/responses?venueId=&functionId=&volunteerId=`.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` extracts the three optional filters.
//!     Empty values count as absent.
//!
//! 2.  **Lookup**: filters are AND-combined; cancelled responses are included,
//!     so callers see the full history.
//!
//! 3.  **HTTP Response**: matching responses as a JSON array, oldest first.

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::ResponseQuery;

/// Actix web handler for `GET /api/responses`.
///
/// # Arguments
/// * `query` - Optional venue, function and volunteer filters.
/// * `state` - Shared application state holding the engine.
///
/// # Returns
/// - `200 OK` with a (possibly empty) array of `VolunteerResponse`s.
/// - `400 Bad Request` when the query string cannot be parsed.
pub(crate) async fn process(
    query: web::Query<ResponseQuery>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let responses = state.engine.responses.list_responses(&query)?;
    Ok(HttpResponse::Ok().json(responses))
}
