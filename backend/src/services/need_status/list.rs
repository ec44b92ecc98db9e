//! # Need-Status Listing Service
//!
//! Backend logic for `GET /api/need-status?venueId=&functionId=`.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` extracts the optional `venueId` and
//!     `functionId` scope from the query string. Empty values count as absent.
//!
//! 2.  **Lookup**: the overlay returns every stored status inside that scope,
//!     in the order the records were first created.
//!
//! 3.  **HTTP Response**: the records are serialized as a JSON array. Needs
//!     that never had a status set do not appear.

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::NeedStatusQuery;

/// Actix web handler for `GET /api/need-status`.
///
/// # Arguments
/// * `query` - Optional venue and function scope.
/// * `state` - Shared application state holding the engine.
///
/// # Returns
/// - `200 OK` with a (possibly empty) array of `NeedStatusUpdate`s.
/// - `400 Bad Request` when the query string cannot be parsed.
pub(crate) async fn process(
    query: web::Query<NeedStatusQuery>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let statuses = state.engine.overlay.list_statuses(&query)?;
    Ok(HttpResponse::Ok().json(statuses))
}
