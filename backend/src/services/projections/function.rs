//! # Function Projection Service
//!
//! Backend logic for `GET /api/projections/{venue_id}/{function_id}`, the
//! organizer's view of one function.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` takes the venue and function ids from the
//!     path.
//!
//! 2.  **Aggregation**: the aggregator reads the function's declared needs,
//!     its active responses (everything except `cancelled`), the need-status
//!     overrides and the confirmed beneficiary commitments.
//!
//! 3.  **Assembly**: every declared need gets an entry, even with no
//!     responses. Items report a response count and the summed quantity;
//!     services report the responding volunteers. Each entry carries its
//!     current status, or `null` when none was set.
//!
//! 4.  **HTTP Response**: the `VenueProjection` as JSON. Nothing is stored.

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// # Arguments
/// * `path` - `(venue_id, function_id)` from the URL.
/// * `state` - Shared application state holding the engine.
///
/// # Returns
/// - `200 OK` with the `VenueProjection`.
/// - `404 Not Found` when the venue or function does not exist.
pub(crate) async fn process(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let (venue_id, function_id) = path.into_inner();
    let projection = state
        .engine
        .projections
        .project_function(&venue_id, &function_id)?;
    Ok(HttpResponse::Ok().json(projection))
}
