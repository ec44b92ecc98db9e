//! # Response Cancellation Service
//!
//! Backend logic for `POST /api/responses/{response_id}/cancel`.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` takes the response id from the path.
//!
//! 2.  **Transition**: the store flips the status to `cancelled` under its
//!     lock. The record itself is kept, and cancelling an already cancelled
//!     response returns it unchanged.
//!
//! 3.  **HTTP Response**: the updated response as JSON. It drops out of every
//!     projection from now on.

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Actix web handler for `POST /api/responses/{response_id}/cancel`.
///
/// # Arguments
/// * `response_id` - Id of the response, extracted from the URL path.
/// * `state` - Shared application state holding the engine.
///
/// # Returns
/// - `200 OK` with the cancelled `VolunteerResponse`.
/// - `404 Not Found` when no response has this id.
pub(crate) async fn process(
    response_id: web::Path<String>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let response = state.engine.responses.cancel_response(&response_id)?;
    Ok(HttpResponse::Ok().json(response))
}
