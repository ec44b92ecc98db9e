//! # Response Submission Service
//!
//! Backend logic for the `POST /api/responses` endpoint, where a volunteer
//! offers items or a service against one declared need.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` receives a `SubmitResponseRequest` JSON body.
//!
//! 2.  **Validation**: the engine checks the volunteer fields, builds the
//!     `NeedKey`, and verifies that the function exists, takes this kind of
//!     response and declares the requested category or service type. Item
//!     offers need a positive quantity; service offers carry none.
//!
//! 3.  **Append**: a new record with a fresh id is stored. The initial status
//!     comes from `engine.default_response_status` in the configuration.
//!     Submitting the same offer twice yields two records.
//!
//! 4.  **HTTP Response**: the stored `VolunteerResponse` is returned with
//!     `201 Created`.

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::SubmitResponseRequest;

/// Actix web handler for `POST /api/responses`.
///
/// # Arguments
/// * `body` - The volunteer's offer.
/// * `state` - Shared application state holding the engine and the configured
///   initial response status.
///
/// # Returns
/// - `201 Created` with the new `VolunteerResponse`.
/// - `400 Bad Request` (`INVALID_REQUEST`) for invalid offers, including
///   targets the function does not declare.
/// - `404 Not Found` when the venue or function does not exist.
pub(crate) async fn process(
    body: web::Json<SubmitResponseRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let response = state
        .engine
        .responses
        .submit_response(body.into_inner(), state.default_response_status)?;
    Ok(HttpResponse::Created().json(response))
}
