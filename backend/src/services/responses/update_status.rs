//! `POST /api/responses/{response_id}/status`
//!
//! Organizer fulfillment tracking. Statuses only move forward
//! (`pending → confirmed → completed`) or to `cancelled`; anything else is
//! `400 INVALID_REQUEST`.

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::UpdateResponseStatusRequest;

/// # Arguments
/// * `response_id` - Id of the response, from the URL path.
/// * `body` - The requested status.
///
/// # Returns
/// - `200 OK` with the updated response.
/// - `400 Bad Request` for a backwards move, `404 Not Found` for unknown ids.
pub(crate) async fn process(
    response_id: web::Path<String>,
    body: web::Json<UpdateResponseStatusRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let response = state
        .engine
        .responses
        .update_response_status(&response_id, body.status)?;
    Ok(HttpResponse::Ok().json(response))
}
