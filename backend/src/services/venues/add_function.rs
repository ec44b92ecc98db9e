//! `POST /api/venues/{venue_id}/functions`

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::FunctionDraft;

/// # Arguments
/// * `venue_id` - Owning venue, from the URL path.
/// * `body` - The function draft; item needs name catalog categories by id.
///
/// # Returns
/// - `201 Created` with the stored `VenueFunction`, category paths resolved.
/// - `400 Bad Request` for malformed opening hours or service lists.
/// - `404 Not Found` when the venue or a named category does not exist.
pub(crate) async fn process(
    venue_id: web::Path<String>,
    body: web::Json<FunctionDraft>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let function = state
        .engine
        .directory
        .add_function(&venue_id, body.into_inner())?;
    Ok(HttpResponse::Created().json(function))
}
