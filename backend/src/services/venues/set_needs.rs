//! `PUT /api/venues/{venue_id}/functions/{function_id}/needs`
//!
//! Item categories are resolved again on replacement, so the new needs carry
//! the catalog paths as they are now. Responses already recorded against the
//! old needs are left untouched.

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::NeedsDraft;

/// Returns the function with its new needs and a fresh `updatedAt`.
pub(crate) async fn process(
    path: web::Path<(String, String)>,
    body: web::Json<NeedsDraft>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let (venue_id, function_id) = path.into_inner();
    let function = state
        .engine
        .directory
        .set_needs(&venue_id, &function_id, body.into_inner())?;
    Ok(HttpResponse::Ok().json(function))
}
