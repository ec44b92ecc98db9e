//! `GET /api/responses/{response_id}`

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Returns one response by id, `404` if unknown.
pub(crate) async fn process(
    response_id: web::Path<String>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let response = state.engine.responses.get_response(&response_id)?;
    Ok(HttpResponse::Ok().json(response))
}
