//! `GET /api/venues/{venue_id}/functions`

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// `404` when the venue does not exist.
pub(crate) async fn process(
    venue_id: web::Path<String>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let functions = state.engine.directory.list_functions(&venue_id)?;
    Ok(HttpResponse::Ok().json(functions))
}
