//! `GET /api/venues/{venue_id}`

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    venue_id: web::Path<String>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.engine.directory.get_venue(&venue_id)?))
}
