//! `GET /api/categories`: the flat catalog in insertion order.

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.engine.catalog.list()?))
}
