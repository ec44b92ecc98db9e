//! `GET /api/projections/{venue_id}`
//!
//! One projection per function of the venue, plus totals across all of them.

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    venue_id: web::Path<String>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let rollup = state.engine.projections.project_venue(&venue_id)?;
    Ok(HttpResponse::Ok().json(rollup))
}
