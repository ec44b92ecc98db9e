//! `PATCH /api/categories/{category_id}`
//!
//! Only custom categories can be renamed. Needs that already captured the
//! old name keep it.

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::RenameCategoryRequest;

pub(crate) async fn process(
    category_id: web::Path<String>,
    body: web::Json<RenameCategoryRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let category = state
        .engine
        .catalog
        .rename_category(&category_id, &body.name)?;
    Ok(HttpResponse::Ok().json(category))
}
