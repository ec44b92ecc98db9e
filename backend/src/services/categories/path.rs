//! `GET /api/categories/{category_id}/path`

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::CategoryPathResponse;

/// Returns the category together with its root-to-leaf chain of
/// `{id, name}` segments.
pub(crate) async fn process(
    category_id: web::Path<String>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let catalog = &state.engine.catalog;
    let category = catalog.get(&category_id)?;
    let path = catalog.get_path(&category_id)?;
    Ok(HttpResponse::Ok().json(CategoryPathResponse { category, path }))
}
