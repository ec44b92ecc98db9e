//! `POST /api/categories`
//!
//! Without `parentId` the category becomes a root. Blank names are rejected
//! with `400 INVALID_REQUEST`.

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::CreateCategoryRequest;

/// # Returns
/// - `201 Created` with the stored `ItemCategory`.
/// - `400 Bad Request` (`INVALID_PARENT`) when `parentId` names an unknown
///   category.
pub(crate) async fn process(
    body: web::Json<CreateCategoryRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let category = state.engine.catalog.add_category(
        &body.name,
        body.parent_id.as_deref(),
        body.is_custom,
    )?;
    Ok(HttpResponse::Created().json(category))
}
