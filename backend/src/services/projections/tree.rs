//! `GET /api/projections/{venue_id}/{function_id}/tree`

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Item projections grouped under the category chain stored on each need.
pub(crate) async fn process(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let (venue_id, function_id) = path.into_inner();
    let tree = state
        .engine
        .projections
        .project_item_tree(&venue_id, &function_id)?;
    Ok(HttpResponse::Ok().json(tree))
}
