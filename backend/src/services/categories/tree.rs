//! `GET /api/categories/tree`
//!
//! A cyclic or orphaned parent chain surfaces as `500 CORRUPT_CATALOG`
//! rather than a tree with nodes silently missing.

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let hierarchy = state.engine.catalog.build_hierarchy()?;
    Ok(HttpResponse::Ok().json(hierarchy))
}
