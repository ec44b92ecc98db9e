//! `GET /api/venues/{venue_id}/functions/{function_id}`

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let (venue_id, function_id) = path.into_inner();
    let function = state
        .engine
        .directory
        .get_function(&venue_id, &function_id)?;
    Ok(HttpResponse::Ok().json(function))
}
