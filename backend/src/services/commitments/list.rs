//! `GET /api/commitments?venueId=&functionId=&beneficiaryId=`

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::CommitmentQuery;

pub(crate) async fn process(
    query: web::Query<CommitmentQuery>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let commitments = state.engine.responses.list_commitments(&query)?;
    Ok(HttpResponse::Ok().json(commitments))
}
