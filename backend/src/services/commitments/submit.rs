//! `POST /api/commitments`
//!
//! A beneficiary commits to collecting from a distribution point. Any other
//! function kind is rejected with `400 INVALID_TARGET`.

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::SubmitCommitmentRequest;

/// Stores a new `confirmed` commitment and returns it with `201 Created`.
pub(crate) async fn process(
    body: web::Json<SubmitCommitmentRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let commitment = state.engine.responses.submit_commitment(
        &body.beneficiary_id,
        &body.venue_id,
        &body.function_id,
    )?;
    Ok(HttpResponse::Created().json(commitment))
}
