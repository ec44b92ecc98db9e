//! `POST /api/commitments/{commitment_id}/cancel`

use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Idempotent; `404` for unknown ids.
pub(crate) async fn process(
    commitment_id: web::Path<String>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let commitment = state.engine.responses.cancel_commitment(&commitment_id)?;
    Ok(HttpResponse::Ok().json(commitment))
}
