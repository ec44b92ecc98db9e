//! # Need-Status Update Service
//!
//! Backend logic for the `POST /api/need-status` endpoint, through which an
//! organizer marks how urgently one need is still wanted.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` receives a `SetNeedStatusRequest` JSON body
//!     naming the need by `venueId`, `functionId` and exactly one of
//!     `itemCategoryId` / `serviceType`, plus the new `status` and `updatedBy`.
//!
//! 2.  **Key Validation**: the flat fields are folded into a `NeedKey`. Blank
//!     scope ids or a missing/doubled target are rejected before any lookup.
//!
//! 3.  **Upsert**: the overlay checks that the function exists and takes this
//!     kind of need, then replaces the stored status for the key or inserts a
//!     new record. An existing record keeps its id.
//!
//! 4.  **HTTP Response**: the stored record is returned as JSON.

use crate::error::{ApiResult, EngineError};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::need_key::NeedKey;
use common::requests::SetNeedStatusRequest;

/// Actix web handler for `POST /api/need-status`.
///
/// # Arguments
/// * `body` - The need being updated and its new status.
/// * `state` - Shared application state holding the engine.
///
/// # Returns
/// - `200 OK` with the upserted `NeedStatusUpdate`.
/// - `400 Bad Request` (`INVALID_REQUEST`) for a malformed key or a target
///   the function cannot carry.
/// - `404 Not Found` when the venue or function does not exist.
pub(crate) async fn process(
    body: web::Json<SetNeedStatusRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let request = body.into_inner();
    let key = NeedKey::from_parts(
        request.venue_id,
        request.function_id,
        request.item_category_id,
        request.service_type,
    )
    .map_err(EngineError::from)?;
    let update = state
        .engine
        .overlay
        .set_status(&key, request.status, &request.updated_by)?;
    Ok(HttpResponse::Ok().json(update))
}
