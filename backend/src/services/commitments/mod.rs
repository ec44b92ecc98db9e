//! # Commitment Service Module
//!
//! Beneficiary commitments to distribution points, under `/api/commitments`.
//! Only `distribution_point` functions accept commitments.
//!
//! ## Registered Routes:
//!
//! *   **`POST /`**: `submit::process`, returns `201 Created`.
//! *   **`GET /?venueId=&functionId=&beneficiaryId=`**: `list::process`.
//! *   **`POST /{commitment_id}/cancel`**: `cancel::process`. Idempotent.

mod cancel;
mod list;
mod submit;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/commitments";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(submit::process))
        .route("", get().to(list::process))
        .route("/{commitment_id}/cancel", post().to(cancel::process))
}
