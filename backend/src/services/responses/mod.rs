//! # Response Service Module
//!
//! Volunteer responses under `/api/responses`. Responses are append-only:
//! every `POST` creates a new record, and cancelling only flips the status.
//!
//! ## Registered Routes:
//!
//! *   **`POST /`**: `submit::process`. Records an offer against one need and
//!     returns it with `201 Created`. The initial status comes from
//!     `engine.default_response_status`.
//! *   **`GET /?venueId=&functionId=&volunteerId=`**: `list::process`.
//!     Filters are AND-combined; omitted filters match everything.
//! *   **`GET /{response_id}`**: `get::process`.
//! *   **`POST /{response_id}/cancel`**: `cancel::process`. Idempotent.
//! *   **`POST /{response_id}/status`**: `update_status::process`. Organizer
//!     fulfillment tracking (`confirmed`, `completed`, `cancelled`).

mod cancel;
mod get;
mod list;
mod submit;
mod update_status;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/responses";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(submit::process))
        .route("", get().to(list::process))
        .route("/{response_id}", get().to(get::process))
        .route("/{response_id}/cancel", post().to(cancel::process))
        .route("/{response_id}/status", post().to(update_status::process))
}
