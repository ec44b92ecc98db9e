//! # Need-Status Service Module
//!
//! Organizer-set urgency per need, under `/api/need-status`.
//!
//! ## Registered Routes:
//!
//! *   **`POST /`**: `set::process`. Upserts the status of one need. The body
//!     names the need by `venueId`, `functionId` and exactly one of
//!     `itemCategoryId` / `serviceType`. Returns the stored record, which keeps
//!     its id across updates.
//!
//! *   **`GET /?venueId=&functionId=`**: `list::process`. Current statuses,
//!     optionally scoped to a venue or a single function.

mod list;
mod set;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/need-status";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(set::process))
        .route("", get().to(list::process))
}
