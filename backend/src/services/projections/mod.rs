//! # Projection Service Module
//!
//! Read-only organizer views under `/api/projections`. Nothing here is
//! stored: every call recomputes from needs, responses and status overrides.
//!
//! ## Registered Routes:
//!
//! *   **`GET /{venue_id}`**: `venue::process`. Every function of the venue
//!     plus venue-wide totals.
//! *   **`GET /{venue_id}/{function_id}`**: `function::process`. One entry per
//!     declared need, including needs nobody has responded to yet.
//! *   **`GET /{venue_id}/{function_id}/tree`**: `tree::process`. The item
//!     projections of one function nested by category.

mod function;
mod tree;
mod venue;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/projections";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/{venue_id}", get().to(venue::process))
        .route("/{venue_id}/{function_id}", get().to(function::process))
        .route("/{venue_id}/{function_id}/tree", get().to(tree::process))
}
