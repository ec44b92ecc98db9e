//! # Venue Service Module
//!
//! Venues and the functions they advertise, under `/api/venues`.
//!
//! ## Registered Routes:
//!
//! *   **`POST /`** / **`GET /`**: create and list venues.
//! *   **`GET /{venue_id}`**: one venue.
//! *   **`POST /{venue_id}/functions`**: `add_function::process`. The body is a
//!     function draft tagged by `type`. Item needs name only a `categoryId`
//!     and a `quantity` level; the category path is captured from the catalog
//!     at this moment and stored with the need.
//! *   **`GET /{venue_id}/functions`**: all functions of a venue.
//! *   **`GET /{venue_id}/functions/{function_id}`**: one function.
//! *   **`PUT /{venue_id}/functions/{function_id}/needs`**: `set_needs::process`.
//!     Replaces the declared needs; the draft kind must match the function.

mod add_function;
mod create;
mod get;
mod get_function;
mod list;
mod list_functions;
mod set_needs;

use actix_web::web::{get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/venues";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("", get().to(list::process))
        .route("/{venue_id}", get().to(get::process))
        .route("/{venue_id}/functions", post().to(add_function::process))
        .route("/{venue_id}/functions", get().to(list_functions::process))
        .route(
            "/{venue_id}/functions/{function_id}",
            get().to(get_function::process),
        )
        .route(
            "/{venue_id}/functions/{function_id}/needs",
            put().to(set_needs::process),
        )
}
