//! # HTTP Services
//!
//! One module per resource, each exposing `configure_routes() -> Scope` under
//! its own `/api/...` path. Handlers are thin: they extract the request,
//! call the engine held in [`AppState`](crate::state::AppState) and map
//! [`EngineError`](crate::error::EngineError)s to JSON error bodies through
//! [`ApiError`].

pub mod categories;
pub mod commitments;
pub mod need_status;
pub mod projections;
pub mod responses;
pub mod venues;

use crate::error::ApiError;
use actix_web::web;

/// Registers every resource plus extractor configs that turn malformed
/// bodies, query strings and paths into `400 INVALID_REQUEST`.
pub fn api(json_limit: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(
            web::JsonConfig::default()
                .limit(json_limit)
                .error_handler(|err, _req| ApiError::Malformed(err.to_string()).into()),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _req| ApiError::Malformed(err.to_string()).into()),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|err, _req| ApiError::Malformed(err.to_string()).into()),
        )
        .service(need_status::configure_routes())
        .service(responses::configure_routes())
        .service(categories::configure_routes())
        .service(venues::configure_routes())
        .service(commitments::configure_routes())
        .service(projections::configure_routes());
    }
}
