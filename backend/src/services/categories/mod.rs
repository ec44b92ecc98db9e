//! # Category Service Module
//!
//! The item category catalog under `/api/categories`.
//!
//! ## Registered Routes:
//!
//! *   **`POST /`**: `create::process`. Adds a category under `parentId`, or a
//!     root when it is omitted. API-created categories are custom unless the
//!     body says otherwise.
//! *   **`GET /`**: `list::process`. Flat list in insertion order.
//! *   **`GET /tree`**: `tree::process`. The full hierarchy.
//! *   **`GET /{category_id}/path`**: `path::process`. The category plus its
//!     root-to-leaf name path.
//! *   **`PATCH /{category_id}`**: `rename::process`. Custom categories only.

mod create;
mod list;
mod path;
mod rename;
mod tree;

use actix_web::web::{get, patch, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/categories";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("", get().to(list::process))
        .route("/tree", get().to(tree::process))
        .route("/{category_id}/path", get().to(path::process))
        .route("/{category_id}", patch().to(rename::process))
}

#[cfg(test)]
mod tests {
    use crate::services::testing::{app, state};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn create_child_and_read_its_path() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .set_json(json!({ "name": "Ibuprofen gel", "parentId": "painkillers" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["level"], 2);
        assert_eq!(created["isCustom"], true);

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/categories/{}/path",
                created["id"].as_str().unwrap()
            ))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["path"], json!(["Medicine", "Painkillers", "Ibuprofen gel"]));
        assert_eq!(body["category"]["name"], "Ibuprofen gel");
    }

    #[actix_web::test]
    async fn unknown_parent_is_rejected() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::post()
            .uri("/api/categories")
            .set_json(json!({ "name": "Orphan", "parentId": "nope" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "INVALID_PARENT");
    }

    #[actix_web::test]
    async fn tree_lists_seeded_roots() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/categories/tree").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let roots: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|node| node["category"]["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(roots, ["medicine", "food", "clothing", "hygiene"]);
    }

    #[actix_web::test]
    async fn rename_only_touches_custom_categories() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::patch()
            .uri("/api/categories/nurofen")
            .set_json(json!({ "name": "Ibuprofen" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .set_json(json!({ "name": "Tents" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let req = test::TestRequest::patch()
            .uri(&format!("/api/categories/{}", created["id"].as_str().unwrap()))
            .set_json(json!({ "name": "Tents and tarps" }))
            .to_request();
        let renamed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(renamed["name"], "Tents and tarps");
    }

    #[actix_web::test]
    async fn missing_path_is_not_found() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri("/api/categories/missing/path")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
