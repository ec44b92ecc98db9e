use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::CreateVenueRequest;

/// Creates a venue and returns it with `201 Created`.
pub(crate) async fn process(
    body: web::Json<CreateVenueRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let venue = state
        .engine
        .directory
        .create_venue(&body.name, &body.address)?;
    Ok(HttpResponse::Created().json(venue))
}
