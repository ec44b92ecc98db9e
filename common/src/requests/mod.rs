//! Payloads accepted by the JSON API and by the engine's mutating operations.

use crate::model::category::ItemCategory;
use crate::model::need::{NeedLevel, OpeningSlot, ServiceRequest, ServiceType};
use crate::model::need_status::NeedStatus;
use crate::model::response::{ResponseStatus, ResponseType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /api/need-status`.
/// Exactly one of `item_category_id` / `service_type` must be present.
pub struct SetNeedStatusRequest {
    pub venue_id: String,
    pub function_id: String,
    #[serde(default)]
    pub item_category_id: Option<String>,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    pub status: NeedStatus,
    pub updated_by: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedStatusQuery {
    pub venue_id: Option<String>,
    pub function_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /api/responses`.
pub struct SubmitResponseRequest {
    pub venue_id: String,
    pub function_id: String,
    pub volunteer_id: String,
    pub volunteer_name: String,
    #[serde(default)]
    pub volunteer_email: Option<String>,
    pub response_type: ResponseType,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Filters for listing responses. Unset fields match everything and set
/// fields are AND-combined.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseQuery {
    pub venue_id: Option<String>,
    pub function_id: Option<String>,
    pub volunteer_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponseStatusRequest {
    pub status: ResponseStatus,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default = "default_custom")]
    pub is_custom: bool,
}

fn default_custom() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameCategoryRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPathResponse {
    pub category: ItemCategory,
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVenueRequest {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// An item need as an organizer enters it: the category path is resolved by
/// the engine at assignment time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemNeedDraft {
    pub category_id: String,
    pub quantity: NeedLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NeedsDraft {
    #[serde(rename_all = "camelCase")]
    Items {
        items: Vec<ItemNeedDraft>,
        #[serde(default)]
        opening_hours: Vec<OpeningSlot>,
    },
    Services { services: Vec<ServiceRequest> },
}

/// Body of `POST /api/venues/{venue_id}/functions`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FunctionDraft {
    #[serde(rename_all = "camelCase")]
    CollectionPoint {
        items: Vec<ItemNeedDraft>,
        #[serde(default)]
        opening_hours: Vec<OpeningSlot>,
    },
    #[serde(rename_all = "camelCase")]
    DistributionPoint {
        items: Vec<ItemNeedDraft>,
        #[serde(default)]
        opening_hours: Vec<OpeningSlot>,
    },
    ServicesNeeded { services: Vec<ServiceRequest> },
    Custom { title: String, needs: NeedsDraft },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCommitmentRequest {
    pub beneficiary_id: String,
    pub venue_id: String,
    pub function_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentQuery {
    pub venue_id: Option<String>,
    pub function_id: Option<String>,
    pub beneficiary_id: Option<String>,
}
