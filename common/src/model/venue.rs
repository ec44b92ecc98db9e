use crate::model::need::FunctionKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A physical place that runs one or more functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// Something a venue advertises: a collection point, a distribution point,
/// a call for services, or a custom mix of one of those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueFunction {
    pub id: String,
    pub venue_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: FunctionKind,
}
