use crate::model::need::{NeedKind, ServiceType};
use crate::model::need_key::{NeedKey, NeedKeyError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type ResponseType = NeedKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Pending => "pending",
            ResponseStatus::Confirmed => "confirmed",
            ResponseStatus::Completed => "completed",
            ResponseStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<ResponseStatus> {
        [
            ResponseStatus::Pending,
            ResponseStatus::Confirmed,
            ResponseStatus::Completed,
            ResponseStatus::Cancelled,
        ]
        .into_iter()
        .find(|s| s.as_str() == value)
    }

    /// Whether the response still counts towards a need.
    pub fn is_active(&self) -> bool {
        !matches!(self, ResponseStatus::Cancelled)
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A volunteer's offer against one need.
///
/// Responses are only ever appended; several may target the same key and
/// they are accumulated, never merged. `quantity_offered` is set for item
/// responses only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "VolunteerResponseWire", try_from = "VolunteerResponseWire")]
pub struct VolunteerResponse {
    pub id: String,
    pub volunteer_id: String,
    pub volunteer_name: String,
    pub volunteer_email: Option<String>,
    pub key: NeedKey,
    pub quantity_offered: Option<u32>,
    pub message: Option<String>,
    pub status: ResponseStatus,
    pub created_at: DateTime<Utc>,
}

impl VolunteerResponse {
    pub fn response_type(&self) -> ResponseType {
        self.key.target.kind()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolunteerResponseWire {
    id: String,
    venue_id: String,
    function_id: String,
    volunteer_id: String,
    volunteer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    volunteer_email: Option<String>,
    response_type: ResponseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    service_type: Option<ServiceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quantity_offered: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    status: ResponseStatus,
    timestamp: DateTime<Utc>,
}

impl From<VolunteerResponse> for VolunteerResponseWire {
    fn from(response: VolunteerResponse) -> Self {
        let response_type = response.response_type();
        let NeedKey {
            venue_id,
            function_id,
            target,
        } = response.key;
        let (category_id, service_type) = target.into_parts();
        VolunteerResponseWire {
            id: response.id,
            venue_id,
            function_id,
            volunteer_id: response.volunteer_id,
            volunteer_name: response.volunteer_name,
            volunteer_email: response.volunteer_email,
            response_type,
            category_id,
            service_type,
            quantity_offered: response.quantity_offered,
            message: response.message,
            status: response.status,
            timestamp: response.created_at,
        }
    }
}

impl TryFrom<VolunteerResponseWire> for VolunteerResponse {
    type Error = NeedKeyError;

    fn try_from(wire: VolunteerResponseWire) -> Result<Self, Self::Error> {
        let key = NeedKey::from_parts(
            wire.venue_id,
            wire.function_id,
            wire.category_id,
            wire.service_type,
        )?;
        Ok(VolunteerResponse {
            id: wire.id,
            volunteer_id: wire.volunteer_id,
            volunteer_name: wire.volunteer_name,
            volunteer_email: wire.volunteer_email,
            key,
            quantity_offered: wire.quantity_offered,
            message: wire.message,
            status: wire.status,
            created_at: wire.timestamp,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentStatus {
    Confirmed,
    Cancelled,
}

impl CommitmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitmentStatus::Confirmed => "confirmed",
            CommitmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<CommitmentStatus> {
        match value {
            "confirmed" => Some(CommitmentStatus::Confirmed),
            "cancelled" => Some(CommitmentStatus::Cancelled),
            _ => None,
        }
    }
}

/// A beneficiary's declared intent to come to a distribution point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryCommitment {
    pub id: String,
    pub beneficiary_id: String,
    pub venue_id: String,
    pub function_id: String,
    pub status: CommitmentStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> VolunteerResponse {
        VolunteerResponse {
            id: "r1".into(),
            volunteer_id: "v1".into(),
            volunteer_name: "Dana".into(),
            volunteer_email: None,
            key: NeedKey::item("1", "f1", "n"),
            quantity_offered: Some(10),
            message: None,
            status: ResponseStatus::Pending,
            created_at: DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn wire_shape_flattens_the_key() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["responseType"], json!("item"));
        assert_eq!(value["categoryId"], json!("n"));
        assert_eq!(value["quantityOffered"], json!(10));
        assert_eq!(value["timestamp"], json!("2024-03-01T10:00:00Z"));
        assert!(value.get("serviceType").is_none());
        assert!(value.get("volunteerEmail").is_none());
    }

    #[test]
    fn wire_shape_reads_back() {
        let value = serde_json::to_value(sample()).unwrap();
        let back: VolunteerResponse = serde_json::from_value(value).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn only_cancelled_responses_are_inactive() {
        assert!(ResponseStatus::Pending.is_active());
        assert!(ResponseStatus::Completed.is_active());
        assert!(!ResponseStatus::Cancelled.is_active());
    }
}
