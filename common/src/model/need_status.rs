use crate::model::need::ServiceType;
use crate::model::need_key::{NeedKey, NeedKeyError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Organizer-set urgency for a single need. Independent of how many
/// volunteers have responded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedStatus {
    NeedALot,
    NeedFewMore,
    DontNeed,
}

impl NeedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NeedStatus::NeedALot => "need_a_lot",
            NeedStatus::NeedFewMore => "need_few_more",
            NeedStatus::DontNeed => "dont_need",
        }
    }

    pub fn parse(value: &str) -> Option<NeedStatus> {
        [NeedStatus::NeedALot, NeedStatus::NeedFewMore, NeedStatus::DontNeed]
            .into_iter()
            .find(|s| s.as_str() == value)
    }
}

impl fmt::Display for NeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The current status override of one need.
///
/// At most one record exists per [`NeedKey`]; setting a new status for the
/// same key rewrites this record and keeps its `id`.
///
/// On the wire the key is flattened into `venueId`, `functionId` and exactly
/// one of `itemCategoryId` / `serviceType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "NeedStatusUpdateWire", try_from = "NeedStatusUpdateWire")]
pub struct NeedStatusUpdate {
    pub id: String,
    pub key: NeedKey,
    pub status: NeedStatus,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NeedStatusUpdateWire {
    id: String,
    venue_id: String,
    function_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    item_category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    service_type: Option<ServiceType>,
    status: NeedStatus,
    updated_by: String,
    updated_at: DateTime<Utc>,
}

impl From<NeedStatusUpdate> for NeedStatusUpdateWire {
    fn from(update: NeedStatusUpdate) -> Self {
        let NeedKey {
            venue_id,
            function_id,
            target,
        } = update.key;
        let (item_category_id, service_type) = target.into_parts();
        NeedStatusUpdateWire {
            id: update.id,
            venue_id,
            function_id,
            item_category_id,
            service_type,
            status: update.status,
            updated_by: update.updated_by,
            updated_at: update.updated_at,
        }
    }
}

impl TryFrom<NeedStatusUpdateWire> for NeedStatusUpdate {
    type Error = NeedKeyError;

    fn try_from(wire: NeedStatusUpdateWire) -> Result<Self, Self::Error> {
        let key = NeedKey::from_parts(
            wire.venue_id,
            wire.function_id,
            wire.item_category_id,
            wire.service_type,
        )?;
        Ok(NeedStatusUpdate {
            id: wire.id,
            key,
            status: wire.status,
            updated_by: wire.updated_by,
            updated_at: wire.updated_at,
        })
    }
}
