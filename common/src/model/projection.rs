//! Read-only summaries derived from needs, responses and status overrides.
//! None of these are ever stored.

use crate::model::need::{NeedLevel, ServiceType};
use crate::model::need_status::NeedStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProjection {
    pub category_id: String,
    pub category_path: Vec<String>,
    #[serde(default)]
    pub category_id_path: Vec<String>,
    pub declared_level: NeedLevel,
    /// `None` means no organizer has set a status, which is not the same as
    /// `dont_need`.
    pub current_status: Option<NeedStatus>,
    pub response_count: u32,
    pub total_quantity_offered: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondingVolunteer {
    pub id: String,
    pub name: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProjection {
    pub service_type: ServiceType,
    pub is_required: bool,
    pub current_status: Option<NeedStatus>,
    pub response_count: u32,
    pub responding_volunteers: Vec<RespondingVolunteer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueProjection {
    pub venue_id: String,
    pub function_id: String,
    pub items: Vec<ItemProjection>,
    pub services: Vec<ServiceProjection>,
    pub beneficiary_commitment_count: u32,
}

impl VenueProjection {
    pub fn response_count(&self) -> u32 {
        self.items.iter().map(|i| i.response_count).sum::<u32>()
            + self.services.iter().map(|s| s.response_count).sum::<u32>()
    }

    pub fn total_quantity_offered(&self) -> u64 {
        self.items.iter().map(|i| i.total_quantity_offered).sum()
    }
}

/// Every function of one venue, plus the totals across them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueRollup {
    pub venue_id: String,
    pub functions: Vec<VenueProjection>,
    pub total_response_count: u32,
    pub total_quantity_offered: u64,
    pub beneficiary_commitment_count: u32,
}

/// A node of a display tree built from category paths.
///
/// `key` is the category id when one is known; `name` is only for display.
/// A node can carry children and attached items at the same time when
/// paths of different depth share a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode<T> {
    pub key: String,
    pub name: String,
    pub children: Vec<TreeNode<T>>,
    pub items: Vec<T>,
}

impl<T> TreeNode<T> {
    pub fn item_count(&self) -> usize {
        self.items.len()
            + self
                .children
                .iter()
                .map(TreeNode::item_count)
                .sum::<usize>()
    }
}
