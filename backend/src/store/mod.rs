//! Storage interfaces used by the engine.
//!
//! The engine only talks to these traits, so the in-memory backend used by
//! default can be replaced by the SQLite one (or anything else) without
//! touching catalog, response or projection logic.
//!
//! Every implementation must serialize writes per collection. Operations that
//! read-then-write (`upsert`, `transition`, `update_function`) must do so
//! under a single lock or transaction so concurrent callers cannot interleave.

pub mod memory;
pub mod sqlite;

use crate::error::EngineResult;
use chrono::{DateTime, Utc};
use common::model::category::ItemCategory;
use common::model::need_key::NeedKey;
use common::model::need_status::{NeedStatus, NeedStatusUpdate};
use common::model::response::{
    BeneficiaryCommitment, CommitmentStatus, ResponseStatus, VolunteerResponse,
};
use common::model::venue::{Venue, VenueFunction};
use common::requests::{CommitmentQuery, NeedStatusQuery, ResponseQuery};

/// Decides the next status of a record from its current state.
pub type TransitionRule<'a, T, S> = &'a dyn Fn(&T) -> EngineResult<S>;

pub trait CategoryStore: Send + Sync {
    /// Fails with `Conflict` when the id is already taken.
    fn insert(&self, category: ItemCategory) -> EngineResult<()>;
    fn get(&self, id: &str) -> EngineResult<Option<ItemCategory>>;
    /// All categories in insertion order.
    fn list(&self) -> EngineResult<Vec<ItemCategory>>;
    fn rename(&self, id: &str, name: &str) -> EngineResult<ItemCategory>;
}

pub trait VenueStore: Send + Sync {
    fn insert_venue(&self, venue: Venue) -> EngineResult<()>;
    fn get_venue(&self, venue_id: &str) -> EngineResult<Option<Venue>>;
    fn list_venues(&self) -> EngineResult<Vec<Venue>>;
    /// Fails with `NotFound` when the owning venue does not exist.
    fn insert_function(&self, function: VenueFunction) -> EngineResult<()>;
    fn get_function(&self, venue_id: &str, function_id: &str)
        -> EngineResult<Option<VenueFunction>>;
    fn list_functions(&self, venue_id: &str) -> EngineResult<Vec<VenueFunction>>;
    fn update_function(
        &self,
        venue_id: &str,
        function_id: &str,
        apply: &dyn Fn(&mut VenueFunction) -> EngineResult<()>,
    ) -> EngineResult<VenueFunction>;
}

pub trait ResponseStore: Send + Sync {
    fn append(&self, response: VolunteerResponse) -> EngineResult<()>;
    fn get(&self, id: &str) -> EngineResult<Option<VolunteerResponse>>;
    fn list(&self, filter: &ResponseQuery) -> EngineResult<Vec<VolunteerResponse>>;
    /// Applies `rule` to the stored response and writes back the status it
    /// returns. Fails with `NotFound` for unknown ids.
    fn transition(
        &self,
        id: &str,
        rule: TransitionRule<'_, VolunteerResponse, ResponseStatus>,
    ) -> EngineResult<VolunteerResponse>;
}

pub trait CommitmentStore: Send + Sync {
    fn append(&self, commitment: BeneficiaryCommitment) -> EngineResult<()>;
    fn list(&self, filter: &CommitmentQuery) -> EngineResult<Vec<BeneficiaryCommitment>>;
    fn transition(
        &self,
        id: &str,
        rule: TransitionRule<'_, BeneficiaryCommitment, CommitmentStatus>,
    ) -> EngineResult<BeneficiaryCommitment>;
}

pub trait NeedStatusStore: Send + Sync {
    /// Replaces the status of the record with this key, keeping its id, or
    /// inserts a fresh record when none exists. Never leaves two records
    /// with the same key.
    fn upsert(
        &self,
        key: &NeedKey,
        status: NeedStatus,
        updated_by: &str,
        at: DateTime<Utc>,
    ) -> EngineResult<NeedStatusUpdate>;
    fn get(&self, key: &NeedKey) -> EngineResult<Option<NeedStatusUpdate>>;
    fn list(&self, scope: &NeedStatusQuery) -> EngineResult<Vec<NeedStatusUpdate>>;
}

/// A query parameter that is absent or blank does not filter.
pub(crate) fn active_filter(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().filter(|f| !f.trim().is_empty())
}

fn matches_opt(filter: &Option<String>, value: &str) -> bool {
    active_filter(filter).is_none_or(|f| f == value)
}

pub(crate) fn response_matches(filter: &ResponseQuery, response: &VolunteerResponse) -> bool {
    matches_opt(&filter.venue_id, &response.key.venue_id)
        && matches_opt(&filter.function_id, &response.key.function_id)
        && matches_opt(&filter.volunteer_id, &response.volunteer_id)
}

pub(crate) fn commitment_matches(
    filter: &CommitmentQuery,
    commitment: &BeneficiaryCommitment,
) -> bool {
    matches_opt(&filter.venue_id, &commitment.venue_id)
        && matches_opt(&filter.function_id, &commitment.function_id)
        && matches_opt(&filter.beneficiary_id, &commitment.beneficiary_id)
}

pub(crate) fn status_matches(scope: &NeedStatusQuery, update: &NeedStatusUpdate) -> bool {
    matches_opt(&scope.venue_id, &update.key.venue_id)
        && matches_opt(&scope.function_id, &update.key.function_id)
}
