//! In-memory store backend.
//!
//! Each collection sits behind its own `RwLock`: readers share the lock and
//! get owned snapshots back, writers take it exclusively.

use crate::error::{EngineError, EngineResult};
use crate::store::{
    commitment_matches, response_matches, status_matches, CategoryStore, CommitmentStore,
    NeedStatusStore, ResponseStore, TransitionRule, VenueStore,
};
use chrono::{DateTime, Utc};
use common::model::category::ItemCategory;
use common::model::need_key::NeedKey;
use common::model::need_status::{NeedStatus, NeedStatusUpdate};
use common::model::response::{
    BeneficiaryCommitment, CommitmentStatus, ResponseStatus, VolunteerResponse,
};
use common::model::venue::{Venue, VenueFunction};
use common::requests::{CommitmentQuery, NeedStatusQuery, ResponseQuery};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

fn read<T>(lock: &RwLock<T>) -> EngineResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| EngineError::Storage("store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> EngineResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| EngineError::Storage("store lock poisoned".to_string()))
}

#[derive(Default)]
pub struct MemoryCategoryStore {
    categories: RwLock<Vec<ItemCategory>>,
}

impl CategoryStore for MemoryCategoryStore {
    fn insert(&self, category: ItemCategory) -> EngineResult<()> {
        let mut categories = write(&self.categories)?;
        if categories.iter().any(|c| c.id == category.id) {
            return Err(EngineError::Conflict(format!(
                "category '{}' already exists",
                category.id
            )));
        }
        categories.push(category);
        Ok(())
    }

    fn get(&self, id: &str) -> EngineResult<Option<ItemCategory>> {
        Ok(read(&self.categories)?.iter().find(|c| c.id == id).cloned())
    }

    fn list(&self) -> EngineResult<Vec<ItemCategory>> {
        Ok(read(&self.categories)?.clone())
    }

    fn rename(&self, id: &str, name: &str) -> EngineResult<ItemCategory> {
        let mut categories = write(&self.categories)?;
        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| EngineError::not_found("category", id))?;
        category.name = name.to_string();
        Ok(category.clone())
    }
}

#[derive(Default)]
struct VenueRecords {
    venues: Vec<Venue>,
    functions: Vec<VenueFunction>,
}

#[derive(Default)]
pub struct MemoryVenueStore {
    records: RwLock<VenueRecords>,
}

impl VenueStore for MemoryVenueStore {
    fn insert_venue(&self, venue: Venue) -> EngineResult<()> {
        let mut records = write(&self.records)?;
        if records.venues.iter().any(|v| v.id == venue.id) {
            return Err(EngineError::Conflict(format!(
                "venue '{}' already exists",
                venue.id
            )));
        }
        records.venues.push(venue);
        Ok(())
    }

    fn get_venue(&self, venue_id: &str) -> EngineResult<Option<Venue>> {
        Ok(read(&self.records)?
            .venues
            .iter()
            .find(|v| v.id == venue_id)
            .cloned())
    }

    fn list_venues(&self) -> EngineResult<Vec<Venue>> {
        Ok(read(&self.records)?.venues.clone())
    }

    fn insert_function(&self, function: VenueFunction) -> EngineResult<()> {
        let mut records = write(&self.records)?;
        if !records.venues.iter().any(|v| v.id == function.venue_id) {
            return Err(EngineError::not_found("venue", &function.venue_id));
        }
        if records
            .functions
            .iter()
            .any(|f| f.venue_id == function.venue_id && f.id == function.id)
        {
            return Err(EngineError::Conflict(format!(
                "function '{}' already exists",
                function.id
            )));
        }
        records.functions.push(function);
        Ok(())
    }

    fn get_function(
        &self,
        venue_id: &str,
        function_id: &str,
    ) -> EngineResult<Option<VenueFunction>> {
        Ok(read(&self.records)?
            .functions
            .iter()
            .find(|f| f.venue_id == venue_id && f.id == function_id)
            .cloned())
    }

    fn list_functions(&self, venue_id: &str) -> EngineResult<Vec<VenueFunction>> {
        Ok(read(&self.records)?
            .functions
            .iter()
            .filter(|f| f.venue_id == venue_id)
            .cloned()
            .collect())
    }

    fn update_function(
        &self,
        venue_id: &str,
        function_id: &str,
        apply: &dyn Fn(&mut VenueFunction) -> EngineResult<()>,
    ) -> EngineResult<VenueFunction> {
        let mut records = write(&self.records)?;
        let function = records
            .functions
            .iter_mut()
            .find(|f| f.venue_id == venue_id && f.id == function_id)
            .ok_or_else(|| EngineError::not_found("function", function_id))?;
        // Work on a copy so a failing `apply` leaves the stored record intact.
        let mut updated = function.clone();
        apply(&mut updated)?;
        *function = updated.clone();
        Ok(updated)
    }
}

#[derive(Default)]
pub struct MemoryResponseStore {
    responses: RwLock<Vec<VolunteerResponse>>,
    commitments: RwLock<Vec<BeneficiaryCommitment>>,
}

impl ResponseStore for MemoryResponseStore {
    fn append(&self, response: VolunteerResponse) -> EngineResult<()> {
        write(&self.responses)?.push(response);
        Ok(())
    }

    fn get(&self, id: &str) -> EngineResult<Option<VolunteerResponse>> {
        Ok(read(&self.responses)?.iter().find(|r| r.id == id).cloned())
    }

    fn list(&self, filter: &ResponseQuery) -> EngineResult<Vec<VolunteerResponse>> {
        Ok(read(&self.responses)?
            .iter()
            .filter(|r| response_matches(filter, r))
            .cloned()
            .collect())
    }

    fn transition(
        &self,
        id: &str,
        rule: TransitionRule<'_, VolunteerResponse, ResponseStatus>,
    ) -> EngineResult<VolunteerResponse> {
        let mut responses = write(&self.responses)?;
        let response = responses
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EngineError::not_found("response", id))?;
        response.status = rule(response)?;
        Ok(response.clone())
    }
}

impl CommitmentStore for MemoryResponseStore {
    fn append(&self, commitment: BeneficiaryCommitment) -> EngineResult<()> {
        write(&self.commitments)?.push(commitment);
        Ok(())
    }

    fn list(&self, filter: &CommitmentQuery) -> EngineResult<Vec<BeneficiaryCommitment>> {
        Ok(read(&self.commitments)?
            .iter()
            .filter(|c| commitment_matches(filter, c))
            .cloned()
            .collect())
    }

    fn transition(
        &self,
        id: &str,
        rule: TransitionRule<'_, BeneficiaryCommitment, CommitmentStatus>,
    ) -> EngineResult<BeneficiaryCommitment> {
        let mut commitments = write(&self.commitments)?;
        let commitment = commitments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| EngineError::not_found("commitment", id))?;
        commitment.status = rule(commitment)?;
        Ok(commitment.clone())
    }
}

#[derive(Default)]
struct StatusRecords {
    updates: Vec<NeedStatusUpdate>,
    by_key: HashMap<NeedKey, usize>,
}

#[derive(Default)]
pub struct MemoryNeedStatusStore {
    records: RwLock<StatusRecords>,
}

impl NeedStatusStore for MemoryNeedStatusStore {
    fn upsert(
        &self,
        key: &NeedKey,
        status: NeedStatus,
        updated_by: &str,
        at: DateTime<Utc>,
    ) -> EngineResult<NeedStatusUpdate> {
        let mut records = write(&self.records)?;
        let existing_index = records.by_key.get(key).copied();
        if let Some(index) = existing_index {
            let existing = &mut records.updates[index];
            existing.status = status;
            existing.updated_by = updated_by.to_string();
            existing.updated_at = at;
            return Ok(existing.clone());
        }

        let update = NeedStatusUpdate {
            id: Uuid::new_v4().to_string(),
            key: key.clone(),
            status,
            updated_by: updated_by.to_string(),
            updated_at: at,
        };
        let index = records.updates.len();
        records.updates.push(update.clone());
        records.by_key.insert(key.clone(), index);
        Ok(update)
    }

    fn get(&self, key: &NeedKey) -> EngineResult<Option<NeedStatusUpdate>> {
        let records = read(&self.records)?;
        Ok(records
            .by_key
            .get(key)
            .map(|&index| records.updates[index].clone()))
    }

    fn list(&self, scope: &NeedStatusQuery) -> EngineResult<Vec<NeedStatusUpdate>> {
        Ok(read(&self.records)?
            .updates
            .iter()
            .filter(|u| status_matches(scope, u))
            .cloned()
            .collect())
    }
}
