//! # Need-Status Overlay
//!
//! Organizer-set urgency per need. Last write wins; a key never has more than
//! one record. The overlay is independent of response volume: a need can be
//! marked `dont_need` while responses keep arriving.

use crate::engine::needs::VenueDirectory;
use crate::error::{EngineError, EngineResult};
use crate::store::NeedStatusStore;
use chrono::Utc;
use common::model::need_key::NeedKey;
use common::model::need_status::{NeedStatus, NeedStatusUpdate};
use common::requests::NeedStatusQuery;
use log::info;
use std::sync::Arc;

#[derive(Clone)]
pub struct NeedStatusOverlay {
    store: Arc<dyn NeedStatusStore>,
    directory: VenueDirectory,
}

impl NeedStatusOverlay {
    pub fn new(store: Arc<dyn NeedStatusStore>, directory: VenueDirectory) -> Self {
        Self { store, directory }
    }

    /// Sets the status of one need, replacing any earlier status for the same
    /// key while keeping its id.
    ///
    /// The function must exist and be of the same kind as the key's target.
    pub fn set_status(
        &self,
        key: &NeedKey,
        status: NeedStatus,
        updated_by: &str,
    ) -> EngineResult<NeedStatusUpdate> {
        if updated_by.trim().is_empty() {
            return Err(EngineError::InvalidRequest(
                "field `updatedBy` must not be blank".to_string(),
            ));
        }
        let function = self.directory.get_function(&key.venue_id, &key.function_id)?;
        if function.kind.need_kind() != key.target.kind() {
            return Err(EngineError::InvalidRequest(format!(
                "function '{}' is a {} and has no need {key}",
                function.id,
                function.kind.name()
            )));
        }

        let update = self.store.upsert(key, status, updated_by, Utc::now())?;
        info!("Need {key} set to {status} by {updated_by} ({})", update.id);
        Ok(update)
    }

    pub fn get_status(&self, key: &NeedKey) -> EngineResult<Option<NeedStatusUpdate>> {
        self.store.get(key)
    }

    pub fn list_statuses(&self, scope: &NeedStatusQuery) -> EngineResult<Vec<NeedStatusUpdate>> {
        self.store.list(scope)
    }
}
