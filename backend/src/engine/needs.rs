//! # Need Model
//!
//! Venues, their functions and the needs those functions declare.
//!
//! Organizers enter item needs as `(categoryId, level)`. When a need is
//! assigned, the category's root-to-leaf path is resolved through the catalog
//! and copied onto the need. The copy is a historical snapshot: renaming the
//! category later does not rewrite needs that already exist.

use crate::engine::catalog::CategoryCatalog;
use crate::error::{EngineError, EngineResult};
use crate::store::VenueStore;
use chrono::Utc;
use common::model::need::{CustomNeeds, FunctionKind, ItemWithQuantity, OpeningSlot, ServiceRequest};
use common::model::venue::{Venue, VenueFunction};
use common::requests::{FunctionDraft, ItemNeedDraft, NeedsDraft};
use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct VenueDirectory {
    venues: Arc<dyn VenueStore>,
    catalog: CategoryCatalog,
}

impl VenueDirectory {
    pub fn new(venues: Arc<dyn VenueStore>, catalog: CategoryCatalog) -> Self {
        Self { venues, catalog }
    }

    pub fn create_venue(&self, name: &str, address: &str) -> EngineResult<Venue> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidRequest(
                "venue name must not be blank".to_string(),
            ));
        }
        let venue = Venue {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            address: address.trim().to_string(),
            created_at: Utc::now(),
        };
        self.venues.insert_venue(venue.clone())?;
        info!("Created venue '{}' ({})", venue.name, venue.id);
        Ok(venue)
    }

    pub fn get_venue(&self, venue_id: &str) -> EngineResult<Venue> {
        self.venues
            .get_venue(venue_id)?
            .ok_or_else(|| EngineError::not_found("venue", venue_id))
    }

    pub fn list_venues(&self) -> EngineResult<Vec<Venue>> {
        self.venues.list_venues()
    }

    /// Creates a function on an existing venue, resolving item categories now.
    pub fn add_function(&self, venue_id: &str, draft: FunctionDraft) -> EngineResult<VenueFunction> {
        self.get_venue(venue_id)?;
        let kind = self.resolve_draft(draft)?;
        let now = Utc::now();
        let function = VenueFunction {
            id: Uuid::new_v4().to_string(),
            venue_id: venue_id.to_string(),
            created_at: now,
            updated_at: now,
            kind,
        };
        self.venues.insert_function(function.clone())?;
        info!(
            "Added {} function {} to venue {}",
            function.kind.name(),
            function.id,
            venue_id
        );
        Ok(function)
    }

    pub fn get_function(&self, venue_id: &str, function_id: &str) -> EngineResult<VenueFunction> {
        self.venues
            .get_function(venue_id, function_id)?
            .ok_or_else(|| {
                debug!("Function lookup missed: {venue_id}/{function_id}");
                EngineError::not_found("function", format!("{venue_id}/{function_id}"))
            })
    }

    pub fn list_functions(&self, venue_id: &str) -> EngineResult<Vec<VenueFunction>> {
        self.get_venue(venue_id)?;
        self.venues.list_functions(venue_id)
    }

    /// Replaces the declared needs of a function. The draft must match the
    /// function's need kind (items for item-based, services for service-based).
    pub fn set_needs(
        &self,
        venue_id: &str,
        function_id: &str,
        draft: NeedsDraft,
    ) -> EngineResult<VenueFunction> {
        let updated = match draft {
            NeedsDraft::Items {
                items,
                opening_hours,
            } => {
                let items = self.assign_items(&items)?;
                check_opening_hours(&opening_hours)?;
                self.venues.update_function(venue_id, function_id, &|function| {
                    if !function
                        .kind
                        .replace_items(items.clone(), opening_hours.clone())
                    {
                        return Err(kind_mismatch(function, "item"));
                    }
                    function.updated_at = Utc::now();
                    Ok(())
                })?
            }
            NeedsDraft::Services { services } => {
                check_services(&services)?;
                self.venues.update_function(venue_id, function_id, &|function| {
                    if !function.kind.replace_services(services.clone()) {
                        return Err(kind_mismatch(function, "service"));
                    }
                    function.updated_at = Utc::now();
                    Ok(())
                })?
            }
        };
        info!("Replaced needs of function {venue_id}/{function_id}");
        Ok(updated)
    }

    /// Resolves one item need against the catalog as it is right now.
    pub fn assign_item(&self, draft: &ItemNeedDraft) -> EngineResult<ItemWithQuantity> {
        let segments = self.catalog.get_path_segments(&draft.category_id)?;
        let (category_id_path, category_path) = segments
            .into_iter()
            .map(|segment| (segment.id, segment.name))
            .unzip();
        Ok(ItemWithQuantity {
            category_id: draft.category_id.clone(),
            category_path,
            category_id_path,
            quantity: draft.quantity,
        })
    }

    fn assign_items(&self, drafts: &[ItemNeedDraft]) -> EngineResult<Vec<ItemWithQuantity>> {
        let mut seen = HashSet::new();
        drafts
            .iter()
            .map(|draft| {
                if !seen.insert(draft.category_id.as_str()) {
                    return Err(EngineError::InvalidRequest(format!(
                        "category '{}' is listed twice",
                        draft.category_id
                    )));
                }
                self.assign_item(draft)
            })
            .collect()
    }

    fn resolve_draft(&self, draft: FunctionDraft) -> EngineResult<FunctionKind> {
        let kind = match draft {
            FunctionDraft::CollectionPoint {
                items,
                opening_hours,
            } => {
                check_opening_hours(&opening_hours)?;
                FunctionKind::CollectionPoint {
                    items: self.assign_items(&items)?,
                    opening_hours,
                }
            }
            FunctionDraft::DistributionPoint {
                items,
                opening_hours,
            } => {
                check_opening_hours(&opening_hours)?;
                FunctionKind::DistributionPoint {
                    items: self.assign_items(&items)?,
                    opening_hours,
                }
            }
            FunctionDraft::ServicesNeeded { services } => {
                check_services(&services)?;
                FunctionKind::ServicesNeeded { services }
            }
            FunctionDraft::Custom { title, needs } => {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err(EngineError::InvalidRequest(
                        "custom function title must not be blank".to_string(),
                    ));
                }
                let needs = match needs {
                    NeedsDraft::Items {
                        items,
                        opening_hours,
                    } => {
                        check_opening_hours(&opening_hours)?;
                        CustomNeeds::Items {
                            items: self.assign_items(&items)?,
                            opening_hours,
                        }
                    }
                    NeedsDraft::Services { services } => {
                        check_services(&services)?;
                        CustomNeeds::Services { services }
                    }
                };
                FunctionKind::Custom { title, needs }
            }
        };
        Ok(kind)
    }
}

fn kind_mismatch(function: &VenueFunction, wanted: &str) -> EngineError {
    EngineError::InvalidRequest(format!(
        "function '{}' is a {} and does not take {wanted} needs",
        function.id,
        function.kind.name()
    ))
}

fn check_services(services: &[ServiceRequest]) -> EngineResult<()> {
    let mut seen = HashSet::new();
    for service in services {
        if !seen.insert(service.service_type) {
            return Err(EngineError::InvalidRequest(format!(
                "service '{}' is listed twice",
                service.service_type
            )));
        }
    }
    Ok(())
}

fn check_opening_hours(slots: &[OpeningSlot]) -> EngineResult<()> {
    match slots.iter().find(|slot| !slot.is_well_formed()) {
        Some(slot) => Err(EngineError::InvalidRequest(format!(
            "opening slot on {} closes at {} before it opens at {}",
            slot.weekday, slot.closes, slot.opens
        ))),
        None => Ok(()),
    }
}
