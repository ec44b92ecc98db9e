//! # Projection Aggregator
//!
//! Turns declared needs, the flat response stream and status overrides into
//! per-need summaries for organizers.
//!
//! Rules:
//! - every declared need yields exactly one projection, zero counts included;
//! - `current_status` is `None` when no organizer has set one;
//! - cancelled responses and cancelled commitments are not counted;
//! - item paths come from the need's stored snapshot, so a category missing
//!   from the catalog does not break the projection.

use crate::engine::need_status::NeedStatusOverlay;
use crate::engine::needs::VenueDirectory;
use crate::engine::responses::ResponseService;
use crate::engine::tree::build_tree;
use crate::error::EngineResult;
use common::model::need::DeclaredNeeds;
use common::model::need_key::{NeedKey, NeedTarget};
use common::model::need_status::NeedStatus;
use common::model::projection::{
    ItemProjection, RespondingVolunteer, ServiceProjection, TreeNode, VenueProjection,
    VenueRollup,
};
use common::model::response::{CommitmentStatus, VolunteerResponse};
use common::model::venue::VenueFunction;
use common::requests::{CommitmentQuery, NeedStatusQuery, ResponseQuery};
use std::collections::HashMap;

#[derive(Clone)]
pub struct ProjectionAggregator {
    directory: VenueDirectory,
    responses: ResponseService,
    overlay: NeedStatusOverlay,
}

impl ProjectionAggregator {
    pub fn new(
        directory: VenueDirectory,
        responses: ResponseService,
        overlay: NeedStatusOverlay,
    ) -> Self {
        Self {
            directory,
            responses,
            overlay,
        }
    }

    pub fn project_function(&self, venue_id: &str, function_id: &str) -> EngineResult<VenueProjection> {
        let function = self.directory.get_function(venue_id, function_id)?;
        self.project(&function)
    }

    /// Projections for every function of a venue, with venue-wide totals.
    pub fn project_venue(&self, venue_id: &str) -> EngineResult<VenueRollup> {
        let functions = self.directory.list_functions(venue_id)?;
        let projections = functions
            .iter()
            .map(|function| self.project(function))
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(VenueRollup {
            venue_id: venue_id.to_string(),
            total_response_count: projections.iter().map(VenueProjection::response_count).sum(),
            total_quantity_offered: projections
                .iter()
                .map(VenueProjection::total_quantity_offered)
                .sum(),
            beneficiary_commitment_count: projections
                .iter()
                .map(|p| p.beneficiary_commitment_count)
                .sum(),
            functions: projections,
        })
    }

    /// Item projections of one function arranged by category path.
    pub fn project_item_tree(
        &self,
        venue_id: &str,
        function_id: &str,
    ) -> EngineResult<Vec<TreeNode<ItemProjection>>> {
        let projection = self.project_function(venue_id, function_id)?;
        Ok(build_tree(projection.items))
    }

    fn project(&self, function: &VenueFunction) -> EngineResult<VenueProjection> {
        let venue_id = function.venue_id.as_str();
        let function_id = function.id.as_str();

        // One read per collection, then everything is matched in memory.
        let scope = ResponseQuery {
            venue_id: Some(venue_id.to_string()),
            function_id: Some(function_id.to_string()),
            volunteer_id: None,
        };
        let mut by_target: HashMap<NeedTarget, Vec<VolunteerResponse>> = HashMap::new();
        for response in self.responses.list_responses(&scope)? {
            if response.status.is_active() {
                by_target
                    .entry(response.key.target.clone())
                    .or_default()
                    .push(response);
            }
        }

        let statuses: HashMap<NeedKey, NeedStatus> = self
            .overlay
            .list_statuses(&NeedStatusQuery {
                venue_id: Some(venue_id.to_string()),
                function_id: Some(function_id.to_string()),
            })?
            .into_iter()
            .map(|update| (update.key, update.status))
            .collect();

        let key_for = |target: NeedTarget| NeedKey::new(venue_id, function_id, target);

        let mut items = Vec::new();
        let mut services = Vec::new();
        match function.kind.declared_needs() {
            DeclaredNeeds::Items(declared) => {
                for need in declared {
                    let target = NeedTarget::Item {
                        category_id: need.category_id.clone(),
                    };
                    let matching = by_target.get(&target).map(Vec::as_slice).unwrap_or_default();
                    items.push(ItemProjection {
                        category_id: need.category_id.clone(),
                        category_path: need.category_path.clone(),
                        category_id_path: need.category_id_path.clone(),
                        declared_level: need.quantity,
                        current_status: statuses.get(&key_for(target)).copied(),
                        response_count: matching.len() as u32,
                        total_quantity_offered: matching
                            .iter()
                            .filter_map(|r| r.quantity_offered)
                            .map(u64::from)
                            .sum(),
                    });
                }
            }
            DeclaredNeeds::Services(declared) => {
                for need in declared {
                    let target = NeedTarget::Service {
                        service_type: need.service_type,
                    };
                    let matching = by_target.get(&target).map(Vec::as_slice).unwrap_or_default();
                    services.push(ServiceProjection {
                        service_type: need.service_type,
                        is_required: need.is_required,
                        current_status: statuses.get(&key_for(target)).copied(),
                        response_count: matching.len() as u32,
                        responding_volunteers: matching
                            .iter()
                            .map(|r| RespondingVolunteer {
                                id: r.volunteer_id.clone(),
                                name: r.volunteer_name.clone(),
                                message: r.message.clone(),
                            })
                            .collect(),
                    });
                }
            }
        }

        let beneficiary_commitment_count = self
            .responses
            .list_commitments(&CommitmentQuery {
                venue_id: Some(venue_id.to_string()),
                function_id: Some(function_id.to_string()),
                beneficiary_id: None,
            })?
            .iter()
            .filter(|c| c.status == CommitmentStatus::Confirmed)
            .count() as u32;

        Ok(VenueProjection {
            venue_id: venue_id.to_string(),
            function_id: function_id.to_string(),
            items,
            services,
            beneficiary_commitment_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::CategoryCatalog;
    use crate::error::EngineError;
    use crate::store::memory::{
        MemoryCategoryStore, MemoryNeedStatusStore, MemoryResponseStore, MemoryVenueStore,
    };
    use common::model::need::{NeedKind, NeedLevel, ServiceRequest, ServiceType};
    use common::model::response::ResponseStatus;
    use common::requests::{FunctionDraft, ItemNeedDraft, SubmitResponseRequest};
    use std::sync::Arc;

    struct Fixture {
        aggregator: ProjectionAggregator,
        responses: ResponseService,
        overlay: NeedStatusOverlay,
        venue_id: String,
        items_id: String,
        services_id: String,
        distribution_id: String,
    }

    fn fixture() -> Fixture {
        let catalog = CategoryCatalog::new(Arc::new(MemoryCategoryStore::default()));
        catalog.seed_predefined().unwrap();
        let directory = VenueDirectory::new(Arc::new(MemoryVenueStore::default()), catalog);
        let store = Arc::new(MemoryResponseStore::default());
        let responses = ResponseService::new(store.clone(), store, directory.clone());
        let overlay = NeedStatusOverlay::new(
            Arc::new(MemoryNeedStatusStore::default()),
            directory.clone(),
        );

        let venue = directory.create_venue("Hall", "").unwrap();
        let items = directory
            .add_function(
                &venue.id,
                FunctionDraft::CollectionPoint {
                    items: vec![
                        ItemNeedDraft {
                            category_id: "nurofen".to_string(),
                            quantity: NeedLevel::ALot,
                        },
                        ItemNeedDraft {
                            category_id: "diapers".to_string(),
                            quantity: NeedLevel::Few,
                        },
                    ],
                    opening_hours: vec![],
                },
            )
            .unwrap();
        let services = directory
            .add_function(
                &venue.id,
                FunctionDraft::ServicesNeeded {
                    services: vec![
                        ServiceRequest {
                            service_type: ServiceType::Carrying,
                            description: String::new(),
                            is_required: true,
                        },
                        ServiceRequest {
                            service_type: ServiceType::Tech,
                            description: String::new(),
                            is_required: false,
                        },
                    ],
                },
            )
            .unwrap();
        let distribution = directory
            .add_function(
                &venue.id,
                FunctionDraft::DistributionPoint {
                    items: vec![],
                    opening_hours: vec![],
                },
            )
            .unwrap();

        Fixture {
            aggregator: ProjectionAggregator::new(directory, responses.clone(), overlay.clone()),
            responses,
            overlay,
            venue_id: venue.id,
            items_id: items.id,
            services_id: services.id,
            distribution_id: distribution.id,
        }
    }

    fn offer_item(fx: &Fixture, category_id: &str, quantity: u32) -> VolunteerResponse {
        fx.responses
            .submit_response(
                SubmitResponseRequest {
                    venue_id: fx.venue_id.clone(),
                    function_id: fx.items_id.clone(),
                    volunteer_id: "v1".to_string(),
                    volunteer_name: "Alex".to_string(),
                    volunteer_email: None,
                    response_type: NeedKind::Item,
                    category_id: Some(category_id.to_string()),
                    service_type: None,
                    quantity: Some(quantity),
                    message: None,
                },
                ResponseStatus::Pending,
            )
            .unwrap()
    }

    fn offer_service(fx: &Fixture, volunteer: &str, service_type: ServiceType) -> VolunteerResponse {
        fx.responses
            .submit_response(
                SubmitResponseRequest {
                    venue_id: fx.venue_id.clone(),
                    function_id: fx.services_id.clone(),
                    volunteer_id: volunteer.to_string(),
                    volunteer_name: format!("Volunteer {volunteer}"),
                    volunteer_email: None,
                    response_type: NeedKind::Service,
                    category_id: None,
                    service_type: Some(service_type),
                    quantity: None,
                    message: Some("Free on weekends".to_string()),
                },
                ResponseStatus::Pending,
            )
            .unwrap()
    }

    #[test]
    fn needs_without_responses_still_project_with_zeroes() {
        let fx = fixture();
        let projection = fx.aggregator.project_function(&fx.venue_id, &fx.items_id).unwrap();
        assert_eq!(projection.items.len(), 2);
        for item in &projection.items {
            assert_eq!(item.response_count, 0);
            assert_eq!(item.total_quantity_offered, 0);
            assert_eq!(item.current_status, None);
        }
    }

    #[test]
    fn item_quantities_are_summed_per_need() {
        let fx = fixture();
        offer_item(&fx, "nurofen", 10);
        offer_item(&fx, "nurofen", 5);
        offer_item(&fx, "diapers", 7);

        let projection = fx.aggregator.project_function(&fx.venue_id, &fx.items_id).unwrap();
        let nurofen = projection
            .items
            .iter()
            .find(|i| i.category_id == "nurofen")
            .unwrap();
        assert_eq!(nurofen.response_count, 2);
        assert_eq!(nurofen.total_quantity_offered, 15);
        assert_eq!(nurofen.category_path, ["Medicine", "Painkillers", "Nurofen"]);
        assert_eq!(nurofen.declared_level, NeedLevel::ALot);
    }

    #[test]
    fn cancelled_responses_drop_out_of_counts() {
        let fx = fixture();
        offer_item(&fx, "nurofen", 10);
        let cancelled = offer_item(&fx, "nurofen", 5);
        fx.responses.cancel_response(&cancelled.id).unwrap();

        let projection = fx.aggregator.project_function(&fx.venue_id, &fx.items_id).unwrap();
        assert_eq!(projection.items[0].response_count, 1);
        assert_eq!(projection.items[0].total_quantity_offered, 10);
    }

    #[test]
    fn status_override_is_reported_per_need() {
        let fx = fixture();
        fx.overlay
            .set_status(
                &NeedKey::item(&fx.venue_id, &fx.items_id, "diapers"),
                NeedStatus::DontNeed,
                "org-1",
            )
            .unwrap();
        offer_item(&fx, "diapers", 50);

        let projection = fx.aggregator.project_function(&fx.venue_id, &fx.items_id).unwrap();
        let diapers = projection
            .items
            .iter()
            .find(|i| i.category_id == "diapers")
            .unwrap();
        assert_eq!(diapers.current_status, Some(NeedStatus::DontNeed));
        assert_eq!(diapers.response_count, 1);
        let nurofen = projection
            .items
            .iter()
            .find(|i| i.category_id == "nurofen")
            .unwrap();
        assert_eq!(nurofen.current_status, None);
    }

    #[test]
    fn service_projection_lists_responding_volunteers() {
        let fx = fixture();
        offer_service(&fx, "v1", ServiceType::Carrying);
        offer_service(&fx, "v2", ServiceType::Carrying);

        let projection = fx
            .aggregator
            .project_function(&fx.venue_id, &fx.services_id)
            .unwrap();
        assert_eq!(projection.services.len(), 2);
        let carrying = &projection.services[0];
        assert_eq!(carrying.service_type, ServiceType::Carrying);
        assert_eq!(carrying.response_count, 2);
        assert!(carrying.is_required);
        let ids: Vec<_> = carrying
            .responding_volunteers
            .iter()
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(ids, ["v1", "v2"]);
        assert_eq!(
            carrying.responding_volunteers[0].message.as_deref(),
            Some("Free on weekends")
        );
        assert_eq!(projection.services[1].response_count, 0);
    }

    #[test]
    fn commitments_are_counted_once_per_function() {
        let fx = fixture();
        fx.responses
            .submit_commitment("b1", &fx.venue_id, &fx.distribution_id)
            .unwrap();
        let second = fx
            .responses
            .submit_commitment("b2", &fx.venue_id, &fx.distribution_id)
            .unwrap();
        fx.responses.cancel_commitment(&second.id).unwrap();

        let projection = fx
            .aggregator
            .project_function(&fx.venue_id, &fx.distribution_id)
            .unwrap();
        assert_eq!(projection.beneficiary_commitment_count, 1);
        assert!(projection.items.is_empty());
    }

    #[test]
    fn venue_rollup_totals_all_functions() {
        let fx = fixture();
        offer_item(&fx, "nurofen", 10);
        offer_item(&fx, "diapers", 4);
        offer_service(&fx, "v3", ServiceType::Tech);
        fx.responses
            .submit_commitment("b1", &fx.venue_id, &fx.distribution_id)
            .unwrap();

        let rollup = fx.aggregator.project_venue(&fx.venue_id).unwrap();
        assert_eq!(rollup.functions.len(), 3);
        assert_eq!(rollup.total_response_count, 3);
        assert_eq!(rollup.total_quantity_offered, 14);
        assert_eq!(rollup.beneficiary_commitment_count, 1);
    }

    #[test]
    fn item_tree_groups_projections_by_category() {
        let fx = fixture();
        offer_item(&fx, "nurofen", 2);
        let tree = fx
            .aggregator
            .project_item_tree(&fx.venue_id, &fx.items_id)
            .unwrap();
        let names: Vec<_> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["Medicine", "Hygiene"]);
        assert_eq!(tree[0].item_count(), 1);
        assert_eq!(tree[0].children[0].children[0].items[0].total_quantity_offered, 2);
    }

    #[test]
    fn unknown_function_is_not_found() {
        let fx = fixture();
        assert!(matches!(
            fx.aggregator.project_function(&fx.venue_id, "missing"),
            Err(EngineError::NotFound(_))
        ));
    }
}
