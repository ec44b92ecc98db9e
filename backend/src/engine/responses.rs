//! # Response Store
//!
//! Volunteer responses and beneficiary commitments.
//!
//! Every submission appends a new record with a fresh id, even if an identical
//! one already exists: retrying `submit_response` means submitting twice.
//! A response may only target a category or service type the function
//! currently declares.
//! Status changes go through [`ResponseStore::transition`] so the
//! read-check-write happens under the store's lock.

use crate::engine::needs::VenueDirectory;
use crate::error::{EngineError, EngineResult};
use crate::store::{CommitmentStore, ResponseStore};
use chrono::Utc;
use common::model::need::NeedKind;
use common::model::need_key::NeedKey;
use common::model::response::{
    BeneficiaryCommitment, CommitmentStatus, ResponseStatus, VolunteerResponse,
};
use common::requests::{CommitmentQuery, ResponseQuery, SubmitResponseRequest};
use log::info;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct ResponseService {
    responses: Arc<dyn ResponseStore>,
    commitments: Arc<dyn CommitmentStore>,
    directory: VenueDirectory,
}

impl ResponseService {
    pub fn new(
        responses: Arc<dyn ResponseStore>,
        commitments: Arc<dyn CommitmentStore>,
        directory: VenueDirectory,
    ) -> Self {
        Self {
            responses,
            commitments,
            directory,
        }
    }

    /// Records a volunteer's offer. `initial_status` must be `pending` or
    /// `confirmed`.
    pub fn submit_response(
        &self,
        request: SubmitResponseRequest,
        initial_status: ResponseStatus,
    ) -> EngineResult<VolunteerResponse> {
        if !matches!(
            initial_status,
            ResponseStatus::Pending | ResponseStatus::Confirmed
        ) {
            return Err(EngineError::InvalidRequest(format!(
                "a new response cannot start as '{initial_status}'"
            )));
        }
        require_text("volunteerId", &request.volunteer_id)?;
        require_text("volunteerName", &request.volunteer_name)?;

        let key = NeedKey::from_parts(
            request.venue_id,
            request.function_id,
            request.category_id,
            request.service_type,
        )?;
        if key.target.kind() != request.response_type {
            return Err(EngineError::InvalidRequest(format!(
                "responseType does not match the target of {key}"
            )));
        }

        let function = self.directory.get_function(&key.venue_id, &key.function_id)?;
        if function.kind.need_kind() != key.target.kind() {
            return Err(EngineError::InvalidRequest(format!(
                "function '{}' is a {} and does not take {:?} responses",
                function.id,
                function.kind.name(),
                request.response_type
            )));
        }
        if !key.target.is_declared_in(function.kind.declared_needs()) {
            return Err(EngineError::InvalidRequest(format!(
                "{key} is not a declared need of function '{}'",
                function.id
            )));
        }

        let quantity_offered = match (request.response_type, request.quantity) {
            (NeedKind::Item, Some(0)) | (NeedKind::Item, None) => {
                return Err(EngineError::InvalidRequest(
                    "item responses must offer a positive quantity".to_string(),
                ))
            }
            (NeedKind::Item, Some(quantity)) => Some(quantity),
            (NeedKind::Service, None) => None,
            (NeedKind::Service, Some(_)) => {
                return Err(EngineError::InvalidRequest(
                    "service responses do not carry a quantity".to_string(),
                ))
            }
        };

        let response = VolunteerResponse {
            id: Uuid::new_v4().to_string(),
            volunteer_id: request.volunteer_id,
            volunteer_name: request.volunteer_name.trim().to_string(),
            volunteer_email: non_blank(request.volunteer_email),
            key,
            quantity_offered,
            message: non_blank(request.message),
            status: initial_status,
            created_at: Utc::now(),
        };
        self.responses.append(response.clone())?;
        info!(
            "Volunteer {} responded to {} ({})",
            response.volunteer_id, response.key, response.id
        );
        Ok(response)
    }

    pub fn get_response(&self, id: &str) -> EngineResult<VolunteerResponse> {
        self.responses
            .get(id)?
            .ok_or_else(|| EngineError::not_found("response", id))
    }

    pub fn list_responses(&self, filter: &ResponseQuery) -> EngineResult<Vec<VolunteerResponse>> {
        self.responses.list(filter)
    }

    /// Marks a response cancelled. Cancelling twice is a no-op.
    pub fn cancel_response(&self, id: &str) -> EngineResult<VolunteerResponse> {
        self.update_response_status(id, ResponseStatus::Cancelled)
    }

    pub fn update_response_status(
        &self,
        id: &str,
        status: ResponseStatus,
    ) -> EngineResult<VolunteerResponse> {
        let updated = self
            .responses
            .transition(id, &|current| next_response_status(current.status, status))?;
        info!("Response {id} is now {}", updated.status);
        Ok(updated)
    }

    /// Records that a beneficiary will come to a distribution point.
    pub fn submit_commitment(
        &self,
        beneficiary_id: &str,
        venue_id: &str,
        function_id: &str,
    ) -> EngineResult<BeneficiaryCommitment> {
        require_text("beneficiaryId", beneficiary_id)?;
        let function = self.directory.get_function(venue_id, function_id)?;
        if !function.kind.is_distribution_point() {
            return Err(EngineError::InvalidTarget(format!(
                "function '{function_id}' is a {}, commitments need a distribution_point",
                function.kind.name()
            )));
        }

        let commitment = BeneficiaryCommitment {
            id: Uuid::new_v4().to_string(),
            beneficiary_id: beneficiary_id.to_string(),
            venue_id: venue_id.to_string(),
            function_id: function_id.to_string(),
            status: CommitmentStatus::Confirmed,
            created_at: Utc::now(),
        };
        self.commitments.append(commitment.clone())?;
        info!(
            "Beneficiary {beneficiary_id} committed to {venue_id}/{function_id} ({})",
            commitment.id
        );
        Ok(commitment)
    }

    /// Idempotent, like [`ResponseService::cancel_response`].
    pub fn cancel_commitment(&self, id: &str) -> EngineResult<BeneficiaryCommitment> {
        let updated = self
            .commitments
            .transition(id, &|_| Ok(CommitmentStatus::Cancelled))?;
        info!("Commitment {id} cancelled");
        Ok(updated)
    }

    pub fn list_commitments(
        &self,
        filter: &CommitmentQuery,
    ) -> EngineResult<Vec<BeneficiaryCommitment>> {
        self.commitments.list(filter)
    }
}

/// Allowed lifecycle moves. Re-applying the current status is always fine.
fn next_response_status(
    current: ResponseStatus,
    requested: ResponseStatus,
) -> EngineResult<ResponseStatus> {
    use ResponseStatus::*;
    match (current, requested) {
        (a, b) if a == b => Ok(current),
        (_, Cancelled) => Ok(Cancelled),
        (Pending, Confirmed) | (Pending, Completed) | (Confirmed, Completed) => Ok(requested),
        _ => Err(EngineError::InvalidRequest(format!(
            "cannot move a response from '{current}' to '{requested}'"
        ))),
    }
}

fn require_text(field: &str, value: &str) -> EngineResult<()> {
    if value.trim().is_empty() {
        return Err(EngineError::InvalidRequest(format!(
            "field `{field}` must not be blank"
        )));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::CategoryCatalog;
    use crate::store::memory::{MemoryCategoryStore, MemoryResponseStore, MemoryVenueStore};
    use common::model::need::{NeedLevel, ServiceRequest, ServiceType};
    use common::requests::{FunctionDraft, ItemNeedDraft};

    struct Fixture {
        service: ResponseService,
        venue_id: String,
        collection_id: String,
        distribution_id: String,
        services_id: String,
    }

    fn fixture() -> Fixture {
        let catalog = CategoryCatalog::new(Arc::new(MemoryCategoryStore::default()));
        catalog.seed_predefined().unwrap();
        let directory = VenueDirectory::new(Arc::new(MemoryVenueStore::default()), catalog);
        let venue = directory.create_venue("Hall", "").unwrap();
        let items = vec![ItemNeedDraft {
            category_id: "nurofen".to_string(),
            quantity: NeedLevel::ALot,
        }];
        let collection = directory
            .add_function(
                &venue.id,
                FunctionDraft::CollectionPoint {
                    items: items.clone(),
                    opening_hours: vec![],
                },
            )
            .unwrap();
        let distribution = directory
            .add_function(
                &venue.id,
                FunctionDraft::DistributionPoint {
                    items,
                    opening_hours: vec![],
                },
            )
            .unwrap();
        let services = directory
            .add_function(
                &venue.id,
                FunctionDraft::ServicesNeeded {
                    services: vec![ServiceRequest {
                        service_type: ServiceType::Carrying,
                        description: "Unload a truck".to_string(),
                        is_required: true,
                    }],
                },
            )
            .unwrap();
        let store = Arc::new(MemoryResponseStore::default());
        Fixture {
            service: ResponseService::new(store.clone(), store, directory),
            venue_id: venue.id,
            collection_id: collection.id,
            distribution_id: distribution.id,
            services_id: services.id,
        }
    }

    fn item_request(fx: &Fixture, volunteer: &str, quantity: Option<u32>) -> SubmitResponseRequest {
        SubmitResponseRequest {
            venue_id: fx.venue_id.clone(),
            function_id: fx.collection_id.clone(),
            volunteer_id: volunteer.to_string(),
            volunteer_name: "Alex".to_string(),
            volunteer_email: Some("alex@example.org".to_string()),
            response_type: NeedKind::Item,
            category_id: Some("nurofen".to_string()),
            service_type: None,
            quantity,
            message: Some("  ".to_string()),
        }
    }

    #[test]
    fn every_submission_appends_a_new_record() {
        let fx = fixture();
        let mut ids = Vec::new();
        for i in 0..5 {
            let response = fx
                .service
                .submit_response(item_request(&fx, &format!("v{i}"), Some(i + 1)), ResponseStatus::Pending)
                .unwrap();
            assert_eq!(response.status, ResponseStatus::Pending);
            assert_eq!(response.message, None);
            ids.push(response.id);
        }
        // An identical retry is a second record, not a merge.
        fx.service
            .submit_response(item_request(&fx, "v0", Some(1)), ResponseStatus::Pending)
            .unwrap();

        let all = fx.service.list_responses(&ResponseQuery::default()).unwrap();
        assert_eq!(all.len(), 6);
        for id in &ids {
            assert_eq!(&fx.service.get_response(id).unwrap().id, id);
        }
    }

    #[test]
    fn list_filters_are_and_combined() {
        let fx = fixture();
        fx.service
            .submit_response(item_request(&fx, "v1", Some(1)), ResponseStatus::Pending)
            .unwrap();
        fx.service
            .submit_response(item_request(&fx, "v2", Some(2)), ResponseStatus::Pending)
            .unwrap();

        let filter = ResponseQuery {
            venue_id: Some(fx.venue_id.clone()),
            function_id: Some(fx.collection_id.clone()),
            volunteer_id: Some("v2".to_string()),
        };
        let listed = fx.service.list_responses(&filter).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].quantity_offered, Some(2));

        let other_function = ResponseQuery {
            function_id: Some(fx.services_id.clone()),
            ..Default::default()
        };
        assert!(fx.service.list_responses(&other_function).unwrap().is_empty());
    }

    #[test]
    fn initial_status_is_explicit() {
        let fx = fixture();
        let confirmed = fx
            .service
            .submit_response(item_request(&fx, "v1", Some(1)), ResponseStatus::Confirmed)
            .unwrap();
        assert_eq!(confirmed.status, ResponseStatus::Confirmed);

        let err = fx
            .service
            .submit_response(item_request(&fx, "v1", Some(1)), ResponseStatus::Completed)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));
    }

    #[test]
    fn item_responses_need_a_positive_quantity() {
        let fx = fixture();
        for quantity in [None, Some(0)] {
            let err = fx
                .service
                .submit_response(item_request(&fx, "v1", quantity), ResponseStatus::Pending)
                .unwrap_err();
            assert!(matches!(err, EngineError::InvalidRequest(_)));
        }
    }

    #[test]
    fn response_must_match_the_function_kind() {
        let fx = fixture();
        let mut request = item_request(&fx, "v1", Some(3));
        request.function_id = fx.services_id.clone();
        let err = fx
            .service
            .submit_response(request, ResponseStatus::Pending)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));

        let service_request = SubmitResponseRequest {
            venue_id: fx.venue_id.clone(),
            function_id: fx.services_id.clone(),
            volunteer_id: "v9".to_string(),
            volunteer_name: "Kim".to_string(),
            volunteer_email: None,
            response_type: NeedKind::Service,
            category_id: None,
            service_type: Some(ServiceType::Carrying),
            quantity: None,
            message: Some("I have a van".to_string()),
        };
        let response = fx
            .service
            .submit_response(service_request, ResponseStatus::Pending)
            .unwrap();
        assert_eq!(response.quantity_offered, None);
        assert_eq!(response.message.as_deref(), Some("I have a van"));
    }

    #[test]
    fn response_type_must_agree_with_the_key() {
        let fx = fixture();
        let mut request = item_request(&fx, "v1", Some(3));
        request.response_type = NeedKind::Service;
        let err = fx
            .service
            .submit_response(request, ResponseStatus::Pending)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));
    }

    #[test]
    fn undeclared_targets_are_rejected() {
        let fx = fixture();
        let mut request = item_request(&fx, "v1", Some(3));
        request.category_id = Some("diapers".to_string());
        let err = fx
            .service
            .submit_response(request, ResponseStatus::Pending)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));

        let tech = SubmitResponseRequest {
            venue_id: fx.venue_id.clone(),
            function_id: fx.services_id.clone(),
            volunteer_id: "v9".to_string(),
            volunteer_name: "Kim".to_string(),
            volunteer_email: None,
            response_type: NeedKind::Service,
            category_id: None,
            service_type: Some(ServiceType::Tech),
            quantity: None,
            message: None,
        };
        let err = fx
            .service
            .submit_response(tech, ResponseStatus::Pending)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));
        assert!(fx
            .service
            .list_responses(&ResponseQuery::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn unknown_function_is_not_found() {
        let fx = fixture();
        let mut request = item_request(&fx, "v1", Some(3));
        request.function_id = "f-missing".to_string();
        let err = fx
            .service
            .submit_response(request, ResponseStatus::Pending)
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn cancel_is_idempotent_and_unknown_ids_fail() {
        let fx = fixture();
        let response = fx
            .service
            .submit_response(item_request(&fx, "v1", Some(3)), ResponseStatus::Pending)
            .unwrap();

        let first = fx.service.cancel_response(&response.id).unwrap();
        let second = fx.service.cancel_response(&response.id).unwrap();
        assert_eq!(first.status, ResponseStatus::Cancelled);
        assert_eq!(second.status, ResponseStatus::Cancelled);

        assert!(matches!(
            fx.service.cancel_response("nope"),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn lifecycle_moves_forward_only() {
        assert_eq!(
            next_response_status(ResponseStatus::Pending, ResponseStatus::Confirmed).unwrap(),
            ResponseStatus::Confirmed
        );
        assert_eq!(
            next_response_status(ResponseStatus::Confirmed, ResponseStatus::Completed).unwrap(),
            ResponseStatus::Completed
        );
        assert_eq!(
            next_response_status(ResponseStatus::Completed, ResponseStatus::Cancelled).unwrap(),
            ResponseStatus::Cancelled
        );
        assert!(next_response_status(ResponseStatus::Confirmed, ResponseStatus::Pending).is_err());
        assert!(next_response_status(ResponseStatus::Cancelled, ResponseStatus::Confirmed).is_err());
    }

    #[test]
    fn commitments_only_target_distribution_points() {
        let fx = fixture();
        let err = fx
            .service
            .submit_commitment("b1", &fx.venue_id, &fx.services_id)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTarget(_)));

        let err = fx
            .service
            .submit_commitment("b1", &fx.venue_id, &fx.collection_id)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTarget(_)));

        let commitment = fx
            .service
            .submit_commitment("b1", &fx.venue_id, &fx.distribution_id)
            .unwrap();
        assert_eq!(commitment.status, CommitmentStatus::Confirmed);
    }

    #[test]
    fn cancelling_a_commitment_twice_is_fine() {
        let fx = fixture();
        let commitment = fx
            .service
            .submit_commitment("b1", &fx.venue_id, &fx.distribution_id)
            .unwrap();
        fx.service.cancel_commitment(&commitment.id).unwrap();
        let again = fx.service.cancel_commitment(&commitment.id).unwrap();
        assert_eq!(again.status, CommitmentStatus::Cancelled);

        let by_beneficiary = CommitmentQuery {
            beneficiary_id: Some("b1".to_string()),
            ..Default::default()
        };
        assert_eq!(fx.service.list_commitments(&by_beneficiary).unwrap().len(), 1);
    }
}
