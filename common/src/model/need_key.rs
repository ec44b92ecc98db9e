use crate::model::need::{DeclaredNeeds, NeedKind, ServiceType};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which single need inside a function a record points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NeedTarget {
    #[serde(rename_all = "camelCase")]
    Item { category_id: String },
    #[serde(rename_all = "camelCase")]
    Service { service_type: ServiceType },
}

impl NeedTarget {
    pub fn kind(&self) -> NeedKind {
        match self {
            NeedTarget::Item { .. } => NeedKind::Item,
            NeedTarget::Service { .. } => NeedKind::Service,
        }
    }

    /// True when `needs` lists this category or service type.
    pub fn is_declared_in(&self, needs: DeclaredNeeds<'_>) -> bool {
        match (self, needs) {
            (NeedTarget::Item { category_id }, DeclaredNeeds::Items(items)) => {
                items.iter().any(|item| &item.category_id == category_id)
            }
            (NeedTarget::Service { service_type }, DeclaredNeeds::Services(services)) => services
                .iter()
                .any(|service| service.service_type == *service_type),
            _ => false,
        }
    }

    /// Builds a target from the flat optional pair used on the wire.
    ///
    /// Exactly one of the two fields must be set.
    pub fn from_parts(
        category_id: Option<String>,
        service_type: Option<ServiceType>,
    ) -> Result<NeedTarget, NeedKeyError> {
        match (category_id, service_type) {
            (Some(category_id), None) => {
                if category_id.trim().is_empty() {
                    Err(NeedKeyError::BlankField("categoryId"))
                } else {
                    Ok(NeedTarget::Item { category_id })
                }
            }
            (None, Some(service_type)) => Ok(NeedTarget::Service { service_type }),
            (Some(_), Some(_)) => Err(NeedKeyError::BothTargets),
            (None, None) => Err(NeedKeyError::NoTarget),
        }
    }

    /// Splits the target back into the flat wire pair.
    pub fn into_parts(self) -> (Option<String>, Option<ServiceType>) {
        match self {
            NeedTarget::Item { category_id } => (Some(category_id), None),
            NeedTarget::Service { service_type } => (None, Some(service_type)),
        }
    }
}

/// Composite identity of one need: the function that declares it plus the
/// item category or service type it is about.
///
/// Responses and need-status overrides correlate through this key, so two keys
/// are equal only when venue, function and target all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedKey {
    pub venue_id: String,
    pub function_id: String,
    pub target: NeedTarget,
}

impl NeedKey {
    pub fn new(venue_id: impl Into<String>, function_id: impl Into<String>, target: NeedTarget) -> Self {
        Self {
            venue_id: venue_id.into(),
            function_id: function_id.into(),
            target,
        }
    }

    pub fn item(
        venue_id: impl Into<String>,
        function_id: impl Into<String>,
        category_id: impl Into<String>,
    ) -> Self {
        Self::new(
            venue_id,
            function_id,
            NeedTarget::Item {
                category_id: category_id.into(),
            },
        )
    }

    pub fn service(
        venue_id: impl Into<String>,
        function_id: impl Into<String>,
        service_type: ServiceType,
    ) -> Self {
        Self::new(venue_id, function_id, NeedTarget::Service { service_type })
    }

    /// Validates the scope fields. Target validation happens in
    /// [`NeedTarget::from_parts`].
    pub fn from_parts(
        venue_id: String,
        function_id: String,
        category_id: Option<String>,
        service_type: Option<ServiceType>,
    ) -> Result<NeedKey, NeedKeyError> {
        if venue_id.trim().is_empty() {
            return Err(NeedKeyError::BlankField("venueId"));
        }
        if function_id.trim().is_empty() {
            return Err(NeedKeyError::BlankField("functionId"));
        }
        let target = NeedTarget::from_parts(category_id, service_type)?;
        Ok(NeedKey {
            venue_id,
            function_id,
            target,
        })
    }
}

impl fmt::Display for NeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            NeedTarget::Item { category_id } => write!(
                f,
                "{}/{}/item:{}",
                self.venue_id, self.function_id, category_id
            ),
            NeedTarget::Service { service_type } => write!(
                f,
                "{}/{}/service:{}",
                self.venue_id, self.function_id, service_type
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NeedKeyError {
    #[error("exactly one of the item category or the service type must be set, got both")]
    BothTargets,
    #[error("exactly one of the item category or the service type must be set, got neither")]
    NoTarget,
    #[error("field `{0}` must not be blank")]
    BlankField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::need::{ItemWithQuantity, NeedLevel, ServiceRequest};

    #[test]
    fn from_parts_requires_exactly_one_target() {
        assert_eq!(
            NeedTarget::from_parts(Some("n".into()), Some(ServiceType::Admin)),
            Err(NeedKeyError::BothTargets)
        );
        assert_eq!(NeedTarget::from_parts(None, None), Err(NeedKeyError::NoTarget));
        assert_eq!(
            NeedTarget::from_parts(Some("n".into()), None),
            Ok(NeedTarget::Item {
                category_id: "n".into()
            })
        );
    }

    #[test]
    fn keys_with_same_category_in_other_functions_differ() {
        let a = NeedKey::item("1", "f1", "n");
        let b = NeedKey::item("1", "f2", "n");
        assert_ne!(a, b);
        assert_eq!(a.target, b.target);
    }

    #[test]
    fn target_is_declared_only_by_matching_needs() {
        let items = vec![ItemWithQuantity {
            category_id: "nurofen".into(),
            category_path: vec![],
            category_id_path: vec![],
            quantity: NeedLevel::ALot,
        }];
        let services = vec![ServiceRequest {
            service_type: ServiceType::Carrying,
            description: String::new(),
            is_required: false,
        }];
        let nurofen = NeedTarget::Item {
            category_id: "nurofen".into(),
        };
        let diapers = NeedTarget::Item {
            category_id: "diapers".into(),
        };
        let carrying = NeedTarget::Service {
            service_type: ServiceType::Carrying,
        };

        assert!(nurofen.is_declared_in(DeclaredNeeds::Items(&items)));
        assert!(!diapers.is_declared_in(DeclaredNeeds::Items(&items)));
        assert!(carrying.is_declared_in(DeclaredNeeds::Services(&services)));
        assert!(!carrying.is_declared_in(DeclaredNeeds::Items(&items)));
        assert!(!NeedTarget::Service {
            service_type: ServiceType::Tech
        }
        .is_declared_in(DeclaredNeeds::Services(&services)));
    }

    #[test]
    fn item_and_service_targets_never_compare_equal() {
        let item = NeedKey::item("1", "f1", "tech");
        let service = NeedKey::service("1", "f1", ServiceType::Tech);
        assert_ne!(item, service);
    }

    #[test]
    fn blank_scope_is_rejected() {
        let err = NeedKey::from_parts(" ".into(), "f1".into(), Some("n".into()), None);
        assert_eq!(err, Err(NeedKeyError::BlankField("venueId")));
    }

    #[test]
    fn display_names_the_target() {
        assert_eq!(NeedKey::item("1", "f1", "n").to_string(), "1/f1/item:n");
        assert_eq!(
            NeedKey::service("1", "f1", ServiceType::Carrying).to_string(),
            "1/f1/service:carrying"
        );
    }
}
