use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How badly a venue function wants an item, as declared by the organizer
/// when the need is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedLevel {
    ALot,
    Some,
    Few,
}

/// The fixed catalog of services a venue can ask volunteers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    LargeTransport,
    SmallTransport,
    Carrying,
    Language,
    Admin,
    Tech,
}

impl ServiceType {
    pub const ALL: [ServiceType; 6] = [
        ServiceType::LargeTransport,
        ServiceType::SmallTransport,
        ServiceType::Carrying,
        ServiceType::Language,
        ServiceType::Admin,
        ServiceType::Tech,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::LargeTransport => "large_transport",
            ServiceType::SmallTransport => "small_transport",
            ServiceType::Carrying => "carrying",
            ServiceType::Language => "language",
            ServiceType::Admin => "admin",
            ServiceType::Tech => "tech",
        }
    }

    pub fn parse(value: &str) -> Option<ServiceType> {
        ServiceType::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item need attached to a venue function.
///
/// `category_path` and `category_id_path` are copied from the catalog when the
/// need is assigned and are never refreshed afterwards: renaming a category
/// later leaves existing needs describing the catalog as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemWithQuantity {
    pub category_id: String,
    pub category_path: Vec<String>,
    #[serde(default)]
    pub category_id_path: Vec<String>,
    pub quantity: NeedLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(default)]
    pub description: String,
    pub is_required: bool,
}

/// A weekly opening window of a collection or distribution point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningSlot {
    pub weekday: Weekday,
    pub opens: NaiveTime,
    pub closes: NaiveTime,
}

impl OpeningSlot {
    pub fn is_well_formed(&self) -> bool {
        self.opens < self.closes
    }
}

/// Whether a function's needs are keyed by item category or by service type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedKind {
    Item,
    Service,
}

/// What a custom function asks for: either items or services, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CustomNeeds {
    #[serde(rename_all = "camelCase")]
    Items {
        items: Vec<ItemWithQuantity>,
        #[serde(default)]
        opening_hours: Vec<OpeningSlot>,
    },
    Services { services: Vec<ServiceRequest> },
}

/// The tagged union of things a venue can advertise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FunctionKind {
    #[serde(rename_all = "camelCase")]
    CollectionPoint {
        items: Vec<ItemWithQuantity>,
        #[serde(default)]
        opening_hours: Vec<OpeningSlot>,
    },
    #[serde(rename_all = "camelCase")]
    DistributionPoint {
        items: Vec<ItemWithQuantity>,
        #[serde(default)]
        opening_hours: Vec<OpeningSlot>,
    },
    ServicesNeeded { services: Vec<ServiceRequest> },
    Custom { title: String, needs: CustomNeeds },
}

/// Borrowed view over a function's declared needs.
#[derive(Debug, Clone, Copy)]
pub enum DeclaredNeeds<'a> {
    Items(&'a [ItemWithQuantity]),
    Services(&'a [ServiceRequest]),
}

impl FunctionKind {
    pub fn name(&self) -> &'static str {
        match self {
            FunctionKind::CollectionPoint { .. } => "collection_point",
            FunctionKind::DistributionPoint { .. } => "distribution_point",
            FunctionKind::ServicesNeeded { .. } => "services_needed",
            FunctionKind::Custom { .. } => "custom",
        }
    }

    pub fn need_kind(&self) -> NeedKind {
        match self.declared_needs() {
            DeclaredNeeds::Items(_) => NeedKind::Item,
            DeclaredNeeds::Services(_) => NeedKind::Service,
        }
    }

    pub fn is_distribution_point(&self) -> bool {
        matches!(self, FunctionKind::DistributionPoint { .. })
    }

    pub fn declared_needs(&self) -> DeclaredNeeds<'_> {
        match self {
            FunctionKind::CollectionPoint { items, .. }
            | FunctionKind::DistributionPoint { items, .. }
            | FunctionKind::Custom {
                needs: CustomNeeds::Items { items, .. },
                ..
            } => DeclaredNeeds::Items(items),
            FunctionKind::ServicesNeeded { services }
            | FunctionKind::Custom {
                needs: CustomNeeds::Services { services },
                ..
            } => DeclaredNeeds::Services(services),
        }
    }

    /// Replaces the item list and opening hours. Returns `false` when the
    /// function is service-based.
    pub fn replace_items(
        &mut self,
        replacement: Vec<ItemWithQuantity>,
        hours: Vec<OpeningSlot>,
    ) -> bool {
        match self {
            FunctionKind::CollectionPoint {
                items,
                opening_hours,
            }
            | FunctionKind::DistributionPoint {
                items,
                opening_hours,
            }
            | FunctionKind::Custom {
                needs:
                    CustomNeeds::Items {
                        items,
                        opening_hours,
                    },
                ..
            } => {
                *items = replacement;
                *opening_hours = hours;
                true
            }
            _ => false,
        }
    }

    /// Replaces the service list. Returns `false` when the function is item-based.
    pub fn replace_services(&mut self, replacement: Vec<ServiceRequest>) -> bool {
        match self {
            FunctionKind::ServicesNeeded { services }
            | FunctionKind::Custom {
                needs: CustomNeeds::Services { services },
                ..
            } => {
                *services = replacement;
                true
            }
            _ => false,
        }
    }
}
