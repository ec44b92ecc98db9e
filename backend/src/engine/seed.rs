//! Predefined item categories seeded at startup.
//!
//! Parents must appear before their children.

pub struct SeedCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub parent_id: Option<&'static str>,
}

const fn seed(id: &'static str, name: &'static str, parent_id: Option<&'static str>) -> SeedCategory {
    SeedCategory {
        id,
        name,
        parent_id,
    }
}

pub const PREDEFINED_CATEGORIES: &[SeedCategory] = &[
    seed("medicine", "Medicine", None),
    seed("painkillers", "Painkillers", Some("medicine")),
    seed("nurofen", "Nurofen", Some("painkillers")),
    seed("paracetamol", "Paracetamol", Some("painkillers")),
    seed("bandages", "Bandages", Some("medicine")),
    seed("food", "Food", None),
    seed("canned-food", "Canned food", Some("food")),
    seed("baby-food", "Baby food", Some("food")),
    seed("clothing", "Clothing", None),
    seed("winter-clothing", "Winter clothing", Some("clothing")),
    seed("hygiene", "Hygiene", None),
    seed("diapers", "Diapers", Some("hygiene")),
    seed("toothpaste", "Toothpaste", Some("hygiene")),
];
