//! The needs & response projection engine.
//!
//! Each component owns one concern and reaches storage only through the
//! traits in [`crate::store`]. [`Engine`] wires them together over a
//! [`Stores`] bundle so the HTTP layer gets one handle.

pub mod catalog;
pub mod need_status;
pub mod needs;
pub mod projection;
pub mod responses;
pub mod seed;
pub mod tree;

use crate::store::memory::{
    MemoryCategoryStore, MemoryNeedStatusStore, MemoryResponseStore, MemoryVenueStore,
};
use crate::store::sqlite::SqliteStore;
use crate::store::{CategoryStore, CommitmentStore, NeedStatusStore, ResponseStore, VenueStore};
use catalog::CategoryCatalog;
use need_status::NeedStatusOverlay;
use needs::VenueDirectory;
use projection::ProjectionAggregator;
use responses::ResponseService;
use std::sync::Arc;

/// The storage backends an [`Engine`] runs on.
#[derive(Clone)]
pub struct Stores {
    pub categories: Arc<dyn CategoryStore>,
    pub venues: Arc<dyn VenueStore>,
    pub responses: Arc<dyn ResponseStore>,
    pub commitments: Arc<dyn CommitmentStore>,
    pub statuses: Arc<dyn NeedStatusStore>,
}

impl Stores {
    pub fn in_memory() -> Self {
        let responses = Arc::new(MemoryResponseStore::default());
        Self {
            categories: Arc::new(MemoryCategoryStore::default()),
            venues: Arc::new(MemoryVenueStore::default()),
            responses: responses.clone(),
            commitments: responses,
            statuses: Arc::new(MemoryNeedStatusStore::default()),
        }
    }

    /// Every collection in one SQLite database.
    pub fn with_sqlite(sqlite: SqliteStore) -> Self {
        let sqlite = Arc::new(sqlite);
        Self {
            categories: sqlite.clone(),
            venues: sqlite.clone(),
            responses: sqlite.clone(),
            commitments: sqlite.clone(),
            statuses: sqlite,
        }
    }
}

#[derive(Clone)]
pub struct Engine {
    pub catalog: CategoryCatalog,
    pub directory: VenueDirectory,
    pub responses: ResponseService,
    pub overlay: NeedStatusOverlay,
    pub projections: ProjectionAggregator,
}

impl Engine {
    pub fn new(stores: Stores) -> Self {
        let catalog = CategoryCatalog::new(stores.categories);
        let directory = VenueDirectory::new(stores.venues, catalog.clone());
        let responses =
            ResponseService::new(stores.responses, stores.commitments, directory.clone());
        let overlay = NeedStatusOverlay::new(stores.statuses, directory.clone());
        let projections =
            ProjectionAggregator::new(directory.clone(), responses.clone(), overlay.clone());
        Self {
            catalog,
            directory,
            responses,
            overlay,
            projections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::need::{NeedKind, NeedLevel};
    use common::model::need_key::NeedKey;
    use common::model::need_status::NeedStatus;
    use common::model::response::ResponseStatus;
    use common::requests::{FunctionDraft, ItemNeedDraft, SubmitResponseRequest};

    /// Seeds the catalog and records two offers plus a status override.
    /// Returns the `(venue, function)` ids.
    fn record_offers(engine: &Engine) -> (String, String) {
        engine.catalog.seed_predefined().unwrap();
        let venue = engine.directory.create_venue("Depot", "Main st. 1").unwrap();
        let function = engine
            .directory
            .add_function(
                &venue.id,
                FunctionDraft::CollectionPoint {
                    items: vec![ItemNeedDraft {
                        category_id: "canned-food".to_string(),
                        quantity: NeedLevel::ALot,
                    }],
                    opening_hours: vec![],
                },
            )
            .unwrap();
        for quantity in [10, 5] {
            engine
                .responses
                .submit_response(
                    SubmitResponseRequest {
                        venue_id: venue.id.clone(),
                        function_id: function.id.clone(),
                        volunteer_id: "v1".to_string(),
                        volunteer_name: "Alex".to_string(),
                        volunteer_email: None,
                        response_type: NeedKind::Item,
                        category_id: Some("canned-food".to_string()),
                        service_type: None,
                        quantity: Some(quantity),
                        message: None,
                    },
                    ResponseStatus::Pending,
                )
                .unwrap();
        }
        engine
            .overlay
            .set_status(
                &NeedKey::item(&venue.id, &function.id, "canned-food"),
                NeedStatus::NeedFewMore,
                "org-1",
            )
            .unwrap();
        (venue.id, function.id)
    }

    fn assert_projected(engine: &Engine, venue_id: &str, function_id: &str) {
        let projection = engine
            .projections
            .project_function(venue_id, function_id)
            .unwrap();
        assert_eq!(projection.items[0].category_path, ["Food", "Canned food"]);
        assert_eq!(projection.items[0].response_count, 2);
        assert_eq!(projection.items[0].total_quantity_offered, 15);
        assert_eq!(projection.items[0].current_status, Some(NeedStatus::NeedFewMore));
    }

    #[test]
    fn in_memory_engine_projects_responses() {
        let engine = Engine::new(Stores::in_memory());
        let (venue_id, function_id) = record_offers(&engine);
        assert_projected(&engine, &venue_id, &function_id);
    }

    #[test]
    fn sqlite_engine_projects_responses() {
        let sqlite = SqliteStore::open_in_memory().unwrap();
        let engine = Engine::new(Stores::with_sqlite(sqlite));
        let (venue_id, function_id) = record_offers(&engine);
        assert_projected(&engine, &venue_id, &function_id);
    }

    #[test]
    fn projections_survive_reopening_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relief.sqlite");
        let (venue_id, function_id) = {
            let engine = Engine::new(Stores::with_sqlite(SqliteStore::open(&path).unwrap()));
            record_offers(&engine)
        };

        let engine = Engine::new(Stores::with_sqlite(SqliteStore::open(&path).unwrap()));
        // Seeding again on startup skips what is already stored.
        assert_eq!(engine.catalog.seed_predefined().unwrap(), 0);
        assert_eq!(engine.directory.list_venues().unwrap().len(), 1);
        assert_projected(&engine, &venue_id, &function_id);
    }
}
