//! Shared application state.
//!
//! `AppState` is built once in `main.rs` from the loaded configuration and
//! handed to every worker as `web::Data`. The engine components are cheap to
//! clone (they only hold `Arc`s to the stores), and all locking happens inside
//! the stores, so handlers never lock anything themselves.

use crate::config::{ReliefConfig, StorageConfig};
use crate::engine::{Engine, Stores};
use crate::error::EngineResult;
use crate::store::sqlite::SqliteStore;
use common::model::response::ResponseStatus;
use log::info;

#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
    /// Status given to responses submitted through the API.
    pub default_response_status: ResponseStatus,
}

impl AppState {
    pub fn new(engine: Engine, default_response_status: ResponseStatus) -> Self {
        Self {
            engine,
            default_response_status,
        }
    }

    /// Opens the configured stores and seeds the catalog if asked to.
    pub fn from_config(config: &ReliefConfig) -> EngineResult<Self> {
        let stores = match &config.storage {
            StorageConfig::Memory => {
                info!("Using in-memory storage");
                Stores::in_memory()
            }
            StorageConfig::Sqlite { path } => {
                info!("Using SQLite storage at {}", path.display());
                Stores::with_sqlite(SqliteStore::open(path)?)
            }
        };
        let engine = Engine::new(stores);
        if config.engine.seed_catalog {
            engine.catalog.seed_predefined()?;
        }
        Ok(Self::new(engine, config.engine.default_response_status))
    }
}
