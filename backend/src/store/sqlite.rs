//! SQLite backend for every engine collection: the category catalog, venues
//! and their functions, responses, commitments and need-status overrides.
//!
//! One connection behind a mutex serializes every write. A function's
//! variant-specific payload (items or services, opening hours, custom title)
//! is kept as a JSON column next to its scope columns. The need-status
//! table carries a UNIQUE index over the flattened key, so the database
//! itself refuses a second record for the same need.

use crate::error::{EngineError, EngineResult};
use crate::store::{
    active_filter, CategoryStore, CommitmentStore, NeedStatusStore, ResponseStore,
    TransitionRule, VenueStore,
};
use chrono::{DateTime, Utc};
use common::model::category::ItemCategory;
use common::model::need::{FunctionKind, ServiceType};
use common::model::need_key::{NeedKey, NeedTarget};
use common::model::need_status::{NeedStatus, NeedStatusUpdate};
use common::model::response::{
    BeneficiaryCommitment, CommitmentStatus, ResponseStatus, VolunteerResponse,
};
use common::model::venue::{Venue, VenueFunction};
use common::requests::{CommitmentQuery, NeedStatusQuery, ResponseQuery};
use log::info;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    parent_id TEXT,
    level INTEGER NOT NULL,
    is_custom INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS venues (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS venue_functions (
    venue_id TEXT NOT NULL REFERENCES venues (id),
    id TEXT NOT NULL,
    kind TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (venue_id, id)
);

CREATE TABLE IF NOT EXISTS responses (
    id TEXT PRIMARY KEY,
    venue_id TEXT NOT NULL,
    function_id TEXT NOT NULL,
    volunteer_id TEXT NOT NULL,
    volunteer_name TEXT NOT NULL,
    volunteer_email TEXT,
    target_kind TEXT NOT NULL,
    target_value TEXT NOT NULL,
    quantity_offered INTEGER,
    message TEXT,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS responses_scope ON responses (venue_id, function_id);

CREATE TABLE IF NOT EXISTS commitments (
    id TEXT PRIMARY KEY,
    beneficiary_id TEXT NOT NULL,
    venue_id TEXT NOT NULL,
    function_id TEXT NOT NULL,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS need_statuses (
    id TEXT PRIMARY KEY,
    venue_id TEXT NOT NULL,
    function_id TEXT NOT NULL,
    target_kind TEXT NOT NULL,
    target_value TEXT NOT NULL,
    status TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (venue_id, function_id, target_kind, target_value)
);
";

const CATEGORY_COLUMNS: &str = "id, name, parent_id, level, is_custom";

const VENUE_COLUMNS: &str = "id, name, address, created_at";

const FUNCTION_COLUMNS: &str = "venue_id, id, kind, created_at, updated_at";

const RESPONSE_COLUMNS: &str = "id, venue_id, function_id, volunteer_id, volunteer_name, \
     volunteer_email, target_kind, target_value, quantity_offered, message, status, created_at";

const COMMITMENT_COLUMNS: &str = "id, beneficiary_id, venue_id, function_id, status, created_at";

const STATUS_COLUMNS: &str =
    "id, venue_id, function_id, target_kind, target_value, status, updated_by, updated_at";

#[derive(Debug, Error)]
#[error("{0}")]
struct DecodeError(String);

fn decode_failure(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(DecodeError(message)))
}

fn parse_time(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| decode_failure(idx, format!("bad timestamp '{raw}': {e}")))
}

fn parse_with<T>(
    row: &Row<'_>,
    idx: usize,
    what: &str,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| decode_failure(idx, format!("unknown {what} '{raw}'")))
}

fn target_columns(target: &NeedTarget) -> (&'static str, String) {
    match target {
        NeedTarget::Item { category_id } => ("item", category_id.clone()),
        NeedTarget::Service { service_type } => ("service", service_type.as_str().to_string()),
    }
}

fn read_key(row: &Row<'_>, venue: usize, kind: usize) -> rusqlite::Result<NeedKey> {
    let target_kind: String = row.get(kind)?;
    let target_value: String = row.get(kind + 1)?;
    let target = match target_kind.as_str() {
        "item" => NeedTarget::Item {
            category_id: target_value,
        },
        "service" => NeedTarget::Service {
            service_type: ServiceType::parse(&target_value).ok_or_else(|| {
                decode_failure(kind + 1, format!("unknown service type '{target_value}'"))
            })?,
        },
        other => return Err(decode_failure(kind, format!("unknown target kind '{other}'"))),
    };
    Ok(NeedKey {
        venue_id: row.get(venue)?,
        function_id: row.get(venue + 1)?,
        target,
    })
}

fn read_category(row: &Row<'_>) -> rusqlite::Result<ItemCategory> {
    Ok(ItemCategory {
        id: row.get(0)?,
        name: row.get(1)?,
        parent_id: row.get(2)?,
        level: row.get(3)?,
        is_custom: row.get(4)?,
    })
}

fn read_venue(row: &Row<'_>) -> rusqlite::Result<Venue> {
    Ok(Venue {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        created_at: parse_time(row, 3)?,
    })
}

fn read_function(row: &Row<'_>) -> rusqlite::Result<VenueFunction> {
    let raw: String = row.get(2)?;
    let kind: FunctionKind = serde_json::from_str(&raw)
        .map_err(|e| decode_failure(2, format!("bad function payload: {e}")))?;
    Ok(VenueFunction {
        venue_id: row.get(0)?,
        id: row.get(1)?,
        kind,
        created_at: parse_time(row, 3)?,
        updated_at: parse_time(row, 4)?,
    })
}

fn encode_kind(kind: &FunctionKind) -> EngineResult<String> {
    serde_json::to_string(kind)
        .map_err(|e| EngineError::Storage(format!("cannot encode function: {e}")))
}

fn read_response(row: &Row<'_>) -> rusqlite::Result<VolunteerResponse> {
    Ok(VolunteerResponse {
        id: row.get(0)?,
        key: read_key(row, 1, 6)?,
        volunteer_id: row.get(3)?,
        volunteer_name: row.get(4)?,
        volunteer_email: row.get(5)?,
        quantity_offered: row.get(8)?,
        message: row.get(9)?,
        status: parse_with(row, 10, "response status", ResponseStatus::parse)?,
        created_at: parse_time(row, 11)?,
    })
}

fn read_commitment(row: &Row<'_>) -> rusqlite::Result<BeneficiaryCommitment> {
    Ok(BeneficiaryCommitment {
        id: row.get(0)?,
        beneficiary_id: row.get(1)?,
        venue_id: row.get(2)?,
        function_id: row.get(3)?,
        status: parse_with(row, 4, "commitment status", CommitmentStatus::parse)?,
        created_at: parse_time(row, 5)?,
    })
}

fn read_status(row: &Row<'_>) -> rusqlite::Result<NeedStatusUpdate> {
    Ok(NeedStatusUpdate {
        id: row.get(0)?,
        key: read_key(row, 1, 3)?,
        status: parse_with(row, 5, "need status", NeedStatus::parse)?,
        updated_by: row.get(6)?,
        updated_at: parse_time(row, 7)?,
    })
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        info!("Opening SQLite store at {}", path.display());
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> EngineResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> EngineResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> EngineResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| EngineError::Storage("sqlite connection lock poisoned".to_string()))
    }
}

impl CategoryStore for SqliteStore {
    fn insert(&self, category: ItemCategory) -> EngineResult<()> {
        let conn = self.lock()?;
        let taken = conn
            .query_row(
                "SELECT 1 FROM categories WHERE id = ?1",
                params![category.id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if taken {
            return Err(EngineError::Conflict(format!(
                "category '{}' already exists",
                category.id
            )));
        }
        conn.execute(
            &format!("INSERT INTO categories ({CATEGORY_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
            params![
                category.id,
                category.name,
                category.parent_id,
                category.level,
                category.is_custom,
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: &str) -> EngineResult<Option<ItemCategory>> {
        let conn = self.lock()?;
        let category = conn
            .query_row(
                &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
                params![id],
                read_category,
            )
            .optional()?;
        Ok(category)
    }

    fn list(&self) -> EngineResult<Vec<ItemCategory>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY rowid"))?;
        let rows = stmt.query_map([], read_category)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn rename(&self, id: &str, name: &str) -> EngineResult<ItemCategory> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let changed = tx.execute(
            "UPDATE categories SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(EngineError::not_found("category", id));
        }
        let category = tx.query_row(
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
            params![id],
            read_category,
        )?;
        tx.commit()?;
        Ok(category)
    }
}

impl VenueStore for SqliteStore {
    fn insert_venue(&self, venue: Venue) -> EngineResult<()> {
        let conn = self.lock()?;
        let taken = conn
            .query_row("SELECT 1 FROM venues WHERE id = ?1", params![venue.id], |_| Ok(()))
            .optional()?
            .is_some();
        if taken {
            return Err(EngineError::Conflict(format!(
                "venue '{}' already exists",
                venue.id
            )));
        }
        conn.execute(
            &format!("INSERT INTO venues ({VENUE_COLUMNS}) VALUES (?1, ?2, ?3, ?4)"),
            params![
                venue.id,
                venue.name,
                venue.address,
                venue.created_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    fn get_venue(&self, venue_id: &str) -> EngineResult<Option<Venue>> {
        let conn = self.lock()?;
        let venue = conn
            .query_row(
                &format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?1"),
                params![venue_id],
                read_venue,
            )
            .optional()?;
        Ok(venue)
    }

    fn list_venues(&self) -> EngineResult<Vec<Venue>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY rowid"))?;
        let rows = stmt.query_map([], read_venue)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn insert_function(&self, function: VenueFunction) -> EngineResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let venue_exists = tx
            .query_row(
                "SELECT 1 FROM venues WHERE id = ?1",
                params![function.venue_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !venue_exists {
            return Err(EngineError::not_found("venue", &function.venue_id));
        }
        let taken = tx
            .query_row(
                "SELECT 1 FROM venue_functions WHERE venue_id = ?1 AND id = ?2",
                params![function.venue_id, function.id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if taken {
            return Err(EngineError::Conflict(format!(
                "function '{}' already exists",
                function.id
            )));
        }
        tx.execute(
            &format!("INSERT INTO venue_functions ({FUNCTION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
            params![
                function.venue_id,
                function.id,
                encode_kind(&function.kind)?,
                function.created_at.to_rfc3339(),
                function.updated_at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_function(
        &self,
        venue_id: &str,
        function_id: &str,
    ) -> EngineResult<Option<VenueFunction>> {
        let conn = self.lock()?;
        let function = conn
            .query_row(
                &format!(
                    "SELECT {FUNCTION_COLUMNS} FROM venue_functions WHERE venue_id = ?1 AND id = ?2"
                ),
                params![venue_id, function_id],
                read_function,
            )
            .optional()?;
        Ok(function)
    }

    fn list_functions(&self, venue_id: &str) -> EngineResult<Vec<VenueFunction>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {FUNCTION_COLUMNS} FROM venue_functions WHERE venue_id = ?1 ORDER BY rowid"
        ))?;
        let rows = stmt.query_map(params![venue_id], read_function)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn update_function(
        &self,
        venue_id: &str,
        function_id: &str,
        apply: &dyn Fn(&mut VenueFunction) -> EngineResult<()>,
    ) -> EngineResult<VenueFunction> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut function = tx
            .query_row(
                &format!(
                    "SELECT {FUNCTION_COLUMNS} FROM venue_functions WHERE venue_id = ?1 AND id = ?2"
                ),
                params![venue_id, function_id],
                read_function,
            )
            .optional()?
            .ok_or_else(|| EngineError::not_found("function", function_id))?;
        apply(&mut function)?;
        tx.execute(
            "UPDATE venue_functions SET kind = ?1, updated_at = ?2 WHERE venue_id = ?3 AND id = ?4",
            params![
                encode_kind(&function.kind)?,
                function.updated_at.to_rfc3339(),
                venue_id,
                function_id
            ],
        )?;
        tx.commit()?;
        Ok(function)
    }
}

impl ResponseStore for SqliteStore {
    fn append(&self, response: VolunteerResponse) -> EngineResult<()> {
        let conn = self.lock()?;
        let (target_kind, target_value) = target_columns(&response.key.target);
        conn.execute(
            &format!("INSERT INTO responses ({RESPONSE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"),
            params![
                response.id,
                response.key.venue_id,
                response.key.function_id,
                response.volunteer_id,
                response.volunteer_name,
                response.volunteer_email,
                target_kind,
                target_value,
                response.quantity_offered,
                response.message,
                response.status.as_str(),
                response.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: &str) -> EngineResult<Option<VolunteerResponse>> {
        let conn = self.lock()?;
        let response = conn
            .query_row(
                &format!("SELECT {RESPONSE_COLUMNS} FROM responses WHERE id = ?1"),
                params![id],
                read_response,
            )
            .optional()?;
        Ok(response)
    }

    fn list(&self, filter: &ResponseQuery) -> EngineResult<Vec<VolunteerResponse>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RESPONSE_COLUMNS} FROM responses
             WHERE (?1 IS NULL OR venue_id = ?1)
               AND (?2 IS NULL OR function_id = ?2)
               AND (?3 IS NULL OR volunteer_id = ?3)
             ORDER BY rowid"
        ))?;
        let rows = stmt.query_map(
            params![
                active_filter(&filter.venue_id),
                active_filter(&filter.function_id),
                active_filter(&filter.volunteer_id)
            ],
            read_response,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn transition(
        &self,
        id: &str,
        rule: TransitionRule<'_, VolunteerResponse, ResponseStatus>,
    ) -> EngineResult<VolunteerResponse> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut response = tx
            .query_row(
                &format!("SELECT {RESPONSE_COLUMNS} FROM responses WHERE id = ?1"),
                params![id],
                read_response,
            )
            .optional()?
            .ok_or_else(|| EngineError::not_found("response", id))?;
        response.status = rule(&response)?;
        tx.execute(
            "UPDATE responses SET status = ?1 WHERE id = ?2",
            params![response.status.as_str(), id],
        )?;
        tx.commit()?;
        Ok(response)
    }
}

impl CommitmentStore for SqliteStore {
    fn append(&self, commitment: BeneficiaryCommitment) -> EngineResult<()> {
        let conn = self.lock()?;
        conn.execute(
            &format!("INSERT INTO commitments ({COMMITMENT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            params![
                commitment.id,
                commitment.beneficiary_id,
                commitment.venue_id,
                commitment.function_id,
                commitment.status.as_str(),
                commitment.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn list(&self, filter: &CommitmentQuery) -> EngineResult<Vec<BeneficiaryCommitment>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COMMITMENT_COLUMNS} FROM commitments
             WHERE (?1 IS NULL OR venue_id = ?1)
               AND (?2 IS NULL OR function_id = ?2)
               AND (?3 IS NULL OR beneficiary_id = ?3)
             ORDER BY rowid"
        ))?;
        let rows = stmt.query_map(
            params![
                active_filter(&filter.venue_id),
                active_filter(&filter.function_id),
                active_filter(&filter.beneficiary_id)
            ],
            read_commitment,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn transition(
        &self,
        id: &str,
        rule: TransitionRule<'_, BeneficiaryCommitment, CommitmentStatus>,
    ) -> EngineResult<BeneficiaryCommitment> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut commitment = tx
            .query_row(
                &format!("SELECT {COMMITMENT_COLUMNS} FROM commitments WHERE id = ?1"),
                params![id],
                read_commitment,
            )
            .optional()?
            .ok_or_else(|| EngineError::not_found("commitment", id))?;
        commitment.status = rule(&commitment)?;
        tx.execute(
            "UPDATE commitments SET status = ?1 WHERE id = ?2",
            params![commitment.status.as_str(), id],
        )?;
        tx.commit()?;
        Ok(commitment)
    }
}

impl NeedStatusStore for SqliteStore {
    fn upsert(
        &self,
        key: &NeedKey,
        status: NeedStatus,
        updated_by: &str,
        at: DateTime<Utc>,
    ) -> EngineResult<NeedStatusUpdate> {
        let conn = self.lock()?;
        let (target_kind, target_value) = target_columns(&key.target);
        conn.execute(
            "INSERT INTO need_statuses
                 (id, venue_id, function_id, target_kind, target_value, status, updated_by, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT (venue_id, function_id, target_kind, target_value) DO UPDATE SET
                 status = excluded.status,
                 updated_by = excluded.updated_by,
                 updated_at = excluded.updated_at",
            params![
                Uuid::new_v4().to_string(),
                key.venue_id,
                key.function_id,
                target_kind,
                target_value,
                status.as_str(),
                updated_by,
                at.to_rfc3339(),
            ],
        )?;
        let update = conn.query_row(
            &format!(
                "SELECT {STATUS_COLUMNS} FROM need_statuses
                 WHERE venue_id = ?1 AND function_id = ?2 AND target_kind = ?3 AND target_value = ?4"
            ),
            params![key.venue_id, key.function_id, target_kind, target_value],
            read_status,
        )?;
        Ok(update)
    }

    fn get(&self, key: &NeedKey) -> EngineResult<Option<NeedStatusUpdate>> {
        let conn = self.lock()?;
        let (target_kind, target_value) = target_columns(&key.target);
        let update = conn
            .query_row(
                &format!(
                    "SELECT {STATUS_COLUMNS} FROM need_statuses
                     WHERE venue_id = ?1 AND function_id = ?2 AND target_kind = ?3 AND target_value = ?4"
                ),
                params![key.venue_id, key.function_id, target_kind, target_value],
                read_status,
            )
            .optional()?;
        Ok(update)
    }

    fn list(&self, scope: &NeedStatusQuery) -> EngineResult<Vec<NeedStatusUpdate>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {STATUS_COLUMNS} FROM need_statuses
             WHERE (?1 IS NULL OR venue_id = ?1)
               AND (?2 IS NULL OR function_id = ?2)
             ORDER BY rowid"
        ))?;
        let rows = stmt.query_map(
            params![active_filter(&scope.venue_id), active_filter(&scope.function_id)],
            read_status,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
