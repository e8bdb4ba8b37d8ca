//! SQLite-backed `CodeRegistry`.
//!
//! One table holds every issued code. `UNIQUE(kind, tenant, code)` is the
//! insert-time backstop; globally scoped rows use the empty string as their
//! tenant, so blank tenant ids are refused before any query. Inserts run in
//! an immediate transaction so the scope check and the write see the same
//! snapshot.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, TransactionBehavior};
use tracing::debug;
use uuid::Uuid;

use crate::code::{Code, EntityKind, Scope};
use crate::error::{InsertError, StoreError};
use crate::ports::{CodeRegistry, EntityRecord, NewEntity, RecordFilter};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS entity_codes(
        id TEXT PRIMARY KEY,
        kind TEXT NOT NULL,
        tenant TEXT NOT NULL DEFAULT '',
        code TEXT NOT NULL,
        label TEXT,
        created_at TEXT NOT NULL,
        retired_at TEXT,
        UNIQUE(kind, tenant, code)
    );
    CREATE INDEX IF NOT EXISTS idx_entity_codes_kind_code ON entity_codes(kind, code);
";

const EXISTS_GLOBAL: &str = "SELECT 1 FROM entity_codes WHERE kind = ?1 AND code = ?2 LIMIT 1";

const EXISTS_IN_TENANT: &str =
    "SELECT 1 FROM entity_codes WHERE kind = ?1 AND code = ?2 AND tenant IN (?3, '') LIMIT 1";

/// Code registry stored in a SQLite database file.
pub struct SqliteRegistry {
    conn: Mutex<Connection>,
}

impl SqliteRegistry {
    /// Opens (creating if needed) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the file cannot be opened or migrated.
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(unavailable)?;
        }
        let conn = Connection::open(path).map_err(unavailable)?;
        conn.busy_timeout(busy_timeout).map_err(unavailable)?;
        debug!(path = %path.display(), "opened code registry");
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory().map_err(unavailable)?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(unavailable)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Unavailable("registry lock poisoned".into()))
    }
}

impl CodeRegistry for SqliteRegistry {
    fn exists(&self, kind: EntityKind, code: &Code, scope: &Scope) -> Result<bool, StoreError> {
        scope.check().map_err(StoreError::InvalidScope)?;
        let conn = self.lock()?;
        code_taken(&conn, kind, code, scope).map_err(unavailable)
    }

    fn insert(&self, entity: &NewEntity) -> Result<EntityRecord, InsertError> {
        entity.scope.check().map_err(StoreError::InvalidScope)?;
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(unavailable)?;

        if code_taken(&tx, entity.kind, &entity.code, &entity.scope).map_err(unavailable)? {
            return Err(duplicate(entity));
        }

        let record = EntityRecord {
            id: Uuid::new_v4(),
            kind: entity.kind,
            code: entity.code.clone(),
            tenant: entity.scope.tenant_id().map(String::from),
            label: entity.label.clone(),
            created_at: entity.created_at,
            retired_at: None,
        };
        let inserted = tx.execute(
            "INSERT INTO entity_codes(id, kind, tenant, code, label, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id.to_string(),
                record.kind.as_str(),
                record.tenant.as_deref().unwrap_or(""),
                record.code.as_str(),
                record.label,
                record.created_at.to_rfc3339(),
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                return Err(duplicate(entity));
            }
            Err(err) => return Err(unavailable(err).into()),
        }
        tx.commit().map_err(unavailable)?;
        Ok(record)
    }

    fn retire(
        &self,
        kind: EntityKind,
        code: &Code,
        scope: &Scope,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        scope.check().map_err(StoreError::InvalidScope)?;
        let conn = self.lock()?;
        let updated = conn
            .execute(
                "UPDATE entity_codes SET retired_at = ?4
                 WHERE kind = ?1 AND code = ?2 AND tenant = ?3 AND retired_at IS NULL",
                params![kind.as_str(), code.as_str(), scope.tenant_id().unwrap_or(""), at.to_rfc3339()],
            )
            .map_err(unavailable)?;
        Ok(updated > 0)
    }

    fn list(&self, filter: &RecordFilter) -> Result<Vec<EntityRecord>, StoreError> {
        filter.check().map_err(StoreError::InvalidScope)?;
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, kind, tenant, code, label, created_at, retired_at
                 FROM entity_codes
                 WHERE (?1 IS NULL OR kind = ?1) AND (?2 IS NULL OR tenant = ?2)
                 ORDER BY created_at, rowid",
            )
            .map_err(unavailable)?;
        let rows = stmt
            .query_map(params![filter.kind.map(EntityKind::as_str), filter.tenant.as_deref()], |row| {
                Ok(RawRow {
                    id: row.get(0)?,
                    kind: row.get(1)?,
                    tenant: row.get(2)?,
                    code: row.get(3)?,
                    label: row.get(4)?,
                    created_at: row.get(5)?,
                    retired_at: row.get(6)?,
                })
            })
            .map_err(unavailable)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(unavailable)?;
        rows.into_iter().map(RawRow::into_record).collect()
    }
}

/// Row as stored, before decoding.
struct RawRow {
    id: String,
    kind: String,
    tenant: String,
    code: String,
    label: Option<String>,
    created_at: String,
    retired_at: Option<String>,
}

impl RawRow {
    fn into_record(self) -> Result<EntityRecord, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Corrupt(format!("row id {}: {e}", self.id)))?;
        let kind: EntityKind = self.kind.parse().map_err(StoreError::Corrupt)?;
        Ok(EntityRecord {
            id,
            kind,
            code: Code::from_trusted(self.code),
            tenant: Some(self.tenant).filter(|t| !t.is_empty()),
            label: self.label,
            created_at: parse_time(&self.created_at)?,
            retired_at: self.retired_at.as_deref().map(parse_time).transpose()?,
        })
    }
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("timestamp {value}: {e}")))
}

fn code_taken(
    conn: &Connection,
    kind: EntityKind,
    code: &Code,
    scope: &Scope,
) -> rusqlite::Result<bool> {
    let found = match scope {
        Scope::Global => conn
            .query_row(EXISTS_GLOBAL, params![kind.as_str(), code.as_str()], |_| Ok(()))
            .optional()?,
        Scope::Tenant(tenant) => conn
            .query_row(EXISTS_IN_TENANT, params![kind.as_str(), code.as_str(), tenant], |_| Ok(()))
            .optional()?,
    };
    Ok(found.is_some())
}

fn duplicate(entity: &NewEntity) -> InsertError {
    InsertError::DuplicateKey { kind: entity.kind, code: entity.code.to_string() }
}

#[allow(clippy::needless_pass_by_value)]
fn unavailable(err: impl std::fmt::Display) -> StoreError {
    StoreError::Unavailable(err.to_string())
}
