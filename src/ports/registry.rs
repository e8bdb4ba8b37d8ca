//! Registry port: the persistence store that owns issued codes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::code::{Code, EntityKind, Scope};
use crate::error::{InsertError, StoreError};

/// A row about to be inserted with its freshly generated code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntity {
    /// Kind of record.
    pub kind: EntityKind,
    /// Generated code.
    pub code: Code,
    /// Uniqueness boundary the code was checked in.
    pub scope: Scope,
    /// Free-form caller label (student name, route, ...).
    pub label: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A stored record and its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Store-assigned row identifier.
    pub id: Uuid,
    /// Kind of record.
    pub kind: EntityKind,
    /// The record's code. Never changes.
    pub code: Code,
    /// Owning school, `None` for globally scoped rows.
    pub tenant: Option<String>,
    /// Free-form caller label.
    pub label: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// When the record was deleted. Its code stays taken.
    pub retired_at: Option<DateTime<Utc>>,
}

impl EntityRecord {
    /// Returns `true` if this row occupies `code` for a lookup in `scope`.
    ///
    /// A global lookup sees every tenant. A tenant lookup sees that tenant's
    /// rows and globally scoped rows.
    #[must_use]
    pub fn occupies(&self, kind: EntityKind, code: &Code, scope: &Scope) -> bool {
        if self.kind != kind || &self.code != code {
            return false;
        }
        match scope {
            Scope::Global => true,
            Scope::Tenant(id) => self.tenant.as_deref().map_or(true, |t| t == id),
        }
    }

    /// Returns `true` until the record is retired.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.retired_at.is_none()
    }
}

/// Criteria for [`CodeRegistry::list`]. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Only rows of this kind.
    pub kind: Option<EntityKind>,
    /// Only rows owned by this tenant.
    pub tenant: Option<String>,
}

impl RecordFilter {
    /// Returns `true` if `record` passes the filter.
    #[must_use]
    pub fn matches(&self, record: &EntityRecord) -> bool {
        self.kind.map_or(true, |k| k == record.kind)
            && self.tenant.as_deref().map_or(true, |t| record.tenant.as_deref() == Some(t))
    }

    /// Rejects a blank tenant filter.
    ///
    /// # Errors
    ///
    /// Returns the same message as [`Scope::check`].
    pub fn check(&self) -> Result<(), String> {
        self.tenant.as_deref().map_or(Ok(()), |t| Scope::tenant(t).check())
    }
}

/// Keyed access to every issued code.
///
/// `exists` and `insert` are separate calls, so a concurrent caller can take
/// a code in between. `insert` must enforce uniqueness itself and report
/// that case as [`InsertError::DuplicateKey`].
pub trait CodeRegistry: Send + Sync {
    /// Returns `true` if `code` is taken for `kind` within `scope`, retired rows included.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the lookup fails.
    fn exists(&self, kind: EntityKind, code: &Code, scope: &Scope) -> Result<bool, StoreError>;

    /// Inserts a record, assigning its row id.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::DuplicateKey`] if the code is already taken in
    /// the entity's scope, or [`InsertError::Store`] if the write fails.
    fn insert(&self, entity: &NewEntity) -> Result<EntityRecord, InsertError>;

    /// Marks the active record holding `code` as retired.
    ///
    /// Returns `false` if no active record matched.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the update fails.
    fn retire(
        &self,
        kind: EntityKind,
        code: &Code,
        scope: &Scope,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Lists records matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the query fails.
    fn list(&self, filter: &RecordFilter) -> Result<Vec<EntityRecord>, StoreError>;
}

impl<T: CodeRegistry + ?Sized> CodeRegistry for Arc<T> {
    fn exists(&self, kind: EntityKind, code: &Code, scope: &Scope) -> Result<bool, StoreError> {
        (**self).exists(kind, code, scope)
    }

    fn insert(&self, entity: &NewEntity) -> Result<EntityRecord, InsertError> {
        (**self).insert(entity)
    }

    fn retire(
        &self,
        kind: EntityKind,
        code: &Code,
        scope: &Scope,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        (**self).retire(kind, code, scope, at)
    }

    fn list(&self, filter: &RecordFilter) -> Result<Vec<EntityRecord>, StoreError> {
        (**self).list(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tenant: Option<&str>) -> EntityRecord {
        EntityRecord {
            id: Uuid::nil(),
            kind: EntityKind::Class,
            code: Code::from_trusted("CLS10A24001".into()),
            tenant: tenant.map(String::from),
            label: None,
            created_at: Utc::now(),
            retired_at: None,
        }
    }

    #[test]
    fn tenant_row_is_invisible_to_other_tenants() {
        let row = record(Some("school-a"));
        let code = row.code.clone();
        assert!(row.occupies(EntityKind::Class, &code, &Scope::tenant("school-a")));
        assert!(!row.occupies(EntityKind::Class, &code, &Scope::tenant("school-b")));
        assert!(row.occupies(EntityKind::Class, &code, &Scope::Global));
    }

    #[test]
    fn global_row_is_visible_to_every_tenant() {
        let row = record(None);
        let code = row.code.clone();
        assert!(row.occupies(EntityKind::Class, &code, &Scope::tenant("school-b")));
        assert!(!row.occupies(EntityKind::Batch, &code, &Scope::Global));
    }

    #[test]
    fn filter_matches_kind_and_tenant() {
        let row = record(Some("school-a"));
        assert!(RecordFilter::default().matches(&row));
        assert!(RecordFilter { kind: Some(EntityKind::Class), tenant: None }.matches(&row));
        assert!(!RecordFilter { kind: Some(EntityKind::Bus), tenant: None }.matches(&row));
        assert!(!RecordFilter { kind: None, tenant: Some("school-b".into()) }.matches(&row));
    }
}
