//! In-process `CodeRegistry` backed by a vector.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::code::{Code, EntityKind, Scope};
use crate::error::{InsertError, StoreError};
use crate::ports::{CodeRegistry, EntityRecord, NewEntity, RecordFilter};

/// Registry that keeps every record in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    records: Mutex<Vec<EntityRecord>>,
}

impl MemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<EntityRecord>>, StoreError> {
        self.records.lock().map_err(|_| StoreError::Unavailable("registry lock poisoned".into()))
    }
}

impl CodeRegistry for MemoryRegistry {
    fn exists(&self, kind: EntityKind, code: &Code, scope: &Scope) -> Result<bool, StoreError> {
        scope.check().map_err(StoreError::InvalidScope)?;
        Ok(self.lock()?.iter().any(|r| r.occupies(kind, code, scope)))
    }

    fn insert(&self, entity: &NewEntity) -> Result<EntityRecord, InsertError> {
        entity.scope.check().map_err(StoreError::InvalidScope)?;
        let mut records = self.lock()?;
        if records.iter().any(|r| r.occupies(entity.kind, &entity.code, &entity.scope)) {
            return Err(InsertError::DuplicateKey {
                kind: entity.kind,
                code: entity.code.to_string(),
            });
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
        records.push(record.clone());
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
        let mut records = self.lock()?;
        let owner = scope.tenant_id();
        let mut retired = false;
        for record in records.iter_mut().filter(|r| {
            r.kind == kind && &r.code == code && r.tenant.as_deref() == owner && r.is_active()
        }) {
            record.retired_at = Some(at);
            retired = true;
        }
        Ok(retired)
    }

    fn list(&self, filter: &RecordFilter) -> Result<Vec<EntityRecord>, StoreError> {
        filter.check().map_err(StoreError::InvalidScope)?;
        Ok(self.lock()?.iter().filter(|r| filter.matches(r)).cloned().collect())
    }
}
