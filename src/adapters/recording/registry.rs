//! Recording adapter for the `CodeRegistry` port.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::json;

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::code::{Code, EntityKind, Scope};
use crate::error::{InsertError, StoreError};
use crate::ports::{CodeRegistry, EntityRecord, NewEntity, RecordFilter};

/// Records registry calls and their results, errors included.
pub struct RecordingRegistry {
    inner: Box<dyn CodeRegistry>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingRegistry {
    /// Wraps `inner`.
    pub fn new(inner: Box<dyn CodeRegistry>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl CodeRegistry for RecordingRegistry {
    fn exists(&self, kind: EntityKind, code: &Code, scope: &Scope) -> Result<bool, StoreError> {
        let result = self.inner.exists(kind, code, scope);
        let input = json!({ "kind": kind, "code": code, "scope": scope });
        record_interaction(&self.recorder, "registry", "exists", &input, &result);
        result
    }

    fn insert(&self, entity: &NewEntity) -> Result<EntityRecord, InsertError> {
        let result = self.inner.insert(entity);
        record_interaction(&self.recorder, "registry", "insert", entity, &result);
        result
    }

    fn retire(
        &self,
        kind: EntityKind,
        code: &Code,
        scope: &Scope,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = self.inner.retire(kind, code, scope, at);
        let input = json!({ "kind": kind, "code": code, "scope": scope, "at": at });
        record_interaction(&self.recorder, "registry", "retire", &input, &result);
        result
    }

    fn list(&self, filter: &RecordFilter) -> Result<Vec<EntityRecord>, StoreError> {
        let result = self.inner.list(filter);
        record_interaction(&self.recorder, "registry", "list", filter, &result);
        result
    }
}
