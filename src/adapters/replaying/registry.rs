//! Replaying adapter for the `CodeRegistry` port.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::code::{Code, EntityKind, Scope};
use crate::error::{InsertError, StoreError};
use crate::ports::{CodeRegistry, EntityRecord, NewEntity, RecordFilter};

/// Serves recorded registry results, recorded store failures included.
pub struct ReplayingRegistry {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingRegistry {
    /// Creates a registry reading from `replayer`.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl CodeRegistry for ReplayingRegistry {
    fn exists(&self, _kind: EntityKind, _code: &Code, _scope: &Scope) -> Result<bool, StoreError> {
        replay_result(&self.replayer, "registry", "exists")
    }

    fn insert(&self, _entity: &NewEntity) -> Result<EntityRecord, InsertError> {
        replay_result(&self.replayer, "registry", "insert")
    }

    fn retire(
        &self,
        _kind: EntityKind,
        _code: &Code,
        _scope: &Scope,
        _at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        replay_result(&self.replayer, "registry", "retire")
    }

    fn list(&self, _filter: &RecordFilter) -> Result<Vec<EntityRecord>, StoreError> {
        replay_result(&self.replayer, "registry", "list")
    }
}
