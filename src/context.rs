//! Service context bundling the port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::{LiveClock, OsEntropy, SqliteRegistry};
use crate::adapters::memory::MemoryRegistry;
use crate::adapters::recording::{RecordingClock, RecordingEntropy, RecordingRegistry};
use crate::adapters::replaying::{ReplayingClock, ReplayingEntropy, ReplayingRegistry};
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::ports::{Clock, CodeRegistry, Entropy};

/// Bundles every port the generator touches.
///
/// Constructors wire up different adapter sets (live, in-memory,
/// recording, replaying).
pub struct ServiceContext {
    /// Source of the current time for date segments and timestamps.
    pub clock: Box<dyn Clock>,
    /// Source of random tails.
    pub entropy: Box<dyn Entropy>,
    /// Store that owns issued codes.
    pub registry: Box<dyn CodeRegistry>,
}

impl ServiceContext {
    /// Live adapters over the SQLite registry described by `store`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the database cannot be opened.
    pub fn live(store: &StoreConfig) -> Result<Self, StoreError> {
        let registry = SqliteRegistry::open(&store.path, store.busy_timeout())?;
        Ok(Self {
            clock: Box::new(LiveClock),
            entropy: Box::new(OsEntropy::new()),
            registry: Box::new(registry),
        })
    }

    /// Live clock and entropy over an empty in-process registry.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            clock: Box::new(LiveClock),
            entropy: Box::new(OsEntropy::new()),
            registry: Box::new(MemoryRegistry::new()),
        }
    }

    /// Wraps every port so its calls are written to `recorder`.
    #[must_use]
    pub fn recording(self, recorder: &Arc<Mutex<CassetteRecorder>>) -> Self {
        Self {
            clock: Box::new(RecordingClock::new(self.clock, Arc::clone(recorder))),
            entropy: Box::new(RecordingEntropy::new(self.entropy, Arc::clone(recorder))),
            registry: Box::new(RecordingRegistry::new(self.registry, Arc::clone(recorder))),
        }
    }

    /// Replays a recorded session from a cassette file.
    ///
    /// Each port gets its own replayer over the same cassette so per-port
    /// cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette = Cassette::from_yaml(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(Self::from_cassette(&cassette))
    }

    /// Replays an already loaded cassette.
    #[must_use]
    pub fn from_cassette(cassette: &Cassette) -> Self {
        Self {
            clock: Box::new(ReplayingClock::new(CassetteReplayer::new(cassette))),
            entropy: Box::new(ReplayingEntropy::new(CassetteReplayer::new(cassette))),
            registry: Box::new(ReplayingRegistry::new(CassetteReplayer::new(cassette))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use crate::code::{Code, CodeGenerator, EntityKind, GenerationRequest, Scope};
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: port.into(), method: method.into(), input: json!(null), output }
    }

    #[test]
    fn replaying_context_reproduces_a_fee_code() {
        let dir = std::env::temp_dir().join("schoolcode_ctx_replay_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fee.cassette.yaml");
        let cassette = Cassette {
            name: "fee".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions: vec![
                interaction(0, "clock", "now", json!("2024-06-15T10:30:00Z")),
                interaction(1, "entropy", "pick", json!(10)),
                interaction(2, "entropy", "pick", json!(11)),
                interaction(3, "entropy", "pick", json!(0)),
                interaction(4, "entropy", "pick", json!(1)),
                interaction(5, "registry", "exists", json!({"Ok": false})),
            ],
        };
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();
        let request = GenerationRequest::new(EntityKind::Fee);
        let code = CodeGenerator::new(&ctx).generate(&request).unwrap();

        assert_eq!(code.as_str(), "FEE202406AB01");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_cassette_is_an_error() {
        let path = std::env::temp_dir().join("schoolcode_no_such.cassette.yaml");
        let err = ServiceContext::replaying(&path).err().unwrap();
        assert!(err.starts_with("Failed to read cassette file"));
    }

    #[test]
    fn live_context_opens_database_file() {
        let dir = std::env::temp_dir().join("schoolcode_ctx_live_test");
        let _ = std::fs::remove_dir_all(&dir);
        let store = StoreConfig { path: dir.join("codes.sqlite3"), busy_timeout_ms: 100 };

        let ctx = ServiceContext::live(&store).unwrap();
        let code = Code::parse(EntityKind::Student, "STU12345678").unwrap();
        assert!(!ctx.registry.exists(EntityKind::Student, &code, &Scope::Global).unwrap());
        assert!(store.path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
