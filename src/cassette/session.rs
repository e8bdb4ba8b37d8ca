//! Recording session: one cassette shared by every recording adapter.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::warn;

use super::recorder::CassetteRecorder;

/// Owns the recorder for one command run.
///
/// Every port writes to the same cassette so the file holds the whole
/// session in call order. The cassette lands at
/// `<dir>/<timestamp>.cassette.yaml`.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
    path: PathBuf,
}

impl RecordingSession {
    /// Starts a session writing under `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a cassette
    /// with the same timestamp already exists.
    pub fn new(dir: &Path, name: &str) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let path = dir.join(format!("{timestamp}.cassette.yaml"));

        if path.exists() {
            return Err(format!("Cassette already exists: {}", path.display()));
        }
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create cassette directory {}: {e}", dir.display()))?;

        let recorder = CassetteRecorder::new(&path, format!("{name}-{timestamp}"), commit_hash());
        Ok(Self { recorder: Arc::new(Mutex::new(recorder)), path })
    }

    /// Handle for recording adapters.
    #[must_use]
    pub fn recorder(&self) -> Arc<Mutex<CassetteRecorder>> {
        Arc::clone(&self.recorder)
    }

    /// Cassette file this session will write.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the cassette.
    ///
    /// Every adapter holding a recorder handle must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if a handle is still alive or the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapters still hold the recorder".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

/// Current git commit hash, or `unknown` outside a repository.
fn commit_hash() -> String {
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    hash.unwrap_or_else(|| {
        warn!("could not read git commit hash, recording 'unknown'");
        "unknown".to_string()
    })
}
