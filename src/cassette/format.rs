//! Cassette data structures for recording and replaying interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded call on a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (`clock`, `entropy`, `registry`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Arguments of the call.
    pub input: serde_json::Value,
    /// Value the port returned. Fallible methods use `{"Ok": ..}` / `{"Err": ..}`.
    pub output: serde_json::Value,
}

/// A recorded session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Git commit hash at recording time, or `unknown`.
    pub commit: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Parses a cassette from YAML text.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if `text` is not a cassette.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Number of interactions recorded for `port`.
    #[must_use]
    pub fn count(&self, port: &str) -> usize {
        self.interactions.iter().filter(|i| i.port == port).count()
    }
}
