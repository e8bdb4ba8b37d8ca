//! Clock port for obtaining the current time.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Dated code segments (`yy`, `yyyy`, `mm`) and record timestamps read the
/// clock through this trait so a session can be replayed with the same dates.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
