//! Replaying adapters: answer port calls from a recorded cassette.

pub mod clock;
pub mod entropy;
pub mod registry;

pub use clock::ReplayingClock;
pub use entropy::ReplayingEntropy;
pub use registry::ReplayingRegistry;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::StoreError;

/// Output of the next recorded `port`/`method` call.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_interaction(port, method).output
}

/// Decodes a recorded `{"Ok": v}` / `{"Err": e}` output.
///
/// An undecodable entry becomes [`StoreError::Corrupt`] so callers see a
/// store failure rather than a panic.
pub(crate) fn replay_result<T, E>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<T, E>
where
    T: DeserializeOwned,
    E: DeserializeOwned + From<StoreError>,
{
    let output = next_output(replayer, port, method);
    serde_json::from_value::<Result<T, E>>(output).unwrap_or_else(|e| {
        Err(StoreError::Corrupt(format!("{port}::{method}: unreadable cassette entry: {e}")).into())
    })
}
