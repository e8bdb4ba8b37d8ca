//! Recording adapters: delegate to a real port and capture every call.

pub mod clock;
pub mod entropy;
pub mod registry;

pub use clock::RecordingClock;
pub use entropy::RecordingEntropy;
pub use registry::RecordingRegistry;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Records one call whose return value is serialized as-is.
///
/// Fallible methods pass their `Result` here too: serde writes it as
/// `{"Ok": v}` or `{"Err": e}`, which is what `replaying::next_output`
/// decodes on the way back.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize + ?Sized,
    O: Serialize + ?Sized,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");
    let output_json = serde_json::to_value(output).expect("failed to serialize recording output");

    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, input_json, output_json);
}
