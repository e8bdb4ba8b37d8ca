//! Recording adapter for the `Entropy` port.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::Entropy;

/// Records every draw while delegating to an inner source.
pub struct RecordingEntropy {
    inner: Box<dyn Entropy>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingEntropy {
    /// Wraps `inner`.
    pub fn new(inner: Box<dyn Entropy>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Entropy for RecordingEntropy {
    fn pick(&self, bound: usize) -> usize {
        let result = self.inner.pick(bound);
        record_interaction(&self.recorder, "entropy", "pick", &json!({ "bound": bound }), &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::SeededEntropy;

    #[test]
    fn records_bound_and_draw() {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new("unused", "test", "abc")));
        let entropy = RecordingEntropy::new(Box::new(SeededEntropy::new(7)), Arc::clone(&recorder));

        let drawn: Vec<usize> = (0..3).map(|_| entropy.pick(10)).collect();
        drop(entropy);

        let expected: Vec<usize> = {
            let seeded = SeededEntropy::new(7);
            (0..3).map(|_| seeded.pick(10)).collect()
        };
        assert_eq!(drawn, expected);
        assert_eq!(recorder.lock().unwrap().len(), 3);
    }
}
