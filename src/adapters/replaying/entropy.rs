//! Replaying adapter for the `Entropy` port.

use std::sync::Mutex;

use super::next_output;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::Entropy;

/// Serves recorded draws.
pub struct ReplayingEntropy {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingEntropy {
    /// Creates an entropy source reading from `replayer`.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Entropy for ReplayingEntropy {
    fn pick(&self, bound: usize) -> usize {
        let output = next_output(&self.replayer, "entropy", "pick");
        let value = output
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
            .expect("entropy::pick: expected unsigned integer output");
        assert!(value < bound, "entropy::pick: recorded {value} is out of range for bound {bound}");
        value
    }
}
