//! Cassettes: YAML recordings of port interactions for exact replay.

pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
