//! Live adapters for real external interactions.

pub mod clock;
pub mod entropy;
pub mod registry;

pub use clock::LiveClock;
pub use entropy::{OsEntropy, SeededEntropy};
pub use registry::SqliteRegistry;
