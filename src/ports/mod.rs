//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between code generation and an
//! external system (time, randomness, the record store).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod entropy;
pub mod registry;

pub use clock::Clock;
pub use entropy::Entropy;
pub use registry::{CodeRegistry, EntityRecord, NewEntity, RecordFilter};
