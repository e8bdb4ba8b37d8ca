//! Port implementations: live, in-memory, recording, and replaying.

pub mod live;
pub mod memory;
pub mod recording;
pub mod replaying;
