//! Database query modules.

pub mod decisions;
pub mod events;
