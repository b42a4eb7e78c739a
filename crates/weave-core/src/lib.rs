//! # Weave Core
//!
//! Domain models and business logic for ContextWeave: decisions, the events
//! recorded against them, and aggregate analytics over the primary store.

pub mod analytics;
pub mod decision;
pub mod error;
pub mod event;
pub mod page;

pub use error::{WeaveError, WeaveResult};
pub use page::Page;
