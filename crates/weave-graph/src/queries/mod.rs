//! Read-only graph queries. Each is a single round trip, decoded into the
//! types in [`crate::model`].

pub mod causality;
pub mod impact;
pub mod related;
pub mod search;
pub mod stats;
pub mod timeline;
