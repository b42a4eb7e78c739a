//! # Weave Graph
//!
//! Neo4j mirror of the primary store plus the temporal queries that run
//! against it.
//!
//! The relational store stays authoritative. Writes there are followed by an
//! explicit, synchronous mirror call ([`GraphService::mirror_decision`],
//! [`GraphService::mirror_event`]) that upserts nodes and `HAS_EVENT` edges.
//! Read queries go straight to the graph, so a failed or missing mirror shows
//! up as empty results rather than an error.

pub mod client;
pub mod error;
pub mod memory;
pub mod model;
pub mod queries;
pub mod schema;
pub mod service;
pub mod store;
pub mod sync;

pub use client::{GraphBackend, GraphClient, GraphConfig};
pub use error::{DepthError, GraphError, GraphResult};
pub use memory::InMemoryGraph;
pub use model::*;
pub use service::GraphService;
pub use store::GraphStore;
pub use sync::{PrimaryStore, SyncOutcome, SyncReport, SyncTarget};
