//! # Weave DB
//!
//! SQLite primary store for ContextWeave. This is the system of record for
//! decisions and their events; the graph store only ever holds a mirrored copy.

pub mod migrations;
pub mod pool;
pub mod queries;

pub use migrations::run_migrations;
pub use pool::{DbError, DbPool, DbResult};
pub use rusqlite;

use std::path::Path;

/// Open the database at `path` and bring its schema up to date.
pub fn init_pool(path: &Path) -> DbResult<DbPool> {
    let pool = DbPool::open(path)?;
    run_migrations(&pool)?;
    Ok(pool)
}
