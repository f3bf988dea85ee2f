//! Database layer - session factory, schema, seed and repositories
//!
//! # Design Principles
//!
//! - One `Database` handle, built explicitly and passed down (no global)
//! - Scoped sessions that always return their connection
//! - Constraint violations surface as typed errors, never swallowed
//! - Transactions for multi-step operations

pub mod error;
pub mod pool;
pub mod repos;
pub mod schema;
pub mod seed;

pub use error::DbError;
pub use pool::{Database, Session};
