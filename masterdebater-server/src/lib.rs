//! masterdebater-server: debate transcript store and HTTP liveness
//!
//! Holds the SQLite session factory, the schema and seed migrations, the
//! per-entity repositories, and the axum server exposing `GET /ping`.

pub mod db;
pub mod http;
pub mod models;

pub use db::{Database, DbError, Session};
pub use http::{run_server, ServerConfig, ServerError};
