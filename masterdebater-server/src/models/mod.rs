//! Validated values for the write paths
//!
//! Invalid input returns ValidationError at construction, before any
//! statement reaches the store.

pub mod validation;
pub mod email;
pub mod text;

pub use validation::ValidationError;
pub use email::Email;
pub use text::{DebateTitle, MemoryKey, Username};
