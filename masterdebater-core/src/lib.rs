//! masterdebater-core: shared vocabulary for the debate store
//!
//! Nothing here touches the database. The server crate maps these types
//! onto columns.

pub mod config;
pub mod error;
pub mod payload;
pub mod seed;
pub mod vocab;

pub use config::{DatabaseConfig, MasterDebaterConfig, ServerSection};
pub use error::{DebateError, Result};
pub use payload::{
    CheckpointData, JsonColumn, PhaseList, SamplingParams, TurnLimits, CHECKPOINT_VERSION,
};
pub use vocab::{ConfigRole, FormatStructure, Side, WinnerSide};
