//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool; identifiers and timestamps are generated here
//! - Uses JOINs for reverse navigation (no back-pointers, no N+1)
//! - Lets constraints reject conflicts (no check-then-insert)
//! - Uses transactions for multi-row writes

pub mod checkpoints;
pub mod comments;
pub mod debates;
pub mod formats;
pub mod llm_configs;
pub mod memory;
pub mod participants;
pub mod scoring;
pub mod turns;
pub mod users;

pub use checkpoints::{Checkpoint, CheckpointRepo};
pub use comments::{CommentRepo, ModeratorComment};
pub use debates::{Debate, DebateRepo, NewDebate, STATUS_COMPLETED, STATUS_PENDING};
pub use formats::{DebateFormat, FormatPhase, FormatRepo, NewFormat, NewPhase};
pub use llm_configs::{LlmConfig, LlmConfigRepo, NewLlmConfig};
pub use memory::{MemoryEntry, MemoryRepo};
pub use participants::{Participant, ParticipantRepo, ParticipantWithUser};
pub use scoring::{CriteriaScoreDetail, DebateScore, ScoringCriterion, ScoringRepo};
pub use turns::{NewTurn, Turn, TurnRepo};
pub use users::{NewUser, User, UserRepo};
