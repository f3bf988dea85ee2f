//! Closed vocabularies stored as text columns
//!
//! Each enum round-trips through its lowercase column value via
//! `as_str()` / `FromStr`. Unknown values are an error, not a default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DebateError;

/// Side a participant takes in a debate (`debate_participants.side`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Affirmative,
    Negative,
    Moderator,
    Judge,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Affirmative => "affirmative",
            Self::Negative => "negative",
            Self::Moderator => "moderator",
            Self::Judge => "judge",
        }
    }

    /// Debating sides, as opposed to officiating ones.
    pub fn is_debater(&self) -> bool {
        matches!(self, Self::Affirmative | Self::Negative)
    }
}

impl FromStr for Side {
    type Err = DebateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "affirmative" => Ok(Self::Affirmative),
            "negative" => Ok(Self::Negative),
            "moderator" => Ok(Self::Moderator),
            "judge" => Ok(Self::Judge),
            other => Err(DebateError::invalid_variant("side", other)),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Judge verdict (`debate_scores.winner_side`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinnerSide {
    Affirmative,
    Negative,
    Tie,
}

impl WinnerSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Affirmative => "affirmative",
            Self::Negative => "negative",
            Self::Tie => "tie",
        }
    }
}

impl FromStr for WinnerSide {
    type Err = DebateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "affirmative" => Ok(Self::Affirmative),
            "negative" => Ok(Self::Negative),
            "tie" => Ok(Self::Tie),
            other => Err(DebateError::invalid_variant("winner side", other)),
        }
    }
}

impl fmt::Display for WinnerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How rigidly a format's phases are enforced (`debate_formats.structure`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatStructure {
    Strict,
    Flexible,
}

impl FormatStructure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Flexible => "flexible",
        }
    }
}

impl FromStr for FormatStructure {
    type Err = DebateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "flexible" => Ok(Self::Flexible),
            other => Err(DebateError::invalid_variant("structure", other)),
        }
    }
}

impl fmt::Display for FormatStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role an LLM configuration is intended for (`llm_configs.role`)
///
/// `General` configs carry a prompt that branches on the role at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigRole {
    Debater,
    Judge,
    Moderator,
    General,
}

impl ConfigRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debater => "debater",
            Self::Judge => "judge",
            Self::Moderator => "moderator",
            Self::General => "general",
        }
    }
}

impl FromStr for ConfigRole {
    type Err = DebateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debater" => Ok(Self::Debater),
            "judge" => Ok(Self::Judge),
            "moderator" => Ok(Self::Moderator),
            "general" => Ok(Self::General),
            other => Err(DebateError::invalid_variant("config role", other)),
        }
    }
}

impl fmt::Display for ConfigRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
