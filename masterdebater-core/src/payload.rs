//! Typed payloads for the JSON-shaped text columns
//!
//! - `debate_formats.phases`       -> [`PhaseList`]
//! - `debate_formats.turn_limits`  -> [`TurnLimits`]
//! - `llm_configs.other_params`    -> [`SamplingParams`]
//! - `debate_checkpoints.checkpoint_data` -> [`CheckpointData`]
//!
//! The first three keep the exact JSON shape the columns have always held
//! (array, object, object). Checkpoints carry an explicit `version`.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DebateError, Result};

/// A value stored as serialized JSON text in a single column.
pub trait JsonColumn: Serialize + DeserializeOwned {
    /// Column name used in error context
    const COLUMN: &'static str;

    /// Encode for storage.
    fn to_column(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| DebateError::json(Self::COLUMN, e))
    }

    /// Decode stored text, rejecting shape drift.
    fn from_column(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| DebateError::json(Self::COLUMN, e))
    }
}

/// Ordered phase names of a format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseList(Vec<String>);

impl PhaseList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 1-based position of a phase, matching `debate_format_phases.sequence`.
    pub fn sequence_of(&self, phase: &str) -> Option<i32> {
        self.0
            .iter()
            .position(|p| p == phase)
            .map(|i| i as i32 + 1)
    }
}

impl JsonColumn for PhaseList {
    const COLUMN: &'static str = "debate_formats.phases";
}

/// Per-phase turn limits; `None` means unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnLimits(BTreeMap<String, Option<u32>>);

impl TurnLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, phase: impl Into<String>, limit: Option<u32>) {
        self.0.insert(phase.into(), limit);
    }

    /// Limit for a phase. Phases absent from the map are unlimited.
    pub fn limit_for(&self, phase: &str) -> Option<u32> {
        self.0.get(phase).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<u32>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, Option<u32>)> for TurnLimits {
    fn from_iter<T: IntoIterator<Item = (String, Option<u32>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl JsonColumn for TurnLimits {
    const COLUMN: &'static str = "debate_formats.turn_limits";
}

/// Auxiliary sampling parameters for an LLM configuration.
///
/// Keys this build does not model are kept in `extra` and written back.
/// Written as compact JSON; readers must not depend on whitespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SamplingParams {
    pub fn new(top_p: f64, frequency_penalty: f64, presence_penalty: f64) -> Self {
        Self {
            top_p: Some(top_p),
            frequency_penalty: Some(frequency_penalty),
            presence_penalty: Some(presence_penalty),
            extra: Map::new(),
        }
    }
}

impl JsonColumn for SamplingParams {
    const COLUMN: &'static str = "llm_configs.other_params";
}

/// Current checkpoint envelope version
pub const CHECKPOINT_VERSION: u32 = 1;

/// Snapshot of debate progress, anchored to `debate_checkpoints.last_turn_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointData {
    pub version: u32,
    /// Phase the debate was in when the snapshot was taken
    pub current_phase: String,
    /// Turn number the next contribution will take
    pub next_turn_number: i32,
    /// Turns already taken, per phase
    #[serde(default)]
    pub phase_turns: BTreeMap<String, u32>,
    /// Orchestrator-specific state carried opaquely
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CheckpointData {
    pub fn new(current_phase: impl Into<String>, next_turn_number: i32) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            current_phase: current_phase.into(),
            next_turn_number,
            phase_turns: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    pub fn with_phase_turns(mut self, phase: impl Into<String>, taken: u32) -> Self {
        self.phase_turns.insert(phase.into(), taken);
        self
    }
}

impl JsonColumn for CheckpointData {
    const COLUMN: &'static str = "debate_checkpoints.checkpoint_data";

    fn from_column(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| DebateError::json(Self::COLUMN, e))?;

        let found = value
            .get("version")
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32;
        if found > CHECKPOINT_VERSION {
            return Err(DebateError::UnsupportedVersion {
                payload: "checkpoint",
                found,
                supported: CHECKPOINT_VERSION,
            });
        }

        serde_json::from_value(value).map_err(|e| DebateError::json(Self::COLUMN, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_list_is_a_bare_array() {
        let phases = PhaseList::new(["opening_pro", "opening_con"]);
        assert_eq!(
            phases.to_column().unwrap(),
            r#"["opening_pro","opening_con"]"#
        );
        assert_eq!(phases.sequence_of("opening_con"), Some(2));
        assert_eq!(phases.sequence_of("closing_pro"), None);
    }

    #[test]
    fn phase_list_rejects_object() {
        let err = PhaseList::from_column(r#"{"phases": []}"#).unwrap_err();
        assert!(matches!(err, DebateError::Json { .. }));
    }

    #[test]
    fn turn_limits_null_means_unlimited() {
        let limits = TurnLimits::from_column(r#"{"discussion": null, "debate": 10}"#).unwrap();
        assert_eq!(limits.limit_for("debate"), Some(10));
        assert_eq!(limits.limit_for("discussion"), None);
        assert_eq!(limits.limit_for("missing"), None);
    }

    #[test]
    fn sampling_params_keep_unknown_keys() {
        let params =
            SamplingParams::from_column(r#"{"top_p": 0.9, "seed": 42}"#).unwrap();
        assert_eq!(params.top_p, Some(0.9));
        assert_eq!(params.frequency_penalty, None);
        assert_eq!(params.extra.get("seed"), Some(&Value::from(42)));

        let text = params.to_column().unwrap();
        assert!(text.contains("\"seed\":42"));
        assert!(!text.contains("frequency_penalty"));
    }

    #[test]
    fn sampling_params_read_spaced_json() {
        let spaced = r#"{"top_p": 0.95, "frequency_penalty": 0.0, "presence_penalty": 0.0}"#;
        let params = SamplingParams::from_column(spaced).unwrap();
        assert_eq!(params, SamplingParams::new(0.95, 0.0, 0.0));

        let compact = params.to_column().unwrap();
        assert_eq!(
            compact,
            r#"{"top_p":0.95,"frequency_penalty":0.0,"presence_penalty":0.0}"#
        );
        let a: Value = serde_json::from_str(spaced).unwrap();
        let b: Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn checkpoint_rejects_newer_version() {
        let err = CheckpointData::from_column(
            r#"{"version": 2, "current_phase": "x", "next_turn_number": 1}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DebateError::UnsupportedVersion { found: 2, supported: 1, .. }
        ));
    }

    #[test]
    fn checkpoint_keeps_orchestrator_state() {
        let text = r#"{"version":1,"current_phase":"exchange_2","next_turn_number":6,
                       "phase_turns":{"exchange_1":2},"speaker_queue":["a","b"]}"#;
        let data = CheckpointData::from_column(text).unwrap();
        assert_eq!(data.current_phase, "exchange_2");
        assert_eq!(data.phase_turns.get("exchange_1"), Some(&2));
        assert!(data.extra.contains_key("speaker_queue"));
    }

    #[test]
    fn checkpoint_missing_fields_is_shape_error() {
        let err = CheckpointData::from_column(r#"{"version":1}"#).unwrap_err();
        assert!(matches!(err, DebateError::Json { .. }));
    }
}
