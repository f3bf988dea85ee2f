use masterdebater_core::{CheckpointData, JsonColumn, PhaseList, SamplingParams, Side, TurnLimits};
use proptest::prelude::*;

proptest! {
    /// Property: column decoders return errors, never panic, on arbitrary text
    #[test]
    fn prop_decoders_never_panic(text in ".*") {
        let _ = PhaseList::from_column(&text);
        let _ = TurnLimits::from_column(&text);
        let _ = SamplingParams::from_column(&text);
        let _ = CheckpointData::from_column(&text);
    }

    /// Property: a stored turn-limit map answers lookups the way it was built
    #[test]
    fn prop_turn_limits_lookup(
        entries in prop::collection::btree_map(
            "[a-z_]{1,12}",
            prop::option::of(1u32..20),
            0..8,
        )
    ) {
        let limits: TurnLimits = entries.clone().into_iter().collect();
        let decoded = TurnLimits::from_column(&limits.to_column().unwrap()).unwrap();

        for (phase, limit) in &entries {
            prop_assert_eq!(decoded.limit_for(phase), *limit);
        }
    }

    /// Property: only the four column spellings parse as a side
    #[test]
    fn prop_side_parse_is_exact(s in "[a-zA-Z]{0,12}") {
        let known = ["affirmative", "negative", "moderator", "judge"];
        prop_assert_eq!(s.parse::<Side>().is_ok(), known.contains(&s.as_str()));
    }

    /// Property: phase sequence is the 1-based index of first occurrence
    #[test]
    fn prop_phase_sequence(names in prop::collection::vec("[a-z]{1,6}", 1..10)) {
        let phases = PhaseList::new(names.clone());
        let first = &names[0];
        prop_assert_eq!(phases.sequence_of(first), Some(1));
        prop_assert_eq!(phases.len(), names.len());
    }
}
