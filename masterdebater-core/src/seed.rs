//! Reference data installed by the initial seed revision
//!
//! Pure data. `masterdebater-server::seed` writes it to the store and
//! removes it again by business key.

use crate::payload::{PhaseList, SamplingParams, TurnLimits};
use crate::vocab::{ConfigRole, FormatStructure};

/// Revision identifier recorded when the seed is applied
pub const SEED_REVISION: &str = "b4612156f1d5";

/// Revision the seed builds on (the table-creation revision)
pub const SEED_DOWN_REVISION: &str = "c66b6ea45d9f";

/// Email of the seeded administrator
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Role shared by every seeded LLM configuration
pub const SEEDED_CONFIG_ROLE: ConfigRole = ConfigRole::General;

#[derive(Debug, Clone, Copy)]
pub struct SeedPhase {
    pub name: &'static str,
    pub description: &'static str,
    pub sequence: i32,
    pub prompt_template: &'static str,
    /// `None` means unlimited
    pub turn_limit: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
pub struct SeedFormat {
    pub name: &'static str,
    pub description: &'static str,
    pub structure: FormatStructure,
    pub phases: &'static [SeedPhase],
}

impl SeedFormat {
    /// Phase names in sequence order, for `debate_formats.phases`.
    pub fn phase_list(&self) -> PhaseList {
        let mut phases: Vec<&SeedPhase> = self.phases.iter().collect();
        phases.sort_by_key(|p| p.sequence);
        PhaseList::new(phases.into_iter().map(|p| p.name))
    }

    /// Phase turn limits, for `debate_formats.turn_limits`.
    pub fn turn_limits(&self) -> TurnLimits {
        self.phases
            .iter()
            .map(|p| (p.name.to_owned(), p.turn_limit))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SeedCriterion {
    pub name: &'static str,
    pub description: &'static str,
    pub max_score: i32,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct SeedLlmConfig {
    pub name: &'static str,
    pub model: &'static str,
    pub temperature: f64,
    pub max_tokens: i32,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
}

impl SeedLlmConfig {
    pub fn sampling_params(&self) -> SamplingParams {
        SamplingParams::new(self.top_p, self.frequency_penalty, self.presence_penalty)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SeedUser {
    pub username: &'static str,
    pub email: &'static str,
    pub is_llm: bool,
}

const fn phase(
    name: &'static str,
    description: &'static str,
    sequence: i32,
    turn_limit: Option<u32>,
    prompt_template: &'static str,
) -> SeedPhase {
    SeedPhase {
        name,
        description,
        sequence,
        prompt_template,
        turn_limit,
    }
}

// Prompts shared between formats
const CROSS_EXAMINATION_LD: &str =
    "Ask questions to clarify and challenge aspects of your opponent's case.";
const REBUTTAL_OXFORD: &str =
    "Respond to the opposing side's arguments, defending your position and addressing their points.";
// Lincoln-Douglas and Popper both name a phase `affirmative_conclusion`; the
// later definition wins for both formats.
const AFFIRMATIVE_CONCLUSION: &str =
    "Summarize why the affirmative case remains stronger, addressing the main points of contention.";

const OPEN_ENDED_PHASES: &[SeedPhase] = &[phase(
    "discussion",
    "Free-form discussion of the topic",
    1,
    None,
    "Share your perspective on the topic, addressing previous points made in the discussion.",
)];

const FIXED_TURN_PHASES: &[SeedPhase] = &[phase(
    "debate",
    "Alternating arguments between affirmative and negative positions",
    1,
    Some(10),
    "Present your arguments {{position}} the proposition, responding to previous points made by your opponent.",
)];

const OXFORD_PHASES: &[SeedPhase] = &[
    phase(
        "opening_pro",
        "Initial presentation of arguments supporting the proposition",
        1,
        Some(1),
        "Present your initial arguments in favor of the proposition. Establish your key points and framework.",
    ),
    phase(
        "opening_con",
        "Initial presentation of arguments opposing the proposition",
        2,
        Some(1),
        "Present your initial arguments against the proposition. Establish your key points and framework.",
    ),
    phase(
        "rebuttal_pro",
        "Response to opposing arguments from the affirmative side",
        3,
        Some(1),
        REBUTTAL_OXFORD,
    ),
    phase(
        "rebuttal_con",
        "Response to opposing arguments from the negative side",
        4,
        Some(1),
        REBUTTAL_OXFORD,
    ),
    phase(
        "cross_examination",
        "Direct questioning between debaters",
        5,
        Some(3),
        "Ask direct questions to probe weaknesses in your opponent's arguments. Be specific and focused.",
    ),
    phase(
        "closing_con",
        "Final arguments and summary from the negative side",
        6,
        Some(1),
        "Summarize your case against the proposition, emphasizing your strongest points and addressing key counterarguments.",
    ),
    phase(
        "closing_pro",
        "Final arguments and summary from the affirmative side",
        7,
        Some(1),
        "Summarize your case in favor of the proposition, emphasizing your strongest points and addressing key counterarguments.",
    ),
];

const LINCOLN_DOUGLAS_PHASES: &[SeedPhase] = &[
    phase(
        "affirmative_constructive",
        "Initial affirmative case presentation",
        1,
        Some(1),
        "Present a comprehensive case in favor of the proposition, outlining your value premise and criterion.",
    ),
    phase(
        "cross_examination_1",
        "Negative questioning of affirmative",
        2,
        Some(3),
        CROSS_EXAMINATION_LD,
    ),
    phase(
        "negative_constructive",
        "Initial negative case presentation",
        3,
        Some(1),
        "Present your case against the proposition, including both direct refutations and your own value framework.",
    ),
    phase(
        "cross_examination_2",
        "Affirmative questioning of negative",
        4,
        Some(3),
        CROSS_EXAMINATION_LD,
    ),
    phase(
        "affirmative_rebuttal",
        "Affirmative defense and refutation",
        5,
        Some(1),
        "Defend your case against criticisms and attack flaws in your opponent's arguments.",
    ),
    phase(
        "negative_rebuttal",
        "Negative defense and refutation",
        6,
        Some(1),
        "Focus on the key points of clash in the debate, emphasizing the strongest arguments against the proposition.",
    ),
    phase(
        "affirmative_conclusion",
        "Final affirmative summary",
        7,
        Some(1),
        AFFIRMATIVE_CONCLUSION,
    ),
];

const POPPER_PHASES: &[SeedPhase] = &[
    phase(
        "affirmative_position",
        "Initial affirmative position statement",
        1,
        Some(1),
        "Present your initial case in favor of the proposition, establishing your main arguments.",
    ),
    phase(
        "negative_position",
        "Initial negative position statement",
        2,
        Some(1),
        "Present your initial case against the proposition, establishing your main arguments.",
    ),
    phase(
        "exchange_1",
        "First exchange of arguments",
        3,
        Some(2),
        "Engage directly with your opponent's arguments, highlighting strengths in your position and weaknesses in theirs.",
    ),
    phase(
        "exchange_2",
        "Second exchange of arguments",
        4,
        Some(2),
        "Continue the debate, focusing on the key areas of disagreement that have emerged.",
    ),
    phase(
        "exchange_3",
        "Third exchange of arguments",
        5,
        Some(2),
        "Address the most crucial points of clash in the debate, emphasizing your strongest arguments.",
    ),
    phase(
        "affirmative_conclusion",
        "Affirmative closing statement",
        6,
        Some(1),
        AFFIRMATIVE_CONCLUSION,
    ),
    phase(
        "negative_conclusion",
        "Negative closing statement",
        7,
        Some(1),
        "Summarize why the negative case remains stronger, addressing the main points of contention.",
    ),
];

/// Debate formats, in insertion order
pub const FORMATS: &[SeedFormat] = &[
    SeedFormat {
        name: "Open-Ended",
        description: "Flexible format with minimal structure",
        structure: FormatStructure::Flexible,
        phases: OPEN_ENDED_PHASES,
    },
    SeedFormat {
        name: "Fixed-Turn (10)",
        description: "Simple debate with fixed number of turns alternating between sides",
        structure: FormatStructure::Strict,
        phases: FIXED_TURN_PHASES,
    },
    SeedFormat {
        name: "Oxford Style",
        description: "Formal debate format with structured phases like opening statements, rebuttals, and closing arguments",
        structure: FormatStructure::Strict,
        phases: OXFORD_PHASES,
    },
    SeedFormat {
        name: "Lincoln-Douglas",
        description: "One-on-one debate format with emphasis on substantive argumentation and cross-examination",
        structure: FormatStructure::Strict,
        phases: LINCOLN_DOUGLAS_PHASES,
    },
    SeedFormat {
        name: "Popper",
        description: "Format with initial positions followed by multiple rounds of free exchanges",
        structure: FormatStructure::Strict,
        phases: POPPER_PHASES,
    },
];

/// Scoring rubric dimensions
pub const CRITERIA: &[SeedCriterion] = &[
    SeedCriterion {
        name: "Logical Reasoning",
        description: "Soundness of arguments, identification and avoidance of fallacies, strength of causal connections",
        max_score: 10,
        weight: 1.0,
    },
    SeedCriterion {
        name: "Evidence Quality",
        description: "Relevance of cited information, credibility of sources, appropriate use of data/statistics",
        max_score: 10,
        weight: 1.0,
    },
    SeedCriterion {
        name: "Responsiveness",
        description: "Direct engagement with opponent's arguments, quality of rebuttals, avoidance of straw man arguments",
        max_score: 10,
        weight: 1.0,
    },
    SeedCriterion {
        name: "Clarity & Organization",
        description: "Structured presentation of ideas, clear thesis and supporting points, effective use of examples",
        max_score: 10,
        weight: 1.0,
    },
    SeedCriterion {
        name: "Rhetorical Effectiveness",
        description: "Persuasiveness of language, strategic framing of arguments, appropriate tone for the context",
        max_score: 10,
        weight: 1.0,
    },
];

/// Prompt body shared by every seeded LLM configuration
pub const GENERIC_BASE_PROMPT: &str = r#"You are participating in a formal debate on the proposition: "{{proposition}}".

Your current role is: {{role}}

If you're a MODERATOR: Ensure civil discussion, enforce format rules, provide clarification, maintain balance, and offer meta-commentary while staying neutral.

If you're a JUDGE: Observe carefully and evaluate based on logical reasoning, evidence quality, responsiveness to opponent's arguments, clarity of ideas, and rhetorical effectiveness.

If you're a DEBATER: Make persuasive arguments {{position}} the proposition, using strong logic, compelling evidence, and effective rhetoric. Respond directly to your opponent's points and follow the format guidelines.

Current context: {{context}}"#;

/// Model configurations, in insertion order
pub const LLM_CONFIGS: &[SeedLlmConfig] = &[
    SeedLlmConfig {
        name: "Llama3 (Balanced)",
        model: "llama3",
        temperature: 0.7,
        max_tokens: 1024,
        top_p: 0.95,
        frequency_penalty: 0.0,
        presence_penalty: 0.0,
    },
    SeedLlmConfig {
        name: "Llama3 (Precise)",
        model: "llama3",
        temperature: 0.3,
        max_tokens: 1024,
        top_p: 0.85,
        frequency_penalty: 0.1,
        presence_penalty: 0.1,
    },
    SeedLlmConfig {
        name: "Llama3 (Creative)",
        model: "llama3",
        temperature: 0.9,
        max_tokens: 1024,
        top_p: 0.98,
        frequency_penalty: -0.2,
        presence_penalty: 0.0,
    },
];

pub const ADMIN_USER: SeedUser = SeedUser {
    username: "Admin",
    email: ADMIN_EMAIL,
    is_llm: false,
};

/// Total phase rows across all seeded formats
pub fn phase_count() -> usize {
    FORMATS.iter().map(|f| f.phases.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(name: &str) -> &'static SeedFormat {
        FORMATS.iter().find(|f| f.name == name).unwrap()
    }

    #[test]
    fn oxford_limits_in_sequence_order() {
        let oxford = format("Oxford Style");
        let limits: Vec<_> = oxford.phases.iter().map(|p| p.turn_limit).collect();
        assert_eq!(
            limits,
            vec![Some(1), Some(1), Some(1), Some(1), Some(3), Some(1), Some(1)]
        );
        assert_eq!(oxford.phase_list().sequence_of("closing_pro"), Some(7));
    }

    #[test]
    fn sequences_are_contiguous_from_one() {
        for f in FORMATS {
            let seqs: Vec<i32> = f.phases.iter().map(|p| p.sequence).collect();
            let expected: Vec<i32> = (1..=f.phases.len() as i32).collect();
            assert_eq!(seqs, expected, "format {}", f.name);
        }
    }

    #[test]
    fn open_ended_is_the_only_flexible_format() {
        let flexible: Vec<_> = FORMATS
            .iter()
            .filter(|f| f.structure == FormatStructure::Flexible)
            .map(|f| f.name)
            .collect();
        assert_eq!(flexible, vec!["Open-Ended"]);
        assert_eq!(format("Open-Ended").turn_limits().limit_for("discussion"), None);
    }

    #[test]
    fn affirmative_conclusion_prompt_shared_across_formats() {
        let ld = format("Lincoln-Douglas").phases.last().unwrap();
        let popper = format("Popper").phases[5];
        assert_eq!(ld.prompt_template, popper.prompt_template);
    }

    #[test]
    fn totals() {
        assert_eq!(FORMATS.len(), 5);
        assert_eq!(phase_count(), 23);
        assert_eq!(CRITERIA.len(), 5);
        assert_eq!(LLM_CONFIGS.len(), 3);
    }
}
