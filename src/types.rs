use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque ID type for type safety
pub type SessionId = String;

/// The kind of a quiz question, with the corpus wire tags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuestionKind {
    #[serde(rename = "mc")]
    MultipleChoice,
    #[serde(rename = "tf")]
    TrueFalse,
    #[serde(rename = "fitb")]
    FillBlank,
}

/// A single quiz question. Created at corpus load time, read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub prompt: String,
    pub correct_answer: String,
    /// Wrong answers offered alongside the correct one. Required for
    /// MultipleChoice and FillBlank; optional for TrueFalse where the
    /// negation is implied.
    #[serde(default)]
    pub distractors: Vec<String>,
    /// Difficulty on a 1-5 scale
    pub difficulty: u8,
    /// Optional source reference for the answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Question {
    /// Whether a session can actually play this question: MultipleChoice and
    /// FillBlank need at least one distractor to present wrong options.
    pub fn is_answerable(&self) -> bool {
        match self.kind {
            QuestionKind::MultipleChoice | QuestionKind::FillBlank => !self.distractors.is_empty(),
            QuestionKind::TrueFalse => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Waiting,
    AwaitingAnswers,
    Grading,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Questions drawn per session
    pub question_count: usize,
    /// Simulated opponents per session
    pub bot_count: usize,
    /// Informational per-question time budget, exposed as the deadline
    pub answer_window_secs: u64,
    /// Simulated answers land uniformly within [0, this] after a question opens
    pub bot_delay_max_ms: u64,
    /// Pause between grading and the next question
    pub pacing_delay_ms: u64,
    /// Fixed seed for the per-session RNG (deterministic opponents in tests)
    pub rng_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            question_count: 10,
            bot_count: 3,
            answer_window_secs: 30,
            bot_delay_max_ms: 5_000,
            pacing_delay_ms: 3_000,
            rng_seed: None,
        }
    }
}

/// Snapshot of a session, safe to hand to the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionStatus {
    pub session_id: SessionId,
    pub phase: Phase,
    pub current_question: Option<Question>,
    pub scoreboard: HashMap<String, u32>,
    /// Participants who have answered the current question, sorted by name
    pub answered: Vec<String>,
    pub participants: Vec<String>,
    pub simulated_players: Vec<String>,
    pub total_questions: usize,
    pub current_question_number: usize,
    pub progress: f64,
}

/// The live question plus its informational deadline (RFC3339).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionView {
    pub question: Option<Question>,
    pub deadline: Option<String>,
}
