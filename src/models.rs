use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One immutable turn of the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A generated quiz question. The wire format uses `correctAnswer` for the
/// index into `answers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub answers: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: usize,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStatus {
    InProgress,
    Completed,
}

/// A quiz in flight. Fields stay private to the crate so progress can only
/// move through `submit_answer` and `advance`, which keep
/// `score <= answered <= current_index + 1 <= questions.len()`.
#[derive(Debug, Clone)]
pub struct QuizSession {
    pub(crate) questions: Vec<QuizQuestion>,
    pub(crate) current_index: usize,
    pub(crate) score: usize,
    pub(crate) answered: HashSet<usize>,
    pub(crate) status: QuizStatus,
}

/// Aggregate counts reported by the test-result analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_questions: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub accuracy_percentage: f32,
}

/// Per-question verdict from the test-result analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionReview {
    pub question: String,
    pub student_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub topic: String,
    pub explanation: String,
}

/// Structured analysis of an uploaded test result. Replaced wholesale each
/// time a new document is analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestAnalysis {
    pub weak_topics: BTreeSet<String>,
    pub analysis: SummaryStats,
    pub question_analysis: Vec<QuestionReview>,
    pub summary: String,
}
