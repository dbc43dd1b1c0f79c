use crate::ai::client::{LanguageModel, STRICT_TEMPERATURE};
use crate::errors::{GenError, ParseError, QuizError};
use crate::logger;
use crate::models::{QuizQuestion, QuizSession, QuizStatus};
use crate::parser::{self, JsonKind};
use std::collections::{BTreeSet, HashSet};

/// How many questions a quiz asks for. The model usually complies; a
/// well-formed reply with a different count is still accepted.
pub const QUIZ_LENGTH: usize = 10;

fn quiz_prompt(topic: &str, weak_topics: &BTreeSet<String>) -> String {
    let weak_topics = if weak_topics.is_empty() {
        "None identified".to_string()
    } else {
        weak_topics
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        r#"Generate a quiz on the topic "{topic}" for a student who is preparing for the Joint Entrance Exam (JEE).
Pick the questions from existing previous year questions (PYQs) available for the JEE exam when possible.

Create {count} single choice questions. For each question, provide 4 answer choices, the correct answer, and a brief explanation.

Format the response as a JSON array of objects, where each object represents a question and has the following structure:
{{
  "question": "The question text",
  "answers": ["Answer A", "Answer B", "Answer C", "Answer D"],
  "correctAnswer": 0,
  "explanation": "Brief explanation of the correct answer"
}}

Here are some weak topics the student has mentioned and needs more attention:
{weak_topics}

Focus more on these weak topics if they are related to {topic}.
Ensure all questions are appropriate for JEE level.
Return ONLY valid JSON with no additional text."#,
        topic = topic,
        count = QUIZ_LENGTH,
        weak_topics = weak_topics,
    )
}

fn parse_questions(raw: &str) -> Result<Vec<QuizQuestion>, ParseError> {
    let value = parser::extract_json(raw, JsonKind::Array)?;
    Ok(serde_json::from_value(value)?)
}

/// Asks the model for a quiz on `topic`, biased toward the session's weak
/// topics. Any failure along the way (call, slice, decode, empty list) comes
/// back as `GenError::GenerationFailed`; there is no retry. The caller
/// installs the questions into the session, replacing any quiz in flight.
pub async fn generate_quiz(
    model: &dyn LanguageModel,
    topic: &str,
    weak_topics: &BTreeSet<String>,
) -> Result<Vec<QuizQuestion>, GenError> {
    logger::log(&format!("generating quiz on \"{}\"", topic));

    let prompt = quiz_prompt(topic, weak_topics);
    let raw = model
        .generate(&prompt, STRICT_TEMPERATURE)
        .await
        .map_err(|e| {
            logger::log(&format!("quiz generation call failed: {}", e));
            GenError::GenerationFailed(e.to_string())
        })?;

    let questions = parse_questions(&raw).map_err(|e| {
        logger::log(&format!("quiz reply was not a usable JSON array: {}", e));
        GenError::GenerationFailed(e.to_string())
    })?;

    if questions.is_empty() {
        return Err(GenError::GenerationFailed(
            "the model returned an empty question list".to_string(),
        ));
    }

    Ok(questions)
}

/// What the student sees right after answering: whether they were right, the
/// text of the correct option, and the model's explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: String,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        let status = if questions.is_empty() {
            QuizStatus::Completed
        } else {
            QuizStatus::InProgress
        };
        Self {
            questions,
            current_index: 0,
            score: 0,
            answered: HashSet::new(),
            status,
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// The question awaiting an answer or an advance, `None` once completed.
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.status {
            QuizStatus::InProgress => self.questions.get(self.current_index),
            QuizStatus::Completed => None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn status(&self) -> QuizStatus {
        self.status
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.answered.contains(&index)
    }

    pub fn answered_count(&self) -> usize {
        self.answered.len()
    }

    /// Answers the current question with the selected option index. Scores
    /// it, marks it answered, and stays on the same question so the student
    /// can read the feedback. Answering twice, or answering a completed
    /// quiz, is a sequencing bug and is rejected.
    ///
    /// A `selected` index outside the option list is a legal (wrong) answer,
    /// not a violation; the feedback still carries the right option.
    pub fn submit_answer(&mut self, selected: usize) -> Result<AnswerFeedback, QuizError> {
        if self.status == QuizStatus::Completed {
            return Err(QuizError::Completed);
        }
        if self.answered.contains(&self.current_index) {
            return Err(QuizError::AlreadyAnswered(self.current_index));
        }

        let question = &self.questions[self.current_index];
        let is_correct = selected == question.correct_answer;

        self.answered.insert(self.current_index);
        if is_correct {
            self.score += 1;
        }

        Ok(AnswerFeedback {
            is_correct,
            correct_answer: question
                .answers
                .get(question.correct_answer)
                .cloned()
                .unwrap_or_default(),
            explanation: question.explanation.clone(),
        })
    }

    /// Moves past an answered question. Completes the quiz when the last one
    /// is left behind. Advancing over an unanswered question, or a completed
    /// quiz, is a sequencing bug and is rejected.
    pub fn advance(&mut self) -> Result<QuizStatus, QuizError> {
        if self.status == QuizStatus::Completed {
            return Err(QuizError::Completed);
        }
        if !self.answered.contains(&self.current_index) {
            return Err(QuizError::NotAnswered(self.current_index));
        }

        self.current_index += 1;
        if self.current_index == self.questions.len() {
            self.status = QuizStatus::Completed;
        }
        Ok(self.status)
    }
}
