pub mod ai;
pub mod analysis;
pub mod app;
pub mod chat;
pub mod config;
pub mod document;
pub mod errors;
pub mod logger;
pub mod models;
pub mod parser;
pub mod quiz;
pub mod session;
pub mod topics;

// Re-exports for convenience
pub use ai::{
    ChatChannel, LanguageModel, OpenRouterModel, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, STRICT_TEMPERATURE,
};
pub use analysis::{analyze, personalized_feedback};
pub use app::StudyBuddy;
pub use chat::{send_message, FALLBACK_REPLY};
pub use config::Config;
pub use document::TextExtractor;
pub use errors::{ConfigError, DocumentError, GenError, ParseError, QuizError, UploadError};
pub use models::{
    ChatRole, ChatTurn, QuestionReview, QuizQuestion, QuizSession, QuizStatus, SummaryStats,
    TestAnalysis,
};
pub use parser::{extract_json, JsonKind};
pub use quiz::{generate_quiz, AnswerFeedback, QUIZ_LENGTH};
pub use session::SessionState;
pub use topics::extract_topics;
