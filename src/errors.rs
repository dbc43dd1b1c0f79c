use crate::parser::JsonKind;
use thiserror::Error;

/// Errors from slicing and decoding JSON out of an LLM reply.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON {0} found in the reply")]
    NoDelimiterFound(JsonKind),
    #[error("reply is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Errors from the generation-backed workflows.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("quiz generation failed: {0}")]
    GenerationFailed(String),
    #[error("test analysis failed: {0}")]
    AnalysisFailed(String),
}

/// Sequencing violations on the quiz state machine. These indicate a bug in
/// the caller, not a bad answer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("question {0} was already answered")]
    AlreadyAnswered(usize),
    #[error("question {0} has not been answered yet")]
    NotAnswered(usize),
    #[error("the quiz is already completed")]
    Completed,
    #[error("no quiz is active")]
    NoActiveQuiz,
}

/// Fatal startup problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing API credential: set the {0} environment variable")]
    MissingApiKey(&'static str),
    #[error("failed to create OpenRouter client: {0}")]
    ClientInit(String),
}

/// Problems with an uploaded document, surfaced to the user as input errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("could not read the uploaded document: {0}")]
    Unreadable(String),
    #[error("no text could be extracted from the document")]
    Empty,
}

/// Everything that can go wrong between receiving an upload and storing its
/// analysis.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Analysis(#[from] GenError),
}
