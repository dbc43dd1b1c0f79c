use crate::ai::client::{ChatChannel, LanguageModel};
use crate::models::{ChatTurn, QuizSession, TestAnalysis};
use std::collections::BTreeSet;
use std::fmt;

/// Everything one student session knows. Components receive this explicitly;
/// there is no global state. Mutators are crate-internal so embedders can
/// only move the session through the component operations, each of which is
/// a single atomic transition.
pub struct SessionState {
    transcript: Vec<ChatTurn>,
    weak_topics: BTreeSet<String>,
    quiz: Option<QuizSession>,
    analysis: Option<TestAnalysis>,
    channel: Option<Box<dyn ChatChannel>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
            weak_topics: BTreeSet::new(),
            quiz: None,
            analysis: None,
            channel: None,
        }
    }

    /// Full conversation history, oldest turn first. Append-only: entries are
    /// never edited or removed while the session lives.
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Topics the student has shown weakness in so far. Grows by union only;
    /// emptied by `clear`.
    pub fn weak_topics(&self) -> &BTreeSet<String> {
        &self.weak_topics
    }

    pub fn quiz(&self) -> Option<&QuizSession> {
        self.quiz.as_ref()
    }

    pub fn quiz_mut(&mut self) -> Option<&mut QuizSession> {
        self.quiz.as_mut()
    }

    /// The most recent test-result analysis, if any document was analyzed.
    pub fn analysis(&self) -> Option<&TestAnalysis> {
        self.analysis.as_ref()
    }

    pub(crate) fn push_turn(&mut self, turn: ChatTurn) {
        self.transcript.push(turn);
    }

    /// Entries are stored trimmed and lower-cased; blank ones are dropped.
    /// Both the chat and the analyzer paths union through here, so the set
    /// never holds two casings of the same topic.
    pub(crate) fn absorb_topics(&mut self, topics: impl IntoIterator<Item = String>) {
        self.weak_topics.extend(
            topics
                .into_iter()
                .map(|topic| topic.trim().to_lowercase())
                .filter(|topic| !topic.is_empty()),
        );
    }

    /// Replaces any quiz in flight. Progress on the old one is discarded.
    pub(crate) fn install_quiz(&mut self, quiz: QuizSession) {
        self.quiz = Some(quiz);
    }

    /// Removes the quiz in flight, if any, without installing a new one.
    pub(crate) fn drop_quiz(&mut self) {
        self.quiz = None;
    }

    /// Replaces any previous analysis wholesale.
    pub(crate) fn store_analysis(&mut self, analysis: TestAnalysis) {
        self.analysis = Some(analysis);
    }

    /// The conversational channel, opened lazily on first use so sessions
    /// that never chat never pay for one.
    pub(crate) fn channel_mut(&mut self, model: &dyn LanguageModel) -> &mut dyn ChatChannel {
        self.channel
            .get_or_insert_with(|| model.start_chat())
            .as_mut()
    }

    /// Resets the whole session: transcript, weak topics, quiz, analysis, and
    /// the conversational channel. The next chat turn opens a fresh channel
    /// with no memory of this one.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.weak_topics.clear();
        self.quiz = None;
        self.analysis = None;
        self.channel = None;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("transcript", &self.transcript)
            .field("weak_topics", &self.weak_topics)
            .field("quiz", &self.quiz)
            .field("analysis", &self.analysis)
            .field("channel_open", &self.channel.is_some())
            .finish()
    }
}
