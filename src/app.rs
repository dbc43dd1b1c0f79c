use crate::ai::client::{LanguageModel, OpenRouterModel};
use crate::analysis;
use crate::chat;
use crate::config::Config;
use crate::document::TextExtractor;
use crate::errors::{ConfigError, DocumentError, GenError, QuizError, UploadError};
use crate::logger;
use crate::models::{QuizSession, QuizStatus, TestAnalysis};
use crate::quiz::{self, AnswerFeedback};
use crate::session::SessionState;

/// One student's study assistant. This is where the rendering layer's events
/// land: it owns the model, the document extractor, and the session state,
/// and turns each event into exactly one session transition.
pub struct StudyBuddy {
    model: Box<dyn LanguageModel>,
    extractor: Box<dyn TextExtractor>,
    state: SessionState,
}

impl StudyBuddy {
    /// Wires up the OpenRouter model from the environment. Fails before any
    /// user interaction when the credential is missing.
    pub fn from_env(extractor: Box<dyn TextExtractor>) -> Result<Self, ConfigError> {
        logger::init();
        let config = Config::from_env()?;
        let model = OpenRouterModel::new(config)?;
        Ok(Self::new(Box::new(model), extractor))
    }

    /// Injects collaborators directly. Tests and embedders with their own
    /// model implementation come through here.
    pub fn new(model: Box<dyn LanguageModel>, extractor: Box<dyn TextExtractor>) -> Self {
        Self {
            model,
            extractor,
            state: SessionState::new(),
        }
    }

    /// Read access for rendering.
    pub fn session(&self) -> &SessionState {
        &self.state
    }

    /// The student typed a chat message. Returns the text to display; never
    /// fails (a broken model turns into the fallback reply).
    pub async fn on_user_message(&mut self, message: &str) -> String {
        chat::send_message(&mut self.state, self.model.as_ref(), message).await
    }

    /// The student asked for a quiz. Any quiz in flight is discarded either
    /// way: replaced on success, gone on failure. There is no stale quiz to
    /// fall back to after a failed generation.
    pub async fn on_quiz_topic_submitted(&mut self, topic: &str) -> Result<(), GenError> {
        match quiz::generate_quiz(self.model.as_ref(), topic, self.state.weak_topics()).await {
            Ok(questions) => {
                self.state.install_quiz(QuizSession::new(questions));
                Ok(())
            }
            Err(err) => {
                self.state.drop_quiz();
                Err(err)
            }
        }
    }

    /// The student picked an answer on the current question.
    pub fn on_answer_selected(&mut self, selected: usize) -> Result<AnswerFeedback, QuizError> {
        match self.state.quiz_mut() {
            Some(quiz) => quiz.submit_answer(selected),
            None => Err(QuizError::NoActiveQuiz),
        }
    }

    /// The student moved past an answered question's feedback.
    pub fn on_next_question(&mut self) -> Result<QuizStatus, QuizError> {
        match self.state.quiz_mut() {
            Some(quiz) => quiz.advance(),
            None => Err(QuizError::NoActiveQuiz),
        }
    }

    /// The student uploaded a test result for structured analysis.
    pub async fn on_document_uploaded(
        &mut self,
        document: &[u8],
    ) -> Result<TestAnalysis, UploadError> {
        let text = self.text_from(document)?;
        Ok(analysis::analyze(&mut self.state, self.model.as_ref(), &text).await?)
    }

    /// The student asked for free-text feedback on a test result instead of
    /// the structured breakdown. Leaves the session untouched.
    pub async fn on_feedback_requested(&self, document: &[u8]) -> Result<String, UploadError> {
        let text = self.text_from(document)?;
        Ok(analysis::personalized_feedback(self.model.as_ref(), &text).await?)
    }

    fn text_from(&self, document: &[u8]) -> Result<String, DocumentError> {
        let text = self.extractor.extract_text(document)?;
        if text.trim().is_empty() {
            return Err(DocumentError::Empty);
        }
        Ok(text)
    }

    /// Clear-session control: forget the conversation, the weak topics, the
    /// quiz, the analysis, and the channel.
    pub fn clear(&mut self) {
        self.state.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::mock::MockModel;
    use crate::chat::FALLBACK_REPLY;

    struct StubExtractor {
        text: Option<&'static str>,
    }

    impl TextExtractor for StubExtractor {
        fn extract_text(&self, _document: &[u8]) -> Result<String, DocumentError> {
            match self.text {
                Some(text) => Ok(text.to_string()),
                None => Err(DocumentError::Unreadable("scrambled bytes".to_string())),
            }
        }
    }

    fn buddy(model: MockModel, text: Option<&'static str>) -> StudyBuddy {
        StudyBuddy::new(Box::new(model), Box::new(StubExtractor { text }))
    }

    fn ten_questions_json() -> String {
        let questions: Vec<serde_json::Value> = (0..10)
            .map(|i| {
                serde_json::json!({
                    "question": format!("question {}", i),
                    "answers": ["option a", "option b", "option c", "option d"],
                    "correctAnswer": i % 4,
                    "explanation": format!("explanation {}", i),
                })
            })
            .collect();
        serde_json::Value::Array(questions).to_string()
    }

    const ANALYSIS_REPLY: &str = r#"{
        "weak_topics": ["kinematics"],
        "analysis": {
            "total_questions": 4,
            "correct_answers": 1,
            "incorrect_answers": 3,
            "accuracy_percentage": 25.0
        },
        "question_analysis": [],
        "summary": "Needs practice on motion problems."
    }"#;

    #[tokio::test]
    async fn test_quiz_flow_end_to_end() {
        // one chat turn seeds a weak topic, then the quiz gets generated
        let quiz_json = ten_questions_json();
        let model = MockModel::new(vec![
            "Projectile motion combines two independent motions.",
            "projectile motion",
            quiz_json.as_str(),
        ]);
        let mut app = buddy(model, None);

        app.on_user_message("I struggle with projectile motion").await;
        assert!(app.session().weak_topics().contains("projectile"));

        app.on_quiz_topic_submitted("Kinematics").await.unwrap();
        let quiz = app.session().quiz().unwrap();
        assert_eq!(quiz.questions().len(), 10);
        assert_eq!(quiz.status(), QuizStatus::InProgress);

        // answer every question, getting half of them right
        for i in 0..10 {
            let correct = app.session().quiz().unwrap().current_question().unwrap().correct_answer;
            let selected = if i % 2 == 0 { correct } else { (correct + 1) % 4 };

            let feedback = app.on_answer_selected(selected).unwrap();
            assert_eq!(feedback.is_correct, i % 2 == 0);

            // a second click on the same question is a bug, not a no-op
            assert_eq!(
                app.on_answer_selected(selected).unwrap_err(),
                QuizError::AlreadyAnswered(i)
            );

            app.on_next_question().unwrap();
        }

        let quiz = app.session().quiz().unwrap();
        assert_eq!(quiz.status(), QuizStatus::Completed);
        assert_eq!(quiz.score(), 5);
        assert_eq!(app.on_answer_selected(0).unwrap_err(), QuizError::Completed);
    }

    #[tokio::test]
    async fn test_quiz_prompt_carries_session_weak_topics() {
        let quiz_json = ten_questions_json();
        let model = MockModel::new(vec!["reply", "vectors", quiz_json.as_str()]);
        let handle = model.clone();
        let mut app = buddy(model, None);

        app.on_user_message("vectors confuse me").await;
        app.on_quiz_topic_submitted("Mechanics").await.unwrap();

        let prompts = handle.prompts();
        assert!(prompts[2].contains("vectors"));
        assert!(prompts[2].contains("\"Mechanics\""));
    }

    #[tokio::test]
    async fn test_answer_without_a_quiz_is_rejected() {
        let mut app = buddy(MockModel::new(vec![]), None);
        assert_eq!(
            app.on_answer_selected(0).unwrap_err(),
            QuizError::NoActiveQuiz
        );
        assert_eq!(
            app.on_next_question().unwrap_err(),
            QuizError::NoActiveQuiz
        );
    }

    #[tokio::test]
    async fn test_failed_generation_discards_previous_quiz() {
        let quiz_json = ten_questions_json();
        let model = MockModel::new(vec![quiz_json.as_str(), "not json"]);
        let mut app = buddy(model, None);

        app.on_quiz_topic_submitted("Optics").await.unwrap();
        app.on_answer_selected(0).unwrap();
        app.on_next_question().unwrap();

        let err = app.on_quiz_topic_submitted("Waves").await.unwrap_err();
        assert!(matches!(err, GenError::GenerationFailed(_)));

        // no stale quiz survives a failed regeneration: the old one is gone,
        // progress included, and there is nothing left to answer
        assert!(app.session().quiz().is_none());
        assert_eq!(
            app.on_answer_selected(0).unwrap_err(),
            QuizError::NoActiveQuiz
        );
    }

    #[tokio::test]
    async fn test_document_upload_happy_path() {
        let model = MockModel::new(vec![ANALYSIS_REPLY]);
        let mut app = buddy(model, Some("->q1 ->wrong ->right"));

        let analysis = app.on_document_uploaded(b"%PDF-1.4 ...").await.unwrap();
        assert_eq!(analysis.analysis.accuracy_percentage, 25.0);

        assert!(app.session().weak_topics().contains("kinematics"));
        assert_eq!(
            app.session().analysis().unwrap().summary,
            "Needs practice on motion problems."
        );
    }

    #[tokio::test]
    async fn test_empty_document_is_an_input_error() {
        let model = MockModel::new(vec![ANALYSIS_REPLY]);
        let mut app = buddy(model, Some("   \n"));

        let err = app.on_document_uploaded(b"bytes").await.unwrap_err();
        assert!(matches!(err, UploadError::Document(DocumentError::Empty)));
        assert!(app.session().analysis().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_document_is_an_input_error() {
        let mut app = buddy(MockModel::new(vec![]), None);
        let err = app.on_document_uploaded(b"garbage").await.unwrap_err();
        assert!(matches!(
            err,
            UploadError::Document(DocumentError::Unreadable(_))
        ));
    }

    #[tokio::test]
    async fn test_feedback_requested() {
        let model = MockModel::new(vec!["Keep it up! Revise optics."]);
        let app = buddy(model, Some("test content"));

        let feedback = app.on_feedback_requested(b"bytes").await.unwrap();
        assert_eq!(feedback, "Keep it up! Revise optics.");
        // free-text feedback leaves the session alone
        assert!(app.session().analysis().is_none());
        assert!(app.session().weak_topics().is_empty());
    }

    #[tokio::test]
    async fn test_degraded_chat_reply() {
        let model = MockModel::with_results(vec![Err("down".to_string())]);
        let mut app = buddy(model, None);

        let reply = app.on_user_message("hello?").await;
        assert_eq!(reply, FALLBACK_REPLY);
        assert_eq!(app.session().transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_forgets_the_whole_session() {
        let quiz_json = ten_questions_json();
        let model = MockModel::new(vec!["sure!", "algebra", quiz_json.as_str()]);
        let mut app = buddy(model, None);

        app.on_user_message("algebra is hard").await;
        app.on_quiz_topic_submitted("Algebra").await.unwrap();

        app.clear();

        assert!(app.session().transcript().is_empty());
        assert!(app.session().weak_topics().is_empty());
        assert!(app.session().quiz().is_none());
        assert!(app.session().analysis().is_none());
    }
}
