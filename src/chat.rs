use crate::ai::client::LanguageModel;
use crate::logger;
use crate::models::ChatTurn;
use crate::session::SessionState;
use crate::topics;

/// Shown when the model cannot be reached. Displayed, never stored: the
/// transcript keeps only what the model actually said.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong. Please try again later.";

fn tutor_prompt(message: &str) -> String {
    format!(
        r#"You are a student support chatbot. The user is preparing for the Joint Entrance Exam (JEE).
Please provide an appropriate response to their message: "{}"

Format your response in a clear, helpful manner.
Keep information short and to the point.
Highlight important information when needed.
Keep the overall response brief and easy to read."#,
        message
    )
}

/// Runs one chat turn: records the user's message, sends the role-wrapped
/// prompt over the lazily opened conversational channel, mines the raw
/// message for weak topics on success, and records the reply.
///
/// Never fails from the caller's point of view. When the channel call errors
/// the caller gets the fallback text, the transcript gains no assistant turn,
/// the weak-topic set is untouched, and the error goes to the log.
pub async fn send_message(
    state: &mut SessionState,
    model: &dyn LanguageModel,
    message: &str,
) -> String {
    state.push_turn(ChatTurn::user(message));

    let prompt = tutor_prompt(message);
    let result = state.channel_mut(model).send(&prompt).await;

    match result {
        Ok(reply) => {
            let new_topics = topics::extract_topics(model, message).await;
            state.absorb_topics(new_topics);
            state.push_turn(ChatTurn::assistant(reply.clone()));
            reply
        }
        Err(e) => {
            logger::log(&format!("chat turn failed: {}", e));
            FALLBACK_REPLY.to_string()
        }
    }
}
