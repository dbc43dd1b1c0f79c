use crate::ai::client::{LanguageModel, STRICT_TEMPERATURE};
use crate::logger;
use std::collections::BTreeSet;

/// Reply meaning "no weak topics in this message".
pub const NO_TOPICS_SENTINEL: &str = "none";

fn classification_prompt(message: &str) -> String {
    format!(
        r#"From the following student message, identify any weak topics or subjects the student might be struggling with.
If there are weak topics, respond with the list of topics separated by a single space. Respond with topic names only, nothing else.
If no weak topics are found, respond with "{}".

Message: "{}""#,
        NO_TOPICS_SENTINEL, message
    )
}

/// Classifies a raw student message into weak-topic candidates. Never fails:
/// a model error is logged and degrades to an empty set, so a flaky call can
/// never block the conversation. The caller decides what to union the result
/// into.
pub async fn extract_topics(model: &dyn LanguageModel, message: &str) -> BTreeSet<String> {
    let prompt = classification_prompt(message);
    match model.generate(&prompt, STRICT_TEMPERATURE).await {
        Ok(reply) => parse_topics(&reply),
        Err(e) => {
            logger::log(&format!("topic extraction failed: {}", e));
            BTreeSet::new()
        }
    }
}

/// Normalizes a classifier reply: trim, lower-case, sentinel check, then
/// whitespace tokenization.
fn parse_topics(reply: &str) -> BTreeSet<String> {
    let normalized = reply.trim().to_lowercase();
    if normalized == NO_TOPICS_SENTINEL {
        return BTreeSet::new();
    }
    normalized.split_whitespace().map(str::to_string).collect()
}
