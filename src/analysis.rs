use crate::ai::client::{LanguageModel, DEFAULT_TEMPERATURE, STRICT_TEMPERATURE};
use crate::errors::{GenError, ParseError};
use crate::logger;
use crate::models::TestAnalysis;
use crate::parser::{self, JsonKind};
use crate::session::SessionState;

fn analysis_prompt(document_text: &str) -> String {
    format!(
        r#"You are analyzing a student's test results for JEE preparation. The document contains questions,
the student's answers, and the correct answers in the following format:

->question
->answer by student
->correct answer

Here is the extracted content from the test result:
{text}

Please analyze and respond with the following JSON structure:
{{
  "weak_topics": ["topic1", "topic2", ...],
  "analysis": {{
    "total_questions": number,
    "correct_answers": number,
    "incorrect_answers": number,
    "accuracy_percentage": number
  }},
  "question_analysis": [
    {{
      "question": "Question text",
      "student_answer": "Student's answer",
      "correct_answer": "Correct answer",
      "is_correct": boolean,
      "topic": "Related topic",
      "explanation": "Brief explanation of why the answer is correct/incorrect and what concept the student needs to focus on"
    }},
    ...
  ],
  "summary": "Brief overall analysis of student performance and recommendations"
}}

Return ONLY valid JSON with no additional text."#,
        text = document_text,
    )
}

fn feedback_prompt(document_text: &str) -> String {
    format!(
        r#"You are a smart AI learning assistant. A student has uploaded their test answers and solutions.

Here is the extracted content from the test result:
{text}

Please do the following:
1. Identify the subjects and topics covered.
2. Point out areas where the student seems to be struggling.
3. Provide motivational feedback.
4. Recommend personalized learning strategies and resources.

Keep your tone friendly and helpful."#,
        text = document_text,
    )
}

fn parse_analysis(raw: &str) -> Result<TestAnalysis, ParseError> {
    let value = parser::extract_json(raw, JsonKind::Object)?;
    Ok(serde_json::from_value(value)?)
}

/// Turns extracted test-result text into a structured analysis. On success
/// the weak topics are unioned into the session and the stored analysis is
/// replaced wholesale; on failure the session keeps whatever it had and the
/// caller gets `GenError::AnalysisFailed`.
pub async fn analyze(
    state: &mut SessionState,
    model: &dyn LanguageModel,
    document_text: &str,
) -> Result<TestAnalysis, GenError> {
    logger::log("analyzing uploaded test results");

    let prompt = analysis_prompt(document_text);
    let raw = model
        .generate(&prompt, STRICT_TEMPERATURE)
        .await
        .map_err(|e| {
            logger::log(&format!("analysis call failed: {}", e));
            GenError::AnalysisFailed(e.to_string())
        })?;

    let analysis = parse_analysis(&raw).map_err(|e| {
        logger::log(&format!("analysis reply was not a usable JSON object: {}", e));
        GenError::AnalysisFailed(e.to_string())
    })?;

    state.absorb_topics(analysis.weak_topics.iter().cloned());
    state.store_analysis(analysis.clone());
    Ok(analysis)
}

/// Free-text study feedback on a test result: topics covered, struggles,
/// encouragement, strategies. No JSON contract and no session mutation, so a
/// reply is passed through as-is.
pub async fn personalized_feedback(
    model: &dyn LanguageModel,
    document_text: &str,
) -> Result<String, GenError> {
    let prompt = feedback_prompt(document_text);
    model
        .generate(&prompt, DEFAULT_TEMPERATURE)
        .await
        .map_err(|e| {
            logger::log(&format!("feedback call failed: {}", e));
            GenError::AnalysisFailed(e.to_string())
        })
}
