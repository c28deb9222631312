//! Prompt construction for the analyzer
//!
//! The chat prompt walks the applicant through the vacancy requirements
//! their resume did not fully match; the review prompt asks for
//! targeted interview questions from the computed gaps.

use serde_json::Value;

use crate::gaps::Gap;

/// Reply used when a review finds nothing to ask about
pub const NO_GAPS_MESSAGE: &str =
    "No significant differences found. The candidate appears to be a good match.";

/// Requirements matched below this percentage need clarification
const CLARIFY_MATCH_THRESHOLD: f64 = 80.0;

/// Build the system prompt for one conversational turn.
///
/// `questions_asked` is the number of assistant turns already in the
/// transcript — each one asked about a requirement, the priming reply
/// included. It selects which unresolved requirement to ask about
/// next, so the question sequence needs no per-session prompt state.
pub fn chat_system_prompt(context: Option<&Value>, questions_asked: usize) -> String {
    let Some(context) = context else {
        return generic_prompt();
    };

    let unresolved = unresolved_requirements(context);
    if unresolved.is_empty() {
        return generic_prompt();
    }

    if questions_asked >= unresolved.len() {
        return "You are an HR assistant wrapping up.\n\n\
                All requirements have been clarified.\n\
                Thank the applicant briefly (under 15 words) and let them know \
                their application will be reviewed."
            .to_string();
    }

    let current = unresolved[questions_asked];
    let vacancy_req = field_text(current, "vacancy_req");
    let user_req_data = field_text(current, "user_req_data");

    if questions_asked > 0 {
        format!(
            "You are an HR assistant. The user just answered a question.\n\n\
             Now ask about this next requirement:\n\
             - Requirement: {}\n\
             - Current info: {}\n\n\
             Rules:\n\
             1. Start with \"Got it.\" or \"Thanks.\"\n\
             2. Immediately ask the next question\n\
             3. Keep total response under 25 words\n\
             4. Be direct and professional",
            vacancy_req, user_req_data
        )
    } else {
        let applicant = applicant_line(context);
        format!(
            "You are an HR assistant. Ask ONE short question to clarify this requirement.\n\
             {}\n\
             Requirement to clarify:\n\
             - {}\n\
             - Current data: {}\n\n\
             Rules:\n\
             1. Ask ONE specific question\n\
             2. Keep it under 20 words\n\
             3. Be direct and professional",
            applicant, vacancy_req, user_req_data
        )
    }
}

/// Build the one-shot review prompt from the documents and their gaps
pub fn interview_questions_prompt(resume: &Value, vacancy: &Value, gaps: &[Gap]) -> String {
    let gaps_text = if gaps.is_empty() {
        "No significant differences found.".to_string()
    } else {
        gaps.iter()
            .map(|gap| format!("- {}", gap.description))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are an experienced HR recruiter. Based on the following differences \
         between a candidate's resume and job requirements, generate 3-5 targeted \
         interview questions.\n\n\
         Candidate:\n{}\n\n\
         Vacancy:\n{}\n\n\
         DIFFERENCES:\n{}\n\n\
         GUIDELINES:\n\
         1. Ask about specific gaps in experience or skills\n\
         2. Inquire how the candidate would compensate for missing qualifications\n\
         3. Ask for examples that demonstrate relevant capabilities\n\
         4. Be professional but conversational\n\
         5. Focus on understanding potential rather than criticizing gaps\n\n\
         Generate 3-5 concise, targeted interview questions as a natural \
         conversation starter.",
        pretty(resume),
        pretty(vacancy),
        gaps_text
    )
}

fn generic_prompt() -> String {
    "You are a helpful assistant. Keep responses under 20 words.".to_string()
}

/// Requirements with a match below the clarification threshold
fn unresolved_requirements(context: &Value) -> Vec<&Value> {
    context
        .pointer("/matching_sections/requirements")
        .and_then(Value::as_array)
        .map(|requirements| {
            requirements
                .iter()
                .filter(|req| {
                    req.get("match_percent")
                        .and_then(Value::as_f64)
                        .unwrap_or(0.0)
                        < CLARIFY_MATCH_THRESHOLD
                })
                .collect()
        })
        .unwrap_or_default()
}

fn applicant_line(context: &Value) -> String {
    let first = context.get("first_name").and_then(Value::as_str);
    let last = context.get("last_name").and_then(Value::as_str);
    match (first, last) {
        (Some(first), Some(last)) => format!("\nApplicant: {} {}\n", first, last),
        (Some(first), None) => format!("\nApplicant: {}\n", first),
        _ => "\n".to_string(),
    }
}

fn field_text<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
