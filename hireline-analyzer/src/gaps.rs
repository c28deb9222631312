//! Structural comparison of parsed resume and vacancy documents
//!
//! Pure field-by-field analysis with no I/O; the result feeds the
//! interview question prompt and the one-shot review endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Resume field, vacancy field, human-readable name
const FIELD_PAIRS: [(&str, &str, &str); 5] = [
    ("experience_years", "work_experience", "years of experience"),
    ("skills", "required_skills", "technical skills"),
    ("education", "education_requirements", "education background"),
    ("certifications", "required_certifications", "certifications"),
    ("languages", "language_requirements", "language skills"),
];

/// How a gap manifests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    /// Items required by the vacancy but absent from the resume
    MissingItems,
    /// Scalar values that disagree
    Mismatch,
}

/// A difference between a resume and a vacancy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gap {
    /// Human-readable field name
    pub field: String,
    /// Gap flavor
    pub kind: GapKind,
    /// Value found in the resume
    pub resume_value: Value,
    /// Value required by the vacancy
    pub vacancy_value: Value,
    /// Sentence used in prompts and API responses
    pub description: String,
}

/// Compare a parsed resume against a parsed vacancy.
///
/// Fields that are missing or empty on either side are skipped. List
/// fields report missing items; scalar fields report case-insensitive
/// mismatches. A final aggregate check covers required skills against
/// the resume skill list.
pub fn analyze_documents(resume: &Value, vacancy: &Value) -> Vec<Gap> {
    let mut gaps = Vec::new();

    for (resume_field, vacancy_field, field_name) in FIELD_PAIRS {
        let resume_value = resume.get(resume_field);
        let vacancy_value = vacancy.get(vacancy_field);

        let (Some(resume_value), Some(vacancy_value)) = (resume_value, vacancy_value) else {
            continue;
        };
        if is_empty_value(resume_value) || is_empty_value(vacancy_value) {
            continue;
        }

        match (resume_value.as_array(), vacancy_value.as_array()) {
            (Some(resume_items), Some(vacancy_items)) => {
                let have: BTreeSet<String> = resume_items.iter().map(value_text).collect();
                let missing: BTreeSet<String> = vacancy_items
                    .iter()
                    .map(value_text)
                    .filter(|item| !have.contains(item))
                    .collect();

                if !missing.is_empty() {
                    let joined = missing.iter().cloned().collect::<Vec<_>>().join(", ");
                    gaps.push(Gap {
                        field: field_name.to_string(),
                        kind: GapKind::MissingItems,
                        resume_value: resume_value.clone(),
                        vacancy_value: vacancy_value.clone(),
                        description: format!("Missing {}: {}", field_name, joined),
                    });
                }
            }
            _ => {
                let resume_text = value_text(resume_value);
                let vacancy_text = value_text(vacancy_value);
                if resume_text.trim().to_lowercase() != vacancy_text.trim().to_lowercase() {
                    gaps.push(Gap {
                        field: field_name.to_string(),
                        kind: GapKind::Mismatch,
                        resume_value: resume_value.clone(),
                        vacancy_value: vacancy_value.clone(),
                        description: format!(
                            "Resume shows '{}' but vacancy requires '{}' for {}",
                            resume_text, vacancy_text, field_name
                        ),
                    });
                }
            }
        }
    }

    // Aggregate skill check across required_skills and requirements
    let resume_skills: BTreeSet<String> = string_items(resume.get("skills"));
    let mut vacancy_reqs = string_items(vacancy.get("required_skills"));
    vacancy_reqs.extend(string_items(vacancy.get("requirements")));

    let missing_skills: BTreeSet<String> = vacancy_reqs
        .iter()
        .filter(|req| !resume_skills.contains(*req))
        .cloned()
        .collect();

    if !missing_skills.is_empty() {
        let joined = missing_skills.iter().cloned().collect::<Vec<_>>().join(", ");
        gaps.push(Gap {
            field: "missing_skills".to_string(),
            kind: GapKind::MissingItems,
            resume_value: Value::Array(resume_skills.into_iter().map(Value::String).collect()),
            vacancy_value: Value::Array(vacancy_reqs.into_iter().map(Value::String).collect()),
            description: format!("Missing required skills: {}", joined),
        });
    }

    gaps
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn string_items(value: Option<&Value>) -> BTreeSet<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().map(value_text).collect())
        .unwrap_or_default()
}
