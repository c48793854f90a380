use crate::error::{AnalyzerError, Result};
use crate::github::RepositorySnapshot;
use crate::schema::{AnalysisResult, InterviewQa, ProjectExplanation, ResumeBullet, VivaQuestion};
use serde_json::Value;

const EXPLANATION_FIELDS: &[&str] = &[
    "overview",
    "key_features",
    "tech_stack",
    "architecture",
    "challenges_solved",
    "impact",
];

const LIST_FIELDS: &[(&str, &str)] = &[
    ("resume_bullets", "No resume bullets generated"),
    ("viva_questions", "No viva questions generated"),
    ("interview_qa", "No interview Q&A generated"),
];

/// Checks the extracted completion JSON against the required schema
///
/// Violations are server faults: they reflect the model's non-compliance
/// with the output contract, not user error.
pub fn validate_analysis(value: &Value) -> Result<()> {
    for (key, _) in LIST_FIELDS {
        if value.get(key).is_none() {
            return Err(missing_field(key));
        }
    }
    let explanation = value
        .get("explanation")
        .ok_or_else(|| missing_field("explanation"))?;
    for field in EXPLANATION_FIELDS {
        if explanation.get(field).is_none() {
            return Err(AnalyzerError::SchemaViolation(format!(
                "Explanation missing required field: {field}"
            )));
        }
    }
    for (key, empty_message) in LIST_FIELDS {
        let non_empty = value[key].as_array().is_some_and(|items| !items.is_empty());
        if !non_empty {
            return Err(AnalyzerError::SchemaViolation((*empty_message).to_string()));
        }
    }
    Ok(())
}

fn missing_field(key: &str) -> AnalyzerError {
    AnalyzerError::SchemaViolation(format!("LLM response missing required field: {key}"))
}

/// Maps the validated completion JSON into the typed result
///
/// `repo_name`/`repo_owner` come from the snapshot; the model is not
/// trusted for identifying fields.
pub fn assemble(value: Value, snapshot: &RepositorySnapshot) -> Result<AnalysisResult> {
    validate_analysis(&value)?;

    let explanation: ProjectExplanation = deserialize_section(&value, "explanation")?;
    let resume_bullets: Vec<ResumeBullet> = deserialize_section(&value, "resume_bullets")?;
    let viva_questions: Vec<VivaQuestion> = deserialize_section(&value, "viva_questions")?;
    let interview_qa: Vec<InterviewQa> = deserialize_section(&value, "interview_qa")?;

    Ok(AnalysisResult {
        repo_name: snapshot.repo_name.clone(),
        repo_owner: snapshot.owner.clone(),
        explanation,
        resume_bullets,
        viva_questions,
        interview_qa,
    })
}

fn deserialize_section<T: serde::de::DeserializeOwned>(value: &Value, key: &str) -> Result<T> {
    serde_json::from_value(value[key].clone())
        .map_err(|e| AnalyzerError::SchemaViolation(format!("Invalid {key} structure: {e}")))
}
