use crate::error::{AnalyzerError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Full GitHub repository URL pattern accepted by the analyze endpoint
static REPO_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://github\.com/[\w\-.]+/[\w\-.]+/?$").unwrap());

/// Request payload for repository analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRepoRequest {
    /// GitHub repository URL, e.g. `https://github.com/openai/whisper`
    pub repo_url: String,
    /// Analysis focus; validated for wire compatibility, the endpoint
    /// always generates the full material set
    #[serde(default)]
    pub focus: Focus,
}

/// Requested analysis focus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    Resume,
    Interview,
    Viva,
    #[default]
    All,
}

impl AnalyzeRepoRequest {
    /// Validates the request before any network call is made
    pub fn validate(&self) -> Result<()> {
        let url = self.repo_url.trim_end_matches('/');
        if !REPO_URL_RE.is_match(url) {
            return Err(AnalyzerError::InvalidUrl(self.repo_url.clone()));
        }
        Ok(())
    }
}

/// API response wrapper for the analyze endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRepoResponse {
    /// Whether analysis was successful
    pub success: bool,
    /// Analysis results when successful
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AnalysisResult>,
    /// Status message
    pub message: String,
    /// Error detail when failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Complete analysis result returned to the caller and accepted back by the
/// export endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Repository name
    pub repo_name: String,
    /// Repository owner
    pub repo_owner: String,
    /// Structured project explanation
    pub explanation: ProjectExplanation,
    /// Resume bullet points
    pub resume_bullets: Vec<ResumeBullet>,
    /// Viva examination questions
    pub viva_questions: Vec<VivaQuestion>,
    /// Interview question/answer pairs
    pub interview_qa: Vec<InterviewQa>,
}

/// Structured project explanation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectExplanation {
    /// High-level project overview
    pub overview: String,
    /// Main features/capabilities
    pub key_features: Vec<String>,
    /// Technologies used
    pub tech_stack: Vec<String>,
    /// System architecture description
    pub architecture: String,
    /// Key problems solved
    pub challenges_solved: Vec<String>,
    /// Project impact/value
    pub impact: String,
}

/// Individual resume bullet point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeBullet {
    /// Formatted resume bullet point (STAR method)
    pub point: String,
}

/// Viva examination question with answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VivaQuestion {
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
}

/// Graduated question difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Interview question and sample answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewQa {
    pub question: String,
    pub answer: String,
    pub category: Category,
}

/// Interview question category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Technical,
    Behavioral,
    ProjectSpecific,
}

/// Request payload for follow-up chat questions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Free-form question about the analyzed repository
    pub question: String,
    /// Previously generated analysis, supplied back by the client
    #[serde(default)]
    pub context: serde_json::Value,
}

/// Chat endpoint response
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}
