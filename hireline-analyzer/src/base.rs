//! Base trait for analyzer collaborators

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gaps::Gap;

/// Error type for analyzer operations
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// A single transcript entry forwarded to the analyzer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub role: String,
    pub content: String,
}

impl Turn {
    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// One conversational turn handed to the analyzer
#[derive(Debug, Clone, Serialize)]
pub struct TurnRequest {
    /// The latest user message
    pub message: String,
    /// All prior turns in arrival order, synthetic greeting excluded
    pub history: Vec<Turn>,
    /// Opaque subject context, passed through verbatim
    pub context: Option<serde_json::Value>,
}

/// Trait for analyzer collaborators
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Produce the assistant reply for one conversational turn
    async fn reply(&self, request: TurnRequest) -> AnalyzerResult<String>;

    /// One-shot review: generate targeted interview questions from a
    /// parsed resume/vacancy pair and the gaps found between them
    async fn interview_questions(
        &self,
        resume: &serde_json::Value,
        vacancy: &serde_json::Value,
        gaps: &[Gap],
    ) -> AnalyzerResult<String>;

    /// Get the model this analyzer talks to
    fn model(&self) -> String;
}
