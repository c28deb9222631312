//! OpenAI-compatible chat-completions client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use hireline_core::config::AnalyzerConfig;

use crate::base::{Analyzer, AnalyzerError, AnalyzerResult, TurnRequest};
use crate::gaps::Gap;
use crate::prompt;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Chat-completions request format
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

impl WireMessage {
    fn system(content: String) -> Self {
        Self {
            role: "system",
            content,
        }
    }

    fn user(content: String) -> Self {
        Self {
            role: "user",
            content,
        }
    }

    fn assistant(content: String) -> Self {
        Self {
            role: "assistant",
            content,
        }
    }
}

/// Chat-completions response format
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Analyzer backed by an OpenAI-compatible chat-completions endpoint
pub struct OpenAiAnalyzer {
    client: Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
    chat_max_tokens: u32,
    chat_temperature: f32,
    review_max_tokens: u32,
    review_temperature: f32,
    history_window: usize,
}

impl OpenAiAnalyzer {
    /// Create a new analyzer client from configuration
    pub fn new(config: &AnalyzerConfig) -> Self {
        let api_base = config
            .api_base
            .clone()
            .filter(|base| !base.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let api_key = if config.api_key.trim().is_empty() {
            None
        } else {
            Some(config.api_key.clone())
        };

        Self {
            client: Client::new(),
            api_base,
            api_key,
            model: config.model.clone(),
            chat_max_tokens: config.chat_max_tokens,
            chat_temperature: config.chat_temperature,
            review_max_tokens: config.review_max_tokens,
            review_temperature: config.review_temperature,
            history_window: config.history_window,
        }
    }

    /// Whether an API key is configured
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn chat(
        &self,
        messages: Vec<WireMessage>,
        max_tokens: u32,
        temperature: f32,
    ) -> AnalyzerResult<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens,
            temperature,
        };

        debug!(
            "Sending chat request to {} with model {}",
            self.api_base, self.model
        );

        let url = format!("{}/chat/completions", self.api_base);
        let mut req_builder = self.client.post(&url).json(&request);
        if let Some(api_key) = &self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AnalyzerError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let response_data: ChatCompletionResponse = response.json().await?;
        let choice = response_data
            .choices
            .first()
            .ok_or_else(|| AnalyzerError::InvalidResponse("No choices in response".to_string()))?;

        let content = choice
            .message
            .content
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                AnalyzerError::InvalidResponse("Empty response content".to_string())
            })?;

        Ok(content.to_string())
    }
}

#[async_trait]
impl Analyzer for OpenAiAnalyzer {
    async fn reply(&self, request: TurnRequest) -> AnalyzerResult<String> {
        // Every prior assistant turn asked one clarification question;
        // the count picks the next requirement to cover.
        let questions_asked = request
            .history
            .iter()
            .filter(|turn| turn.role == "assistant")
            .count();
        let system = prompt::chat_system_prompt(request.context.as_ref(), questions_asked);

        let mut messages = vec![WireMessage::system(system)];

        // Only the most recent turns reach the model; the relay keeps
        // the full transcript.
        let start = request.history.len().saturating_sub(self.history_window);
        for turn in &request.history[start..] {
            if turn.role == "assistant" {
                messages.push(WireMessage::assistant(turn.content.clone()));
            } else {
                messages.push(WireMessage::user(turn.content.clone()));
            }
        }
        messages.push(WireMessage::user(request.message));

        self.chat(messages, self.chat_max_tokens, self.chat_temperature)
            .await
    }

    async fn interview_questions(
        &self,
        resume: &serde_json::Value,
        vacancy: &serde_json::Value,
        gaps: &[Gap],
    ) -> AnalyzerResult<String> {
        if gaps.is_empty() {
            return Ok(prompt::NO_GAPS_MESSAGE.to_string());
        }

        let messages = vec![WireMessage::user(prompt::interview_questions_prompt(
            resume, vacancy, gaps,
        ))];
        self.chat(messages, self.review_max_tokens, self.review_temperature)
            .await
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}
