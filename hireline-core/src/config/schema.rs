//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for hireline
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP/WebSocket server configuration
    pub server: ServerConfig,
    /// Analyzer collaborator configuration
    pub analyzer: AnalyzerConfig,
    /// Relay behavior configuration
    pub relay: RelayConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Analyzer collaborator configuration (OpenAI-compatible endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// API key for the chat-completions endpoint
    #[serde(default)]
    pub api_key: String,
    /// Override for the API base URL
    #[serde(default)]
    pub api_base: Option<String>,
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,
    /// Token cap for conversational turns
    #[serde(default = "default_chat_max_tokens")]
    pub chat_max_tokens: u32,
    /// Temperature for conversational turns
    #[serde(default = "default_chat_temperature")]
    pub chat_temperature: f32,
    /// Token cap for one-shot interview question generation
    #[serde(default = "default_review_max_tokens")]
    pub review_max_tokens: u32,
    /// Temperature for one-shot interview question generation
    #[serde(default = "default_review_temperature")]
    pub review_temperature: f32,
    /// How many recent transcript entries are forwarded to the model per turn
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_chat_max_tokens() -> u32 {
    100
}
fn default_chat_temperature() -> f32 {
    0.5
}
fn default_review_max_tokens() -> u32 {
    512
}
fn default_review_temperature() -> f32 {
    0.2
}
fn default_history_window() -> usize {
    2
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: None,
            model: default_model(),
            chat_max_tokens: default_chat_max_tokens(),
            chat_temperature: default_chat_temperature(),
            review_max_tokens: default_review_max_tokens(),
            review_temperature: default_review_temperature(),
            history_window: default_history_window(),
        }
    }
}

/// Relay behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Send a synthetic greeting when a registered context is found
    #[serde(default = "default_true")]
    pub greeting_enabled: bool,
    /// Close sessions that receive no frame within this window.
    /// Unset means sessions stay open until the client disconnects.
    #[serde(default)]
    pub idle_timeout_secs: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            greeting_enabled: true,
            idle_timeout_secs: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            overrides: HashMap::new(),
        }
    }
}
