//! Configuration validation rules.

use super::schema::Config;

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push("server.host must not be empty".to_string());
    }
    if config.server.port == 0 {
        errors.push("server.port must be > 0".to_string());
    }

    if config.analyzer.model.trim().is_empty() {
        errors.push("analyzer.model must not be empty".to_string());
    }
    if config.analyzer.chat_max_tokens == 0 {
        errors.push("analyzer.chat_max_tokens must be > 0".to_string());
    }
    if config.analyzer.review_max_tokens == 0 {
        errors.push("analyzer.review_max_tokens must be > 0".to_string());
    }
    if !(0.0..=2.0).contains(&config.analyzer.chat_temperature) {
        errors.push("analyzer.chat_temperature must be in [0.0, 2.0]".to_string());
    }
    if !(0.0..=2.0).contains(&config.analyzer.review_temperature) {
        errors.push("analyzer.review_temperature must be in [0.0, 2.0]".to_string());
    }
    if config.analyzer.history_window == 0 {
        errors.push("analyzer.history_window must be > 0".to_string());
    }
    if let Some(base) = &config.analyzer.api_base {
        if base.trim().is_empty() {
            errors.push("analyzer.api_base must not be empty when set".to_string());
        }
    }

    if let Some(idle) = config.relay.idle_timeout_secs {
        if idle == 0 {
            errors.push("relay.idle_timeout_secs must be > 0 when set".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Validation(errors.join("; ")))
    }
}
