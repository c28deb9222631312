//! Relay controller: one session's lifecycle
//!
//! The controller owns the transcript for the lifetime of the
//! connection and is driven by the transport task. The analyzer call is
//! the only suspension point; the controller never holds anything
//! another session could wait on.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use hireline_analyzer::{Analyzer, Turn, TurnRequest};
use hireline_core::session::Session;

use crate::envelope::{self, Frame};

/// Message sent to the analyzer when a session starts with a known context
pub const PRIMING_MESSAGE: &str = "Initialize conversation with application context";

/// Validation notice pushed to the client for undecodable envelopes
pub const INVALID_FORMAT_NOTICE: &str = "Error: Invalid format";

/// Connection lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Connecting,
    Open,
    Closed,
}

/// Owns one session's transcript and drives its conversation
pub struct RelayController {
    session: Session,
    analyzer: Arc<dyn Analyzer>,
    state: RelayState,
    greeting_enabled: bool,
}

impl RelayController {
    /// Create a controller for a freshly accepted connection
    pub fn new(session: Session, analyzer: Arc<dyn Analyzer>, greeting_enabled: bool) -> Self {
        Self {
            session,
            analyzer,
            state: RelayState::Connecting,
            greeting_enabled,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> RelayState {
        self.state
    }

    /// The session owned by this controller
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// CONNECTING -> OPEN.
    ///
    /// When a context was injected at session creation, sends the
    /// synthetic greeting and one priming call with empty history.
    /// Returns the frames to push to the client, in order. A priming
    /// failure is logged and leaves the session open.
    pub async fn open(&mut self) -> Vec<String> {
        if self.state != RelayState::Connecting {
            return Vec::new();
        }
        self.state = RelayState::Open;

        let mut frames = Vec::new();
        let Some(context) = self.session.context().cloned() else {
            debug!("Session {} opened without context", self.session.id);
            return frames;
        };

        if self.greeting_enabled {
            let greeting = greeting_text(&context);
            self.session.add_greeting(&greeting);
            frames.push(greeting);
        }

        let request = TurnRequest {
            message: PRIMING_MESSAGE.to_string(),
            history: Vec::new(),
            context: Some(context),
        };
        match self.analyzer.reply(request).await {
            Ok(text) => {
                self.session.add_assistant_message(&text);
                frames.push(text);
            }
            Err(e) => {
                warn!("Priming call failed for session {}: {}", self.session.id, e);
            }
        }

        frames
    }

    /// OPEN -> OPEN: process one inbound text frame.
    ///
    /// Returns the frame to push back to the client, or `None` for
    /// control frames. An analyzer failure yields an error-style reply;
    /// the session stays open either way.
    pub async fn handle_frame(&mut self, raw: &str) -> Option<String> {
        if self.state != RelayState::Open {
            return None;
        }

        match envelope::decode(raw) {
            Frame::Control => {
                debug!("Ignoring control frame on session {}", self.session.id);
                None
            }
            Frame::Invalid { reason } => {
                warn!(
                    "Dropping invalid envelope on session {}: {}",
                    self.session.id, reason
                );
                Some(INVALID_FORMAT_NOTICE.to_string())
            }
            Frame::Envelope(envelope) => {
                if let Some(context) = envelope.context {
                    // First write wins; the session context is immutable
                    // once set.
                    self.session.set_context(context);
                }

                // The transcript kept here is authoritative; the history
                // snapshot excludes the greeting and the message being
                // handled.
                let history: Vec<Turn> = self
                    .session
                    .history()
                    .iter()
                    .map(|m| Turn {
                        role: m.role.clone(),
                        content: m.content.clone(),
                    })
                    .collect();
                self.session.add_user_message(&envelope.message);

                let request = TurnRequest {
                    message: envelope.message,
                    history,
                    context: self.session.context().cloned(),
                };

                let reply = match self.analyzer.reply(request).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Analyzer call failed on session {}: {}", self.session.id, e);
                        format!("Error: {}", e)
                    }
                };

                self.session.add_assistant_message(&reply);
                Some(reply)
            }
        }
    }

    /// OPEN -> CLOSED. Nothing is sent on the transport afterwards.
    pub fn close(&mut self) {
        if self.state != RelayState::Closed {
            self.state = RelayState::Closed;
            info!(
                "Session {} closed after {} messages",
                self.session.id,
                self.session.messages.len()
            );
        }
    }
}

fn greeting_text(context: &Value) -> String {
    let first_name = context.get("first_name").and_then(Value::as_str);
    let score = context.get("matching_score").and_then(Value::as_f64);

    match (first_name, score) {
        (Some(name), Some(score)) => format!(
            "Hello {}! I'm here to help clarify your application. \
             Your current matching score is {}%. Let me ask you a few questions.",
            name, score
        ),
        (Some(name), None) => format!(
            "Hello {}! I'm here to help clarify your application. \
             Let me ask you a few questions.",
            name
        ),
        _ => "Hello! I'm here to help clarify your application. \
              Let me ask you a few questions."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hireline_analyzer::{AnalyzerError, AnalyzerResult, Gap};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    enum Scripted {
        Text(&'static str),
        Fail,
    }

    /// Analyzer double that records requests and plays back a script
    struct ScriptedAnalyzer {
        script: Mutex<VecDeque<Scripted>>,
        requests: Mutex<Vec<TurnRequest>>,
    }

    impl ScriptedAnalyzer {
        fn new(script: Vec<Scripted>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<TurnRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Analyzer for ScriptedAnalyzer {
        async fn reply(&self, request: TurnRequest) -> AnalyzerResult<String> {
            self.requests.lock().unwrap().push(request);
            match self.script.lock().unwrap().pop_front() {
                Some(Scripted::Text(text)) => Ok(text.to_string()),
                Some(Scripted::Fail) => {
                    Err(AnalyzerError::ApiError("scripted failure".to_string()))
                }
                None => panic!("script exhausted"),
            }
        }

        async fn interview_questions(
            &self,
            _resume: &Value,
            _vacancy: &Value,
            _gaps: &[Gap],
        ) -> AnalyzerResult<String> {
            unimplemented!("not used by the relay")
        }

        fn model(&self) -> String {
            "scripted".to_string()
        }
    }

    fn controller_without_context(script: Vec<Scripted>) -> (RelayController, Arc<ScriptedAnalyzer>) {
        let analyzer = ScriptedAnalyzer::new(script);
        let session = Session::new("s-1", "app-1", None);
        (
            RelayController::new(session, analyzer.clone(), true),
            analyzer,
        )
    }

    #[tokio::test]
    async fn test_open_without_context_sends_nothing() {
        let (mut controller, analyzer) = controller_without_context(vec![]);
        let frames = controller.open().await;

        assert!(frames.is_empty());
        assert_eq!(controller.state(), RelayState::Open);
        assert!(analyzer.requests().is_empty());
    }

    #[tokio::test]
    async fn test_open_with_context_primes_before_any_user_frame() {
        let analyzer = ScriptedAnalyzer::new(vec![Scripted::Text("Let's begin.")]);
        let context = json!({"first_name": "Ana", "matching_score": 82});
        let session = Session::new("s-1", "app-1", Some(context.clone()));
        let mut controller = RelayController::new(session, analyzer.clone(), true);

        let frames = controller.open().await;

        assert_eq!(frames.len(), 2);
        assert!(frames[0].contains("Hello Ana!"));
        assert!(frames[0].contains("82%"));
        assert_eq!(frames[1], "Let's begin.");

        let requests = analyzer.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].message, PRIMING_MESSAGE);
        assert!(requests[0].history.is_empty());
        assert_eq!(requests[0].context, Some(context));

        // The greeting is flagged and excluded from forwarded history;
        // the surfaced priming reply is a normal assistant turn.
        let history = controller.session().history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "Let's begin.");
    }

    #[tokio::test]
    async fn test_priming_failure_keeps_session_open() {
        let analyzer = ScriptedAnalyzer::new(vec![Scripted::Fail, Scripted::Text("Hi there.")]);
        let session = Session::new("s-1", "app-1", Some(json!({"first_name": "Ana"})));
        let mut controller = RelayController::new(session, analyzer.clone(), true);

        let frames = controller.open().await;
        // Greeting still goes out; the failed priming reply does not.
        assert_eq!(frames.len(), 1);
        assert_eq!(controller.state(), RelayState::Open);

        let reply = controller.handle_frame(r#"{"message": "Hello"}"#).await;
        assert_eq!(reply.as_deref(), Some("Hi there."));
    }

    #[tokio::test]
    async fn test_greeting_can_be_disabled() {
        let analyzer = ScriptedAnalyzer::new(vec![Scripted::Text("Primed.")]);
        let session = Session::new("s-1", "app-1", Some(json!({"first_name": "Ana"})));
        let mut controller = RelayController::new(session, analyzer.clone(), false);

        let frames = controller.open().await;
        assert_eq!(frames, vec!["Primed.".to_string()]);
    }

    #[tokio::test]
    async fn test_turn_forwards_transcript_minus_greeting() {
        let analyzer = ScriptedAnalyzer::new(vec![
            Scripted::Text("Hello, how can I help?"),
            Scripted::Text("Good to hear."),
        ]);
        let session = Session::new("s-1", "app-1", None);
        let mut controller = RelayController::new(session, analyzer.clone(), true);
        controller.open().await;

        let reply = controller
            .handle_frame(r#"{"message": "Hi", "history": []}"#)
            .await;
        assert_eq!(reply.as_deref(), Some("Hello, how can I help?"));

        let reply = controller.handle_frame(r#"{"message": "Doing well"}"#).await;
        assert_eq!(reply.as_deref(), Some("Good to hear."));

        let requests = analyzer.requests();
        assert_eq!(requests[0].message, "Hi");
        assert!(requests[0].history.is_empty());
        assert!(requests[0].context.is_none());

        assert_eq!(requests[1].message, "Doing well");
        assert_eq!(
            requests[1].history,
            vec![Turn::user("Hi"), Turn::assistant("Hello, how can I help?")]
        );
    }

    #[tokio::test]
    async fn test_control_frames_never_touch_the_transcript() {
        let (mut controller, analyzer) = controller_without_context(vec![]);
        controller.open().await;

        assert!(controller.handle_frame("connected").await.is_none());
        assert!(controller.handle_frame("\"connected\"").await.is_none());
        assert!(controller.handle_frame("plain text").await.is_none());

        assert!(controller.session().messages.is_empty());
        assert!(analyzer.requests().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_envelope_yields_notice_and_drops_turn() {
        let (mut controller, analyzer) = controller_without_context(vec![]);
        controller.open().await;

        let reply = controller.handle_frame(r#"{"history": []}"#).await;
        assert_eq!(reply.as_deref(), Some(INVALID_FORMAT_NOTICE));
        assert!(controller.session().messages.is_empty());
        assert!(analyzer.requests().is_empty());
    }

    #[tokio::test]
    async fn test_analyzer_failure_is_visible_and_non_fatal() {
        let analyzer = ScriptedAnalyzer::new(vec![Scripted::Fail, Scripted::Text("Recovered.")]);
        let session = Session::new("s-1", "app-1", None);
        let mut controller = RelayController::new(session, analyzer.clone(), true);
        controller.open().await;

        let reply = controller.handle_frame(r#"{"message": "Hi"}"#).await;
        let reply = reply.unwrap();
        assert!(reply.starts_with("Error:"));
        assert_eq!(controller.state(), RelayState::Open);

        let reply = controller.handle_frame(r#"{"message": "Still there?"}"#).await;
        assert_eq!(reply.as_deref(), Some("Recovered."));
    }

    #[tokio::test]
    async fn test_envelope_context_is_set_once() {
        let analyzer = ScriptedAnalyzer::new(vec![
            Scripted::Text("first"),
            Scripted::Text("second"),
        ]);
        let session = Session::new("s-1", "app-1", None);
        let mut controller = RelayController::new(session, analyzer.clone(), true);
        controller.open().await;

        controller
            .handle_frame(r#"{"message": "Hi", "context": {"first_name": "Ana"}}"#)
            .await;
        controller
            .handle_frame(r#"{"message": "Again", "context": {"first_name": "Bob"}}"#)
            .await;

        let requests = analyzer.requests();
        assert_eq!(requests[0].context, Some(json!({"first_name": "Ana"})));
        assert_eq!(requests[1].context, Some(json!({"first_name": "Ana"})));
    }

    #[tokio::test]
    async fn test_frames_after_close_are_dropped() {
        let (mut controller, analyzer) = controller_without_context(vec![]);
        controller.open().await;
        controller.close();

        assert_eq!(controller.state(), RelayState::Closed);
        assert!(controller.handle_frame(r#"{"message": "Hi"}"#).await.is_none());
        assert!(analyzer.requests().is_empty());
    }
}
