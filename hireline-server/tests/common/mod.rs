#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hireline_analyzer::{Analyzer, AnalyzerError, AnalyzerResult, Gap, TurnRequest};

pub enum Scripted {
    Text(&'static str),
    Fail,
}

/// Analyzer double that records every request and plays back a script
pub struct ScriptedAnalyzer {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<TurnRequest>>,
}

impl ScriptedAnalyzer {
    pub fn new(script: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<TurnRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self) -> AnalyzerResult<String> {
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Text(text)) => Ok(text.to_string()),
            Some(Scripted::Fail) => Err(AnalyzerError::ApiError("scripted failure".to_string())),
            None => Err(AnalyzerError::ApiError("script exhausted".to_string())),
        }
    }
}

#[async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn reply(&self, request: TurnRequest) -> AnalyzerResult<String> {
        self.requests.lock().unwrap().push(request);
        self.next()
    }

    async fn interview_questions(
        &self,
        _resume: &Value,
        _vacancy: &Value,
        _gaps: &[Gap],
    ) -> AnalyzerResult<String> {
        self.next()
    }

    fn model(&self) -> String {
        "scripted".to_string()
    }
}

/// Analyzer double whose reply encodes what it was given
pub struct EchoAnalyzer;

#[async_trait]
impl Analyzer for EchoAnalyzer {
    async fn reply(&self, request: TurnRequest) -> AnalyzerResult<String> {
        Ok(format!("echo:{}:{}", request.history.len(), request.message))
    }

    async fn interview_questions(
        &self,
        _resume: &Value,
        _vacancy: &Value,
        gaps: &[Gap],
    ) -> AnalyzerResult<String> {
        Ok(format!("questions:{}", gaps.len()))
    }

    fn model(&self) -> String {
        "echo".to_string()
    }
}

/// Analyzer double that answers after a delay
pub struct SlowAnalyzer {
    pub delay: Duration,
}

#[async_trait]
impl Analyzer for SlowAnalyzer {
    async fn reply(&self, _request: TurnRequest) -> AnalyzerResult<String> {
        tokio::time::sleep(self.delay).await;
        Ok("late reply".to_string())
    }

    async fn interview_questions(
        &self,
        _resume: &Value,
        _vacancy: &Value,
        _gaps: &[Gap],
    ) -> AnalyzerResult<String> {
        tokio::time::sleep(self.delay).await;
        Ok("late questions".to_string())
    }

    fn model(&self) -> String {
        "slow".to_string()
    }
}
