use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use hireline_analyzer::{analyze_documents, Gap};

use crate::state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let analyzer_status = if state.analyzer_configured {
        "configured"
    } else {
        "no_api_key"
    };
    Json(json!({
        "status": "ok",
        "analyzer_status": analyzer_status,
        "model": state.analyzer.model(),
        "open_sessions": state.registry.len(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RegisterApplicationRequest {
    /// Use this id; one is generated when absent
    pub id: Option<String>,
    /// Opaque subject context handed to the relay verbatim
    pub context: Value,
}

pub async fn register_application_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterApplicationRequest>,
) -> (StatusCode, Json<Value>) {
    let id = state.applications.register(payload.id, payload.context);
    tracing::info!("Registered application context {}", id);
    (StatusCode::CREATED, Json(json!({ "id": id })))
}

pub async fn get_application_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state.applications.get(&id).map(Json).ok_or((
        StatusCode::NOT_FOUND,
        Json(json!({ "status": "error", "message": "Application not found" })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume: Value,
    pub vacancy: Value,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub gaps: Vec<Gap>,
    pub questions: String,
}

/// One-shot review: structural gaps plus analyzer-generated questions
pub async fn analyze_handler(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<Value>)> {
    let gaps = analyze_documents(&payload.resume, &payload.vacancy);

    match state
        .analyzer
        .interview_questions(&payload.resume, &payload.vacancy, &gaps)
        .await
    {
        Ok(questions) => Ok(Json(AnalyzeResponse { gaps, questions })),
        Err(e) => {
            tracing::error!("Review call failed: {}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "status": "error", "message": e.to_string() })),
            ))
        }
    }
}
