// SPDX-License-Identifier: MIT

//! HTTP surface: chat relay, questionnaire sessions and report export

mod sessions;

pub use sessions::{SessionStore, SessionView};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::assistant::{FemiBot, Message, ModelProvider};
use crate::config::AppConfig;
use crate::error::{FemiverseError, ModelError};
use crate::report::HealthReport;
use crate::symptom::{AnswerValue, RuleBook};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    models: Arc<dyn ModelProvider>,
    sessions: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig, rules: RuleBook, models: Arc<dyn ModelProvider>) -> Self {
        Self {
            config: Arc::new(config),
            models,
            sessions: SessionStore::new(Arc::new(rules)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/chat", post(chat))
        .route("/api/report", post(create_report))
        .route("/api/checker/rules", get(get_rules))
        .route("/api/checker/sessions", post(create_session))
        .route(
            "/api/checker/sessions/{id}",
            get(get_session).delete(delete_session),
        )
        .route("/api/checker/sessions/{id}/answers", post(record_answer))
        .route("/api/checker/sessions/{id}/advance", post(advance))
        .route("/api/checker/sessions/{id}/retreat", post(retreat))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Log filter for the service: the `RUST_LOG` directives, or `info`
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

pub async fn serve(state: AppState, port: u16) -> Result<(), FemiverseError> {
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// JSON error body with a status derived from the error kind
pub struct ApiError(FemiverseError);

impl From<FemiverseError> for ApiError {
    fn from(err: FemiverseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            FemiverseError::InvalidAnswer { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            FemiverseError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            FemiverseError::Report(_) => StatusCode::BAD_REQUEST,
            FemiverseError::Model(e) => {
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            log::error!("Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    message: String,
    api_key: Option<String>,
    #[serde(default)]
    conversation_history: Vec<Message>,
}

async fn chat(State(state): State<AppState>, Json(payload): Json<ChatRequest>) -> Response {
    let session = match state.config.session(payload.api_key.as_deref()) {
        Ok(Some(session)) => session,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Gemini API key is required" })),
            )
                .into_response()
        }
        Err(e) => return ApiError(e).into_response(),
    };

    let bot = FemiBot::new(state.models.model_for(&session)).with_generation(session.generation);
    match bot
        .generate_reply(&payload.conversation_history, &payload.message)
        .await
    {
        Ok(text) => Json(json!({ "response": text })).into_response(),
        Err(e) => {
            log::error!("Chat API error: {}", e);
            let status = StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::BAD_GATEWAY);
            let details = match &e {
                ModelError::Status { body, .. } => {
                    serde_json::from_str::<Value>(body).unwrap_or_else(|_| json!(body))
                }
                other => json!(other.to_string()),
            };
            (
                status,
                Json(json!({
                    "error": "Failed to get response from Gemini API",
                    "details": details
                })),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
struct ReportRequest {
    conversation: Vec<Message>,
}

async fn create_report(Json(payload): Json<ReportRequest>) -> Result<Json<Value>, ApiError> {
    let report = HealthReport::from_transcript(&payload.conversation, Utc::now())?;
    Ok(Json(json!({
        "fileName": report.file_name(),
        "text": report.render_text(),
        "report": report,
    })))
}

async fn get_rules(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.sessions.rules()))
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    (StatusCode::CREATED, Json(state.sessions.create().await))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(state.sessions.view(id).await?))
}

async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.sessions.remove(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerRequest {
    question_id: String,
    value: AnswerValue,
}

async fn record_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state
        .sessions
        .update(id, |q| {
            q.record_answer(&payload.question_id, payload.value)?;
            Ok(SessionView::of(id, q))
        })
        .await?;
    Ok(Json(view))
}

async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let (outcome, view) = state.sessions.advance(id).await?;
    Ok(Json(json!({ "outcome": outcome, "session": view })))
}

async fn retreat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state
        .sessions
        .update(id, |q| {
            q.retreat();
            Ok(SessionView::of(id, q))
        })
        .await?;
    Ok(Json(view))
}
