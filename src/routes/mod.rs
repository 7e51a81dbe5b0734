//! HTTP routes
//!
//! The page and its form posts live at the root; the same operations are
//! exposed as JSON under `/api`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{delete, get, post, put},
    Form, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{ConversationSnapshot, Orchestrator, Rejection, SubmitOutcome};
use crate::ui;
use crate::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Submission task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Notification not found: {0}")]
    NotificationNotFound(Uuid),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotificationNotFound(_) => StatusCode::NOT_FOUND,
        };
        tracing::debug!(error = %self, "Request failed");
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SendForm {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub outcome: SubmitOutcome,
    pub conversation: ConversationSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WebSearchSetting {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub text: String,
}

/// Run a submission on its own task so a dropped connection does not cancel
/// the outstanding completion.
async fn submit_detached(
    orchestrator: Arc<Orchestrator>,
    text: String,
) -> Result<SubmitOutcome, ApiError> {
    let task = tokio::spawn(async move { orchestrator.submit(&text).await });
    Ok(task.await?)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(ui::render_page(
        &state.interface,
        &state.orchestrator.snapshot(),
    ))
}

/// Redirects as soon as the draft is dispatched. The page shows the thinking
/// indicator and refreshes until the reply lands.
async fn send_form(State(state): State<AppState>, Form(form): Form<SendForm>) -> Redirect {
    state.orchestrator.set_draft(form.message);
    match state.orchestrator.dispatch_draft() {
        Ok(_) => {}
        Err(Rejection::AlreadyBusy) => tracing::debug!("Draft kept, a completion is outstanding"),
        Err(Rejection::EmptyInput) => tracing::debug!("Blank draft ignored"),
    }
    Redirect::to("/")
}

async fn toggle_web_search_form(State(state): State<AppState>) -> Redirect {
    let enabled = state.orchestrator.toggle_web_search();
    tracing::debug!(enabled, "Web search toggled");
    Redirect::to("/")
}

async fn dismiss_form(State(state): State<AppState>, Path(id): Path<Uuid>) -> Redirect {
    state.orchestrator.dismiss_notification(id);
    Redirect::to("/")
}

async fn conversation(State(state): State<AppState>) -> Json<ConversationSnapshot> {
    Json(state.orchestrator.snapshot())
}

async fn post_message(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let outcome = submit_detached(state.orchestrator.clone(), request.message).await?;

    Ok(Json(MessageResponse {
        outcome,
        conversation: state.orchestrator.snapshot(),
    }))
}

async fn put_web_search(
    State(state): State<AppState>,
    Json(setting): Json<WebSearchSetting>,
) -> Json<WebSearchSetting> {
    state.orchestrator.set_web_search(setting.enabled);
    Json(setting)
}

async fn put_draft(State(state): State<AppState>, Json(request): Json<DraftRequest>) -> StatusCode {
    state.orchestrator.set_draft(request.text);
    StatusCode::NO_CONTENT
}

async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.orchestrator.dismiss_notification(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotificationNotFound(id))
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/send", post(send_form))
        .route("/web-search", post(toggle_web_search_form))
        .route("/notifications/:id/dismiss", post(dismiss_form))
        .route("/api/conversation", get(conversation))
        .route("/api/messages", post(post_message))
        .route("/api/web-search", put(put_web_search))
        .route("/api/draft", put(put_draft))
        .route("/api/notifications/:id", delete(delete_notification))
}
