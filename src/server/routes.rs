//! HTTP route handlers.
//!
//! Each endpoint maps onto one session operation; every failure becomes a
//! JSON `{"error": ...}` body with a matching status code.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::SharedState;
use crate::bot::{ConversationSession, Submission, Turn, CLEAR_ACKNOWLEDGEMENT};
use crate::error::BotError;

/// Request body for POST /api/chat. A missing `message` counts as empty.
#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub history: Vec<Turn>,
}

#[derive(Serialize)]
pub struct ClearResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub initialized: bool,
    pub model: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<BotError> for ApiError {
    fn from(err: BotError) -> Self {
        let status = match err {
            BotError::EmptyInput => StatusCode::BAD_REQUEST,
            BotError::Initialization(_) | BotError::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn initialized_session(state: &SharedState) -> Result<&Mutex<ConversationSession>, ApiError> {
    state
        .session()
        .ok_or_else(|| ApiError::internal("Bot not initialized"))
}

/// Handler for POST /api/chat
pub async fn chat_handler(
    State(state): State<Arc<SharedState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<ChatResponse> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("rejected chat request body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    let Some(session) = state.session() else {
        return Err(ApiError::internal(format!(
            "Bot not initialized: {}",
            state.init_error().unwrap_or("unknown error")
        )));
    };

    match Submission::parse(&request.message) {
        Submission::Empty => Err(BotError::EmptyInput.into()),
        Submission::Clear => {
            session.lock().await.clear();
            info!("conversation cleared by chat command");
            Ok(Json(ChatResponse {
                response: CLEAR_ACKNOWLEDGEMENT.to_string(),
            }))
        }
        Submission::Message(text) => {
            debug!("chat request: {} chars", text.len());
            let reply = session.lock().await.send(text).await.map_err(|e| {
                warn!("chat request failed: {}", e);
                ApiError::from(e)
            })?;
            Ok(Json(ChatResponse { response: reply }))
        }
    }
}

/// Handler for GET /api/history
pub async fn history_handler(State(state): State<Arc<SharedState>>) -> ApiResult<HistoryResponse> {
    let session = initialized_session(&state)?;
    let history = session.lock().await.history();
    Ok(Json(HistoryResponse { history }))
}

/// Handler for POST /api/clear
pub async fn clear_handler(State(state): State<Arc<SharedState>>) -> ApiResult<ClearResponse> {
    let session = initialized_session(&state)?;
    session.lock().await.clear();
    info!("conversation cleared");
    Ok(Json(ClearResponse {
        message: "Conversation cleared".to_string(),
    }))
}

/// Handler for GET /api/status
pub async fn status_handler(State(state): State<Arc<SharedState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        initialized: state.is_initialized(),
        model: state.model().to_string(),
    })
}
