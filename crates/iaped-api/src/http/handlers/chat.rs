//! Chat session HTTP handlers.
//!
//! Endpoints:
//! - POST /chat           - Open (create or reuse) a session
//! - GET  /chat           - List the caller's sessions
//! - GET  /chat/{id}      - Get a single session
//! - POST /chat/{id}/send - Send one message and get the updated session
//!
//! Built-in extractor rejections are mapped into the `{"detail": ...}`
//! envelope here: a non-UUID `{id}` is indistinguishable from an absent
//! session (404), a body that fails to parse is a 400.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use iaped_types::error::ChatError;
use iaped_types::session::SessionView;

use crate::http::error::AppError;
use crate::http::extractors::identity::CallerIdentity;
use crate::state::AppState;

/// Request body for POST /chat. The body itself is optional.
#[derive(Debug, Default, Deserialize)]
pub struct OpenSessionRequest {
    #[serde(default)]
    pub force_new: bool,
}

/// Request body for POST /chat/{id}/send. A missing `message` field behaves
/// like an empty one and is rejected by validation.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: String,
}

fn session_id(id: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    id.map(|Path(id)| id)
        .map_err(|_| AppError::Chat(ChatError::SessionNotFound))
}

/// POST /chat - Open a session: 200 with an existing empty session, or 201
/// with a newly created one.
pub async fn open_session(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<OpenSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let force_new = match body {
        Ok(Json(body)) => body.force_new,
        // No JSON body at all is fine; a body that fails to parse is not.
        Err(JsonRejection::MissingJsonContentType(_)) => false,
        Err(rejection) => return Err(AppError::BadRequest(rejection.body_text())),
    };

    let opened = state.gate.open_session(&caller.0, force_new).await?;
    let status = if opened.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(opened.session)))
}

/// GET /chat - All of the caller's sessions, newest first.
pub async fn list_sessions(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<Vec<SessionView>>, AppError> {
    let sessions = state.gate.list_owned_sessions(&caller.0).await?;
    Ok(Json(sessions))
}

/// GET /chat/{id} - One session with its full history; 404 when absent,
/// foreign, or not a valid id at all.
pub async fn get_session(
    State(state): State<AppState>,
    caller: CallerIdentity,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SessionView>, AppError> {
    let id = session_id(id)?;
    let session = state.gate.get_owned_session(&caller.0, id).await?;
    Ok(Json(session))
}

/// POST /chat/{id}/send - Run one turn and return the updated session.
pub async fn send_message(
    State(state): State<AppState>,
    caller: CallerIdentity,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SessionView>, AppError> {
    let id = session_id(id)?;
    let Json(body) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let session = state
        .orchestrator
        .send_message(id, &caller.0, &body.message)
        .await?;
    Ok(Json(session))
}
