//! History listing HTTP handler.

use axum::Json;
use axum::extract::State;

use iaped_types::session::SessionSummary;

use crate::http::error::AppError;
use crate::http::extractors::identity::CallerIdentity;
use crate::state::AppState;

/// GET /chat/history - One `{id, created_at, first_msg, last_msg}` summary
/// per session owned by the caller, newest first.
pub async fn list_session_summaries(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<Vec<SessionSummary>>, AppError> {
    let summaries = state.history.list_session_summaries(&caller.0).await?;
    Ok(Json(summaries))
}
