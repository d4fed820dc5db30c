//! Application error type mapping to HTTP status codes and `{"detail": ...}` bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use iaped_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
///
/// Every body is `{"detail": "<human-readable reason>"}`. Backend failures
/// map to 502 so callers can tell "message sent, reply pending" apart from
/// a local server fault.
#[derive(Debug)]
pub enum AppError {
    /// Chat orchestration errors.
    Chat(ChatError),
    /// Request payload rejected before reaching the orchestration layer.
    BadRequest(String),
    /// Caller identity missing or malformed.
    Unauthorized(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Chat(ChatError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Chat(ChatError::SessionNotFound) => {
                (StatusCode::NOT_FOUND, "chat session not found".to_string())
            }
            AppError::Chat(ChatError::Gateway(e)) => (StatusCode::BAD_GATEWAY, e.to_string()),
            AppError::Chat(ChatError::Storage(e)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iaped_types::error::GatewayError;

    #[test]
    fn test_validation_maps_to_400() {
        let response =
            AppError::Chat(ChatError::Validation("message required".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::Chat(ChatError::SessionNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_gateway_failure_maps_to_502() {
        let response = AppError::Chat(ChatError::Gateway(GatewayError::RateLimited)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let response = AppError::BadRequest("invalid JSON body".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response = AppError::Unauthorized("missing caller identity".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_body_is_detail_envelope() {
        let response =
            AppError::Chat(ChatError::Validation("message too long".to_string())).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["detail"], "message too long");
    }
}
