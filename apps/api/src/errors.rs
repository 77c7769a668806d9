use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::store::StoreError;
use crate::validation::FieldViolation;

/// Message returned for every failure that originates in the model round trip.
pub const AI_RESPONSE_INVALID: &str = "AI response invalid";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {} violation(s)", .0.len())]
    InvalidInput(Vec<FieldViolation>),

    /// Model call failed, returned nothing, or returned text that is not JSON.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Model output parsed but does not satisfy the ranked-result contract.
    #[error("AI response invalid: {} violation(s)", .0.len())]
    AiResponseInvalid(Vec<FieldViolation>),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) | AppError::AiResponseInvalid(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match &self {
            AppError::Unauthorized => ("UNAUTHORIZED", "Authentication required".to_string(), None),
            AppError::Forbidden => ("FORBIDDEN", "Access denied".to_string(), None),
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone(), None),
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone(), None),
            AppError::InvalidInput(violations) => (
                "VALIDATION_ERROR",
                "Invalid input".to_string(),
                Some(violations_json(violations)),
            ),
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream AI error: {msg}");
                ("AI_UPSTREAM_ERROR", AI_RESPONSE_INVALID.to_string(), None)
            }
            AppError::AiResponseInvalid(violations) => (
                "AI_RESPONSE_INVALID",
                AI_RESPONSE_INVALID.to_string(),
                Some(violations_json(violations)),
            ),
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

fn violations_json(violations: &[FieldViolation]) -> Value {
    serde_json::to_value(violations).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ai_response_invalid_carries_field_details() {
        let err = AppError::AiResponseInvalid(vec![FieldViolation::new(
            "items.0.score",
            "must be between 0 and 1",
        )]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "AI_RESPONSE_INVALID");
        assert_eq!(json["error"]["message"], AI_RESPONSE_INVALID);
        assert_eq!(json["error"]["details"][0]["path"], "items.0.score");
    }

    #[tokio::test]
    async fn test_internal_error_does_not_leak_cause() {
        let err = AppError::Internal(anyhow::anyhow!("connection string postgres://secret"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "An internal server error occurred");
        assert!(json["error"].get("details").is_none());
    }

    #[test]
    fn test_upstream_maps_to_bad_gateway() {
        assert_eq!(
            AppError::Upstream("timeout".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
    }
}
