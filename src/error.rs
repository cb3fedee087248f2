use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// One failed field check, shaped like an express-validator error entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'static str>,
}

impl FieldError {
    pub fn body(param: &str, value: Option<&str>, msg: &str) -> Self {
        Self {
            value: Some(value.unwrap_or_default().to_string()),
            msg: msg.to_string(),
            param: Some(param.to_string()),
            location: Some("body"),
        }
    }

    /// An error not tied to a single field (e.g. bad credentials).
    pub fn message(msg: &str) -> Self {
        Self {
            value: None,
            msg: msg.to_string(),
            param: None,
            location: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed ({} errors)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_authorized() -> Self {
        ApiError::Unauthorized("User not authorized".into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(errors) => {
                (status, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::BadRequest(msg) | ApiError::Unauthorized(msg) | ApiError::NotFound(msg) => {
                (status, Json(json!({ "msg": msg }))).into_response()
            }
            ApiError::Internal(e) => {
                error!(error = %e, "request failed");
                (status, "Server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_variants() {
        assert_eq!(
            ApiError::Validation(vec![]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::not_authorized().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::NotFound("Post not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(anyhow::anyhow!("db down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn field_error_serialization_omits_missing_parts() {
        let json = serde_json::to_value(FieldError::message("User already exists")).unwrap();
        assert_eq!(json, json!({ "msg": "User already exists" }));

        let json = serde_json::to_value(FieldError::body("text", None, "Text is require")).unwrap();
        assert_eq!(
            json,
            json!({ "value": "", "msg": "Text is require", "param": "text", "location": "body" })
        );
    }
}
