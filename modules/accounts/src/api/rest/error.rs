use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::error::DomainError;

/// REST-boundary error: an HTTP status plus a JSON `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn missing_fields() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Username and password are required",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

/// Map domain errors to the REST boundary.
impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match &e {
            DomainError::MissingCredentials
            | DomainError::UsernameTooLong { .. }
            | DomainError::PasswordTooShort { .. } => {
                Self::new(StatusCode::BAD_REQUEST, e.to_string())
            }
            DomainError::UsernameTaken { .. } => Self::new(StatusCode::CONFLICT, e.to_string()),
            DomainError::InvalidCredentials => Self::new(StatusCode::UNAUTHORIZED, e.to_string()),
            DomainError::TokenIssue
            | DomainError::PasswordHash { .. }
            | DomainError::Database { .. } => {
                // Log the internal details but don't expose them to the client
                tracing::error!(error = %e, "Internal error in accounts API");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}
