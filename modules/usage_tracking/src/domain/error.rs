use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("website_url is required")]
    MissingWebsiteUrl,

    #[error("total_time_seconds must be a non-negative integer")]
    InvalidDuration,

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn missing_website_url() -> Self {
        Self::MissingWebsiteUrl
    }

    pub fn invalid_duration() -> Self {
        Self::InvalidDuration
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
