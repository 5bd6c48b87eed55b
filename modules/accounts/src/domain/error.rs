use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Username too long: {len} characters (max: {max})")]
    UsernameTooLong { len: usize, max: usize },

    #[error("Password too short (min: {min} characters)")]
    PasswordTooShort { min: usize },

    #[error("Username '{username}' is already taken")]
    UsernameTaken { username: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Failed to issue token")]
    TokenIssue,

    #[error("Password hashing error: {message}")]
    PasswordHash { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn missing_credentials() -> Self {
        Self::MissingCredentials
    }

    pub fn username_too_long(len: usize, max: usize) -> Self {
        Self::UsernameTooLong { len, max }
    }

    pub fn password_too_short(min: usize) -> Self {
        Self::PasswordTooShort { min }
    }

    pub fn username_taken(username: impl Into<String>) -> Self {
        Self::UsernameTaken {
            username: username.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn password_hash(message: impl Into<String>) -> Self {
        Self::PasswordHash {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
