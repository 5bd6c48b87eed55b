use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, SqlErr};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{LoginOutcome, NewUser, User};
use crate::domain::error::DomainError;
use crate::infra::storage::entity;
use auth::TokenIssuer;

/// Domain service with business rules for account management.
pub struct Service {
    db: DatabaseConnection,
    issuer: Arc<TokenIssuer>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_username_length: usize,
    pub min_password_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_username_length: 64,
            min_password_length: 4,
        }
    }
}

impl Service {
    pub fn new(db: DatabaseConnection, issuer: Arc<TokenIssuer>, config: ServiceConfig) -> Self {
        Self { db, issuer, config }
    }

    #[instrument(name = "accounts.service.register", skip(self, new_user), fields(username = %new_user.username))]
    pub async fn register(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Registering new user");

        self.validate_new_user(&new_user)?;

        if entity::username_exists(&self.db, &new_user.username)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Err(DomainError::username_taken(new_user.username));
        }

        let password_hash = hash_password(&new_user.password)?;

        let created = entity::create(
            &self.db,
            entity::NewUserEntity {
                id: Uuid::new_v4(),
                username: new_user.username.clone(),
                password_hash,
                created_at: Utc::now(),
            },
        )
        .await
        .map_err(|e| {
            // Backstop for a register racing past the username_exists check:
            // the unique constraint still reports the conflict.
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                DomainError::username_taken(new_user.username.clone())
            } else {
                DomainError::database(e.to_string())
            }
        })?;

        info!("Successfully registered user with id={}", created.id);
        Ok(User {
            id: created.id,
            username: created.username,
            created_at: created.created_at,
        })
    }

    #[instrument(name = "accounts.service.login", skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, DomainError> {
        debug!("Attempting login");

        if username.trim().is_empty() || password.is_empty() {
            return Err(DomainError::missing_credentials());
        }

        let stored = entity::find_by_username(&self.db, username)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(DomainError::invalid_credentials)?;

        if !verify_password(password, &stored.password_hash)? {
            warn!("Login failed: wrong password");
            return Err(DomainError::invalid_credentials());
        }

        let token = self
            .issuer
            .issue(stored.id)
            .map_err(|_| DomainError::TokenIssue)?;

        info!("Login succeeded for user id={}", stored.id);
        Ok(LoginOutcome {
            user: User {
                id: stored.id,
                username: stored.username,
                created_at: stored.created_at,
            },
            token,
        })
    }

    // --- validation helpers ---

    fn validate_new_user(&self, new_user: &NewUser) -> Result<(), DomainError> {
        if new_user.username.trim().is_empty() || new_user.password.is_empty() {
            return Err(DomainError::missing_credentials());
        }
        if new_user.username.len() > self.config.max_username_length {
            return Err(DomainError::username_too_long(
                new_user.username.len(),
                self.config.max_username_length,
            ));
        }
        if new_user.password.len() < self.config.min_password_length {
            return Err(DomainError::password_too_short(
                self.config.min_password_length,
            ));
        }
        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| DomainError::password_hash(e.to_string()))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, DomainError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| {
        // A hash we cannot even parse means corrupted storage, not bad input.
        DomainError::password_hash(e.to_string())
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
