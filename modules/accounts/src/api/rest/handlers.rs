use axum::{http::StatusCode, response::Json, Extension};
use std::sync::Arc;
use tracing::info;

use crate::api::rest::dto::{LoginReq, LoginResp, RegisterReq, RegisterResp};
use crate::api::rest::error::ApiError;
use crate::domain::service::Service;

/// Register a new user
pub async fn register(
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<RegisterReq>,
) -> Result<(StatusCode, Json<RegisterResp>), ApiError> {
    info!("Handling registration request");

    let new_user = req.into_new_user().ok_or_else(ApiError::missing_fields)?;
    let user = svc.register(new_user).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResp {
            message: "User registered successfully".to_string(),
            user_id: user.id,
        }),
    ))
}

/// Log in and receive a bearer token
pub async fn login(
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<LoginReq>,
) -> Result<Json<LoginResp>, ApiError> {
    info!("Handling login request");

    let (username, password) = match (req.username, req.password) {
        (Some(u), Some(p)) => (u, p),
        _ => return Err(ApiError::missing_fields()),
    };

    let outcome = svc.login(&username, &password).await?;

    Ok(Json(LoginResp {
        message: "Login successful".to_string(),
        token: outcome.token,
    }))
}
