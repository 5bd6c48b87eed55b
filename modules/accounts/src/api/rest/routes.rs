use axum::{routing::post, Extension, Router};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Public routes: no bearer token required.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .layer(Extension(service))
}
