use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Protected routes: the caller must wrap this router in the bearer-token
/// middleware so handlers can rely on the `CurrentUser` extension.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/track", post(handlers::track))
        .route("/dashboard", get(handlers::dashboard))
        .layer(Extension(service))
}
