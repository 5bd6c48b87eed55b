use axum::{extract::Query, response::Json, Extension};
use std::sync::Arc;
use tracing::info;

use auth::CurrentUser;

use crate::api::rest::dto::{DashboardQuery, SiteTotalDto, TrackReq, TrackResp};
use crate::api::rest::error::ApiError;
use crate::domain::service::Service;
use crate::domain::window::Window;

/// Record a time-on-site observation for the authenticated user
pub async fn track(
    Extension(svc): Extension<Arc<Service>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(req): Json<TrackReq>,
) -> Result<Json<TrackResp>, ApiError> {
    info!("Handling track request");

    let observation = req.into_observation().ok_or_else(ApiError::missing_fields)?;
    svc.record(user_id, observation).await?;

    Ok(Json(TrackResp {
        message: "Time tracked successfully".to_string(),
    }))
}

/// Per-site totals for the authenticated user within the requested window
pub async fn dashboard(
    Extension(svc): Extension<Arc<Service>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Vec<SiteTotalDto>>, ApiError> {
    info!("Handling dashboard request with range: {:?}", query.range);

    let window = Window::from_query(query.range.as_deref());
    let totals = svc.dashboard(user_id, window).await?;

    Ok(Json(totals.into_iter().map(SiteTotalDto::from).collect()))
}
