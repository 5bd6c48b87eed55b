use serde::{Deserialize, Serialize};

use crate::contract::model::{Observation, SiteTotal};

/// REST DTO for the track request body.
///
/// Required fields are optional here so their absence maps to a 400
/// validation error rather than a deserialization rejection.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TrackReq {
    pub website_url: Option<String>,
    pub website_title: Option<String>,
    pub total_time_seconds: Option<i64>,
}

/// REST DTO for a successful track call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackResp {
    pub message: String,
}

/// Query parameters for the dashboard.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DashboardQuery {
    pub range: Option<String>,
}

/// REST DTO for one dashboard row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteTotalDto {
    pub website_url: String,
    pub total_time: i64,
}

impl TrackReq {
    /// Both required fields present; the title stays optional.
    pub fn into_observation(self) -> Option<Observation> {
        match (self.website_url, self.total_time_seconds) {
            (Some(website_url), Some(seconds)) => Some(Observation {
                website_url,
                website_title: self.website_title,
                seconds,
            }),
            _ => None,
        }
    }
}

impl From<SiteTotal> for SiteTotalDto {
    fn from(t: SiteTotal) -> Self {
        Self {
            website_url: t.website_url,
            total_time: t.total_time,
        }
    }
}
