/// A single time-on-site observation pushed by the browser extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub website_url: String,
    /// Display title for the site; last write wins, never accumulated.
    pub website_title: Option<String>,
    /// Additional observed seconds, non-negative.
    pub seconds: i64,
}

/// Per-site total within an aggregation window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteTotal {
    pub website_url: String,
    pub total_time: i64,
}
