//! Usage ledger module: per-user, per-site, per-day accumulated seconds.
//!
//! Writes are merge-on-conflict upserts so that concurrent observations for
//! the same (user, site, day) key all land in the final total; reads are
//! windowed per-site sums for the dashboard.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;
