//! User accounts module: registration and login over the `users` table.
//!
//! Layered the same way as the other domain modules:
//! - `api/rest`: DTOs, handlers, routes, error mapping
//! - `contract`: models exposed to other modules
//! - `domain`: business rules (validation, hashing, token issue)
//! - `infra/storage`: SeaORM entity and migrations

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;
