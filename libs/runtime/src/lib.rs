//! Process-level runtime support for the WebTime Tracker server:
//! layered configuration loading and tracing/logging initialization.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{
    AppConfig, AuthConfig, CliArgs, DatabaseConfig, LoggingConfig, Section, ServerConfig,
};
