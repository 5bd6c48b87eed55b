use anyhow::{anyhow, Result};
use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    // Rebuild DSN with absolute path and normalized slashes; add mode=rwc
    // only when the caller did not pick a mode themselves
    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    match query {
        Some(q) if q.split('&').any(|kv| kv.starts_with("mode=")) => {
            out.push('?');
            out.push_str(q);
        }
        Some(q) => {
            out.push_str("?mode=rwc&");
            out.push_str(q);
        }
        None => out.push_str("?mode=rwc"),
    }
    Ok(out)
}

/// WebTime Tracker Server - time-on-site ingestion and dashboards
#[derive(Parser)]
#[command(name = "webtime-server")]
#[command(about = "WebTime Tracker Server - time-on-site ingestion and dashboards")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (port / verbosity)
    config.apply_cli_overrides(&args);

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("WebTime Tracker Server starting");

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Execute command
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config),
    }
}

/// Detect DB backend from URL scheme (sqlite/postgres).
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim().to_owned();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(&raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

async fn connect_database(config: &AppConfig, args: &CliArgs) -> Result<DatabaseConnection> {
    let db_config = config
        .database
        .clone()
        .ok_or_else(|| anyhow!("No database configuration found"))?;

    let _backend = detect_from_dsn(&db_config)?;

    // Use URL from config; override with in-memory SQLite when --mock is set
    let mut final_dsn = if args.mock {
        "sqlite::memory:".to_string()
    } else {
        db_config.url.trim().to_owned()
    };

    // Absolutize sqlite DSNs to avoid cwd issues
    if final_dsn.starts_with("sqlite://") {
        final_dsn =
            absolutize_sqlite_dsn(&final_dsn, Path::new(&config.server.home_dir), true)?;
    }

    let mut options = ConnectOptions::new(final_dsn.clone());
    options
        .max_connections(db_config.max_conns.unwrap_or(10))
        .acquire_timeout(Duration::from_secs(5));

    tracing::info!("Connecting to database: {}", final_dsn);
    let db = Database::connect(options).await?;

    tracing::info!("Running migrations");
    accounts::infra::storage::migrations::Migrator::up(&db, None).await?;
    usage_tracking::infra::storage::migrations::Migrator::up(&db, None).await?;

    Ok(db)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build the HTTP router: public account routes, token-guarded usage
/// routes, and the middleware stack.
fn build_router(config: &AppConfig, db: DatabaseConnection) -> Router {
    let issuer = Arc::new(auth::TokenIssuer::new(
        &config.auth.token_secret,
        config.auth.token_ttl,
    ));

    let accounts_service = Arc::new(accounts::domain::service::Service::new(
        db.clone(),
        issuer.clone(),
        accounts::domain::service::ServiceConfig::default(),
    ));
    let usage_service = Arc::new(usage_tracking::domain::service::Service::new(db));

    let protected = usage_tracking::api::rest::routes::router(usage_service)
        .layer(from_fn_with_state(issuer.clone(), auth::require_auth));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .merge(accounts::api::rest::routes::router(accounts_service))
        .merge(protected);

    // Middleware stack, innermost added first:
    // body limit → CORS → timeout → trace → request-id set/propagate
    router = router.layer(RequestBodyLimitLayer::new(1024 * 1024));
    if config.server.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }
    router = router.layer(TimeoutLayer::new(Duration::from_secs(30)));
    router = router.layer(TraceLayer::new_for_http());
    router = router.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
    router = router.layer(PropagateRequestIdLayer::x_request_id());

    router
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let db = connect_database(&config, &args).await?;
    let router = build_router(&config, db);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!(e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("HTTP server shutting down gracefully (ctrl-c)");
}

fn check_config(config: AppConfig) -> Result<()> {
    if let Some(db_config) = &config.database {
        let backend = detect_from_dsn(db_config)?;
        println!("Database backend: {}", backend);
    } else {
        println!("No database configured");
    }
    if config.auth.token_secret.trim().is_empty() {
        return Err(anyhow!("auth.token_secret must not be empty"));
    }
    println!("Configuration OK");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolutize_keeps_memory_dsn() {
        let out = absolutize_sqlite_dsn("sqlite::memory:", Path::new("/base"), false).unwrap();
        assert_eq!(out, "sqlite::memory:");
    }

    #[test]
    fn absolutize_joins_relative_paths() {
        let out =
            absolutize_sqlite_dsn("sqlite://db/webtime.db", Path::new("/base"), false).unwrap();
        assert_eq!(out, "sqlite:///base/db/webtime.db?mode=rwc");
    }

    #[test]
    fn absolutize_respects_an_explicit_mode() {
        let out =
            absolutize_sqlite_dsn("sqlite://db.sqlite?mode=ro", Path::new("/base"), false).unwrap();
        assert_eq!(out, "sqlite:///base/db.sqlite?mode=ro");
    }

    #[test]
    fn absolutize_keeps_other_query_params() {
        let out = absolutize_sqlite_dsn("sqlite://db.sqlite?cache=shared", Path::new("/base"), false)
            .unwrap();
        assert_eq!(out, "sqlite:///base/db.sqlite?mode=rwc&cache=shared");
    }

    #[test]
    fn absolutize_rejects_non_sqlite() {
        assert!(absolutize_sqlite_dsn("postgres://x/y", Path::new("/base"), false).is_err());
    }

    #[test]
    fn dsn_scheme_detection() {
        let cfg = |url: &str| DatabaseConfig {
            url: url.to_string(),
            max_conns: None,
        };
        assert_eq!(detect_from_dsn(&cfg("sqlite://a.db")).unwrap(), "sqlite");
        assert_eq!(
            detect_from_dsn(&cfg("postgres://u:p@h/db")).unwrap(),
            "postgres"
        );
        assert!(detect_from_dsn(&cfg("mysql://h/db")).is_err());
        assert!(detect_from_dsn(&cfg("")).is_err());
    }
}
