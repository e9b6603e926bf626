//! blend-server - Persistence Service for coal blend records
//!
//! Serves create/update/get-latest over HTTP, backed by a SQLite database
//! in the resolved data folder.

use anyhow::{Context, Result};
use blend_common::config::{
    database_path, ensure_directory_exists, resolve_data_folder, DATA_FOLDER_ENV,
};
use blend_common::db::init_database;
use blend_server::{build_router, AppState};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments for blend-server
#[derive(Parser, Debug)]
#[command(name = "blend-server")]
#[command(about = "Coal blend record persistence service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "BLEND_PORT")]
    port: u16,

    /// Address to bind
    #[arg(short, long, default_value = "127.0.0.1", env = "BLEND_BIND")]
    bind: String,

    /// Folder holding blendlog.db (overrides env, config file and default)
    #[arg(short, long)]
    data_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    // Build identification first, before any database delay
    info!(
        "Starting blend-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let data_folder = resolve_data_folder(args.data_folder.as_deref(), DATA_FOLDER_ENV);
    ensure_directory_exists(&data_folder)?;

    let db_path = database_path(&data_folder);
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Record store ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let app = build_router(AppState::new(pool));

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", args.bind, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("blend-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
