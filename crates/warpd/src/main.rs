//! warpd — the WarpGrid actions daemon.
//!
//! Single binary that assembles:
//! - Serving platform store (redb)
//! - Action store + invocation bridge
//! - REST API
//!
//! # Usage
//!
//! ```text
//! warpd serve --port 8080 --data-dir /var/lib/warpgrid --gateway istio-ingress:80
//! ```

mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use config::{DaemonConfig, FileConfig};

#[derive(Parser)]
#[command(name = "warpd", about = "WarpGrid actions daemon", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the action API.
    Serve(ServeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// TOML config file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on [default: 8080].
    #[arg(long)]
    port: Option<u16>,

    /// Data directory for the serving store [default: /var/lib/warpgrid].
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Gateway host:port through which action hosts are reached. Required.
    #[arg(long)]
    gateway: Option<String>,

    /// Domain suffix for route hostnames [default: example.com].
    #[arg(long)]
    domain_suffix: Option<String>,
}

impl ServeArgs {
    fn resolve(self) -> anyhow::Result<DaemonConfig> {
        let file = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        let flags = FileConfig {
            port: self.port,
            data_dir: self.data_dir,
            gateway: self.gateway,
            domain_suffix: self.domain_suffix,
        };
        Ok(file.merge(flags).validate()?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,warpd=debug,warpgrid=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => {
            let config = args.resolve()?;
            run_serve(config).await
        }
    }
}

async fn run_serve(config: DaemonConfig) -> anyhow::Result<()> {
    info!(gateway = %config.gateway, "WarpGrid actions daemon starting");

    // Ensure data directory exists.
    std::fs::create_dir_all(&config.data_dir)?;
    let db_path = config.data_dir.join("serving.redb");

    // ── Initialize subsystems ──────────────────────────────────

    let serving = warpgrid_serving::ServingStore::open(&db_path)?
        .with_domain_suffix(config.domain_suffix.clone());
    info!(path = ?db_path, domain_suffix = %config.domain_suffix, "serving store opened");

    // ── Start API server ───────────────────────────────────────

    let router = warpgrid_api::build_router(Arc::new(serving), config.gateway);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("WarpGrid actions daemon stopped");
    Ok(())
}
