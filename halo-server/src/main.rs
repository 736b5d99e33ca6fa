//! # Halo Server
//!
//! `halo-server` serves the image set document; `halo-server watch` fetches
//! it from a running server and prints the avatar cluster as images load.

#![allow(missing_docs)]

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use halo_config::{Config, ConfigLoad, ConfigLoader};
use halo_core::{HttpProbe, ImageSetClient};
use halo_server::{
    AppState, create_app,
    infra::telemetry::init_tracing,
    watch::{WatchOptions, watch},
};
use tracing::{info, warn};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "halo-server")]
#[command(about = "Image set endpoint and avatar cluster status client")]
struct Cli {
    /// Path to a halo.toml configuration file
    #[arg(long, global = true, env = "HALO_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Path to a .env file loaded before configuration
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the image set and print the cluster status as images load
    Watch(WatchArgs),
}

#[derive(ClapArgs, Debug, Clone)]
struct WatchArgs {
    /// Image set endpoint (overrides config)
    #[arg(long, env = "HALO_SOURCE_URL")]
    url: Option<String>,

    /// Caption shown under the set name
    #[arg(long)]
    location: Option<String>,

    /// Keep watching after every slot has settled
    #[arg(long, default_value_t = false)]
    follow: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_runtime_config(&cli)?;

    match cli.command {
        Some(Command::Watch(args)) => run_watch(config, args).await,
        None => run_server(config, cli.serve).await,
    }
}

fn load_runtime_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path.clone());
    }
    if let Some(path) = &cli.env_file {
        loader = loader.with_env_file(path.clone());
    }

    let ConfigLoad { config, warnings } =
        loader.load().context("failed to load configuration")?;

    init_tracing();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => {
                warn!(message = %warning.message, "configuration warning")
            }
        }
    }

    Ok(config)
}

async fn run_server(mut config: Config, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }

    let addr = config.server.bind_address();
    let app = create_app(AppState::from_config(&config));

    info!(
        image_set = %config.image_set.name,
        images = config.image_set.slot_count(),
        "Starting Halo server on {addr}"
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Halo server stopped");
    Ok(())
}

async fn run_watch(config: Config, args: WatchArgs) -> anyhow::Result<()> {
    let url = args.url.unwrap_or(config.source.url);
    let client = ImageSetClient::new(&url, config.source.timeout)
        .context("invalid image set source")?;
    let probe = Arc::new(HttpProbe::new(config.probe.timeout)?);
    let options = WatchOptions {
        policy: config.retry.policy(),
        location: args.location,
        follow: args.follow,
    };

    let mut stdout = std::io::stdout();
    match watch(&client, probe, &options, &mut stdout).await? {
        Some(view) if view.has_error => {
            warn!(name = %view.name, "cluster settled with errors");
        }
        Some(view) => info!(name = %view.name, "cluster settled"),
        None => info!("image set source has no data"),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
