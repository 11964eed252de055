use std::{net::SocketAddr, panic, path::PathBuf};

use anyhow::{ensure, Context};
use clap::Parser;
use format_lister::YtdlProvider;
use log::{error, info, LevelFilter};
use tokio::net::TcpListener;

use crate::config::Config;

mod config;
mod consts;
mod errors;
mod routes;
mod systems;
mod utils;

use mimalloc::MiMalloc;

// Changes the allocator to improve performance especially on Windows
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Serves the available formats (itags) of YouTube videos as JSON.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Config file, defaults to `config.toml` in the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides `server.bind`.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Overrides `log.level`.
    #[arg(long)]
    log_level: Option<LevelFilter>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }

    systems::logger::init(config.log.level, config.log.file.as_deref())
        .context("failed to initialize logger")?;
    panic::set_hook(Box::new(|e| {
        error!("{e}");
    }));

    let server = &config.server;
    ensure!(
        server.endpoint.starts_with('/') && server.generic_endpoint.starts_with('/'),
        "endpoints must start with '/'"
    );
    ensure!(
        server.endpoint != server.generic_endpoint,
        "endpoint and generic_endpoint must differ"
    );

    let app = routes::router(YtdlProvider::new(), server);
    let listener = TcpListener::bind(server.bind)
        .await
        .with_context(|| format!("failed to bind {}", server.bind))?;
    info!(
        "listening on {} ({}, {})",
        listener.local_addr()?,
        server.endpoint,
        server.generic_endpoint
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("server error")?;
    log::logger().flush();
    Ok(())
}
