//! `nyaya-proxy` binary entrypoint.

use anyhow::Result;
use clap::Parser;
use nyaya_proxy::{serve, ServerConfig};
use std::path::PathBuf;

/// Indian Law AI assistant server
#[derive(Parser, Debug)]
#[command(name = "nyaya-proxy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a YAML config file (defaults to ./nyaya.yml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding the HTML pages, libs/ and node_modules/
    #[arg(long)]
    asset_root: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Respect `RUST_LOG` if set; otherwise default to info.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(root) = cli.asset_root {
        config.asset_root = root;
    }

    serve(config).await
}
