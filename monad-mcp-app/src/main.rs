use anyhow::{Context, Result};
use clap::Parser;
use monad_mcp_app::McpServer;
use monad_mcp_config::MonadConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Monad migration tools over the Model Context Protocol (stdio).
#[derive(Debug, Parser)]
#[command(name = "monad-mcp", version, about)]
struct Args {
    /// YAML file overriding the built-in network, gas and contract table
    #[arg(long, env = "MONAD_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the registered operations and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = match &args.config {
        Some(path) => {
            let config = MonadConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            info!("Using config {}", path.display());
            config
        }
        None => MonadConfig::default(),
    };

    let server =
        McpServer::from_config(Arc::new(config)).context("Failed to build tool registry")?;

    if args.list {
        for descriptor in server.dispatcher().list() {
            println!("{:<36} {}", descriptor.name, descriptor.description);
        }
        return Ok(());
    }

    server
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
