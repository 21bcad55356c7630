use anyhow::{Context, Result};
use clap::Parser;
use eventsdisplay_config::SiteConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Community events listing and suggestion site
#[derive(Parser, Debug)]
#[command(name = "eventsdisplay", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SiteConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_logging(&config, cli.verbose);

    info!(
        "Starting eventsdisplay v{} (templates: {})",
        env!("CARGO_PKG_VERSION"),
        config.site.templates_dir.display()
    );

    eventsdisplay_web::start_server(config)
        .await
        .context("Server terminated with an error")?;

    Ok(())
}

fn init_logging(config: &SiteConfig, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.logging.ansi)
        .init();
}
