use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use yieldgap::{
    dataset::{DatasetLoader, RegionDataset},
    web::{self, WebServerConfig},
    SiteConfig,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Cotton yield gap map and assistant")]
struct Cli {
    /// Path to a site configuration YAML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Region dataset YAML (uses the builtin table when omitted)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,

    /// Override the assistant's typing delay in milliseconds
    #[arg(long)]
    typing_delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => SiteConfig::from_yaml(path)?,
        None => SiteConfig::default(),
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(delay) = cli.typing_delay_ms {
        config.chat.typing_delay_ms = delay;
    }
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    let dataset = match cli.dataset.or_else(|| config.dataset.clone()) {
        Some(path) => DatasetLoader::new(".").load(path)?,
        None => RegionDataset::builtin()?,
    };
    info!(
        dataset = %dataset.name,
        regions = dataset.regions.len(),
        "region dataset loaded"
    );

    web::run(WebServerConfig {
        registry: dataset.into_registry(),
        scene: config.scene.settings(),
        typing_delay: config.chat.typing_delay(),
        session_idle: config.server.session_idle(),
        host: config.server.host,
        port: config.server.port,
    })
    .await
}
