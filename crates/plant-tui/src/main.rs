mod action;
mod app;
mod app_state;
mod card;
mod component;
mod components;
mod loader;
mod pending;
mod theme;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use plant_proto::config::{Config, RefreshStrategy};
use plant_proto::{GraphqlClient, MemoryApi, PlantApi};

/// Terminal client for the houseplants that need watering or cleaning today.
#[derive(Debug, Parser)]
#[command(name = "plantcare", version)]
struct Args {
    /// GraphQL endpoint (overrides `[api] endpoint` from the config file)
    #[arg(long)]
    endpoint: Option<String>,

    /// Config file to read instead of the default one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run against a built-in in-memory backend
    #[arg(long)]
    demo: bool,

    /// What to do with the list after a plant has been cared for
    #[arg(long, value_enum)]
    refresh: Option<RefreshArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RefreshArg {
    /// Remove the plant, then re-read the list
    Refetch,
    /// Remove the plant only
    Local,
}

impl From<RefreshArg> for RefreshStrategy {
    fn from(arg: RefreshArg) -> Self {
        match arg {
            RefreshArg::Refetch => RefreshStrategy::Refetch,
            RefreshArg::Local => RefreshStrategy::Local,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_path = plant_proto::platform::log_path();
    if let Some(dir) = log_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; suppress connection-level noise from the HTTP stack.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("plantcare log: {}", log_path.display());
    tracing::info!("plantcare starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("config: falling back to defaults: {:#}", e);
            Config::default()
        }),
    };
    if let Some(endpoint) = args.endpoint {
        config.api.endpoint = endpoint;
    }
    if let Some(refresh) = args.refresh {
        config.ui.refresh = refresh.into();
    }
    tracing::debug!("config: {:?}", config);

    // ── Backend ──────────────────────────────────────────────────────────────
    let api: Arc<dyn PlantApi> = if args.demo {
        Arc::new(MemoryApi::demo())
    } else {
        Arc::new(GraphqlClient::new(&config.api)?)
    };

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let (app, rx) = app::App::new(api, &config);
    app.run(rx).await?;

    Ok(())
}
