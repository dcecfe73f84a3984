//! Codexa Reviewer - AI code review dashboard
//!
//! A web service that forwards submitted code to the Codexa analysis
//! engine, falls back to local heuristics when the engine is unreachable,
//! and keeps recent results in memory for a statistics dashboard.
//!
//! Routes:
//!   GET  /                  - recent analyses
//!   GET  /dashboard         - statistics and history
//!   POST /analyze           - analyze code
//!   POST /governance/check  - repository governance verdict
//!   GET  /api/health        - health check
//!   GET  /api/stats         - statistics as JSON

mod analysis;
mod cli;
mod config;
mod governance;
mod models;
mod remote;
mod report;
mod server;
mod service;
mod store;

use analysis::{CodeScorer, LocalHeuristicScorer};
use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use governance::{GovernancePolicy, StaticGovernancePolicy};
use remote::{ClientConfig, RemoteAnalysisClient};
use service::ReviewService;
use std::sync::Arc;
use store::InMemoryAnalysisStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Codexa Reviewer v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_server(args).await {
        error!("Server failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .codexa.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Build the service from configuration and serve until shutdown.
async fn run_server(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    let (scorer, governance): (Arc<dyn CodeScorer>, Arc<dyn GovernancePolicy>) =
        if config.use_remote() {
            info!("Codexa engine: {}", config.remote.api_base);
            info!("   Timeout: {}s", config.remote.timeout_seconds);
            if config.remote.function_key.is_none() {
                debug!("No function key configured");
            }

            let client = Arc::new(RemoteAnalysisClient::new(ClientConfig {
                api_base: config.remote.api_base.clone(),
                function_key: config.remote.function_key.clone(),
                timeout_seconds: config.remote.timeout_seconds,
            })?);
            let scorer: Arc<dyn CodeScorer> = client.clone();
            let governance: Arc<dyn GovernancePolicy> = client;
            (scorer, governance)
        } else {
            info!("Offline mode: scoring with local heuristics only");
            let scorer: Arc<dyn CodeScorer> = Arc::new(LocalHeuristicScorer);
            let governance: Arc<dyn GovernancePolicy> = Arc::new(StaticGovernancePolicy);
            (scorer, governance)
        };

    let store = Arc::new(InMemoryAnalysisStore::new(config.store.capacity));
    info!("Keeping up to {} analyses in memory", store.capacity());

    let service = Arc::new(ReviewService::new(scorer, governance, store));

    server::serve(service, &config.server.host, config.server.port).await
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", config::CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
