use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use faceit_finder::aggregate::{self, ProfileOutcome};
use faceit_finder::api::state::AppState;
use faceit_finder::config::AppConfig;
use faceit_finder::models::EloLevel;
use faceit_finder::upstream::{FaceitApi, FaceitClient};

#[derive(Parser)]
#[command(name = "faceit-finder")]
#[command(about = "HTTP facade over the FACEIT Data API with profile aggregation")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (defaults to the config file value)
        #[arg(long)]
        host: Option<String>,

        /// Port number (defaults to the config file value)
        #[arg(long)]
        port: Option<u16>,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },

    /// Print the aggregated profile for a nickname, Steam URL or ID
    Profile { nickname_or_url: String },

    /// Run the smurf heuristic for a player ID
    SmurfCheck { player_id: String },

    /// Classify a FACEIT elo rating
    EloLevel {
        #[arg(allow_hyphen_values = true)]
        elo: i64,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_api(config: &AppConfig) -> Result<FaceitApi> {
    if config.upstream.api_key.is_none() {
        tracing::warn!(
            "No API token configured ({} unset); upstream will reject requests",
            config.upstream.api_key_env
        );
    }
    let client = FaceitClient::new(&config.upstream).context("Failed to build FACEIT client")?;
    let api = FaceitApi::new(Arc::new(client));
    tracing::info!(
        "Using {} upstream at {}",
        api.backend_name(),
        config.upstream.base_url
    );
    Ok(api)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);

    tracing::info!("Starting faceit-finder v{}", env!("CARGO_PKG_VERSION"));
    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let api = build_api(&config)?;
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let state = AppState {
                api,
                config: Arc::new(config),
            };

            let mut app = faceit_finder::api::build_router(state);
            if access_log {
                app = app.layer(TraceLayer::new_for_http());
            }

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Profile { nickname_or_url } => {
            let api = build_api(&config)?;
            let outcome = aggregate::full_profile(&api, &nickname_or_url).await?;
            if let ProfileOutcome::NotFound { error } = &outcome {
                tracing::warn!("{}", error);
            }
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::SmurfCheck { player_id } => {
            let api = build_api(&config)?;
            let report = aggregate::smurf_check(&api, &player_id).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::EloLevel { elo } => {
            println!("{}", EloLevel::from_elo(Some(elo)).level);
        }
    }

    Ok(())
}
