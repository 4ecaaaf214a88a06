//! Larder - Food inventory backend with expiry tracking and an AI assistant

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use larder::{
    api::build_app,
    assistant::{AssistantGateway, AssistantState},
    config::LarderConfig,
    dashboard::DashboardState,
    expiry::SystemClock,
    inventory::{InventoryState, InventoryStore},
    seed::{seed, SeedOutcome},
    validation::Validator,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "larder")]
#[command(version)]
#[command(about = "Food inventory backend with expiry tracking and an AI assistant")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LARDER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// SQLite database file
        #[arg(long)]
        database: Option<PathBuf>,

        /// Seed sample data when the database is empty
        #[arg(long)]
        seed: bool,
    },

    /// Fill an empty database with sample data
    Seed {
        /// SQLite database file
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("larder={},tower_http=debug", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => LarderConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => LarderConfig::default(),
    };

    match cli.command {
        Commands::Serve {
            host,
            port,
            database,
            seed,
        } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(database) = database {
                config.storage.database_path = database;
            }
            run_server(config, seed).await?;
        }
        Commands::Seed { database } => {
            let mut config = config;
            if let Some(database) = database {
                config.storage.database_path = database;
            }
            run_seed(&config).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

fn open_store(config: &LarderConfig) -> Result<Arc<InventoryStore>> {
    let store = InventoryStore::open(
        &config.storage.database_path,
        config.expiry,
        Arc::new(SystemClock),
    )
    .with_context(|| {
        format!(
            "Failed to open database {}",
            config.storage.database_path.display()
        )
    })?;
    Ok(Arc::new(store))
}

async fn run_server(config: LarderConfig, seed_if_empty: bool) -> Result<()> {
    tracing::info!("Starting Larder");

    let store = open_store(&config)?;
    if seed_if_empty {
        seed(&store).await?;
    }
    store.refresh_derived().await?;

    let validator = Arc::new(Validator::new(&config.validation)?);
    let gateway = AssistantGateway::from_config(&config.assistant)?.map(Arc::new);

    let app = build_app(
        InventoryState {
            store: store.clone(),
            validator: validator.clone(),
        },
        DashboardState {
            store: store.clone(),
        },
        AssistantState {
            store,
            validator,
            gateway,
        },
        &config.server.cors_origins,
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(
        address = %addr,
        database = %config.storage.database_path.display(),
        "Larder is running. Press Ctrl+C to stop."
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down...");
}

async fn run_seed(config: &LarderConfig) -> Result<()> {
    let store = open_store(config)?;
    match seed(&store).await? {
        SeedOutcome::Seeded { categories, items } => {
            println!(
                "Seeded {} categories and {} items into {}",
                categories,
                items,
                config.storage.database_path.display()
            );
        }
        SeedOutcome::Skipped => {
            println!("Database already contains data; nothing to do");
        }
    }
    Ok(())
}

fn show_config(config: Option<&LarderConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    println!("{}", config.to_toml()?);
    Ok(())
}
