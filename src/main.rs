//! grouplog - group chat message archive with an HTTP query API.
//!
//! Persists inbound group chat messages into an embedded SQLite store and
//! serves filtered listings, point lookups, and per-group aggregates.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grouplog::config::Config;
use grouplog::storage::MessageStore;

#[derive(Parser)]
#[command(name = "grouplog")]
#[command(about = "Group chat message archive with an HTTP query API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.toml")]
        config: String,

        /// Override listen address
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Validate configuration file
    Check {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.toml")]
        config: String,
    },
}

/// Initialize tracing; RUST_LOG takes precedence over the configured level.
fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("grouplog={},tower_http=info", default_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, listen } => {
            let mut config = Config::from_file(&config)?;
            init_tracing(&config.logging.level);

            if let Some(addr) = listen {
                tracing::info!(listen = %addr, "Override listen address");
                config.server.listen = addr;
            }

            // Fatal if the data directory is unusable; nothing to serve then.
            let store = MessageStore::open(&config.storage.data_dir).await?;

            grouplog::api::run_server(config, store).await
        }

        Commands::Check { config: path } => {
            init_tracing("info");
            let config = Config::from_file(&path)?;
            tracing::info!(
                config = %path,
                listen = %config.server.listen,
                data_dir = %config.storage.data_dir,
                "Configuration OK"
            );
            Ok(())
        }
    }
}
