//! atlas: serve the atlas HTTP bootstrap or apply schema migrations

use std::path::PathBuf;

use anyhow::{Context, Result};
use atlas_server::{run_server, Settings};
use clap::{Parser, Subcommand};
use sqlx::PgPool;
use tracing::info;

mod tracing_setup;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "atlas",
    author,
    version,
    about = "Data-access service for location, identity and access entities"
)]
struct Cli {
    /// Settings file (default: ./settings.toml)
    #[arg(long, short = 'c', global = true, env = "ATLAS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Apply pending migrations before listening
        #[arg(long)]
        migrate: bool,
    },
    /// Apply pending schema migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads ATLAS_CONFIG
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug })?;

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let pool = connect(&settings).await?;

    match cli.command {
        Commands::Serve { migrate } => {
            if migrate {
                atlas_db::migrations::run(&pool)
                    .await
                    .context("Failed to apply migrations")?;
            }
            run_server(pool, &settings.server)
                .await
                .context("Server failed")?;
        }
        Commands::Migrate => {
            let result = atlas_db::migrations::run(&pool).await;
            pool.close().await;
            result.context("Failed to apply migrations")?;
        }
    }

    Ok(())
}

async fn connect(settings: &Settings) -> Result<PgPool> {
    let target = settings
        .database_target()
        .context("Failed to resolve database settings")?;
    info!(
        source = target.source,
        max_connections = target.pool.max_connections,
        "Connecting to database"
    );

    atlas_db::create_pool_with_options(target.options, &target.pool)
        .await
        .with_context(|| format!("Failed to connect to database ({})", target.source))
}
