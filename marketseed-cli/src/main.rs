//! marketseed CLI - synthetic data for the freelance marketplace schema
//!
//! Seeds categories and skills, users with profiles, jobs with their
//! applications, projects and milestones, then messages, notifications and
//! reviews. Every stage is one transaction and is verified once committed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marketseed_core::DbConfig;
use marketseed_db::{create_pool, PgStore};
use tracing::debug;

mod commands;
mod config;
mod tracing_setup;

use commands::SeedArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "marketseed",
    author,
    version,
    about = "Seed a freelance marketplace PostgreSQL database with synthetic data",
    long_about = "Generate and bulk-insert users, jobs, applications, projects, milestones, \
                  messages, notifications and reviews in foreign-key order. Reads DATABASE_URL \
                  from the environment or a .env file. Runs the full pipeline when no \
                  subcommand is given.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    /// Seeding config file (defaults to ~/.marketseed/config.toml layered with ./marketseed.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    seed: SeedArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the seeding pipeline (default)
    Seed(SeedArgs),
    /// Report row counts and orphaned foreign keys without seeding
    Verify,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init_tracing(&TracingConfig { debug: cli.debug }).ok();

    config::load_dotenv();
    let seed_config = config::load_seed_config(cli.config.as_deref())?;
    let db_config = DbConfig::from_env(&seed_config.pool)?;

    let pool = create_pool(&db_config)
        .await
        .context("Failed to connect to database")?;
    debug!("connection pool ready");
    let store = PgStore::new(pool.clone());

    let command = cli.command.unwrap_or(Commands::Seed(cli.seed));
    let result = match command {
        Commands::Seed(args) => commands::run_seed(&store, &seed_config, args).await,
        Commands::Verify => commands::run_verify(&store).await,
    };

    pool.close().await;
    result
}
