//! Seed command - run the staged pipeline and print per-stage results.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use marketseed_core::{Pipeline, SeedConfig, SeedStore, Stage, StageOutcome, StageSummary};
use tracing::{info, warn};

#[derive(Args, Debug, Clone, Default)]
pub struct SeedArgs {
    /// Truncate every seeded table before the first stage
    #[arg(long)]
    pub reset: bool,

    /// Run a single stage (skills, users, jobs, messages, notifications, reviews).
    /// Earlier stages must already be seeded.
    #[arg(long, value_name = "STAGE")]
    pub only: Option<Stage>,
}

pub async fn run_seed(store: &dyn SeedStore, config: &SeedConfig, args: SeedArgs) -> Result<()> {
    let started = Instant::now();
    let mut pipeline = Pipeline::new(store, config).context("Invalid seed configuration")?;

    if args.reset {
        pipeline.reset().await.context("Failed to reset seeded tables")?;
    }

    // printed as each stage finishes so committed stages show up even if a later one fails
    let mut dirty = 0;
    let mut report = |summary: &StageSummary| {
        print_summary(summary);
        if !summary.verification.is_clean() {
            dirty += 1;
        }
    };

    match args.only {
        Some(stage) => {
            let summary = pipeline
                .run_stage(stage)
                .await
                .with_context(|| format!("Stage '{stage}' failed"))?;
            report(&summary);
        }
        None => {
            pipeline
                .run_all_with(&mut report)
                .await
                .context("Seeding aborted")?;
        }
    }

    if dirty > 0 {
        warn!(stages = dirty, "verification reported problems");
    }
    info!(elapsed = ?started.elapsed(), "seeding finished");
    Ok(())
}

fn print_summary(summary: &StageSummary) {
    let report = &summary.report;
    match &report.outcome {
        StageOutcome::Committed => println!(
            "{:<14} committed  {:>8} rows",
            report.stage,
            report.total_submitted()
        ),
        StageOutcome::Skipped { reason } => {
            println!("{:<14} skipped    {}", report.stage, reason)
        }
    }
    print!("{}", summary.verification);
}
