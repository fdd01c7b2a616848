//! Verify command - row counts and orphan checks without seeding.

use anyhow::{Context, Result};
use marketseed_core::{verify_all, SeedStore};
use tracing::warn;

pub async fn run_verify(store: &dyn SeedStore) -> Result<()> {
    let report = verify_all(store).await.context("Verification queries failed")?;

    println!("Table counts:");
    print!("{report}");

    // Orphans are reported, never fatal
    if !report.is_clean() {
        warn!(
            checks = report.orphans.len(),
            "orphaned rows found, see report above"
        );
    }
    Ok(())
}
