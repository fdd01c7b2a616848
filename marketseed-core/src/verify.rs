//! Read-only post-seed checks: row counts and LEFT JOIN orphan detection.
//!
//! Findings are reported and logged, never raised. Only a failing query is
//! an error.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{info, warn};

use crate::error::Result;
use crate::store::SeedStore;
use crate::table::Table;

/// A child foreign key column that must point at an existing parent `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrphanCheck {
    pub child: Table,
    pub column: &'static str,
    pub parent: Table,
}

impl OrphanCheck {
    const fn new(child: Table, column: &'static str, parent: Table) -> Self {
        Self {
            child,
            column,
            parent,
        }
    }

    /// Count of child rows whose non-null key has no parent.
    pub fn sql(&self) -> String {
        format!(
            "SELECT COUNT(*)::int8 FROM {child} c \
             LEFT JOIN {parent} p ON p.id = c.{column} \
             WHERE c.{column} IS NOT NULL AND p.id IS NULL",
            child = self.child,
            parent = self.parent,
            column = self.column,
        )
    }
}

impl fmt::Display for OrphanCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} -> {}.id", self.child, self.column, self.parent)
    }
}

pub const ORPHAN_CHECKS: &[OrphanCheck] = &[
    OrphanCheck::new(Table::Skills, "category_id", Table::Categories),
    OrphanCheck::new(Table::FreelancerProfiles, "user_id", Table::Users),
    OrphanCheck::new(Table::ClientProfiles, "user_id", Table::Users),
    OrphanCheck::new(Table::Jobs, "client_id", Table::Users),
    OrphanCheck::new(Table::Jobs, "category_id", Table::Categories),
    OrphanCheck::new(Table::JobSkills, "job_id", Table::Jobs),
    OrphanCheck::new(Table::JobSkills, "skill_id", Table::Skills),
    OrphanCheck::new(Table::Applications, "job_id", Table::Jobs),
    OrphanCheck::new(Table::Applications, "freelancer_id", Table::Users),
    OrphanCheck::new(Table::Projects, "job_id", Table::Jobs),
    OrphanCheck::new(Table::Projects, "application_id", Table::Applications),
    OrphanCheck::new(Table::Projects, "client_id", Table::Users),
    OrphanCheck::new(Table::Projects, "freelancer_id", Table::Users),
    OrphanCheck::new(Table::Milestones, "project_id", Table::Projects),
    OrphanCheck::new(Table::Messages, "sender_id", Table::Users),
    OrphanCheck::new(Table::Messages, "receiver_id", Table::Users),
    OrphanCheck::new(Table::Messages, "project_id", Table::Projects),
    OrphanCheck::new(Table::Notifications, "user_id", Table::Users),
    OrphanCheck::new(Table::Reviews, "project_id", Table::Projects),
    OrphanCheck::new(Table::Reviews, "reviewer_id", Table::Users),
    OrphanCheck::new(Table::Reviews, "reviewee_id", Table::Users),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub table: Table,
    pub rows: i64,
    /// Rows present before the stage being verified began.
    pub before: i64,
    /// Rows the inserter sent during that stage.
    pub submitted: Option<u64>,
}

impl TableCount {
    pub fn added(&self) -> i64 {
        self.rows - self.before
    }

    /// Submitted minus added rows, when the two differ. Positive means rows
    /// went missing.
    pub fn discrepancy(&self) -> Option<i64> {
        let submitted = i64::try_from(self.submitted?).unwrap_or(i64::MAX);
        let diff = submitted - self.added();
        (diff != 0).then_some(diff)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanFinding {
    pub check: OrphanCheck,
    pub orphans: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub counts: Vec<TableCount>,
    pub orphans: Vec<OrphanFinding>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty() && self.counts.iter().all(|c| c.discrepancy().is_none())
    }

    pub fn count(&self, table: Table) -> Option<i64> {
        self.counts.iter().find(|c| c.table == table).map(|c| c.rows)
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for count in &self.counts {
            write!(f, "  {:<22} {:>8}", count.table.as_str(), count.rows)?;
            if let Some(submitted) = count.submitted {
                write!(f, "  (submitted {submitted}, added {})", count.added())?;
            }
            writeln!(f)?;
        }
        if self.orphans.is_empty() {
            writeln!(f, "  no orphaned rows")?;
        } else {
            for finding in &self.orphans {
                writeln!(f, "  ORPHANS {:<40} {:>6}", finding.check.to_string(), finding.orphans)?;
            }
        }
        Ok(())
    }
}

/// Current row count of each table.
pub async fn count_tables(
    store: &dyn SeedStore,
    tables: &[Table],
) -> Result<BTreeMap<Table, i64>> {
    let mut counts = BTreeMap::new();
    for table in tables {
        counts.insert(*table, store.count_rows(*table).await?);
    }
    Ok(counts)
}

/// Count rows and look for orphans in `tables`.
///
/// `before` holds counts taken when the stage began and `submitted` its
/// per-table insert counts. A table whose growth differs from what was
/// submitted is logged. Tables missing from `before` count from zero.
pub async fn verify_tables(
    store: &dyn SeedStore,
    tables: &[Table],
    before: &BTreeMap<Table, i64>,
    submitted: &BTreeMap<Table, u64>,
) -> Result<VerifyReport> {
    let mut report = VerifyReport::default();

    for table in tables {
        let rows = store.count_rows(*table).await?;
        let count = TableCount {
            table: *table,
            rows,
            before: before.get(table).copied().unwrap_or(0),
            submitted: submitted.get(table).copied(),
        };
        if let Some(diff) = count.discrepancy() {
            warn!(
                table = %table,
                submitted = ?count.submitted,
                added = count.added(),
                diff,
                "row count does not match rows submitted"
            );
        }
        report.counts.push(count);
    }

    for check in ORPHAN_CHECKS.iter().filter(|c| tables.contains(&c.child)) {
        let orphans = store.count_orphans(check).await?;
        if orphans > 0 {
            warn!(check = %check, orphans, "orphaned rows found");
            report.orphans.push(OrphanFinding {
                check: *check,
                orphans,
            });
        }
    }

    if report.is_clean() {
        info!(tables = tables.len(), "verification passed");
    }
    Ok(report)
}

/// Verify every seeded table.
pub async fn verify_all(store: &dyn SeedStore) -> Result<VerifyReport> {
    verify_tables(store, &Table::ALL, &BTreeMap::new(), &BTreeMap::new()).await
}
