//! Database seam for the seeding pipeline.
//!
//! `marketseed-db` implements these traits over a sqlx `PgPool`; tests use
//! an in-memory store. Every stage runs on exactly one [`SeedTx`].

use async_trait::async_trait;

use crate::batch::InsertStatement;
use crate::error::Result;
use crate::models::ProjectRef;
use crate::table::Table;
use crate::verify::OrphanCheck;

/// Parent id lists read at the start of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdSet {
    Categories,
    Skills,
    ActiveUsers,
    ActiveClients,
    ActiveFreelancers,
    OpenJobs,
}

impl IdSet {
    pub fn sql(self) -> &'static str {
        match self {
            IdSet::Categories => "SELECT id::int8 FROM categories ORDER BY id",
            IdSet::Skills => "SELECT id::int8 FROM skills ORDER BY id",
            IdSet::ActiveUsers => {
                "SELECT id::int8 FROM users WHERE status = 'active' ORDER BY id"
            }
            IdSet::ActiveClients => {
                "SELECT id::int8 FROM users WHERE role = 'client' AND status = 'active' ORDER BY id"
            }
            IdSet::ActiveFreelancers => {
                "SELECT id::int8 FROM users WHERE role = 'freelancer' AND status = 'active' ORDER BY id"
            }
            IdSet::OpenJobs => "SELECT id::int8 FROM jobs WHERE status = 'open' ORDER BY id",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            IdSet::Categories => "categories",
            IdSet::Skills => "skills",
            IdSet::ActiveUsers => "active users",
            IdSet::ActiveClients => "clients",
            IdSet::ActiveFreelancers => "freelancers",
            IdSet::OpenJobs => "open jobs",
        }
    }
}

/// Statements run after a bulk insert, outside any generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maintenance {
    /// Recompute freelancer rating aggregates from `reviews`.
    RefreshRatings,
    /// Empty every seeded table and reset identities.
    Truncate,
}

impl Maintenance {
    pub fn sql(self) -> &'static str {
        match self {
            Maintenance::RefreshRatings => {
                r#"
                UPDATE freelancer_profiles fp
                SET rating_avg = agg.rating_avg,
                    review_count = agg.review_count
                FROM (
                    SELECT reviewee_id,
                           ROUND(AVG(rating)::numeric, 2) AS rating_avg,
                           COUNT(*) AS review_count
                    FROM reviews
                    GROUP BY reviewee_id
                ) agg
                WHERE fp.user_id = agg.reviewee_id
                "#
            }
            Maintenance::Truncate => {
                "TRUNCATE reviews, notifications, messages, milestones, projects, \
                 applications, job_skills, jobs, client_profiles, freelancer_profiles, \
                 users, skills, categories RESTART IDENTITY CASCADE"
            }
        }
    }
}

/// One open transaction. Dropping without `commit` must not persist anything.
#[async_trait]
pub trait SeedTx: Send {
    async fn fetch_ids(&mut self, set: IdSet) -> Result<Vec<i64>>;

    /// Projects with their participants, optionally filtered by status.
    async fn fetch_projects(&mut self, completed_only: bool) -> Result<Vec<ProjectRef>>;

    /// Execute one rendered INSERT; returns ids when the table has them.
    async fn insert(&mut self, statement: &InsertStatement<'_>) -> Result<Vec<i64>>;

    async fn execute(&mut self, statement: Maintenance) -> Result<u64>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Pool-level access: transactions for stages, plain reads for the verifier.
#[async_trait]
pub trait SeedStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn SeedTx + '_>>;

    async fn count_rows(&self, table: Table) -> Result<i64>;

    async fn count_orphans(&self, check: &OrphanCheck) -> Result<i64>;
}
