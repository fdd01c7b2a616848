//! Fixed seeding order: skills, users, jobs, messages, notifications, reviews.
//!
//! Each stage is one transaction. A stage either commits everything it
//! generated or rolls back and stops the run; stages already committed stay
//! committed. A stage whose prerequisites are missing rolls back and is
//! reported as skipped.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, instrument, warn};

use crate::batch::insert_rows;
use crate::config::SeedConfig;
use crate::error::{Result, SeedError};
use crate::generators::{jobs, messages, notifications, reference, reviews, users};
use crate::models::{attach_ids, ApplicationRef, Insertable, JobRef, ProjectRef, UserRef};
use crate::store::{IdSet, Maintenance, SeedStore, SeedTx};
use crate::table::Table;
use crate::verify::{self, VerifyReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Skills,
    Users,
    Jobs,
    Messages,
    Notifications,
    Reviews,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Skills,
        Stage::Users,
        Stage::Jobs,
        Stage::Messages,
        Stage::Notifications,
        Stage::Reviews,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Skills => "skills",
            Stage::Users => "users",
            Stage::Jobs => "jobs",
            Stage::Messages => "messages",
            Stage::Notifications => "notifications",
            Stage::Reviews => "reviews",
        }
    }

    /// Tables written by this stage.
    pub fn tables(self) -> &'static [Table] {
        match self {
            Stage::Skills => &[Table::Categories, Table::Skills],
            Stage::Users => &[Table::Users, Table::FreelancerProfiles, Table::ClientProfiles],
            Stage::Jobs => &[
                Table::Jobs,
                Table::JobSkills,
                Table::Applications,
                Table::Projects,
                Table::Milestones,
            ],
            Stage::Messages => &[Table::Messages],
            Stage::Notifications => &[Table::Notifications],
            Stage::Reviews => &[Table::Reviews],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                SeedError::config(format!(
                    "unknown stage '{s}' (expected one of: skills, users, jobs, messages, notifications, reviews)"
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Committed,
    Skipped { reason: String },
}

#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    pub outcome: StageOutcome,
    /// Rows sent per table. Empty when the stage was skipped.
    pub submitted: BTreeMap<Table, u64>,
}

impl StageReport {
    pub fn total_submitted(&self) -> u64 {
        self.submitted.values().sum()
    }
}

#[derive(Debug, Clone)]
pub struct StageSummary {
    pub report: StageReport,
    pub verification: VerifyReport,
}

enum StageBody {
    Done(BTreeMap<Table, u64>),
    Skip(String),
}

pub struct Pipeline<'a> {
    store: &'a dyn SeedStore,
    config: &'a SeedConfig,
    rng: StdRng,
    now: DateTime<Utc>,
}

impl<'a> Pipeline<'a> {
    /// Fails when `config` does not validate; generators rely on its ranges.
    pub fn new(store: &'a dyn SeedStore, config: &'a SeedConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            store,
            config,
            rng,
            now: Utc::now(),
        })
    }

    /// Pin the reference time used for generated timestamps.
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Empty every seeded table in a transaction of its own.
    pub async fn reset(&self) -> Result<()> {
        let store = self.store;
        let mut tx = store.begin().await?;
        match tx.execute(Maintenance::Truncate).await {
            Ok(_) => {
                tx.commit().await?;
                info!("truncated all seeded tables");
                Ok(())
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!(error = %rollback_err, "rollback after failed truncate also failed");
                }
                Err(err)
            }
        }
    }

    /// Run every stage in order, stopping at the first failure.
    pub async fn run_all(&mut self) -> Result<Vec<StageSummary>> {
        self.run_all_with(|_| {}).await
    }

    /// Like [`Pipeline::run_all`], handing each summary to `on_stage` as soon
    /// as its stage finishes. Stages finished before a failure are still
    /// reported.
    pub async fn run_all_with<F>(&mut self, mut on_stage: F) -> Result<Vec<StageSummary>>
    where
        F: FnMut(&StageSummary),
    {
        let mut summaries = Vec::with_capacity(Stage::ALL.len());
        for stage in Stage::ALL {
            let summary = self.run_stage(stage).await?;
            on_stage(&summary);
            summaries.push(summary);
        }
        Ok(summaries)
    }

    /// Run one stage in its own transaction, then verify its tables.
    #[instrument(skip_all, fields(stage = %stage))]
    pub async fn run_stage(&mut self, stage: Stage) -> Result<StageSummary> {
        info!("seeding {stage}");
        let store = self.store;
        let before = verify::count_tables(store, stage.tables()).await?;
        let mut tx = store.begin().await?;

        let (outcome, submitted) = match self.seed_stage(stage, tx.as_mut()).await {
            Ok(StageBody::Done(submitted)) => {
                tx.commit().await?;
                (StageOutcome::Committed, submitted)
            }
            Ok(StageBody::Skip(reason)) => {
                tx.rollback().await?;
                warn!(reason = %reason, "stage skipped");
                (StageOutcome::Skipped { reason }, BTreeMap::new())
            }
            Err(err) => {
                error!(error = %err, "stage failed, rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    error!(error = %rollback_err, "rollback failed");
                }
                return Err(err);
            }
        };

        let report = StageReport {
            stage,
            outcome,
            submitted,
        };
        let verification =
            verify::verify_tables(store, stage.tables(), &before, &report.submitted).await?;
        Ok(StageSummary {
            report,
            verification,
        })
    }

    async fn seed_stage(&mut self, stage: Stage, tx: &mut dyn SeedTx) -> Result<StageBody> {
        match stage {
            Stage::Skills => self.seed_skills(tx).await,
            Stage::Users => self.seed_users(tx).await,
            Stage::Jobs => self.seed_jobs(tx).await,
            Stage::Messages => self.seed_messages(tx).await,
            Stage::Notifications => self.seed_notifications(tx).await,
            Stage::Reviews => self.seed_reviews(tx).await,
        }
    }

    async fn seed_skills(&mut self, tx: &mut dyn SeedTx) -> Result<StageBody> {
        let mut submitted = BTreeMap::new();

        let categories = reference::categories();
        let category_ids = insert_counted(tx, &categories, &mut submitted).await?;
        let skills = reference::skills(&category_ids);
        insert_counted(tx, &skills, &mut submitted).await?;

        Ok(StageBody::Done(submitted))
    }

    async fn seed_users(&mut self, tx: &mut dyn SeedTx) -> Result<StageBody> {
        let mut submitted = BTreeMap::new();

        let users = users::users(
            &mut self.rng,
            self.config.users,
            &self.config.role_mix,
            self.now,
        );
        let ids = insert_counted(tx, &users, &mut submitted).await?;
        let refs = attach_ids(&ids, &users, UserRef::from_inserted);

        let freelancers = users::freelancer_profiles(&mut self.rng, &refs);
        insert_counted(tx, &freelancers, &mut submitted).await?;
        let clients = users::client_profiles(&mut self.rng, &refs);
        insert_counted(tx, &clients, &mut submitted).await?;

        Ok(StageBody::Done(submitted))
    }

    async fn seed_jobs(&mut self, tx: &mut dyn SeedTx) -> Result<StageBody> {
        let client_ids = tx.fetch_ids(IdSet::ActiveClients).await?;
        if client_ids.is_empty() {
            return Ok(StageBody::Skip("no clients found".into()));
        }
        let category_ids = tx.fetch_ids(IdSet::Categories).await?;
        if category_ids.is_empty() {
            return Ok(StageBody::Skip("no categories found".into()));
        }
        let freelancer_ids = tx.fetch_ids(IdSet::ActiveFreelancers).await?;
        let skill_ids = tx.fetch_ids(IdSet::Skills).await?;

        let mut submitted = BTreeMap::new();

        let jobs = jobs::jobs(
            &mut self.rng,
            self.config.jobs,
            &client_ids,
            &category_ids,
            self.now,
        );
        let job_ids = insert_counted(tx, &jobs, &mut submitted).await?;
        let job_refs = attach_ids(&job_ids, &jobs, JobRef::from_inserted);

        let job_skills = jobs::job_skills(&mut self.rng, &job_refs, &skill_ids);
        insert_counted(tx, &job_skills, &mut submitted).await?;

        let applications = jobs::applications(
            &mut self.rng,
            &job_refs,
            &freelancer_ids,
            self.config.applications_per_job.range(),
            self.now,
        );
        let application_ids = insert_counted(tx, &applications, &mut submitted).await?;
        let application_refs =
            attach_ids(&application_ids, &applications, ApplicationRef::from_inserted);

        let projects = jobs::projects(&mut self.rng, &job_refs, &application_refs, self.now);
        let project_ids = insert_counted(tx, &projects, &mut submitted).await?;
        let project_refs = attach_ids(&project_ids, &projects, ProjectRef::from_inserted);

        let milestones = jobs::milestones(
            &mut self.rng,
            &project_refs,
            self.config.milestones_per_project.range(),
        );
        insert_counted(tx, &milestones, &mut submitted).await?;

        Ok(StageBody::Done(submitted))
    }

    async fn seed_messages(&mut self, tx: &mut dyn SeedTx) -> Result<StageBody> {
        let projects = tx.fetch_projects(false).await?;
        let user_ids = tx.fetch_ids(IdSet::ActiveUsers).await?;
        if projects.is_empty() && user_ids.len() < 2 {
            return Ok(StageBody::Skip("no projects or users to exchange messages".into()));
        }

        let mut submitted = BTreeMap::new();
        let messages = messages::messages(
            &mut self.rng,
            self.config.messages,
            &projects,
            &user_ids,
            self.now,
        );
        insert_counted(tx, &messages, &mut submitted).await?;

        Ok(StageBody::Done(submitted))
    }

    async fn seed_notifications(&mut self, tx: &mut dyn SeedTx) -> Result<StageBody> {
        let user_ids = tx.fetch_ids(IdSet::ActiveUsers).await?;
        if user_ids.is_empty() {
            return Ok(StageBody::Skip("no active users found".into()));
        }
        let open_job_ids = tx.fetch_ids(IdSet::OpenJobs).await?;
        let projects = tx.fetch_projects(false).await?;

        let mut submitted = BTreeMap::new();
        let notifications = notifications::notifications(
            &mut self.rng,
            self.config.notifications,
            &user_ids,
            &open_job_ids,
            &projects,
            self.now,
        );
        insert_counted(tx, &notifications, &mut submitted).await?;

        Ok(StageBody::Done(submitted))
    }

    async fn seed_reviews(&mut self, tx: &mut dyn SeedTx) -> Result<StageBody> {
        let completed = tx.fetch_projects(true).await?;
        if completed.is_empty() {
            return Ok(StageBody::Skip("no completed projects".into()));
        }

        let mut submitted = BTreeMap::new();
        let reviews = reviews::reviews(&mut self.rng, &completed, self.config.review_cap, self.now);
        insert_counted(tx, &reviews, &mut submitted).await?;

        let updated = tx.execute(Maintenance::RefreshRatings).await?;
        info!(profiles = updated, "refreshed freelancer ratings");

        Ok(StageBody::Done(submitted))
    }
}

async fn insert_counted<R: Insertable + Sync>(
    tx: &mut dyn SeedTx,
    rows: &[R],
    submitted: &mut BTreeMap<Table, u64>,
) -> Result<Vec<i64>> {
    let ids = insert_rows(tx, rows).await?;
    *submitted.entry(R::TABLE).or_default() += rows.len() as u64;
    info!(table = %R::TABLE, rows = rows.len(), "inserted");
    Ok(ids)
}
