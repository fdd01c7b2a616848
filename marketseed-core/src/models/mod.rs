//! Row records and the parent references carried between entities.
//!
//! A `New*` row is what a generator produces. A `*Ref` is the slice of an
//! inserted row that dependent generators need, keyed by the id the
//! database returned for it.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::table::Table;
use crate::value::SqlValue;

pub mod rows;
pub mod status;

pub use rows::*;
pub use status::*;

/// A row that can be written into its target table.
///
/// `values` must yield one value per entry in `TABLE.insert_columns()`.
/// It fails only when a json column cannot be serialized.
pub trait Insertable {
    const TABLE: Table;

    fn values(&self) -> Result<Vec<SqlValue>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRef {
    pub id: i64,
    pub role: UserRole,
    pub status: UserStatus,
}

impl UserRef {
    pub fn from_inserted(id: i64, user: &NewUser) -> Self {
        Self {
            id,
            role: user.role,
            status: user.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobRef {
    pub id: i64,
    pub client_id: i64,
    pub title: String,
    pub budget_max: f64,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

impl JobRef {
    pub fn from_inserted(id: i64, job: &NewJob) -> Self {
        Self {
            id,
            client_id: job.client_id,
            title: job.title.clone(),
            budget_max: job.budget_max,
            status: job.status,
            created_at: job.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplicationRef {
    pub id: i64,
    pub job_id: i64,
    pub freelancer_id: i64,
    pub proposed_rate: f64,
    pub estimated_days: i32,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

impl ApplicationRef {
    pub fn from_inserted(id: i64, application: &NewApplication) -> Self {
        Self {
            id,
            job_id: application.job_id,
            freelancer_id: application.freelancer_id,
            proposed_rate: application.proposed_rate,
            estimated_days: application.estimated_days,
            status: application.status,
            created_at: application.created_at,
        }
    }
}

/// Project participants, either freshly inserted or read back from the
/// database by later stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectRef {
    pub id: i64,
    pub client_id: i64,
    pub freelancer_id: i64,
    pub agreed_amount: f64,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
}

impl ProjectRef {
    pub fn from_inserted(id: i64, project: &NewProject) -> Self {
        Self {
            id,
            client_id: project.client_id,
            freelancer_id: project.freelancer_id,
            agreed_amount: project.agreed_amount,
            status: project.status,
            start_date: project.start_date,
        }
    }
}

/// Pair returned ids with the rows that produced them, in submission order.
pub fn attach_ids<R, T>(ids: &[i64], rows: &[R], f: impl Fn(i64, &R) -> T) -> Vec<T> {
    ids.iter().zip(rows).map(|(id, row)| f(*id, row)).collect()
}
