//! Synthetic data generation and staged seeding for the marketplace schema.
//!
//! This crate holds everything that does not need a database driver: row
//! generators, batch INSERT rendering, the stage coordinator and the
//! verifier. `marketseed-db` supplies the PostgreSQL side of [`store`].

pub mod batch;
pub mod config;
pub mod error;
pub mod generators;
pub mod models;
pub mod payload;
pub mod pipeline;
pub mod store;
pub mod table;
pub mod value;
pub mod verify;

pub use batch::{insert_rows, InsertBatch, InsertStatement, MAX_BIND_PARAMS};
pub use config::{DbConfig, PoolConfig, SeedConfig, DATABASE_URL_VAR};
pub use error::{Result, SeedError};
pub use payload::{NotificationPayload, Severity};
pub use pipeline::{Pipeline, Stage, StageOutcome, StageReport, StageSummary};
pub use store::{IdSet, Maintenance, SeedStore, SeedTx};
pub use table::Table;
pub use value::SqlValue;
pub use verify::{
    count_tables, verify_all, verify_tables, OrphanCheck, TableCount, VerifyReport, ORPHAN_CHECKS,
};
