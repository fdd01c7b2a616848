//! Seeding and connection configuration.
//!
//! Both structs are built once in `main` and passed down explicitly.

use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeedError};

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Per-entity volumes and bounds for a seeding run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub users: usize,
    pub role_mix: RoleMix,
    pub jobs: usize,
    pub applications_per_job: Bounds,
    pub milestones_per_project: Bounds,
    pub messages: usize,
    pub notifications: usize,
    pub review_cap: usize,
    /// Fixed RNG seed; absent means a fresh, non-reproducible run.
    pub rng_seed: Option<u64>,
    pub pool: PoolConfig,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: 200,
            role_mix: RoleMix::default(),
            jobs: 100,
            applications_per_job: Bounds { min: 10, max: 50 },
            milestones_per_project: Bounds { min: 1, max: 5 },
            messages: 5000,
            notifications: 2000,
            review_cap: 500,
            rng_seed: None,
            pool: PoolConfig::default(),
        }
    }
}

impl SeedConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SeedConfig =
            toml::from_str(contents).map_err(|e| SeedError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.applications_per_job.validate("applications_per_job")?;
        self.milestones_per_project.validate("milestones_per_project")?;
        self.role_mix.validate()?;
        if self.pool.max_connections == 0 {
            return Err(SeedError::config("pool.max_connections must be at least 1"));
        }
        Ok(())
    }
}

/// Inclusive count range, e.g. applications per job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub fn range(self) -> RangeInclusive<u32> {
        self.min..=self.max
    }

    fn validate(self, name: &str) -> Result<()> {
        if self.min > self.max {
            return Err(SeedError::config(format!(
                "{name}: min {} is greater than max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Share of generated users per role. Admins take the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleMix {
    pub freelancer: f64,
    pub client: f64,
}

impl Default for RoleMix {
    fn default() -> Self {
        Self {
            freelancer: 0.60,
            client: 0.35,
        }
    }
}

impl RoleMix {
    fn validate(self) -> Result<()> {
        let valid = |share: f64| (0.0..=1.0).contains(&share);
        if !valid(self.freelancer) || !valid(self.client) || self.freelancer + self.client > 1.0 {
            return Err(SeedError::config(
                "role_mix shares must be within 0..=1 and sum to at most 1",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub idle_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            idle_timeout_secs: 30,
            connect_timeout_secs: 2,
        }
    }
}

/// Connection settings for the process-wide pool.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub idle_timeout: Duration,
    pub connect_timeout: Duration,
}

impl DbConfig {
    /// Read `DATABASE_URL` from the environment. Absence is fatal.
    pub fn from_env(pool: &PoolConfig) -> Result<Self> {
        let database_url = std::env::var(DATABASE_URL_VAR)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SeedError::MissingConfig {
                var: DATABASE_URL_VAR,
            })?;
        Ok(Self::new(database_url, pool))
    }

    pub fn new(database_url: impl Into<String>, pool: &PoolConfig) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: pool.max_connections,
            idle_timeout: Duration::from_secs(pool.idle_timeout_secs),
            connect_timeout: Duration::from_secs(pool.connect_timeout_secs),
        }
    }
}
