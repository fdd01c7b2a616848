//! Environment and TOML configuration loading.
//!
//! `.env` files feed `DATABASE_URL`; `config.toml` / `marketseed.toml` feed
//! the seeding counts and pool limits.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use marketseed_core::SeedConfig;
use tracing::{debug, info, warn};

/// Load environment variables from .env files.
///
/// Priority order (highest to lowest):
/// 1. Variables already set in the environment
/// 2. Current directory .env
/// 3. ~/.marketseed/.env
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            // dotenvy never overwrites variables that are already set
            match dotenvy::from_path(&env_file) {
                Ok(()) => {
                    debug!("Loaded .env from {}", env_file.display());
                    loaded_from.push(env_file);
                }
                Err(e) => warn!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found, using process environment only");
    } else {
        let paths: Vec<String> = loaded_from.iter().map(|p| p.display().to_string()).collect();
        info!("Loaded environment from: {}", paths.join(", "));
    }
}

/// The marketseed config directory (~/.marketseed)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".marketseed"))
}

/// Resolve the seeding configuration.
///
/// An explicit path must exist and parse. Otherwise the global and local
/// files are layered (local keys win) and any unreadable layer is skipped
/// with a warning.
pub fn load_seed_config(explicit: Option<&Path>) -> Result<SeedConfig> {
    if let Some(path) = explicit {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = SeedConfig::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        return Ok(config);
    }

    let global = config_dir().map(|dir| dir.join("config.toml"));
    Ok(load_layered(global.as_deref(), Path::new("marketseed.toml")))
}

fn load_layered(global: Option<&Path>, local: &Path) -> SeedConfig {
    let mut merged = toml::Table::new();
    let mut sources = Vec::new();

    for path in global.into_iter().chain(std::iter::once(local)) {
        if let Some(layer) = read_layer(path) {
            merge_tables(&mut merged, layer);
            sources.push(path.display().to_string());
        }
    }

    if sources.is_empty() {
        debug!("No config files found, using defaults");
        return SeedConfig::default();
    }

    match toml::Value::Table(merged).try_into::<SeedConfig>() {
        Ok(config) => match config.validate() {
            Ok(()) => {
                debug!("Loaded config from {}", sources.join(", "));
                config
            }
            Err(e) => {
                warn!("Ignoring config from {}: {}", sources.join(", "), e);
                SeedConfig::default()
            }
        },
        Err(e) => {
            warn!("Ignoring config from {}: {}", sources.join(", "), e);
            SeedConfig::default()
        }
    }
}

fn read_layer(path: &Path) -> Option<toml::Table> {
    if !path.exists() {
        return None;
    }
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };
    match contents.parse::<toml::Table>() {
        Ok(table) => Some(table),
        Err(e) => {
            warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

/// Overlay `top` onto `base`, descending into nested tables.
fn merge_tables(base: &mut toml::Table, top: toml::Table) {
    for (key, value) in top {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(nested)) => {
                merge_tables(existing, nested)
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
