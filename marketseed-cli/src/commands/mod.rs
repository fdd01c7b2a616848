//! Command implementations for the marketseed CLI

pub mod seed;
pub mod verify;

pub use seed::{run_seed, SeedArgs};
pub use verify::run_verify;
