//! PostgreSQL side of the marketseed store traits.

pub mod pool;
pub mod store;

pub use pool::create_pool;
pub use store::{PgStore, PgTx};
