pub mod conversions;
pub mod models;
pub mod pool;
pub mod queries;

pub use pool::{create_pool, run_migrations};
pub use sqlx::PgPool;

/// Transaction handle threaded through the multi-step cancel path.
pub type PgTx = sqlx::Transaction<'static, sqlx::Postgres>;
