//! Database connection pool and embedded migrations.

mod pool;

pub use pool::{AsyncDbPool, MIGRATIONS, establish_async_connection_pool, run_pending_migrations};
