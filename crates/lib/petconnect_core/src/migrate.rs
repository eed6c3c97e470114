//! Database migration support.
//!
//! Embeds the SQL files under `petconnect_core/migrations/` into the binary.

use sqlx::PgPool;

/// Apply every pending migration to the given pool.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
