//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! longbox-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `LONGBOX_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! Migration files live in `crates/server/migrations/`. The server does not
//! run them on startup; this command is the only migration path.

use tracing::info;

use super::{CommandError, connect};

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    info!("Connecting to database...");
    let pool = connect().await?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
