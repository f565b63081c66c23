//! Migrate command handler
//!
//! Applies, previews or reverts the embedded migrations over a dedicated
//! synchronous connection.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;

use crate::config::Settings;
use crate::db::{MIGRATIONS, run_pending_migrations};
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// # Errors
    /// - Database connection errors
    /// - Migration execution errors
    /// - More rollback steps than applied migrations
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.config.database.validate()?;

        match (dry_run, rollback) {
            (true, _) => self.show_pending_migrations().await,
            (false, Some(steps)) => self.rollback_migrations(steps).await,
            (false, None) => self.run_migrations().await,
        }
    }

    async fn show_pending_migrations(&self) -> AppResult<()> {
        println!("Checking for pending migrations...");

        let pending = self
            .with_connection("check pending migrations", |conn| {
                conn.pending_migrations(MIGRATIONS)
                    .map(|pending| pending.iter().map(|m| m.name().to_string()).collect::<Vec<_>>())
            })
            .await?;

        if pending.is_empty() {
            println!("✓ No pending migrations found - database is up to date");
        } else {
            println!("Found {} pending migration(s):", pending.len());
            for name in &pending {
                println!("  - {}", name);
            }
            println!("\nRun without --dry-run to apply these migrations");
        }

        Ok(())
    }

    async fn run_migrations(&self) -> AppResult<()> {
        println!("Running database migrations...");

        let applied = run_pending_migrations(&self.config.database.url).await?;

        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for migration in &applied {
                println!("  - {}", migration);
            }
        }

        Ok(())
    }

    async fn rollback_migrations(&self, steps: u32) -> AppResult<()> {
        if steps == 0 {
            return Err(AppError::BadRequest {
                message: "Number of rollback steps must be greater than 0".to_string(),
            });
        }

        println!("Rolling back {} migration(s)...", steps);

        let applied_count = self
            .with_connection("get applied migrations", |conn| {
                conn.applied_migrations().map(|applied| applied.len())
            })
            .await?;

        if applied_count < steps as usize {
            return Err(AppError::BadRequest {
                message: format!(
                    "Cannot rollback {} migrations - only {} applied migrations available",
                    steps, applied_count
                ),
            });
        }

        let reverted = self
            .with_connection("revert migration", move |conn| {
                (0..steps)
                    .map(|_| conn.revert_last_migration(MIGRATIONS).map(|v| v.to_string()))
                    .collect::<Result<Vec<_>, _>>()
            })
            .await?;

        println!("✓ Rolled back {} migration(s):", reverted.len());
        for version in &reverted {
            println!("  - {}", version);
        }

        Ok(())
    }

    /// Runs `work` on a fresh blocking connection off the async runtime.
    async fn with_connection<T, F>(&self, operation: &'static str, work: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(
                &mut PgConnection,
            ) -> Result<T, Box<dyn std::error::Error + Send + Sync>>
            + Send
            + 'static,
    {
        let database_url = self.config.database.url.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn =
                PgConnection::establish(&database_url).map_err(|e| AppError::Database {
                    operation: "establish connection for migrations".to_string(),
                    source: anyhow::Error::new(e),
                })?;

            work(&mut conn).map_err(|e| AppError::Database {
                operation: operation.to_string(),
                source: anyhow::anyhow!("Migration error: {}", e),
            })
        })
        .await
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::new(e),
        })?
    }

    #[cfg(test)]
    fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/categories".to_string();
        config
    }

    #[test]
    fn test_migrate_handler_new() {
        let config = create_valid_config();
        let handler = MigrateCommandHandler::new(config.clone());
        assert_eq!(handler.config(), &config);
    }

    #[tokio::test]
    async fn test_zero_rollback_steps_rejected_before_connecting() {
        let handler = MigrateCommandHandler::new(create_valid_config());

        let result = handler.execute(false, Some(0)).await;
        match result {
            Err(AppError::BadRequest { message }) => {
                assert!(message.contains("must be greater than 0"))
            }
            other => panic!("Expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_database_url_rejected() {
        let handler = MigrateCommandHandler::new(Settings::default());
        assert!(matches!(
            handler.execute(true, None).await,
            Err(AppError::Configuration { .. })
        ));
    }
}
