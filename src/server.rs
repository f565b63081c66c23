//! Server module for managing HTTP server lifecycle
//!
//! This module handles server initialization, startup, and graceful shutdown.

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{Environment, Settings};
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
    environment: Environment,
}

impl Server {
    pub fn new(settings: Settings, environment: Environment) -> Self {
        Self {
            settings,
            environment,
        }
    }

    /// Start the server and run until a shutdown signal arrives
    ///
    /// # Errors
    /// - Invalid JWT configuration
    /// - Migration failures when `database.auto_migrate` is set
    /// - Database connection pool initialization errors
    /// - Address binding errors
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = &self.settings;

        tracing::info!(
            app_name = %settings.application.name,
            app_version = %settings.application.version,
            environment = %self.environment,
            "Application starting"
        );

        // URL and secret are never logged
        tracing::info!(
            max_connections = settings.database.max_connections,
            min_connections = settings.database.min_connections,
            connection_timeout = settings.database.connection_timeout,
            auto_migrate = settings.database.auto_migrate,
            "Database configuration loaded"
        );
        tracing::info!(
            level = %settings.logger.level,
            console_enabled = settings.logger.console.enabled,
            file_enabled = settings.logger.file.enabled,
            "Logger configuration loaded"
        );

        settings.jwt.validate().map_err(|e| {
            tracing::error!(error = %e, "JWT configuration validation failed");
            anyhow::anyhow!("JWT configuration validation failed: {}", e)
        })?;
        tracing::info!(
            access_token_expiration = settings.jwt.access_token_expiration,
            "JWT configuration validated"
        );

        if settings.database.auto_migrate {
            let applied = run_pending_migrations(&settings.database.url).await?;
            tracing::info!(count = applied.len(), migrations = ?applied, "Migrations applied");
        }

        tracing::info!("Initializing database connection pool...");
        let pool = establish_async_connection_pool(&settings.database).await?;
        tracing::info!("Database connection pool initialized");

        let state = AppState::new(pool, settings.jwt.clone());
        let router = create_router(state);

        let address = settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Waits for Ctrl+C or SIGTERM.
///
/// A handler that cannot be installed is logged and treated as never firing.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
