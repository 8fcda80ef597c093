//! Main application structure and lifecycle management

use crate::{api::ApiServer, browser, preflight};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use config::Config;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Main application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            started_at: Utc::now(),
        }
    }

    /// Seconds since the server started
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

/// Main application that coordinates all components
pub struct Application {
    state: Arc<AppState>,
    api_server: ApiServer,
}

impl Application {
    /// Run the startup checks and build the server
    pub fn new(config: Config) -> Result<Self> {
        info!("Running startup checks...");

        let report = preflight::run(&config).context("Startup checks failed")?;
        info!(
            config_valid = report.inspection.valid,
            generated = ?report.generated,
            "Startup checks complete"
        );

        let state = Arc::new(AppState::new(config));

        let api_server = ApiServer::new(state.clone())
            .context("Failed to create API server")?;

        Ok(Self { state, api_server })
    }

    /// Run the application until `shutdown` resolves
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let config = &self.state.config;
        info!(root = %config.site.root, "Serving site");
        info!("Main page: {}", config.index_url());

        if config.site.open_browser {
            browser::open_after(
                config.index_url(),
                Duration::from_millis(config.site.open_browser_delay_ms),
            );
        }

        self.api_server
            .run(shutdown)
            .await
            .context("API server error")?;

        info!("Application shutdown complete");
        Ok(())
    }
}
