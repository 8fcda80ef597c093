//! Navermap dev server - Main Application Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, ConfigLoader};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod browser;
mod cli;
mod inspection;
mod preflight;

use app::Application;
use cli::{Cli, Commands};
use inspection::ScriptInspection;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if it exists; logged once logging is up
    let dotenv_result = dotenv::dotenv();

    let cli = Cli::parse();
    let command = cli.resolved_command();

    if let Commands::InitConfig { path } = &command {
        ConfigLoader::create_example(path)?;
        println!("Wrote example settings to {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = ConfigLoader::load(&cli.config)
        .context("Failed to load configuration")?;

    if let Commands::Serve { port, root, open } = &command {
        if let Some(port) = port {
            config.server.port = *port;
        }
        if let Some(root) = root {
            config.site.root = root.clone();
        }
        config.site.open_browser |= *open;
    }

    init_logging(&config)?;

    match dotenv_result {
        Ok(path) => info!("Loaded environment variables from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Could not load .env file: {}", e),
    }

    preflight::check_settings(&config).context("Invalid settings")?;

    match command {
        Commands::Serve { .. } => serve(config).await,
        Commands::Check { script } => check(&config, script),
        Commands::Generate { force, output } => generate(&config, force, output),
        Commands::InitConfig { .. } => Ok(ExitCode::SUCCESS),
    }
}

async fn serve(config: Config) -> Result<ExitCode> {
    info!("Starting Navermap dev server v{}", env!("CARGO_PKG_VERSION"));

    let mut app = Application::new(config)
        .context("Failed to create application")?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        info!("Shutdown signal received");
    };

    app.run(shutdown_signal).await?;

    Ok(ExitCode::SUCCESS)
}

fn check(config: &Config, script: Option<PathBuf>) -> Result<ExitCode> {
    let path = script.unwrap_or_else(|| config.site.config_script_path());
    let inspection = ScriptInspection::read(&path)?;

    for warning in &inspection.warnings {
        println!("warning: {}", warning);
    }
    for message in &inspection.errors {
        println!("error: {}", message);
    }

    if inspection.valid {
        println!("{}: configuration is complete", path.display());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}: {} problem(s) found", path.display(), inspection.errors.len());
        Ok(ExitCode::FAILURE)
    }
}

fn generate(config: &Config, force: bool, output: Option<PathBuf>) -> Result<ExitCode> {
    let mut site = config.site.clone();
    if let Some(output) = output {
        site.root = output
            .parent()
            .map(|p| p.display().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| ".".to_string());
        site.config_script = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("Output path has no file name")?;
    }

    match preflight::generate_config_script(&site, force)? {
        preflight::GenerateOutcome::AlreadyExists(path) => {
            println!("{} already exists, use --force to overwrite", path.display());
            Ok(ExitCode::FAILURE)
        }
        _ => {
            let inspection = ScriptInspection::read(&site.config_script_path())?;
            println!("Wrote {}", site.config_script_path().display());
            for message in &inspection.errors {
                println!("error: {}", message);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Initialize logging from settings; `RUST_LOG` wins over the configured level
fn init_logging(config: &Config) -> Result<()> {
    let log_level = config.logging.level.clone();
    let log_format = config.logging.format.clone();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
    }

    info!("Logging initialized");
    info!("Log level: {}", log_level);
    info!("Log format: {}", log_format);

    Ok(())
}
