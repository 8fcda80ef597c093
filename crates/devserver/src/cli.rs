//! Command line interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dev server for the Naver Map page
#[derive(Parser, Debug)]
#[command(name = "navermap")]
#[command(version)]
#[command(about = "Serve the Naver Map page and check its config.js")]
pub struct Cli {
    /// Settings file (YAML); missing files fall back to defaults
    #[arg(short, long, env = "CONFIG_PATH", default_value = "navermap.yaml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate config.js if needed, run the startup checks and serve the site
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Directory to serve
        #[arg(long)]
        root: Option<String>,
        /// Open the index page in a browser once the server is up
        #[arg(long)]
        open: bool,
    },
    /// Validate a config script and print every problem
    Check {
        /// Script to check (defaults to the configured config script)
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Write config.js from environment variables
    Generate {
        /// Overwrite an existing script
        #[arg(long)]
        force: bool,
        /// Where to write (defaults to the configured config script)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write an example settings file
    InitConfig {
        /// Destination path
        #[arg(default_value = "navermap.yaml")]
        path: PathBuf,
    },
}

impl Cli {
    /// The command to run; `serve` when none is given
    pub fn resolved_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve {
            port: None,
            root: None,
            open: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::parse_from(["navermap"]);
        assert!(matches!(
            cli.resolved_command(),
            Commands::Serve { port: None, root: None, open: false }
        ));
    }

    #[test]
    fn test_check_with_script() {
        let cli = Cli::parse_from(["navermap", "check", "--script", "public/config.js"]);
        match cli.resolved_command() {
            Commands::Check { script } => assert_eq!(script, Some(PathBuf::from("public/config.js"))),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from(["navermap", "--config", "dev.yaml", "serve", "-p", "9000", "--open"]);
        assert_eq!(cli.config, PathBuf::from("dev.yaml"));
        assert!(matches!(cli.resolved_command(), Commands::Serve { port: Some(9000), open: true, .. }));
    }
}
