//! CLI interface for DocSave

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docsave")]
#[command(author = "Krakaw")]
#[command(version)]
#[command(about = "Save documents and links behind web and mobile sign-in", long_about = None)]
pub struct Cli {
    /// Path to the config file (defaults to searching upward for docsave.toml)
    #[arg(short, long, global = true, env = "DOCSAVE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default docsave.toml in the current directory
    Init,

    /// Validate the config and check the database is reachable
    Check,

    /// Create or update the database schema
    Migrate,

    /// Start the HTTP API server and web UI
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(long, env = "DOCSAVE_HOST")]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },
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
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from(["docsave", "serve", "--host", "127.0.0.1", "-p", "8080"]).unwrap();
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(8080));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["docsave", "check", "--config", "/tmp/docsave.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/docsave.toml")));
        assert!(matches!(cli.command, Commands::Check));
    }
}
