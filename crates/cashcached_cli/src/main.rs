//! cashcached - command line front end for the CashCached site
//!
//! - `scenario`: replay a headless scenario against the page
//! - `contact`: send one contact message through EmailJS
//! - `init`: write a default `site.toml`

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cashcached")]
#[command(about = "CashCached site tooling")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a headless scenario file
    Scenario {
        /// Scenario JSON file
        file: PathBuf,

        /// Write the JSON report to this relative path instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,

        /// Site configuration file or directory
        #[arg(long, default_value = ".")]
        config: PathBuf,
    },

    /// Send a contact message through EmailJS
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        message: String,

        /// Site configuration file or directory
        #[arg(long, default_value = ".")]
        config: PathBuf,
    },

    /// Write a default site.toml
    Init {
        /// Directory to write into
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Scenario {
            file,
            report,
            config,
        } => commands::scenario(&file, report.as_deref(), &config),
        Command::Contact {
            name,
            email,
            message,
            config,
        } => commands::contact(&config, &name, &email, &message).await,
        Command::Init { path, force } => commands::init(&path, force),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_contact_arguments() {
        let cli = Cli::try_parse_from([
            "cashcached",
            "-v",
            "contact",
            "--name",
            "Ana",
            "--email",
            "ana@x.com",
            "--message",
            "Hello",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Command::Contact { name, config, .. } => {
                assert_eq!(name, "Ana");
                assert_eq!(config, PathBuf::from("."));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
