// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Stratus Load Balancer CLI
//!
//! The `stratus` binary manages cloud load balancers through the
//! vendor-neutral driver interface, with provider extensions for ELB
//! policies and listeners.
//!
//! ## Commands
//!
//! - `stratus balancer list|get|create|destroy|attach|detach|members|protocols|algorithms`
//! - `stratus policy list|types|create|delete|set-listener|set-backend`
//! - `stratus listener create`
//! - `stratus config show|validate|generate`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

use stratus_lb::commands::{self, BalancerCommand, ConfigCommand, ListenerCommand, PolicyCommand};
use stratus_lb::Globals;

/// Stratus - manage cloud load balancers
#[derive(Parser)]
#[command(name = "stratus")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "STRATUS_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Configuration profile to use (default: the configured default_profile)
    #[arg(short, long, global = true, env = "STRATUS_PROFILE")]
    profile: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "STRATUS_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load balancer lifecycle and membership
    #[command(name = "balancer")]
    Balancer {
        #[command(subcommand)]
        command: BalancerCommand,
    },

    /// Balancer policies (ELB)
    #[command(name = "policy")]
    Policy {
        #[command(subcommand)]
        command: PolicyCommand,
    },

    /// Balancer listeners (ELB)
    #[command(name = "listener")]
    Listener {
        #[command(subcommand)]
        command: ListenerCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before parsing so env-backed flags pick it up
    let dotenv = dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    if let Some(path) = dotenv {
        debug!("Loaded environment from {:?}", path);
    }

    let globals = Globals {
        config: cli.config,
        profile: cli.profile,
        json: cli.json,
    };

    match cli.command {
        Some(Commands::Balancer { command }) => {
            commands::balancer::handle_command(command, &globals).await
        }
        Some(Commands::Policy { command }) => {
            commands::policy::handle_command(command, &globals).await
        }
        Some(Commands::Listener { command }) => {
            commands::listener::handle_command(command, &globals).await
        }
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, &globals).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
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
    fn test_parse_create_with_zones_and_members() {
        let cli = Cli::try_parse_from([
            "stratus", "balancer", "create", "web", "--port", "80", "--protocol", "tcp",
            "--member", "i-1", "--member", "i-2", "--zone", "a", "--zone", "b",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Balancer {
                command:
                    BalancerCommand::Create {
                        name,
                        port,
                        members,
                        zones,
                        ..
                    },
            }) => {
                assert_eq!(name, "web");
                assert_eq!(port, 80);
                assert_eq!(members, vec!["i-1", "i-2"]);
                assert_eq!(zones, vec!["a", "b"]);
            }
            _ => panic!("expected balancer create"),
        }
    }

    #[test]
    fn test_parse_listener_with_certificate() {
        let cli = Cli::try_parse_from([
            "stratus",
            "listener",
            "create",
            "web",
            "--listener",
            "443:8443:https:arn:aws:iam::123:server-certificate/web",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Listener {
                command: ListenerCommand::Create { listeners, .. },
            }) => {
                assert_eq!(listeners.len(), 1);
                assert_eq!(
                    listeners[0].ssl_certificate_id.as_deref(),
                    Some("arn:aws:iam::123:server-certificate/web")
                );
            }
            _ => panic!("expected listener create"),
        }
    }

    #[test]
    fn test_rejects_unknown_algorithm() {
        assert!(Cli::try_parse_from([
            "stratus", "balancer", "create", "web", "--port", "80", "--algorithm", "fastest",
        ])
        .is_err());
    }
}
