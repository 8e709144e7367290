// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use stratus_core::domain::driver_config::LoadBalancerConfig;

use crate::Globals;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./stratus-config.yaml)
        #[arg(short, long, default_value = "./stratus-config.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(command: ConfigCommand, globals: &Globals) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(globals, paths),
        ConfigCommand::Validate { file } => validate(file.or_else(|| globals.config.clone())),
        ConfigCommand::Generate { output, examples } => generate(output, examples),
    }
}

fn show(globals: &Globals, show_paths: bool) -> Result<()> {
    let config = LoadBalancerConfig::load_or_default(globals.config.clone())
        .context("Failed to load configuration")?;

    if globals.json {
        return crate::output::print_json(&redacted(config));
    }

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &globals.config {
            Some(path) => println!("  1. --config flag: {}", path.display()),
            None => println!("  1. --config flag: {}", "(not set)".dimmed()),
        }
        println!(
            "  2. STRATUS_CONFIG_PATH: {}",
            std::env::var("STRATUS_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./stratus-config.yaml");
        println!("  4. ~/.stratus/config.yaml");
        println!("  5. /etc/stratus/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!("  Name: {}", config.metadata.name);
    println!(
        "  Default profile: {}",
        config.spec.default_profile.as_deref().unwrap_or("(none)")
    );
    println!();

    println!("{}", "Profiles:".bold());
    for profile in &config.spec.profiles {
        let status = if profile.enabled {
            "enabled".green()
        } else {
            "disabled".dimmed()
        };
        println!("  {} ({}, {})", profile.name.bold(), profile.provider_type, status);
        println!("    Region: {}", profile.region);
        if let Some(endpoint) = &profile.endpoint {
            println!("    Endpoint: {}", endpoint);
        }
        println!("    Zones: {}", profile.availability_zones.join(", "));
        println!("    Timeout: {}s", profile.timeout_secs);
        println!("    Access key: {}", mask(&profile.access_key_id));
    }

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = LoadBalancerConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    let sample = if with_examples {
        include_str!("../../templates/config-with-examples.yaml")
    } else {
        include_str!("../../templates/config-minimal.yaml")
    };

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

/// Hide literal credentials; `env:` references are shown as-is
fn mask(value: &str) -> String {
    if value.starts_with("env:") || value.is_empty() {
        value.to_string()
    } else {
        "********".to_string()
    }
}

fn redacted(mut config: LoadBalancerConfig) -> LoadBalancerConfig {
    for profile in &mut config.spec.profiles {
        profile.access_key_id = mask(&profile.access_key_id);
        profile.secret_access_key = mask(&profile.secret_access_key);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_env_references() {
        assert_eq!(mask("env:AWS_ACCESS_KEY_ID"), "env:AWS_ACCESS_KEY_ID");
        assert_eq!(mask("AKIDEXAMPLE"), "********");
        assert_eq!(mask(""), "");
    }

    #[test]
    fn test_templates_are_valid() {
        for template in [
            include_str!("../../templates/config-minimal.yaml"),
            include_str!("../../templates/config-with-examples.yaml"),
        ] {
            let config = LoadBalancerConfig::from_yaml_str(template).unwrap();
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stratus-config.yaml");
        generate(path.clone(), false).unwrap();

        let config = LoadBalancerConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.spec.default_profile.as_deref(), Some("default"));
    }
}
