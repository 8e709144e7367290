// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Load balancer commands
//!
//! Commands: protocols, algorithms, list, get, create, destroy, attach, detach, members

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use stratus_core::domain::{Algorithm, LoadBalancerError, Member, Node};

use crate::output;
use crate::Globals;

#[derive(Subcommand)]
pub enum BalancerCommand {
    /// List supported listener protocols
    Protocols,

    /// List supported balancing algorithms
    Algorithms,

    /// List load balancers
    List,

    /// Show one load balancer
    Get {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Create a load balancer with one listener
    Create {
        #[arg(value_name = "NAME")]
        name: String,

        /// Listener port (used for both balancer and instances)
        #[arg(long)]
        port: u16,

        /// Listener protocol (tcp, ssl, http, https)
        #[arg(long, default_value = "http")]
        protocol: String,

        /// Balancing algorithm
        #[arg(long, default_value = "round-robin")]
        algorithm: Algorithm,

        /// Instance ids to register after creation
        #[arg(long = "member", value_name = "INSTANCE_ID")]
        members: Vec<String>,

        /// Availability zone suffixes (default: profile zones)
        #[arg(long = "zone", value_name = "SUFFIX")]
        zones: Vec<String>,
    },

    /// Delete a load balancer
    Destroy {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Register an instance with a load balancer
    Attach {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(value_name = "INSTANCE_ID")]
        instance_id: String,
    },

    /// Deregister an instance from a load balancer
    Detach {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(value_name = "INSTANCE_ID")]
        instance_id: String,
    },

    /// List instances registered with a load balancer
    Members {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

pub async fn handle_command(command: BalancerCommand, globals: &Globals) -> Result<()> {
    match command {
        BalancerCommand::Protocols => protocols(globals),
        BalancerCommand::Algorithms => algorithms(globals),
        BalancerCommand::List => list(globals).await,
        BalancerCommand::Get { name } => get(globals, &name).await,
        BalancerCommand::Create {
            name,
            port,
            protocol,
            algorithm,
            members,
            zones,
        } => create(globals, &name, port, &protocol, algorithm, members, zones).await,
        BalancerCommand::Destroy { name } => destroy(globals, &name).await,
        BalancerCommand::Attach { name, instance_id } => attach(globals, &name, &instance_id).await,
        BalancerCommand::Detach { name, instance_id } => detach(globals, &name, &instance_id).await,
        BalancerCommand::Members { name } => members(globals, &name).await,
    }
}

fn protocols(globals: &Globals) -> Result<()> {
    let driver = globals.driver()?;
    let protocols: Vec<String> = driver.list_protocols().iter().map(|p| p.to_string()).collect();
    output::print_names(&protocols, "No protocols supported", globals.json)
}

fn algorithms(globals: &Globals) -> Result<()> {
    let driver = globals.driver()?;
    let algorithms: Vec<String> = driver
        .list_supported_algorithms()
        .iter()
        .map(|a| a.to_string())
        .collect();
    output::print_names(&algorithms, "No algorithms supported", globals.json)
}

async fn list(globals: &Globals) -> Result<()> {
    let driver = globals.driver()?;
    let balancers = driver
        .list_balancers()
        .await
        .context("Failed to list load balancers")?;
    output::print_balancers(&balancers, globals.json)
}

async fn get(globals: &Globals, name: &str) -> Result<()> {
    let driver = globals.driver()?;
    let balancer = driver
        .get_balancer(name)
        .await
        .with_context(|| format!("Failed to get load balancer '{}'", name))?;
    output::print_balancer(&balancer, globals.json)
}

async fn create(
    globals: &Globals,
    name: &str,
    port: u16,
    protocol: &str,
    algorithm: Algorithm,
    members: Vec<String>,
    zones: Vec<String>,
) -> Result<()> {
    let protocol = protocol.to_ascii_lowercase();
    let members: Vec<Member> = members.into_iter().map(Member::new).collect();

    let driver = globals.driver()?;
    check_protocol(&protocol, &driver.list_protocols())?;

    let result = if zones.is_empty() {
        driver
            .create_balancer(name, port, &protocol, algorithm, &members)
            .await
    } else {
        let zones: Vec<&str> = zones.iter().map(String::as_str).collect();
        globals
            .elb()?
            .ex_create_balancer(name, port, &protocol, algorithm, &members, &zones)
            .await
    };

    let balancer = match result {
        Ok(balancer) => balancer,
        Err(LoadBalancerError::PartialCreate { balancer, source }) => {
            if !globals.json {
                println!(
                    "{}",
                    format!("⚠ Load balancer '{}' created without members", balancer.name)
                        .yellow()
                );
            }
            output::print_balancer(&balancer, globals.json)?;
            anyhow::bail!("Failed to register members with '{}': {}", name, source);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to create load balancer '{}'", name))
        }
    };

    if !globals.json {
        println!(
            "{}",
            format!("✓ Load balancer '{}' created", balancer.name).green()
        );
    }
    output::print_balancer(&balancer, globals.json)
}

/// Reject protocols the driver does not list before anything is sent
fn check_protocol(protocol: &str, supported: &[&str]) -> Result<()> {
    if !supported.contains(&protocol) {
        anyhow::bail!(
            "Unsupported protocol '{}'. Supported: {}",
            protocol,
            supported.join(", ")
        );
    }
    Ok(())
}

async fn destroy(globals: &Globals, name: &str) -> Result<()> {
    let driver = globals.driver()?;
    let balancer = driver
        .get_balancer(name)
        .await
        .with_context(|| format!("Failed to get load balancer '{}'", name))?;

    let deleted = driver
        .destroy_balancer(&balancer)
        .await
        .with_context(|| format!("Failed to delete load balancer '{}'", name))?;

    output::print_outcome(
        deleted,
        &format!("Load balancer '{}' deleted", name),
        &format!("Load balancer '{}' was not deleted", name),
    )
}

async fn attach(globals: &Globals, name: &str, instance_id: &str) -> Result<()> {
    let driver = globals.driver()?;
    let mut balancer = driver
        .get_balancer(name)
        .await
        .with_context(|| format!("Failed to get load balancer '{}'", name))?;

    driver
        .balancer_attach_compute_node(&mut balancer, &Node::new(instance_id))
        .await
        .with_context(|| format!("Failed to register '{}' with '{}'", instance_id, name))?;

    if globals.json {
        return output::print_members(driver.balancer_list_members(&balancer), true);
    }
    println!(
        "{}",
        format!("✓ Registered {} with {}", instance_id, name).green()
    );
    Ok(())
}

async fn detach(globals: &Globals, name: &str, instance_id: &str) -> Result<()> {
    let driver = globals.driver()?;
    let mut balancer = driver
        .get_balancer(name)
        .await
        .with_context(|| format!("Failed to get load balancer '{}'", name))?;

    let detached = driver
        .balancer_detach_member(&mut balancer, &Member::new(instance_id))
        .await
        .with_context(|| format!("Failed to deregister '{}' from '{}'", instance_id, name))?;

    if globals.json {
        return output::print_members(driver.balancer_list_members(&balancer), true);
    }
    output::print_outcome(
        detached,
        &format!("Deregistered {} from {}", instance_id, name),
        &format!("{} was not deregistered from {}", instance_id, name),
    )
}

async fn members(globals: &Globals, name: &str) -> Result<()> {
    let driver = globals.driver()?;
    let balancer = driver
        .get_balancer(name)
        .await
        .with_context(|| format!("Failed to get load balancer '{}'", name))?;

    output::print_members(driver.balancer_list_members(&balancer), globals.json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_protocol() {
        let supported = ["tcp", "ssl", "http", "https"];
        assert!(check_protocol("https", &supported).is_ok());

        let err = check_protocol("udp", &supported).unwrap_err();
        assert!(err.to_string().contains("Unsupported protocol 'udp'"));
    }
}
