// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Balancer policy commands (ELB extensions)
//!
//! Commands: list, types, create, delete, set-listener, set-backend

use anyhow::{Context, Result};
use clap::Subcommand;

use stratus_core::domain::LoadBalancer;
use stratus_core::{ElasticLbDriver, LoadBalancerDriver};

use crate::output;
use crate::Globals;

#[derive(Subcommand)]
pub enum PolicyCommand {
    /// List policy names defined on a load balancer
    List {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// List policy types offered by the provider
    Types,

    /// Create a policy on a load balancer
    Create {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(value_name = "POLICY")]
        policy: String,

        /// Policy type, e.g. ProxyProtocolPolicyType
        #[arg(long = "type", value_name = "TYPE")]
        policy_type: String,

        /// Policy attribute as KEY=VALUE (repeatable, order preserved)
        #[arg(long = "attribute", value_name = "KEY=VALUE", value_parser = parse_attribute)]
        attributes: Vec<(String, String)>,
    },

    /// Delete a policy from a load balancer
    Delete {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(value_name = "POLICY")]
        policy: String,
    },

    /// Set the policies applied to a listener port (none clears them)
    SetListener {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(long)]
        port: u16,

        #[arg(long = "policy", value_name = "POLICY")]
        policies: Vec<String>,
    },

    /// Set the policies applied to a backend instance port (none clears them)
    SetBackend {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(long)]
        port: u16,

        #[arg(long = "policy", value_name = "POLICY")]
        policies: Vec<String>,
    },
}

pub async fn handle_command(command: PolicyCommand, globals: &Globals) -> Result<()> {
    let elb = globals.elb()?;

    match command {
        PolicyCommand::List { name } => {
            let balancer = fetch(&elb, &name).await?;
            let policies = elb
                .ex_list_balancer_policies(&balancer)
                .await
                .with_context(|| format!("Failed to list policies for '{}'", name))?;
            output::print_names(&policies, "No policies defined", globals.json)
        }
        PolicyCommand::Types => {
            let types = elb
                .ex_list_balancer_policy_types()
                .await
                .context("Failed to list policy types")?;
            output::print_names(&types, "No policy types available", globals.json)
        }
        PolicyCommand::Create {
            name,
            policy,
            policy_type,
            attributes,
        } => {
            let balancer = fetch(&elb, &name).await?;
            let attributes: Vec<(&str, &str)> = attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            let created = elb
                .ex_create_balancer_policy(&balancer, &policy, &policy_type, &attributes)
                .await
                .with_context(|| format!("Failed to create policy '{}'", policy))?;
            output::print_outcome(
                created,
                &format!("Policy '{}' created on {}", policy, name),
                &format!("Policy '{}' was not created", policy),
            )
        }
        PolicyCommand::Delete { name, policy } => {
            let balancer = fetch(&elb, &name).await?;
            let deleted = elb
                .ex_delete_balancer_policy(&balancer, &policy)
                .await
                .with_context(|| format!("Failed to delete policy '{}'", policy))?;
            output::print_outcome(
                deleted,
                &format!("Policy '{}' deleted from {}", policy, name),
                &format!("Policy '{}' was not deleted", policy),
            )
        }
        PolicyCommand::SetListener {
            name,
            port,
            policies,
        } => {
            let balancer = fetch(&elb, &name).await?;
            let policies: Vec<&str> = policies.iter().map(String::as_str).collect();
            let applied = elb
                .ex_set_balancer_policies_listener(&balancer, port, &policies)
                .await
                .with_context(|| format!("Failed to set policies on listener {}", port))?;
            output::print_outcome(
                applied,
                &format!("Listener {} policies updated on {}", port, name),
                &format!("Listener {} policies were not updated", port),
            )
        }
        PolicyCommand::SetBackend {
            name,
            port,
            policies,
        } => {
            let balancer = fetch(&elb, &name).await?;
            let policies: Vec<&str> = policies.iter().map(String::as_str).collect();
            let applied = elb
                .ex_set_balancer_policies_backend_server(&balancer, port, &policies)
                .await
                .with_context(|| format!("Failed to set policies on backend port {}", port))?;
            output::print_outcome(
                applied,
                &format!("Backend port {} policies updated on {}", port, name),
                &format!("Backend port {} policies were not updated", port),
            )
        }
    }
}

async fn fetch(elb: &ElasticLbDriver, name: &str) -> Result<LoadBalancer> {
    elb.get_balancer(name)
        .await
        .with_context(|| format!("Failed to get load balancer '{}'", name))
}

pub fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}
