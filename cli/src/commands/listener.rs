// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Balancer listener commands (ELB extensions)

use anyhow::{Context, Result};
use clap::Subcommand;

use stratus_core::domain::Listener;
use stratus_core::LoadBalancerDriver;

use crate::output;
use crate::Globals;

#[derive(Subcommand)]
pub enum ListenerCommand {
    /// Add listeners to a load balancer
    Create {
        #[arg(value_name = "NAME")]
        name: String,

        /// Listener as LB_PORT:INSTANCE_PORT:PROTOCOL[:CERTIFICATE_ID] (repeatable)
        #[arg(long = "listener", value_name = "LISTENER", required = true)]
        listeners: Vec<Listener>,
    },
}

pub async fn handle_command(command: ListenerCommand, globals: &Globals) -> Result<()> {
    match command {
        ListenerCommand::Create { name, listeners } => {
            let elb = globals.elb()?;
            let balancer = elb
                .get_balancer(&name)
                .await
                .with_context(|| format!("Failed to get load balancer '{}'", name))?;

            let created = elb
                .ex_create_balancer_listeners(&balancer, &listeners)
                .await
                .with_context(|| format!("Failed to add listeners to '{}'", name))?;

            output::print_outcome(
                created,
                &format!("{} listener(s) added to {}", listeners.len(), name),
                &format!("Listeners were not added to {}", name),
            )
        }
    }
}
