// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Table and JSON rendering for command results

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use stratus_core::domain::{LoadBalancer, Member};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn balancer_table(balancers: &[LoadBalancer]) -> String {
    let mut out = format!(
        "{:<32} {:<10} {:<6} {:<8} {}\n",
        "NAME", "STATE", "PORT", "MEMBERS", "ADDRESS"
    );
    for lb in balancers {
        out.push_str(&format!(
            "{:<32} {:<10} {:<6} {:<8} {}\n",
            lb.name,
            lb.state.to_string(),
            lb.port.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
            lb.members().len(),
            lb.ip.as_deref().unwrap_or("-"),
        ));
    }
    out
}

pub fn print_balancers(balancers: &[LoadBalancer], json: bool) -> Result<()> {
    if json {
        return print_json(balancers);
    }

    if balancers.is_empty() {
        println!("{}", "No load balancers found".yellow());
        return Ok(());
    }

    println!("{} load balancers found:", balancers.len());
    print!("{}", balancer_table(balancers));
    Ok(())
}

pub fn print_balancer(lb: &LoadBalancer, json: bool) -> Result<()> {
    if json {
        return print_json(lb);
    }

    println!("{}", lb.name.bold());
    println!("  ID:      {}", lb.id);
    println!("  State:   {}", lb.state);
    println!("  Address: {}", lb.ip.as_deref().unwrap_or("-"));
    println!(
        "  Port:    {}",
        lb.port.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string())
    );
    println!("  Driver:  {}", lb.driver);

    let mut extra: Vec<_> = lb.extra.iter().collect();
    extra.sort();
    for (key, value) in extra {
        println!("  {}: {}", key, value);
    }

    println!("  Members: {}", lb.members().len());
    for member in lb.members() {
        println!("    - {}", member.id);
    }
    Ok(())
}

pub fn print_members(members: &[Member], json: bool) -> Result<()> {
    if json {
        return print_json(members);
    }

    if members.is_empty() {
        println!("{}", "No members registered".yellow());
        return Ok(());
    }

    for member in members {
        println!("{}", member.id);
    }
    Ok(())
}

pub fn print_names(names: &[String], empty_message: &str, json: bool) -> Result<()> {
    if json {
        return print_json(names);
    }

    if names.is_empty() {
        println!("{}", empty_message.yellow());
        return Ok(());
    }

    for name in names {
        println!("{}", name);
    }
    Ok(())
}

/// Report a boolean provider outcome
pub fn print_outcome(ok: bool, success: &str, failure: &str) -> Result<()> {
    if ok {
        println!("{}", format!("✓ {}", success).green());
        Ok(())
    } else {
        anyhow::bail!("{}", failure)
    }
}
