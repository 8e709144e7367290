// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Stratus CLI

pub mod balancer;
pub mod config;
pub mod listener;
pub mod policy;

pub use self::balancer::BalancerCommand;
pub use self::config::ConfigCommand;
pub use self::listener::ListenerCommand;
pub use self::policy::PolicyCommand;
