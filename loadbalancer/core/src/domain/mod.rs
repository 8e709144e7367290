// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod balancer;
pub mod driver;
pub mod driver_config;

pub use balancer::{Algorithm, Listener, LoadBalancer, Member, Node, State};
pub use driver::{LoadBalancerDriver, LoadBalancerError};
