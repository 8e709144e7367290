// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Lib
//!
//! Vendor-neutral load balancer management with an Amazon ELB driver.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Exposes the domain model and the provider drivers

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::elb::ElasticLbDriver;
pub use infrastructure::registry::DriverRegistry;
