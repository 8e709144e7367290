// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Stratus CLI library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Command handlers and output formatting for the `stratus` binary

pub mod commands;
pub mod output;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use stratus_core::domain::driver_config::LoadBalancerConfig;
use stratus_core::{DriverRegistry, ElasticLbDriver, LoadBalancerDriver};

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct Globals {
    pub config: Option<PathBuf>,
    pub profile: Option<String>,
    pub json: bool,
}

impl Globals {
    pub fn load_config(&self) -> Result<LoadBalancerConfig> {
        let config = LoadBalancerConfig::load_or_default(self.config.clone())
            .context("Failed to load configuration")?;
        config
            .validate()
            .context("Configuration validation failed")?;
        Ok(config)
    }

    pub fn registry(&self) -> Result<DriverRegistry> {
        DriverRegistry::from_config(&self.load_config()?)
    }

    /// Vendor-neutral driver for the selected profile
    pub fn driver(&self) -> Result<Arc<dyn LoadBalancerDriver>> {
        self.registry()?.get(self.profile.as_deref())
    }

    /// ELB driver for extension commands
    pub fn elb(&self) -> Result<Arc<ElasticLbDriver>> {
        self.registry()?.elb(self.profile.as_deref())
    }
}
