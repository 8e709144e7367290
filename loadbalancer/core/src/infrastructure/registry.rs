// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Load Balancer Driver Registry - Profile Resolution and Driver Management
//
// Builds one driver per enabled configuration profile and hands out either
// the vendor-neutral interface or the concrete driver for extension calls.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::driver::LoadBalancerDriver;
use crate::domain::driver_config::{LoadBalancerConfig, ProfileConfig};
use crate::infrastructure::elb::ElasticLbDriver;

/// A driver built from a profile
#[derive(Clone)]
pub enum RegisteredDriver {
    Elb(Arc<ElasticLbDriver>),
}

impl RegisteredDriver {
    pub fn as_driver(&self) -> Arc<dyn LoadBalancerDriver> {
        match self {
            RegisteredDriver::Elb(driver) => driver.clone(),
        }
    }

    pub fn as_elb(&self) -> Option<Arc<ElasticLbDriver>> {
        match self {
            RegisteredDriver::Elb(driver) => Some(driver.clone()),
        }
    }
}

/// Registry for managing drivers keyed by profile name
pub struct DriverRegistry {
    drivers: HashMap<String, RegisteredDriver>,
    default_profile: Option<String>,
}

impl DriverRegistry {
    /// Create driver registry from configuration
    pub fn from_config(config: &LoadBalancerConfig) -> anyhow::Result<Self> {
        let mut drivers = HashMap::new();

        info!("Initializing load balancer driver registry");

        for profile in &config.spec.profiles {
            if !profile.enabled {
                info!("Profile '{}' disabled, skipping", profile.name);
                continue;
            }

            match Self::create_driver(profile) {
                Ok(driver) => {
                    info!(
                        "Registered profile '{}' ({} in {})",
                        profile.name, profile.provider_type, profile.region
                    );
                    drivers.insert(profile.name.clone(), driver);
                }
                Err(e) => {
                    warn!("Failed to initialize profile '{}': {}", profile.name, e);
                }
            }
        }

        if drivers.is_empty() {
            warn!("No load balancer profiles could be initialized");
        }

        Ok(Self {
            drivers,
            default_profile: config.spec.default_profile.clone(),
        })
    }

    /// Create a driver instance from a profile
    fn create_driver(profile: &ProfileConfig) -> anyhow::Result<RegisteredDriver> {
        let driver = match profile.provider_type.as_str() {
            "elb" => RegisteredDriver::Elb(Arc::new(ElasticLbDriver::from_profile(profile)?)),
            _ => anyhow::bail!("Unsupported provider type: {}", profile.provider_type),
        };

        Ok(driver)
    }

    fn resolve(&self, profile: Option<&str>) -> anyhow::Result<&RegisteredDriver> {
        let name = profile
            .or(self.default_profile.as_deref())
            .ok_or_else(|| anyhow::anyhow!("No profile selected and no default_profile configured"))?;

        self.drivers
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Profile '{}' is not available", name))
    }

    /// Vendor-neutral driver for a profile (default profile when `None`)
    pub fn get(&self, profile: Option<&str>) -> anyhow::Result<Arc<dyn LoadBalancerDriver>> {
        Ok(self.resolve(profile)?.as_driver())
    }

    /// Concrete ELB driver for extension operations
    pub fn elb(&self, profile: Option<&str>) -> anyhow::Result<Arc<ElasticLbDriver>> {
        let name = profile.or(self.default_profile.as_deref()).unwrap_or("-");
        self.resolve(profile)?
            .as_elb()
            .ok_or_else(|| anyhow::anyhow!("Profile '{}' is not an ELB profile", name))
    }

    pub fn default_profile(&self) -> Option<&str> {
        self.default_profile.as_deref()
    }

    /// Names of the initialized profiles, sorted
    pub fn profiles(&self) -> Vec<String> {
        let mut names: Vec<_> = self.drivers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_profile(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LoadBalancerConfig {
        LoadBalancerConfig::from_yaml_str(
            r#"
apiVersion: stratus.dev/v1
kind: LoadBalancerConfig
metadata:
  name: test
spec:
  default_profile: primary
  profiles:
    - name: primary
      region: us-east-1
      access_key_id: AKID
      secret_access_key: secret
    - name: secondary
      region: eu-west-1
      access_key_id: AKID
      secret_access_key: secret
      endpoint: http://localhost:4566
    - name: disabled
      region: us-east-1
      access_key_id: AKID
      secret_access_key: secret
      enabled: false
    - name: unsupported
      type: alb
      region: us-east-1
      access_key_id: AKID
      secret_access_key: secret
    - name: unresolved
      region: us-east-1
      access_key_id: env:STRATUS_TEST_UNSET_KEY_ID
      secret_access_key: secret
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_registry_creation() {
        let registry = DriverRegistry::from_config(&config()).unwrap();
        assert_eq!(registry.profiles(), vec!["primary", "secondary"]);
        assert!(!registry.has_profile("disabled"));
        assert!(!registry.has_profile("unsupported"));
        assert!(!registry.has_profile("unresolved"));
        assert_eq!(registry.default_profile(), Some("primary"));
    }

    #[test]
    fn test_registry_lookup() {
        let registry = DriverRegistry::from_config(&config()).unwrap();

        let default = registry.get(None).unwrap();
        assert_eq!(default.name(), "Amazon Elastic Load Balancing");

        let secondary = registry.elb(Some("secondary")).unwrap();
        assert_eq!(secondary.region(), "eu-west-1");

        assert!(registry.get(Some("disabled")).is_err());
    }
}
