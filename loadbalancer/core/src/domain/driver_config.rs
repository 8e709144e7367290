// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Driver Configuration Types
//
// Defines the configuration schema for load balancer driver profiles:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Named provider profiles (credentials, region, endpoint override)
// - "env:VAR_NAME" indirection for secrets
// - Discovery, environment overrides and validation

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const API_VERSION: &str = "stratus.dev/v1";
pub const KIND: &str = "LoadBalancerConfig";

/// Top-level configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadBalancerConfig {
    /// API version (must be "stratus.dev/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "LoadBalancerConfig")
    pub kind: String,

    pub metadata: ConfigMetadata,

    pub spec: LoadBalancerConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadBalancerConfigSpec {
    /// Profile used when none is selected explicitly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,
}

/// One provider account/region pairing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Unique profile name (e.g., "production", "staging-eu")
    pub name: String,

    /// Provider type
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String, // "elb"

    /// Provider region (e.g., "us-east-1")
    pub region: String,

    /// Access key id (supports "env:VAR_NAME")
    pub access_key_id: String,

    /// Secret access key (supports "env:VAR_NAME")
    pub secret_access_key: String,

    /// Endpoint override (e.g., a local emulator); defaults to the regional host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Zone suffixes appended to the region when creating balancers
    #[serde(default = "default_availability_zones")]
    pub availability_zones: Vec<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ProfileConfig {
    /// Resolve the access key id, following "env:VAR_NAME" indirection
    pub fn resolve_access_key_id(&self) -> anyhow::Result<String> {
        resolve_secret(&self.access_key_id)
    }

    /// Resolve the secret access key, following "env:VAR_NAME" indirection
    pub fn resolve_secret_access_key(&self) -> anyhow::Result<String> {
        resolve_secret(&self.secret_access_key)
    }
}

/// Resolve a secret from config (supports "env:VAR_NAME" syntax)
pub fn resolve_secret(value: &str) -> anyhow::Result<String> {
    match value.strip_prefix("env:") {
        Some(var_name) => std::env::var(var_name)
            .map_err(|_| anyhow::anyhow!("Environment variable not set: {}", var_name)),
        None => Ok(value.to_string()),
    }
}

fn default_true() -> bool {
    true
}

fn default_provider_type() -> String {
    "elb".to_string()
}

fn default_availability_zones() -> Vec<String> {
    vec!["a".to_string()]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for LoadBalancerConfigSpec {
    fn default() -> Self {
        Self {
            default_profile: Some("default".to_string()),
            profiles: vec![ProfileConfig {
                name: "default".to_string(),
                provider_type: default_provider_type(),
                region: std::env::var("AWS_REGION").unwrap_or_else(|_| default_region()),
                access_key_id: "env:AWS_ACCESS_KEY_ID".to_string(),
                secret_access_key: "env:AWS_SECRET_ACCESS_KEY".to_string(),
                endpoint: None,
                availability_zones: default_availability_zones(),
                timeout_secs: default_timeout_secs(),
                enabled: true,
            }],
        }
    }
}

impl Default for LoadBalancerConfig {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ConfigMetadata {
                name: "default".to_string(),
                version: None,
            },
            spec: LoadBalancerConfigSpec::default(),
        }
    }
}

impl LoadBalancerConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. STRATUS_CONFIG_PATH environment variable
    /// 2. ./stratus-config.yaml (working directory)
    /// 3. ~/.stratus/config.yaml (user home)
    /// 4. /etc/stratus/config.yaml (system, Unix) or C:\ProgramData\Stratus\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("STRATUS_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./stratus-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".stratus").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        let system_config = PathBuf::from("/etc/stratus/config.yaml");
        #[cfg(windows)]
        let system_config = PathBuf::from("C:\\ProgramData\\Stratus\\config.yaml");

        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to an environment-backed default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path (fail if missing/invalid)
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!(
                "No configuration file found in standard locations. Using AWS_* environment defaults."
            );
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to the default profile
    pub fn apply_env_overrides(&mut self) {
        let default_name = self.spec.default_profile.clone();
        let Some(profile) = self
            .spec
            .profiles
            .iter_mut()
            .find(|p| Some(&p.name) == default_name.as_ref())
        else {
            return;
        };

        if let Ok(region) = std::env::var("STRATUS_REGION") {
            if !region.is_empty() {
                tracing::info!("Environment override: STRATUS_REGION={}", region);
                profile.region = region;
            }
        }

        if let Ok(val) = std::env::var("STRATUS_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    tracing::info!("Environment override: STRATUS_TIMEOUT_SECS={}", secs);
                    profile.timeout_secs = secs;
                }
                _ => {
                    tracing::warn!(
                        "Invalid value for STRATUS_TIMEOUT_SECS: '{}'. Expected a positive integer. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Look up a profile by name, or the default profile when `name` is None
    pub fn profile(&self, name: Option<&str>) -> Option<&ProfileConfig> {
        let name = name.or(self.spec.default_profile.as_deref())?;
        self.spec.profiles.iter().find(|p| p.name == name)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        let mut seen = HashSet::new();
        for profile in &self.spec.profiles {
            if profile.name.is_empty() {
                anyhow::bail!("Profile name cannot be empty");
            }

            if !seen.insert(profile.name.as_str()) {
                anyhow::bail!("Duplicate profile name: {}", profile.name);
            }

            if profile.region.is_empty() {
                anyhow::bail!("Profile region cannot be empty for: {}", profile.name);
            }

            if profile.availability_zones.is_empty() {
                anyhow::bail!(
                    "Profile must list at least one availability zone: {}",
                    profile.name
                );
            }

            if profile.timeout_secs == 0 {
                anyhow::bail!("Profile timeout must be positive: {}", profile.name);
            }
        }

        if let Some(default_profile) = &self.spec.default_profile {
            if !self.spec.profiles.iter().any(|p| &p.name == default_profile) {
                anyhow::bail!("Default profile '{}' not found in profiles", default_profile);
            }
        }

        Ok(())
    }
}
