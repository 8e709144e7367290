// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Balancer
//!
//! Vendor-neutral load balancer value objects.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Implements the balancer, member and listener model shared by all drivers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Lifecycle state of a load balancer as reported by a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Provisioning has been requested but not confirmed
    Pending,

    /// Serving traffic
    Active,

    /// The provider does not report a state
    Unknown,

    /// Provisioning failed
    Error,

    /// Removed from the provider
    Deleted,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::Pending => "pending",
            State::Active => "active",
            State::Unknown => "unknown",
            State::Error => "error",
            State::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// Traffic distribution algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    RoundRobin,
    Random,
    LeastConnections,
    WeightedRoundRobin,
    WeightedLeastConnections,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::RoundRobin
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Algorithm::RoundRobin => "round-robin",
            Algorithm::Random => "random",
            Algorithm::LeastConnections => "least-connections",
            Algorithm::WeightedRoundRobin => "weighted-round-robin",
            Algorithm::WeightedLeastConnections => "weighted-least-connections",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "round-robin" => Ok(Algorithm::RoundRobin),
            "random" => Ok(Algorithm::Random),
            "least-connections" => Ok(Algorithm::LeastConnections),
            "weighted-round-robin" => Ok(Algorithm::WeightedRoundRobin),
            "weighted-least-connections" => Ok(Algorithm::WeightedLeastConnections),
            other => Err(format!("Unknown algorithm: {}", other)),
        }
    }
}

/// Compute node reference used when attaching instances to a balancer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Provider instance identifier
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// Instance registered behind a balancer
///
/// Members are identified by `id` alone; `ip` and `port` are only populated
/// by providers that track them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Id of the owning balancer (non-owning back-reference)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balancer_id: Option<String>,
}

impl Member {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ip: None,
            port: None,
            balancer_id: None,
        }
    }

    pub fn with_balancer(mut self, balancer_id: impl Into<String>) -> Self {
        self.balancer_id = Some(balancer_id.into());
        self
    }
}

/// Provider-managed load distribution endpoint
///
/// # Local member view
///
/// `members()` is a local view, not the provider's authoritative list. It is
/// seeded when the balancer is parsed from a describe response (empty after a
/// create) and afterwards only changes through attach/detach calls made with
/// a driver on this value. Obtain a fresh balancer to observe changes made
/// elsewhere.
///
/// Attach and detach take `&mut LoadBalancer`. Callers sharing one balancer
/// between tasks must serialize access themselves (e.g. behind a mutex).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: String,
    pub name: String,
    pub state: State,

    /// Address or DNS name assigned by the provider
    pub ip: Option<String>,

    pub port: Option<u16>,

    /// Name of the driver that produced this balancer
    pub driver: String,

    /// Provider metadata that has no vendor-neutral field
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, String>,

    #[serde(default)]
    members: Vec<Member>,
}

impl LoadBalancer {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        state: State,
        ip: Option<String>,
        port: Option<u16>,
        driver: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            state,
            ip,
            port,
            driver: driver.into(),
            extra: HashMap::new(),
            members: Vec::new(),
        }
    }

    /// Seed the local member view
    pub fn with_members(mut self, members: Vec<Member>) -> Self {
        self.members = members;
        self
    }

    /// Local member view (see the type-level docs for its staleness contract)
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Record a member in the local view after a successful registration
    pub fn record_member(&mut self, member: Member) {
        self.members.push(member);
    }

    /// Drop every local entry whose id matches; returns how many were removed
    pub fn forget_member(&mut self, member_id: &str) -> usize {
        let before = self.members.len();
        self.members.retain(|m| m.id != member_id);
        before - self.members.len()
    }
}

/// Listener binding between a balancer port and an instance port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub load_balancer_port: u16,
    pub instance_port: u16,
    pub protocol: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_certificate_id: Option<String>,
}

impl Listener {
    pub fn new(load_balancer_port: u16, instance_port: u16, protocol: impl Into<String>) -> Self {
        Self {
            load_balancer_port,
            instance_port,
            protocol: protocol.into(),
            ssl_certificate_id: None,
        }
    }

    pub fn with_certificate(mut self, certificate_id: impl Into<String>) -> Self {
        self.ssl_certificate_id = Some(certificate_id.into());
        self
    }

    /// HTTPS and SSL listeners terminate TLS and need a certificate
    pub fn requires_certificate(&self) -> bool {
        let protocol = self.protocol.to_ascii_uppercase();
        protocol == "HTTPS" || protocol == "SSL"
    }
}

impl std::str::FromStr for Listener {
    type Err = String;

    /// Parses `LB_PORT:INSTANCE_PORT:PROTOCOL[:CERTIFICATE_ID]`
    ///
    /// Certificate ids are ARNs and contain colons, so everything after the
    /// third separator is kept verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(4, ':');
        let lb_port = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| format!("Missing balancer port in '{}'", s))?;
        let instance_port = parts
            .next()
            .ok_or_else(|| format!("Missing instance port in '{}'", s))?;
        let protocol = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| format!("Missing protocol in '{}'", s))?;

        let mut listener = Listener::new(
            lb_port
                .parse()
                .map_err(|_| format!("Invalid balancer port: {}", lb_port))?,
            instance_port
                .parse()
                .map_err(|_| format!("Invalid instance port: {}", instance_port))?,
            protocol,
        );
        if let Some(certificate) = parts.next().filter(|c| !c.is_empty()) {
            listener = listener.with_certificate(certificate);
        }
        Ok(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balancer() -> LoadBalancer {
        LoadBalancer::new("web", "web", State::Active, None, Some(80), "test")
    }

    #[test]
    fn test_forget_member_removes_all_matching_ids() {
        let mut lb = balancer().with_members(vec![
            Member::new("i-1"),
            Member::new("i-2"),
            Member::new("i-1"),
        ]);

        assert_eq!(lb.forget_member("i-1"), 2);
        assert_eq!(lb.members(), &[Member::new("i-2")]);
        assert_eq!(lb.forget_member("i-1"), 0);
    }

    #[test]
    fn test_listener_requires_certificate() {
        assert!(Listener::new(443, 80, "https").requires_certificate());
        assert!(Listener::new(443, 80, "SSL").requires_certificate());
        assert!(!Listener::new(80, 80, "HTTP").requires_certificate());
        assert!(!Listener::new(25, 25, "tcp").requires_certificate());
    }

    #[test]
    fn test_listener_from_str_keeps_arn_colons() {
        let listener: Listener = "443:8443:HTTPS:arn:aws:iam::123456789012:server-certificate/web"
            .parse()
            .unwrap();
        assert_eq!(listener.load_balancer_port, 443);
        assert_eq!(listener.instance_port, 8443);
        assert_eq!(listener.protocol, "HTTPS");
        assert_eq!(
            listener.ssl_certificate_id.as_deref(),
            Some("arn:aws:iam::123456789012:server-certificate/web")
        );

        let plain: Listener = "80:8080:http".parse().unwrap();
        assert_eq!(plain.ssl_certificate_id, None);

        assert!("80:http".parse::<Listener>().is_err());
        assert!("eighty:80:http".parse::<Listener>().is_err());
    }

    #[test]
    fn test_algorithm_parse() {
        assert_eq!("round_robin".parse::<Algorithm>(), Ok(Algorithm::RoundRobin));
        assert_eq!(
            "Least-Connections".parse::<Algorithm>(),
            Ok(Algorithm::LeastConnections)
        );
        assert!("fastest".parse::<Algorithm>().is_err());
    }
}
