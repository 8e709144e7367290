// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Driver
//!
//! Vendor-neutral load balancer driver interface.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Implements the driver capability set and its error taxonomy

// Load Balancer Driver Domain Interface (Anti-Corruption Layer)
//
// Every cloud provider gets one concrete implementation under infrastructure/.
// Provider-specific extensions (ex_* operations) live on the concrete type only.

use async_trait::async_trait;

use super::balancer::{Algorithm, LoadBalancer, Member, Node};

/// Domain interface for load balancer providers
#[async_trait]
pub trait LoadBalancerDriver: Send + Sync {
    /// Human-readable driver name
    fn name(&self) -> &'static str;

    /// Protocols accepted by `create_balancer`
    fn list_protocols(&self) -> Vec<&'static str>;

    /// Algorithms the provider can honour
    fn list_supported_algorithms(&self) -> Vec<Algorithm>;

    /// List every balancer visible to the account
    async fn list_balancers(&self) -> Result<Vec<LoadBalancer>, LoadBalancerError>;

    /// Fetch one balancer, failing with `NotFound` when the provider has no match
    async fn get_balancer(&self, balancer_id: &str) -> Result<LoadBalancer, LoadBalancerError>;

    /// Create a balancer with a single listener
    async fn create_balancer(
        &self,
        name: &str,
        port: u16,
        protocol: &str,
        algorithm: Algorithm,
        members: &[Member],
    ) -> Result<LoadBalancer, LoadBalancerError>;

    async fn destroy_balancer(&self, balancer: &LoadBalancer) -> Result<bool, LoadBalancerError>;

    /// Register a compute node and record it in the balancer's local member view
    async fn balancer_attach_compute_node(
        &self,
        balancer: &mut LoadBalancer,
        node: &Node,
    ) -> Result<Member, LoadBalancerError>;

    /// Register an existing member and record it in the balancer's local member view
    async fn balancer_attach_member(
        &self,
        balancer: &mut LoadBalancer,
        member: &Member,
    ) -> Result<Member, LoadBalancerError>;

    /// Deregister a member and drop it from the balancer's local member view
    async fn balancer_detach_member(
        &self,
        balancer: &mut LoadBalancer,
        member: &Member,
    ) -> Result<bool, LoadBalancerError>;

    /// Local member view; never issues a request
    fn balancer_list_members<'a>(&self, balancer: &'a LoadBalancer) -> &'a [Member] {
        balancer.members()
    }
}

/// Errors that can occur during load balancer operations
#[derive(Debug, thiserror::Error)]
pub enum LoadBalancerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Load balancer not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Provider error (HTTP {status}) {code}: {message}")]
    Provider {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The balancer exists on the provider but registering its members failed;
    /// `balancer` is the created balancer with an empty local member view
    #[error("Load balancer '{}' was created but a follow-up step failed: {source}", .balancer.id)]
    PartialCreate {
        balancer: Box<LoadBalancer>,
        source: Box<LoadBalancerError>,
    },
}
