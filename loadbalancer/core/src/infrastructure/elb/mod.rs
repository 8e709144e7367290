// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Amazon Elastic Load Balancing Driver
//!
//! Implements the `LoadBalancerDriver` trait over the classic ELB query API
//! (version 2012-06-01). Every operation builds one parameter set, sends it
//! through a [`Connection`] and parses the XML reply.
//!
//! # Extension operations
//!
//! Policy and listener management have no vendor-neutral counterpart and are
//! only available on [`ElasticLbDriver`] itself (`ex_*` methods). They report
//! success as `Ok(status == 200)`; a rejected call is `Ok(false)`, not an error.

pub mod parser;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::balancer::{Algorithm, Listener, LoadBalancer, Member, Node, State};
use crate::domain::driver::{LoadBalancerDriver, LoadBalancerError};
use crate::domain::driver_config::ProfileConfig;
use crate::infrastructure::aws::{Connection, Params, Response, SignedConnection};

pub const VERSION: &str = "2012-06-01";
pub const ROOT: &str = "/2012-06-01/";
pub const NS: &str = "http://elasticloadbalancing.amazonaws.com/doc/2012-06-01/";
pub const DRIVER_NAME: &str = "Amazon Elastic Load Balancing";

const PROTOCOLS: [&str; 4] = ["tcp", "ssl", "http", "https"];
const DEFAULT_ZONES: [&str; 1] = ["a"];

/// Regional API host
pub fn host_for_region(region: &str) -> String {
    format!("elasticloadbalancing.{}.amazonaws.com", region)
}

/// ELB adapter
pub struct ElasticLbDriver {
    connection: Arc<dyn Connection>,
    region: String,
    default_zones: Vec<String>,
}

impl ElasticLbDriver {
    /// Create a driver signing with `access_id`/`secret` against the regional host
    pub fn new(
        access_id: impl Into<String>,
        secret: impl Into<String>,
        region: impl Into<String>,
    ) -> Result<Self, LoadBalancerError> {
        let region = region.into();
        let connection = SignedConnection::new(access_id, secret, &host_for_region(&region), VERSION)?;
        Ok(Self::with_connection(region, Arc::new(connection)))
    }

    /// Create a driver over an existing transport
    pub fn with_connection(region: impl Into<String>, connection: Arc<dyn Connection>) -> Self {
        Self {
            connection,
            region: region.into(),
            default_zones: DEFAULT_ZONES.iter().map(|z| z.to_string()).collect(),
        }
    }

    /// Create a driver from a configuration profile
    pub fn from_profile(profile: &ProfileConfig) -> anyhow::Result<Self> {
        let access_id = profile.resolve_access_key_id()?;
        let secret = profile.resolve_secret_access_key()?;

        let endpoint = match &profile.endpoint {
            Some(endpoint) => Url::parse(endpoint)
                .map_err(|e| anyhow::anyhow!("Invalid endpoint '{}': {}", endpoint, e))?,
            None => Url::parse(&format!("https://{}", host_for_region(&profile.region)))?,
        };

        let connection = SignedConnection::with_endpoint(
            access_id,
            secret,
            endpoint,
            VERSION,
            Duration::from_secs(profile.timeout_secs),
        )?;

        Ok(Self::with_connection(profile.region.clone(), Arc::new(connection))
            .with_default_zones(profile.availability_zones.clone()))
    }

    /// Zone suffixes used by `create_balancer`
    pub fn with_default_zones(mut self, zones: Vec<String>) -> Self {
        if !zones.is_empty() {
            self.default_zones = zones;
        }
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    async fn send(&self, params: Params) -> Result<Response, LoadBalancerError> {
        debug!(action = params.get("Action").unwrap_or("-"), region = %self.region, "Issuing ELB request");
        self.connection.request(ROOT, params).await
    }

    /// Send and fail on any non-2xx status
    async fn send_checked(&self, params: Params) -> Result<Response, LoadBalancerError> {
        self.send(params).await?.error_for_status()
    }

    /// Send and report success as `status == 200`
    async fn send_for_status(&self, params: Params) -> Result<bool, LoadBalancerError> {
        let action = params.get("Action").unwrap_or("-").to_string();
        let response = self.send(params).await?;
        if !response.is_ok() {
            warn!(action = %action, status = response.status().as_u16(), "ELB rejected request");
        }
        Ok(response.is_ok())
    }

    async fn register_instances(
        &self,
        balancer_name: &str,
        instance_ids: &[&str],
    ) -> Result<(), LoadBalancerError> {
        let params = Params::action("RegisterInstancesWithLoadBalancer")
            .with("LoadBalancerName", balancer_name)
            .with_indexed("Instances.member", "InstanceId", instance_ids.iter().copied());
        self.send_checked(params).await?;
        Ok(())
    }

    /// Create a balancer spanning the given zone suffixes (appended to the region)
    ///
    /// ELB does not take an algorithm, so `algorithm` is accepted for interface
    /// parity and not transmitted. `members` are registered with a second
    /// request once the balancer exists; if that request fails the balancer
    /// is still returned, inside `LoadBalancerError::PartialCreate`.
    pub async fn ex_create_balancer(
        &self,
        name: &str,
        port: u16,
        protocol: &str,
        algorithm: Algorithm,
        members: &[Member],
        availability_zones: &[&str],
    ) -> Result<LoadBalancer, LoadBalancerError> {
        if name.is_empty() {
            return Err(LoadBalancerError::InvalidArgument(
                "Balancer name must not be empty".to_string(),
            ));
        }
        if availability_zones.is_empty() {
            return Err(LoadBalancerError::InvalidArgument(
                "At least one availability zone is required".to_string(),
            ));
        }
        if algorithm != Algorithm::RoundRobin {
            debug!(%algorithm, "ELB ignores the balancing algorithm");
        }

        let protocol = protocol.to_ascii_uppercase();
        let zones: Vec<String> = availability_zones
            .iter()
            .map(|zone| format!("{}{}", self.region, zone))
            .collect();

        let params = Params::action("CreateLoadBalancer")
            .with("LoadBalancerName", name)
            .with("Listeners.member.1.InstancePort", port.to_string())
            .with("Listeners.member.1.InstanceProtocol", protocol.as_str())
            .with("Listeners.member.1.LoadBalancerPort", port.to_string())
            .with("Listeners.member.1.Protocol", protocol.as_str())
            .with_list("AvailabilityZones.member", zones);

        let response = self.send_checked(params).await?;
        let doc = response.document()?;
        let dns_name = parser::created_dns_name(doc.root_element());

        info!(balancer = name, dns_name = ?dns_name, "Created load balancer");

        let mut balancer =
            LoadBalancer::new(name, name, State::Pending, dns_name, Some(port), DRIVER_NAME);

        if !members.is_empty() {
            let ids: Vec<&str> = members.iter().map(|m| m.id.as_str()).collect();
            if let Err(source) = self.register_instances(name, &ids).await {
                warn!(balancer = name, error = %source, "Created load balancer but member registration failed");
                return Err(LoadBalancerError::PartialCreate {
                    balancer: Box::new(balancer),
                    source: Box::new(source),
                });
            }
            for member in members {
                balancer.record_member(Member {
                    balancer_id: Some(name.to_string()),
                    ..member.clone()
                });
            }
        }

        Ok(balancer)
    }

    /// Names of the policies defined on a balancer
    pub async fn ex_list_balancer_policies(
        &self,
        balancer: &LoadBalancer,
    ) -> Result<Vec<String>, LoadBalancerError> {
        let params = Params::action("DescribeLoadBalancerPolicies")
            .with("LoadBalancerName", balancer.id.as_str());

        let response = self.send_checked(params).await?;
        let doc = response.document()?;
        Ok(parser::policies(doc.root_element()))
    }

    /// Names of the policy types the provider offers
    pub async fn ex_list_balancer_policy_types(&self) -> Result<Vec<String>, LoadBalancerError> {
        let params = Params::action("DescribeLoadBalancerPolicyTypes");

        let response = self.send_checked(params).await?;
        let doc = response.document()?;
        Ok(parser::policy_types(doc.root_element()))
    }

    /// Create a policy; attributes are sent in slice order
    pub async fn ex_create_balancer_policy(
        &self,
        balancer: &LoadBalancer,
        policy_name: &str,
        policy_type: &str,
        attributes: &[(&str, &str)],
    ) -> Result<bool, LoadBalancerError> {
        let params = Params::action("CreateLoadBalancerPolicy")
            .with("LoadBalancerName", balancer.id.as_str())
            .with("PolicyName", policy_name)
            .with("PolicyTypeName", policy_type)
            .with_indexed(
                "PolicyAttributes.member",
                "AttributeName",
                attributes.iter().map(|(name, _)| *name),
            )
            .with_indexed(
                "PolicyAttributes.member",
                "AttributeValue",
                attributes.iter().map(|(_, value)| *value),
            );

        self.send_for_status(params).await
    }

    pub async fn ex_delete_balancer_policy(
        &self,
        balancer: &LoadBalancer,
        policy_name: &str,
    ) -> Result<bool, LoadBalancerError> {
        let params = Params::action("DeleteLoadBalancerPolicy")
            .with("LoadBalancerName", balancer.id.as_str())
            .with("PolicyName", policy_name);

        self.send_for_status(params).await
    }

    /// Replace the policies of a listener; an empty list clears them
    pub async fn ex_set_balancer_policies_listener(
        &self,
        balancer: &LoadBalancer,
        balancer_port: u16,
        policies: &[&str],
    ) -> Result<bool, LoadBalancerError> {
        let params = Params::action("SetLoadBalancerPoliciesOfListener")
            .with("LoadBalancerName", balancer.id.as_str())
            .with("LoadBalancerPort", balancer_port.to_string())
            .with_list("PolicyNames.member", policies.iter().copied());

        self.send_for_status(params).await
    }

    /// Replace the policies of a backend instance port; an empty list clears them
    pub async fn ex_set_balancer_policies_backend_server(
        &self,
        balancer: &LoadBalancer,
        instance_port: u16,
        policies: &[&str],
    ) -> Result<bool, LoadBalancerError> {
        let params = Params::action("SetLoadBalancerPoliciesForBackendServer")
            .with("LoadBalancerName", balancer.id.as_str())
            .with("InstancePort", instance_port.to_string())
            .with_list("PolicyNames.member", policies.iter().copied());

        self.send_for_status(params).await
    }

    /// Add listeners to a balancer
    ///
    /// HTTPS and SSL listeners must carry a certificate id; the call fails
    /// with `InvalidArgument` before anything is sent otherwise.
    pub async fn ex_create_balancer_listeners(
        &self,
        balancer: &LoadBalancer,
        listeners: &[Listener],
    ) -> Result<bool, LoadBalancerError> {
        let mut params = Params::action("CreateLoadBalancerListeners")
            .with("LoadBalancerName", balancer.id.as_str());

        for (index, listener) in listeners.iter().enumerate() {
            let prefix = format!("Listeners.member.{}", index + 1);
            params = params
                .with(
                    format!("{}.LoadBalancerPort", prefix),
                    listener.load_balancer_port.to_string(),
                )
                .with(
                    format!("{}.InstancePort", prefix),
                    listener.instance_port.to_string(),
                )
                .with(
                    format!("{}.Protocol", prefix),
                    listener.protocol.to_ascii_uppercase(),
                );

            if listener.requires_certificate() {
                let certificate = listener.ssl_certificate_id.as_deref().ok_or_else(|| {
                    LoadBalancerError::InvalidArgument(format!(
                        "Listener on port {} uses {} and needs an SSL certificate id",
                        listener.load_balancer_port, listener.protocol
                    ))
                })?;
                params = params.with(format!("{}.SSLCertificateId", prefix), certificate);
            }
        }

        self.send_for_status(params).await
    }
}

#[async_trait]
impl LoadBalancerDriver for ElasticLbDriver {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn list_protocols(&self) -> Vec<&'static str> {
        PROTOCOLS.to_vec()
    }

    fn list_supported_algorithms(&self) -> Vec<Algorithm> {
        vec![Algorithm::RoundRobin]
    }

    async fn list_balancers(&self) -> Result<Vec<LoadBalancer>, LoadBalancerError> {
        let params = Params::action("DescribeLoadBalancers");

        let response = self.send_checked(params).await?;
        let doc = response.document()?;
        parser::balancers(doc.root_element())
    }

    async fn get_balancer(&self, balancer_id: &str) -> Result<LoadBalancer, LoadBalancerError> {
        let params = Params::action("DescribeLoadBalancers")
            .with("LoadBalancerNames.member.1", balancer_id);

        let response = self.send_checked(params).await?;
        let doc = response.document()?;
        parser::balancers(doc.root_element())?
            .into_iter()
            .next()
            .ok_or_else(|| LoadBalancerError::NotFound(balancer_id.to_string()))
    }

    async fn create_balancer(
        &self,
        name: &str,
        port: u16,
        protocol: &str,
        algorithm: Algorithm,
        members: &[Member],
    ) -> Result<LoadBalancer, LoadBalancerError> {
        let zones: Vec<&str> = self.default_zones.iter().map(String::as_str).collect();
        self.ex_create_balancer(name, port, protocol, algorithm, members, &zones)
            .await
    }

    async fn destroy_balancer(&self, balancer: &LoadBalancer) -> Result<bool, LoadBalancerError> {
        let params = Params::action("DeleteLoadBalancer")
            .with("LoadBalancerName", balancer.id.as_str());

        self.send_checked(params).await?;
        info!(balancer = %balancer.id, "Deleted load balancer");
        Ok(true)
    }

    async fn balancer_attach_compute_node(
        &self,
        balancer: &mut LoadBalancer,
        node: &Node,
    ) -> Result<Member, LoadBalancerError> {
        self.balancer_attach_member(balancer, &Member::new(node.id.as_str()))
            .await
    }

    async fn balancer_attach_member(
        &self,
        balancer: &mut LoadBalancer,
        member: &Member,
    ) -> Result<Member, LoadBalancerError> {
        self.register_instances(&balancer.id, &[member.id.as_str()])
            .await?;

        let attached = Member::new(member.id.as_str()).with_balancer(balancer.id.as_str());
        balancer.record_member(attached.clone());
        info!(balancer = %balancer.id, instance = %member.id, "Registered instance");
        Ok(attached)
    }

    async fn balancer_detach_member(
        &self,
        balancer: &mut LoadBalancer,
        member: &Member,
    ) -> Result<bool, LoadBalancerError> {
        let params = Params::action("DeregisterInstancesFromLoadBalancer")
            .with("LoadBalancerName", balancer.id.as_str())
            .with("Instances.member.1.InstanceId", member.id.as_str());

        self.send_checked(params).await?;
        balancer.forget_member(&member.id);
        info!(balancer = %balancer.id, instance = %member.id, "Deregistered instance");
        Ok(true)
    }
}
