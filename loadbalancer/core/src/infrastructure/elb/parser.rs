// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! ELB response parsing
//!
//! Pure conversions from ELB XML documents into domain objects. Optional
//! fields that are missing become `None` (or are skipped in lists); a balancer
//! description without `LoadBalancerName` is rejected because the name is its
//! identity.

use roxmltree::Node;

use super::{DRIVER_NAME, NS};
use crate::domain::balancer::{LoadBalancer, Member, State};
use crate::domain::driver::LoadBalancerError;
use crate::infrastructure::aws::xml::{find_all, find_text};

const BALANCERS_PATH: &str = "DescribeLoadBalancersResult/LoadBalancerDescriptions/member";
const POLICIES_PATH: &str = "DescribeLoadBalancerPoliciesResult/PolicyDescriptions/member";
const POLICY_TYPES_PATH: &str =
    "DescribeLoadBalancerPolicyTypesResult/PolicyTypeDescriptions/member";

/// Every balancer in a `DescribeLoadBalancers` response
pub fn balancers(root: Node<'_, '_>) -> Result<Vec<LoadBalancer>, LoadBalancerError> {
    find_all(root, BALANCERS_PATH, NS)
        .into_iter()
        .map(balancer)
        .collect()
}

/// One `LoadBalancerDescriptions/member` fragment
pub fn balancer(el: Node<'_, '_>) -> Result<LoadBalancer, LoadBalancerError> {
    let name = find_text(el, "LoadBalancerName", NS).ok_or_else(|| {
        LoadBalancerError::MalformedResponse(
            "Load balancer description without LoadBalancerName".to_string(),
        )
    })?;
    let dns_name = find_text(el, "DNSName", NS);
    let port = find_text(el, "ListenerDescriptions/member/Listener/LoadBalancerPort", NS)
        .and_then(|p| p.parse::<u16>().ok());

    let members = find_all(el, "Instances/member/InstanceId", NS)
        .into_iter()
        .filter_map(|node| node.text())
        .map(|id| Member::new(id.trim()).with_balancer(name.clone()))
        .collect();

    let mut balancer = LoadBalancer::new(
        name.clone(),
        name,
        State::Unknown,
        dns_name,
        port,
        DRIVER_NAME,
    )
    .with_members(members);

    for (key, path) in [
        ("created_time", "CreatedTime"),
        ("scheme", "Scheme"),
        ("vpc_id", "VPCId"),
        ("canonical_hosted_zone_name", "CanonicalHostedZoneName"),
    ] {
        if let Some(value) = find_text(el, path, NS) {
            balancer.extra.insert(key.to_string(), value);
        }
    }

    let zones: Vec<_> = find_all(el, "AvailabilityZones/member", NS)
        .into_iter()
        .filter_map(|node| node.text())
        .map(str::trim)
        .collect();
    if !zones.is_empty() {
        balancer
            .extra
            .insert("availability_zones".to_string(), zones.join(","));
    }

    Ok(balancer)
}

/// Policy names from a `DescribeLoadBalancerPolicies` response
pub fn policies(root: Node<'_, '_>) -> Vec<String> {
    find_all(root, POLICIES_PATH, NS)
        .into_iter()
        .filter_map(|el| find_text(el, "PolicyName", NS))
        .collect()
}

/// Policy type names from a `DescribeLoadBalancerPolicyTypes` response
pub fn policy_types(root: Node<'_, '_>) -> Vec<String> {
    find_all(root, POLICY_TYPES_PATH, NS)
        .into_iter()
        .filter_map(|el| find_text(el, "PolicyTypeName", NS))
        .collect()
}

/// DNS name assigned in a `CreateLoadBalancer` response
pub fn created_dns_name(root: Node<'_, '_>) -> Option<String> {
    find_text(root, "CreateLoadBalancerResult/DNSName", NS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICIES: &str = r#"<DescribeLoadBalancerPoliciesResponse xmlns="http://elasticloadbalancing.amazonaws.com/doc/2012-06-01/">
  <DescribeLoadBalancerPoliciesResult>
    <PolicyDescriptions>
      <member>
        <PolicyName>MyDurationStickyPolicy</PolicyName>
        <PolicyTypeName>LBCookieStickinessPolicyType</PolicyTypeName>
      </member>
      <member>
        <PolicyName>EnableProxyProtocol</PolicyName>
        <PolicyTypeName>ProxyProtocolPolicyType</PolicyTypeName>
      </member>
    </PolicyDescriptions>
  </DescribeLoadBalancerPoliciesResult>
</DescribeLoadBalancerPoliciesResponse>"#;

    const POLICY_TYPES: &str = r#"<DescribeLoadBalancerPolicyTypesResponse xmlns="http://elasticloadbalancing.amazonaws.com/doc/2012-06-01/">
  <DescribeLoadBalancerPolicyTypesResult>
    <PolicyTypeDescriptions>
      <member>
        <PolicyTypeName>ProxyProtocolPolicyType</PolicyTypeName>
        <Description>Policy that controls whether to include the IP address and port of the originating request for TCP messages.</Description>
      </member>
      <member><Description>no name</Description></member>
    </PolicyTypeDescriptions>
  </DescribeLoadBalancerPolicyTypesResult>
</DescribeLoadBalancerPolicyTypesResponse>"#;

    const CREATED: &str = r#"<CreateLoadBalancerResponse xmlns="http://elasticloadbalancing.amazonaws.com/doc/2012-06-01/">
  <CreateLoadBalancerResult>
    <DNSName>web-1234567890.us-east-1.elb.amazonaws.com</DNSName>
  </CreateLoadBalancerResult>
</CreateLoadBalancerResponse>"#;

    #[test]
    fn test_policies() {
        let doc = roxmltree::Document::parse(POLICIES).unwrap();
        assert_eq!(
            policies(doc.root_element()),
            vec!["MyDurationStickyPolicy", "EnableProxyProtocol"]
        );
    }

    #[test]
    fn test_policy_types_skip_nameless_entries() {
        let doc = roxmltree::Document::parse(POLICY_TYPES).unwrap();
        assert_eq!(
            policy_types(doc.root_element()),
            vec!["ProxyProtocolPolicyType"]
        );
    }

    #[test]
    fn test_created_dns_name() {
        let doc = roxmltree::Document::parse(CREATED).unwrap();
        assert_eq!(
            created_dns_name(doc.root_element()).as_deref(),
            Some("web-1234567890.us-east-1.elb.amazonaws.com")
        );
    }

    #[test]
    fn test_balancer_without_name_is_malformed() {
        let doc = roxmltree::Document::parse(
            r#"<member xmlns="http://elasticloadbalancing.amazonaws.com/doc/2012-06-01/"><DNSName>x</DNSName></member>"#,
        )
        .unwrap();
        assert!(matches!(
            balancer(doc.root_element()),
            Err(LoadBalancerError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_balancer_missing_optional_fields() {
        let doc = roxmltree::Document::parse(
            r#"<member xmlns="http://elasticloadbalancing.amazonaws.com/doc/2012-06-01/"><LoadBalancerName>bare</LoadBalancerName></member>"#,
        )
        .unwrap();
        let lb = balancer(doc.root_element()).unwrap();
        assert_eq!(lb.id, "bare");
        assert_eq!(lb.ip, None);
        assert_eq!(lb.port, None);
        assert_eq!(lb.state, State::Unknown);
        assert!(lb.members().is_empty());
        assert!(lb.extra.is_empty());
    }

    #[test]
    fn test_empty_describe() {
        let doc = roxmltree::Document::parse(
            r#"<DescribeLoadBalancersResponse xmlns="http://elasticloadbalancing.amazonaws.com/doc/2012-06-01/"><DescribeLoadBalancersResult><LoadBalancerDescriptions/></DescribeLoadBalancersResult></DescribeLoadBalancersResponse>"#,
        )
        .unwrap();
        assert!(balancers(doc.root_element()).unwrap().is_empty());
    }
}
