// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Query parameter builder for the AWS query protocol
//!
//! Repeated fields use 1-based dotted paths, e.g. `Listeners.member.1.Protocol`.
//! Keys are kept sorted, which is also the canonical order used for signing.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Start a parameter set for one API action
    pub fn action(action: &str) -> Self {
        Self::default().with("Action", action)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Emit `{prefix}.{n}` for each item, n starting at 1
    ///
    /// A single name is passed as a one-element slice.
    pub fn with_list<I, S>(self, prefix: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        items
            .into_iter()
            .enumerate()
            .fold(self, |params, (i, item)| {
                params.with(format!("{}.{}", prefix, i + 1), item)
            })
    }

    /// Emit `{prefix}.{n}.{field}` for each item, n starting at 1
    pub fn with_indexed<I, S>(self, prefix: &str, field: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        items
            .into_iter()
            .enumerate()
            .fold(self, |params, (i, item)| {
                params.with(format!("{}.{}.{}", prefix, i + 1, field), item)
            })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys starting with `prefix`, in canonical order
    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .keys()
            .filter(move |k| k.starts_with(prefix))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_list_is_one_based() {
        let params = Params::action("SetLoadBalancerPoliciesOfListener")
            .with_list("PolicyNames.member", ["first", "second"]);

        assert_eq!(params.get("PolicyNames.member.1"), Some("first"));
        assert_eq!(params.get("PolicyNames.member.2"), Some("second"));
        assert!(!params.contains_key("PolicyNames.member.0"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_with_list_single_item() {
        let params = Params::default().with_list("PolicyNames.member", ["only"]);
        assert_eq!(params.get("PolicyNames.member.1"), Some("only"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_with_indexed() {
        let params = Params::default().with_indexed("Instances.member", "InstanceId", ["i-1", "i-2"]);
        assert_eq!(params.get("Instances.member.1.InstanceId"), Some("i-1"));
        assert_eq!(params.get("Instances.member.2.InstanceId"), Some("i-2"));
    }

    #[test]
    fn test_keys_with_prefix() {
        let params = Params::action("X")
            .with_list("PolicyNames.member", ["a", "b"])
            .with("PolicyName", "c");
        let keys: Vec<_> = params.keys_with_prefix("PolicyNames.").collect();
        assert_eq!(keys, vec!["PolicyNames.member.1", "PolicyNames.member.2"]);
    }
}
