// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! AWS Signature Version 2 for query-protocol requests
//!
//! The string to sign is
//! `"GET\n{host}\n{path}\n{canonical query}"` where the canonical query is the
//! sorted, RFC 3986 encoded parameter list (including the auth parameters but
//! not `Signature` itself).

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;

use super::params::Params;

type HmacSha256 = Hmac<Sha256>;

/// Everything except unreserved characters (`A-Z a-z 0-9 - _ . ~`)
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub const SIGNATURE_METHOD: &str = "HmacSHA256";
pub const SIGNATURE_VERSION: &str = "2";

/// Timestamp format expected by the `Timestamp` parameter
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ENCODE_SET).to_string()
}

/// Sorted `key=value` pairs joined with `&`
pub fn canonical_query(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Credentials and request coordinates that go into a signature
pub struct SigningContext<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub host: &'a str,
    pub path: &'a str,
    pub version: &'a str,
}

impl SigningContext<'_> {
    /// Add the auth parameters and the resulting `Signature`
    pub fn sign(&self, params: Params, timestamp: &str) -> Params {
        let params = params
            .with("AWSAccessKeyId", self.access_key_id)
            .with("SignatureMethod", SIGNATURE_METHOD)
            .with("SignatureVersion", SIGNATURE_VERSION)
            .with("Timestamp", timestamp)
            .with("Version", self.version);

        let string_to_sign = format!(
            "GET\n{}\n{}\n{}",
            self.host,
            self.path,
            canonical_query(&params)
        );
        let signature = hmac_sha256_base64(self.secret_access_key, &string_to_sign);

        params.with("Signature", signature)
    }
}

pub fn hmac_sha256_base64(key: &str, data: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts any key length"));
    mac.update(data.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_sha256_base64_known_vector() {
        assert_eq!(
            hmac_sha256_base64("key", "The quick brown fox jumps over the lazy dog"),
            "97yD9DBThCSxMpjmqm+xQ+9NWaFJRhdZl0edvC0aPNg="
        );
    }

    #[test]
    fn test_encode_keeps_unreserved() {
        assert_eq!(encode("Az09-_.~"), "Az09-_.~");
        assert_eq!(encode("web lb/1"), "web%20lb%2F1");
        assert_eq!(encode("2026-01-02T03:04:05Z"), "2026-01-02T03%3A04%3A05Z");
    }

    #[test]
    fn test_sign_describe_request() {
        let ctx = SigningContext {
            access_key_id: "AKIDEXAMPLE",
            secret_access_key: "secret",
            host: "elasticloadbalancing.us-east-1.amazonaws.com",
            path: "/2012-06-01/",
            version: "2012-06-01",
        };
        let params = Params::action("DescribeLoadBalancers")
            .with("LoadBalancerNames.member.1", "web lb/1");

        let signed = ctx.sign(params, "2026-01-02T03:04:05Z");

        assert_eq!(signed.get("AWSAccessKeyId"), Some("AKIDEXAMPLE"));
        assert_eq!(signed.get("SignatureVersion"), Some("2"));
        assert_eq!(signed.get("SignatureMethod"), Some("HmacSHA256"));
        assert_eq!(signed.get("Version"), Some("2012-06-01"));
        assert_eq!(
            signed.get("Signature"),
            Some("vKwqDAuE7Qr26OEDXPhyjJe6PVLZtdmaBSHcFaJVDMU=")
        );
    }

    #[test]
    fn test_canonical_query_is_sorted() {
        let params = Params::default().with("b", "2").with("a", "1").with("C", "3");
        assert_eq!(canonical_query(&params), "C=3&a=1&b=2");
    }
}
