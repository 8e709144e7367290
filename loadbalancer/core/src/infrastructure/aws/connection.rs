// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Signed AWS query-protocol connection
//!
//! Drivers talk to the provider through the [`Connection`] trait so the
//! transport can be swapped (tests, emulators). [`SignedConnection`] is the
//! production implementation: it signs every request with Signature Version 2
//! and sends it as a GET.
//!
//! A [`Response`] is returned for every HTTP status. Callers decide whether a
//! non-2xx status is an error (`error_for_status`) or a boolean outcome.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::params::Params;
use super::signature::{canonical_query, SigningContext, TIMESTAMP_FORMAT};
use super::xml::find_descendant_text;
use crate::domain::driver::LoadBalancerError;

/// Transport used by provider drivers
#[async_trait]
pub trait Connection: Send + Sync {
    /// Issue one request for `params` under `path`
    async fn request(&self, path: &str, params: Params) -> Result<Response, LoadBalancerError>;
}

/// Raw provider response
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    body: String,
}

impl Response {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// True only for HTTP 200
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Parse the body as XML
    pub fn document(&self) -> Result<roxmltree::Document<'_>, LoadBalancerError> {
        roxmltree::Document::parse(&self.body).map_err(malformed)
    }

    /// Turn a non-2xx response into the matching error kind
    pub fn error_for_status(self) -> Result<Self, LoadBalancerError> {
        if self.status.is_success() {
            return Ok(self);
        }
        Err(self.into_error())
    }

    fn into_error(self) -> LoadBalancerError {
        let status = self.status.as_u16();
        let (code, message) = match roxmltree::Document::parse(&self.body) {
            Ok(doc) => (
                find_descendant_text(doc.root_element(), "Code"),
                find_descendant_text(doc.root_element(), "Message"),
            ),
            Err(_) => (None, None),
        };

        let code = code.unwrap_or_else(|| format!("HTTP{}", status));
        let message = message.unwrap_or_else(|| {
            self.status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

        match code.as_str() {
            "LoadBalancerNotFound" => LoadBalancerError::NotFound(message),
            "InvalidClientTokenId" | "SignatureDoesNotMatch" | "AuthFailure"
            | "OptInRequired" | "MissingAuthenticationToken" => {
                LoadBalancerError::Authentication(format!("{}: {}", code, message))
            }
            _ if status == 401 || status == 403 => {
                LoadBalancerError::Authentication(format!("{}: {}", code, message))
            }
            _ => LoadBalancerError::Provider {
                status,
                code,
                message,
            },
        }
    }
}

fn network(err: reqwest::Error) -> LoadBalancerError {
    LoadBalancerError::Network(err.to_string())
}

fn malformed(err: roxmltree::Error) -> LoadBalancerError {
    LoadBalancerError::MalformedResponse(err.to_string())
}

/// Connection that signs requests with an access key id and secret
pub struct SignedConnection {
    client: Client,
    endpoint: Url,
    access_key_id: String,
    secret_access_key: String,
    version: String,
}

impl std::fmt::Debug for SignedConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedConnection")
            .field("endpoint", &self.endpoint.as_str())
            .field("access_key_id", &self.access_key_id)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl SignedConnection {
    /// Create a connection against `https://{host}`
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        host: &str,
        version: impl Into<String>,
    ) -> Result<Self, LoadBalancerError> {
        let endpoint = Url::parse(&format!("https://{}", host)).map_err(|e| {
            LoadBalancerError::Configuration(format!("Invalid host '{}': {}", host, e))
        })?;
        Self::with_endpoint(
            access_key_id,
            secret_access_key,
            endpoint,
            version,
            Duration::from_secs(30),
        )
    }

    /// Create a connection against an explicit endpoint with a request timeout
    pub fn with_endpoint(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        endpoint: Url,
        version: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LoadBalancerError> {
        let access_key_id = access_key_id.into();
        let secret_access_key = secret_access_key.into();

        if access_key_id.trim().is_empty() {
            return Err(LoadBalancerError::Authentication(
                "Access key id must not be empty".to_string(),
            ));
        }
        if secret_access_key.is_empty() {
            return Err(LoadBalancerError::Authentication(
                "Secret access key must not be empty".to_string(),
            ));
        }
        if endpoint.host_str().is_none() {
            return Err(LoadBalancerError::Configuration(format!(
                "Endpoint has no host: {}",
                endpoint
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadBalancerError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            access_key_id,
            secret_access_key,
            version: version.into(),
        })
    }

    /// Host value as sent in the `Host` header (port included when non-default)
    fn host_header(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sign `params` for `path` at the given timestamp
    pub fn sign(&self, path: &str, params: Params, timestamp: &str) -> Params {
        let host = self.host_header();
        SigningContext {
            access_key_id: &self.access_key_id,
            secret_access_key: &self.secret_access_key,
            host: &host,
            path,
            version: &self.version,
        }
        .sign(params, timestamp)
    }

    fn build_url(&self, path: &str, query: &str) -> String {
        let base = self.endpoint.as_str().trim_end_matches('/');
        format!("{}{}?{}", base, path, query)
    }
}

#[async_trait]
impl Connection for SignedConnection {
    async fn request(&self, path: &str, params: Params) -> Result<Response, LoadBalancerError> {
        let action = params.get("Action").unwrap_or("-").to_string();
        let timestamp = chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let signed = self.sign(path, params, &timestamp);
        let url = self.build_url(path, &canonical_query(&signed));

        debug!(action = %action, endpoint = %self.endpoint, "Sending signed request");

        let response = self.client.get(&url).send().await.map_err(network)?;
        let status = response.status();
        let body = response.text().await.map_err(network)?;

        debug!(action = %action, status = status.as_u16(), "Received response");

        Ok(Response::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const ERROR_BODY: &str = r#"<ErrorResponse xmlns="http://elasticloadbalancing.amazonaws.com/doc/2012-06-01/">
  <Error>
    <Type>Sender</Type>
    <Code>LoadBalancerNotFound</Code>
    <Message>Cannot find Load Balancer missing</Message>
  </Error>
  <RequestId>83c88b9d-12b7-11e3-8b82-87b12EXAMPLE</RequestId>
</ErrorResponse>"#;

    fn connection(url: &str) -> SignedConnection {
        SignedConnection::with_endpoint(
            "AKIDEXAMPLE",
            "secret",
            Url::parse(url).unwrap(),
            "2012-06-01",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_credentials() {
        let result = SignedConnection::new("", "secret", "example.com", "2012-06-01");
        assert!(matches!(result, Err(LoadBalancerError::Authentication(_))));

        let result = SignedConnection::new("AKID", "", "example.com", "2012-06-01");
        assert!(matches!(result, Err(LoadBalancerError::Authentication(_))));
    }

    #[test]
    fn test_host_header_and_url() {
        let conn = connection("http://127.0.0.1:4566");
        assert_eq!(conn.host_header(), "127.0.0.1:4566");
        assert_eq!(
            conn.build_url("/2012-06-01/", "Action=X"),
            "http://127.0.0.1:4566/2012-06-01/?Action=X"
        );

        let conn = SignedConnection::new(
            "AKID",
            "secret",
            "elasticloadbalancing.eu-west-1.amazonaws.com",
            "2012-06-01",
        )
        .unwrap();
        assert_eq!(
            conn.host_header(),
            "elasticloadbalancing.eu-west-1.amazonaws.com"
        );
    }

    #[tokio::test]
    async fn test_request_is_signed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/2012-06-01/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("Action".into(), "DescribeLoadBalancers".into()),
                Matcher::UrlEncoded("AWSAccessKeyId".into(), "AKIDEXAMPLE".into()),
                Matcher::UrlEncoded("SignatureVersion".into(), "2".into()),
                Matcher::UrlEncoded("SignatureMethod".into(), "HmacSHA256".into()),
                Matcher::UrlEncoded("Version".into(), "2012-06-01".into()),
                Matcher::Regex("Signature=".into()),
                Matcher::Regex("Timestamp=".into()),
            ]))
            .with_status(200)
            .with_body("<DescribeLoadBalancersResponse/>")
            .create_async()
            .await;

        let conn = connection(&server.url());
        let response = conn
            .request("/2012-06-01/", Params::action("DescribeLoadBalancers"))
            .await
            .unwrap();

        assert!(response.is_ok());
        assert_eq!(response.body(), "<DescribeLoadBalancersResponse/>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_raised() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/2012-06-01/")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(ERROR_BODY)
            .create_async()
            .await;

        let conn = connection(&server.url());
        let response = conn
            .request("/2012-06-01/", Params::action("DescribeLoadBalancers"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!response.is_ok());
        match response.error_for_status() {
            Err(LoadBalancerError::NotFound(message)) => {
                assert_eq!(message, "Cannot find Load Balancer missing");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_error_mapping() {
        let auth = Response::new(
            StatusCode::FORBIDDEN,
            "<ErrorResponse><Error><Code>SignatureDoesNotMatch</Code><Message>bad</Message></Error></ErrorResponse>",
        );
        assert!(matches!(
            auth.error_for_status(),
            Err(LoadBalancerError::Authentication(_))
        ));

        let throttled = Response::new(
            StatusCode::BAD_REQUEST,
            "<ErrorResponse><Error><Code>Throttling</Code><Message>Rate exceeded</Message></Error></ErrorResponse>",
        );
        match throttled.error_for_status() {
            Err(LoadBalancerError::Provider { status, code, message }) => {
                assert_eq!(status, 400);
                assert_eq!(code, "Throttling");
                assert_eq!(message, "Rate exceeded");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let opaque = Response::new(StatusCode::BAD_GATEWAY, "not xml");
        match opaque.error_for_status() {
            Err(LoadBalancerError::Provider { code, message, .. }) => {
                assert_eq!(code, "HTTP502");
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(Response::new(StatusCode::OK, "").error_for_status().is_ok());
    }

    #[test]
    fn test_unparsable_body_is_malformed_response() {
        let response = Response::new(StatusCode::OK, "<DescribeLoadBalancersResponse>");
        assert!(matches!(
            response.document(),
            Err(LoadBalancerError::MalformedResponse(_))
        ));
    }
}
