//! HTTP implementation of the remote store
//!
//! Requests are plain GETs of the form `{base}/{namespace}/{endpoint}?k=..`,
//! one per operation. Path segments and query values are percent-encoded.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::{Operation, RemoteStore};
use crate::error::StoreError;

/// Client for the configuration service HTTP API
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// Creates a gateway for the given base URL
    ///
    /// # Arguments
    /// * `base_url` - Root address of the remote store (e.g. "http://localhost:8080")
    /// * `request_timeout` - Optional deadline for each request; `None` keeps the
    ///   reqwest default
    ///
    /// # Returns
    /// * `Err(StoreError::InvalidBaseUrl)` if the URL cannot carry a path
    /// * `Err(StoreError::Request)` if the HTTP client cannot be built
    pub fn new(base_url: &str, request_timeout: Option<Duration>) -> Result<Self, StoreError> {
        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(builder.build()?, base_url)
    }

    /// Creates a gateway with a custom HTTP client
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, StoreError> {
        let parsed = Url::parse(base_url).map_err(|e| StoreError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.cannot_be_a_base() {
            return Err(StoreError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Builds the request URL (without query) for an operation
    fn endpoint_url(&self, op: &Operation<'_>) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| StoreError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: "URL cannot carry a path".to_string(),
                })?;
            segments
                .pop_if_empty()
                .push(op.namespace())
                .push(op.endpoint());
        }
        Ok(url)
    }
}

#[async_trait]
impl RemoteStore for HttpGateway {
    async fn call(&self, op: &Operation<'_>) -> Result<String, StoreError> {
        let url = self.endpoint_url(op)?;
        tracing::trace!(endpoint = op.endpoint(), namespace = op.namespace(), "sending request");

        let response = self.client.get(url).query(&op.query()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unparseable_base_url() {
        let result = HttpGateway::new("not a url", None);
        assert!(matches!(result, Err(StoreError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_rejects_base_url_without_path() {
        let result = HttpGateway::new("mailto:ops@example.com", None);
        assert!(matches!(result, Err(StoreError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_endpoint_url_appends_namespace_and_endpoint() {
        let gateway = HttpGateway::new("http://localhost:8080", None).unwrap();
        let url = gateway
            .endpoint_url(&Operation::Get {
                namespace: "db",
                key: "k",
            })
            .unwrap();

        assert_eq!(url.as_str(), "http://localhost:8080/db/get");
    }

    #[test]
    fn test_endpoint_url_keeps_base_path_and_trailing_slash() {
        let gateway = HttpGateway::new("http://localhost:8080/rcfg/", None).unwrap();
        let url = gateway
            .endpoint_url(&Operation::Add { namespace: "db" })
            .unwrap();

        assert_eq!(url.as_str(), "http://localhost:8080/rcfg/db/add");
    }

    #[test]
    fn test_endpoint_url_encodes_namespace() {
        let gateway = HttpGateway::new("http://localhost:8080", None).unwrap();
        let url = gateway
            .endpoint_url(&Operation::Add {
                namespace: "team a/b",
            })
            .unwrap();

        assert_eq!(url.as_str(), "http://localhost:8080/team%20a%2Fb/add");
    }
}
