//! HTTP transport used to execute MeS requests.
//!
//! [`Transport`] is the seam between request construction and the network.
//! [`ReqwestTransport`] is the production implementation; tests swap in
//! their own.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::collections::HashMap;

use crate::client::Error;
use crate::options::TransportOptions;

/// Something that can send a fully built HTTP request.
#[async_trait]
pub trait Transport: Send + Sync + Sized {
    /// Build a transport from options. Called lazily on first execution.
    fn connect(options: &TransportOptions) -> Result<Self, Error>;

    /// Send the request and return the response, whatever its status.
    async fn execute(&self, request: reqwest::Request) -> reqwest::Result<reqwest::Response>;
}

/// Transport backed by a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn connect(options: &TransportOptions) -> Result<Self, Error> {
        Ok(Self::new(build_http_client(options)?))
    }

    async fn execute(&self, request: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.client.execute(request).await
    }
}

/// Build a configured HTTP client from transport options.
///
/// Applies timeout, proxy, user agent and extra headers.
///
/// # Example
/// ```
/// use mes_client::http::build_http_client;
/// use mes_client::options::TransportOptions;
/// use std::time::Duration;
///
/// let options = TransportOptions::default().with_timeout(Duration::from_secs(10));
/// assert!(build_http_client(&options).is_ok());
/// ```
pub fn build_http_client(options: &TransportOptions) -> Result<Client, Error> {
    let mut builder = Client::builder();

    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_url) = &options.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| Error::Configuration(format!("invalid proxy '{}': {}", proxy_url, e)))?;
        builder = builder.proxy(proxy);
    }

    if let Some(user_agent) = &options.user_agent {
        builder = builder.user_agent(user_agent);
    }

    if let Some(headers) = &options.extra_headers {
        builder = builder.default_headers(extra_header_map(headers)?);
    }

    Ok(builder.build()?)
}

/// Convert configured extra headers into a [`HeaderMap`].
pub fn extra_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, Error> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| Error::Configuration(format!("invalid header name '{}'", key)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::Configuration(format!("invalid value for header '{}'", key)))?;
        map.insert(name, value);
    }
    Ok(map)
}
