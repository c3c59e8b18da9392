//! Request builder: environment and URL composition, the field bag, and
//! execution against a lazily created transport.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Url};
use tracing::{debug, warn};

use crate::client::{Endpoint, Error};
use crate::http::{ReqwestTransport, Transport};
use crate::model::{FieldValue, Fields, RawResponse};
use crate::options::{Environment, TransportOptions, BASE_DOMAIN};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A single MeS API request.
///
/// Wraps an [`Endpoint`] with the environment it targets, the fields to send,
/// and the transport that sends them. The transport is created on first
/// [`execute`](Request::execute) and reused for the lifetime of the request.
///
/// # Example
/// ```no_run
/// use mes_client::client::Endpoint;
/// use mes_client::model::Response;
/// use mes_client::options::Environment;
/// use mes_client::request::Request;
///
/// struct Charge;
///
/// impl Endpoint for Charge {
///     type Output = Response;
///
///     fn base_path(&self) -> Option<&str> {
///         Some("/v1/payments")
///     }
///
///     fn endpoint_path(&self) -> Option<&str> {
///         Some("charge")
///     }
/// }
///
/// # async fn run() -> Result<(), mes_client::Error> {
/// let mut request = Request::new(Charge, Environment::Test);
/// request.set_field("amount", "10.00").set_field("currency", "USD");
///
/// let response = request.execute().await?;
/// println!("{:?}", response.field("error_code"));
/// # Ok(())
/// # }
/// ```
pub struct Request<E: Endpoint, T: Transport = ReqwestTransport> {
    endpoint: E,
    environment: Environment,
    fields: Fields,
    transport_options: TransportOptions,
    transport: Option<T>,
    last_response: Option<RawResponse>,
}

impl<E: Endpoint> Request<E> {
    /// Create a request that sends through [`ReqwestTransport`].
    pub fn new(endpoint: E, environment: Environment) -> Self {
        Self::create(endpoint, environment)
    }

    /// Same as [`Request::new`], kept for call sites that read better as a factory.
    pub fn factory(endpoint: E, environment: Environment) -> Self {
        Self::new(endpoint, environment)
    }

    /// Create a request from an environment tag (`api`, `cert` or `test`).
    ///
    /// Unknown tags fail here rather than producing a malformed URL later.
    pub fn from_tag(endpoint: E, environment: &str) -> Result<Self, Error> {
        Ok(Self::new(endpoint, environment.parse()?))
    }
}

impl<E: Endpoint, T: Transport> Request<E, T> {
    /// Create a request whose transport of type `T` is built lazily.
    ///
    /// The endpoint's default fields are applied immediately.
    pub fn create(endpoint: E, environment: Environment) -> Self {
        let fields = endpoint.default_fields().into_iter().collect();

        Self {
            endpoint,
            environment,
            fields,
            transport_options: TransportOptions::default(),
            transport: None,
            last_response: None,
        }
    }

    /// Use an already built transport instead of creating one lazily.
    pub fn with_transport<U: Transport>(self, transport: U) -> Request<E, U> {
        Request {
            endpoint: self.endpoint,
            environment: self.environment,
            fields: self.fields,
            transport_options: self.transport_options,
            transport: Some(transport),
            last_response: None,
        }
    }

    /// Options used when the transport is created. Ignored once it exists.
    pub fn with_transport_options(mut self, options: TransportOptions) -> Self {
        self.transport_options = options;
        self
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Insert or overwrite a field.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        self.fields.set(name, value);
        self
    }

    /// Remove a field if present.
    pub fn remove_field(&mut self, name: &str) -> &mut Self {
        self.fields.remove(name);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Whether the transport has been created yet.
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// The transport, once created or injected.
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    /// Raw response of the most recent [`execute`](Request::execute) call.
    pub fn last_response(&self) -> Option<&RawResponse> {
        self.last_response.as_ref()
    }

    /// Full API URL: `https://{environment}.merchante-solutions.com{base_path}/{endpoint_path}`.
    ///
    /// Segments are concatenated as given; slashes are not normalized.
    pub fn resolve_url(&self) -> String {
        let mut url = format!("https://{}.{}", self.environment.subdomain(), BASE_DOMAIN);

        if let Some(base_path) = self.endpoint.base_path() {
            url.push_str(base_path);
        }

        if let Some(endpoint_path) = self.endpoint.endpoint_path().filter(|p| !p.is_empty()) {
            url.push('/');
            url.push_str(endpoint_path);
        }

        url
    }

    /// Build the HTTP request without sending it.
    ///
    /// GET and HEAD carry the fields as query parameters; every other method
    /// sends them as a url-encoded form body.
    pub fn build_request(&self) -> Result<reqwest::Request, Error> {
        let method = self.endpoint.http_method();
        let raw_url = self.resolve_url();
        let mut url = Url::parse(&raw_url)
            .map_err(|e| Error::Configuration(format!("invalid url '{}': {}", raw_url, e)))?;
        let pairs = self.fields.to_pairs();

        if method == Method::GET || method == Method::HEAD {
            if !pairs.is_empty() {
                let mut query = url.query_pairs_mut();
                for (name, value) in &pairs {
                    query.append_pair(name, value);
                }
            }
            return Ok(reqwest::Request::new(method, url));
        }

        let body = serde_urlencoded::to_string(&pairs)
            .map_err(|e| Error::Configuration(format!("could not encode fields: {}", e)))?;

        let mut request = reqwest::Request::new(method, url);
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        *request.body_mut() = Some(body.into());
        Ok(request)
    }

    /// Send the request and post-process the response through the endpoint.
    ///
    /// Performs exactly one HTTP exchange per call, with no retries. The
    /// future completes when that exchange does; callers without an async
    /// context drive it to completion with `Runtime::block_on`.
    ///
    /// Non-2xx responses are returned as [`Error::Status`]; the raw response
    /// is still available from [`last_response`](Request::last_response).
    /// Connection failures and timeouts are returned as [`Error::Transport`].
    pub async fn execute(&mut self) -> Result<E::Output, Error> {
        self.last_response = None;

        let request = self.build_request()?;
        let url = request.url().clone();
        debug!(
            method = %request.method(),
            url = %url,
            fields = self.fields.len(),
            "Sending MeS request"
        );

        let transport = match self.transport.take() {
            Some(transport) => transport,
            None => {
                debug!("Creating HTTP transport");
                T::connect(&self.transport_options)?
            }
        };
        let transport = self.transport.insert(transport);

        let response = transport.execute(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        debug!(status = %status, bytes = body.len(), "Received MeS response");

        self.last_response = Some(RawResponse {
            status,
            headers,
            body: body.clone(),
        });

        if !status.is_success() {
            warn!(status = %status, url = %url, "MeS request failed");
            return Err(Error::Status { status, body });
        }

        self.endpoint.process_response(body)
    }
}
