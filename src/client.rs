//! Endpoint contract and error types.

use reqwest::{Method, StatusCode};
use thiserror::Error;

use crate::model::{FieldValue, FromBody};

/// Errors that can occur while building or executing a request.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Describes one MeS API endpoint.
///
/// Implement this trait to add a new endpoint. The endpoint supplies the
/// path segments, its default fields and HTTP method, and turns the raw
/// response body into a typed result.
///
/// # Required Methods
/// - `base_path`: path of the API on the server, e.g. `/mes-api/tridentApi`
///
/// # Provided Methods (with default implementations)
/// - `endpoint_path`: no endpoint segment
/// - `default_fields`: no defaults
/// - `http_method`: `POST`
/// - `process_response`: [`FromBody::from_body`] of `Output`
///
/// # Example
/// ```rust
/// use mes_client::client::Endpoint;
/// use mes_client::model::{FieldValue, Response};
///
/// struct Sale;
///
/// impl Endpoint for Sale {
///     type Output = Response;
///
///     fn base_path(&self) -> Option<&str> {
///         Some("/mes-api/tridentApi")
///     }
///
///     fn default_fields(&self) -> Vec<(&'static str, FieldValue)> {
///         vec![("transaction_type", "D".into())]
///     }
/// }
/// ```
pub trait Endpoint {
    /// Typed result of a successful request.
    type Output: FromBody;

    fn base_path(&self) -> Option<&str>;

    fn endpoint_path(&self) -> Option<&str> {
        None
    }

    /// Fields seeded into every new request for this endpoint.
    fn default_fields(&self) -> Vec<(&'static str, FieldValue)> {
        Vec::new()
    }

    fn http_method(&self) -> Method {
        Method::POST
    }

    /// Post-process the raw response body.
    ///
    /// Override to parse vendor-specific payloads beyond what `Output`'s
    /// [`FromBody`] implementation does.
    fn process_response(&self, body: String) -> Result<Self::Output, Error> {
        <Self::Output as FromBody>::from_body(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Response;

    struct Bare;

    impl Endpoint for Bare {
        type Output = Response;

        fn base_path(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn test_endpoint_defaults() {
        let endpoint = Bare;
        assert_eq!(endpoint.http_method(), Method::POST);
        assert!(endpoint.endpoint_path().is_none());
        assert!(endpoint.default_fields().is_empty());

        let response = endpoint.process_response("error_code=000".to_string()).unwrap();
        assert_eq!(response.field("error_code").as_deref(), Some("000"));
    }

    #[test]
    fn test_error_display() {
        let err = Error::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502 Bad Gateway: upstream down");

        let err = Error::Configuration("bad proxy".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad proxy");
    }
}
