//! Environment selection and transport configuration.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::client::Error;

/// Base domain shared by every MeS API.
pub const BASE_DOMAIN: &str = "merchante-solutions.com";

/// Deployment tier of the MeS API. Each tier lives on its own subdomain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Live traffic, `api.merchante-solutions.com`
    Production,
    /// Certification, `cert.merchante-solutions.com`
    Cert,
    /// Sandbox, `test.merchante-solutions.com`
    Test,
}

impl Environment {
    /// Subdomain tag for this environment.
    pub fn subdomain(&self) -> &'static str {
        match self {
            Environment::Production => "api",
            Environment::Cert => "cert",
            Environment::Test => "test",
        }
    }

    /// Host name (`{subdomain}.merchante-solutions.com`).
    pub fn host(&self) -> String {
        format!("{}.{}", self.subdomain(), BASE_DOMAIN)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subdomain())
    }
}

impl FromStr for Environment {
    type Err = Error;

    /// Accepts the subdomain tags (`api`, `cert`, `test`) and `production`.
    ///
    /// # Example
    /// ```
    /// use mes_client::options::Environment;
    ///
    /// assert_eq!("api".parse::<Environment>().unwrap(), Environment::Production);
    /// assert!("staging".parse::<Environment>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" | "production" => Ok(Environment::Production),
            "cert" => Ok(Environment::Cert),
            "test" => Ok(Environment::Test),
            other => Err(Error::Configuration(format!(
                "unrecognized environment '{}', expected one of: api, cert, test",
                other
            ))),
        }
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.subdomain())
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

/// HTTP transport configuration applied when a request lazily builds its client.
///
/// Everything is optional; the default leaves the transport's own defaults in place.
///
/// # Example
/// ```rust
/// use mes_client::options::TransportOptions;
/// use std::time::Duration;
///
/// let options = TransportOptions::default()
///     .with_timeout(Duration::from_secs(30))
///     .with_header("X-Request-Source".to_string(), "billing".to_string());
/// assert_eq!(options.timeout, Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportOptions {
    /// Request timeout, in whole seconds when read from config
    #[serde(default, with = "duration_secs")]
    pub timeout: Option<Duration>,

    /// HTTP proxy URL
    #[serde(default)]
    pub proxy: Option<String>,

    /// Overrides the transport's User-Agent header
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Additional HTTP headers to include in requests
    #[serde(default)]
    pub extra_headers: Option<HashMap<String, String>>,
}

impl TransportOptions {
    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: String) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Set the User-Agent.
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = Some(user_agent);
        self
    }

    /// Set extra headers.
    pub fn with_extra_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.extra_headers = Some(headers);
        self
    }

    /// Add a single extra header.
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key, value);
        self
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&duration.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdomains() {
        assert_eq!(Environment::Production.subdomain(), "api");
        assert_eq!(Environment::Cert.subdomain(), "cert");
        assert_eq!(Environment::Test.subdomain(), "test");
        assert_eq!(Environment::Cert.host(), "cert.merchante-solutions.com");
    }

    #[test]
    fn test_parse_environment() {
        assert_eq!("test".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!(" CERT ".parse::<Environment>().unwrap(), Environment::Cert);
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );

        let err = "sandbox".parse::<Environment>().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("sandbox"));
    }

    #[test]
    fn test_environment_serde() {
        let json = serde_json::to_string(&Environment::Production).unwrap();
        assert_eq!(json, "\"api\"");

        let env: Environment = serde_json::from_str("\"cert\"").unwrap();
        assert_eq!(env, Environment::Cert);

        assert!(serde_json::from_str::<Environment>("\"prod-eu\"").is_err());
    }

    #[test]
    fn test_transport_options_from_config() {
        let options: TransportOptions = serde_json::from_str(
            r#"{"timeout": 15, "user_agent": "billing/1.0", "extra_headers": {"X-Trace": "1"}}"#,
        )
        .unwrap();

        assert_eq!(options.timeout, Some(Duration::from_secs(15)));
        assert_eq!(options.user_agent.as_deref(), Some("billing/1.0"));
        assert!(options.proxy.is_none());
        assert_eq!(
            options.extra_headers.unwrap().get("X-Trace").map(String::as_str),
            Some("1")
        );
    }

    #[test]
    fn test_transport_options_defaults() {
        let options: TransportOptions = serde_json::from_str("{}").unwrap();
        assert!(options.timeout.is_none());
        assert!(options.extra_headers.is_none());

        let options = TransportOptions::default()
            .with_header("A".to_string(), "1".to_string())
            .with_header("B".to_string(), "2".to_string());
        assert_eq!(options.extra_headers.unwrap().len(), 2);
    }
}
