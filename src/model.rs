//! Request field bag and response value types.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::client::Error;

/// Value of a single request field. Sent on the wire as its string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Integer(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::Text(s.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Integer(n.into())
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Integer(n.into())
    }
}

/// The field bag: request parameters accumulated before execution.
///
/// Keys are unique. Iteration is sorted by key so the wire form is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(BTreeMap<String, FieldValue>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Remove a field. Removing an absent field is a no-op.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Stringified `(name, value)` pairs, ready for query or form encoding.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (name, value) in iter {
            fields.set(name, value);
        }
        fields
    }
}

/// Conversion from a raw response body into a typed result.
///
/// Used as the default response-processing hook of an
/// [`Endpoint`](crate::client::Endpoint).
pub trait FromBody: Sized {
    fn from_body(body: String) -> Result<Self, Error>;
}

impl FromBody for String {
    fn from_body(body: String) -> Result<Self, Error> {
        Ok(body)
    }
}

/// JSON payload deserialized into `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T: DeserializeOwned> FromBody for Json<T> {
    fn from_body(body: String) -> Result<Self, Error> {
        serde_json::from_str(&body)
            .map(Json)
            .map_err(|e| Error::Parse(e.to_string()))
    }
}

/// Generic MeS response.
///
/// Most MeS endpoints answer with url-encoded `key=value&key=value` text;
/// [`Response::field`] gives access to individual values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    body: String,
}

impl Response {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Raw response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }

    /// Parse the body as url-encoded key/value pairs.
    ///
    /// A body that is not key/value text yields an empty map. When a key
    /// repeats, the last value wins.
    ///
    /// # Example
    /// ```
    /// use mes_client::model::Response;
    ///
    /// let response = Response::new("transaction_id=abc123&error_code=000&auth_response_text=Exact+Match");
    /// let fields = response.fields();
    /// assert_eq!(fields["error_code"], "000");
    /// assert_eq!(fields["auth_response_text"], "Exact Match");
    /// ```
    pub fn fields(&self) -> HashMap<String, String> {
        serde_urlencoded::from_str::<Vec<(String, String)>>(self.body.trim())
            .map(|pairs| pairs.into_iter().collect())
            .unwrap_or_default()
    }

    /// Single value from the key/value body.
    pub fn field(&self, name: &str) -> Option<String> {
        self.fields().remove(name)
    }
}

impl FromBody for Response {
    fn from_body(body: String) -> Result<Self, Error> {
        Ok(Response::new(body))
    }
}

/// Snapshot of the most recent HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::from("10.00").to_string(), "10.00");
        assert_eq!(FieldValue::from(42).to_string(), "42");
        assert_eq!(FieldValue::from(-7i64).to_string(), "-7");
    }

    #[test]
    fn test_set_overwrites() {
        let mut fields = Fields::new();
        fields.set("amount", "10.00");
        fields.set("amount", 12);

        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("amount"), Some(&FieldValue::Integer(12)));
    }

    #[test]
    fn test_set_then_remove_restores_state() {
        let mut fields: Fields = [("currency", "USD")].into_iter().collect();
        let before = fields.clone();

        fields.set("amount", "10.00");
        fields.remove("amount");

        assert_eq!(fields, before);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut fields: Fields = [("currency", "USD")].into_iter().collect();
        let before = fields.clone();

        assert!(fields.remove("missing").is_none());
        assert_eq!(fields, before);
    }

    #[test]
    fn test_to_pairs_sorted() {
        let mut fields = Fields::new();
        fields.set("currency", "USD");
        fields.set("amount", "10.00");
        fields.set("count", 3);

        assert_eq!(
            fields.to_pairs(),
            vec![
                ("amount".to_string(), "10.00".to_string()),
                ("count".to_string(), "3".to_string()),
                ("currency".to_string(), "USD".to_string()),
            ]
        );
    }

    #[test]
    fn test_response_fields() {
        let response = Response::new("a=1&b=two+words&b=3\n");
        let fields = response.fields();
        assert_eq!(fields.get("a").map(String::as_str), Some("1"));
        assert_eq!(fields.get("b").map(String::as_str), Some("3"));
        assert_eq!(response.field("missing"), None);
        assert_eq!(response.body(), "a=1&b=two+words&b=3\n");
    }

    #[test]
    fn test_response_fields_empty_body() {
        assert!(Response::new("").fields().is_empty());
    }

    #[test]
    fn test_json_from_body() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Status {
            code: String,
        }

        let Json(status) = Json::<Status>::from_body(r#"{"code": "000"}"#.to_string()).unwrap();
        assert_eq!(status.code, "000");

        let err = Json::<Status>::from_body("error_code=101".to_string()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
