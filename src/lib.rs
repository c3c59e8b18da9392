//! # mes_client - Merchant e-Solutions API client base
//!
//! A small base layer for building clients against the Merchant e-Solutions
//! (MeS) payment APIs.
//!
//! ## Features
//! - Environment selection (production, certification, test subdomains)
//! - URL assembly from endpoint-supplied path segments
//! - Field bag with endpoint defaults, sent as query string or form body
//! - Lazily created, per-request HTTP transport
//! - Typed response post-processing through the [`Endpoint`] trait
//!
//! ## Architecture
//!
//! - **[`Endpoint`]**: what a concrete API endpoint supplies (paths, default
//!   fields, HTTP method, response hook)
//! - **[`Request`]**: builds and executes a request for an endpoint
//! - **[`Transport`](http::Transport)**: the HTTP seam, backed by `reqwest`
//!
//! ## Example
//! ```no_run
//! use mes_client::{Endpoint, Environment, Request, Response};
//!
//! struct Sale;
//!
//! impl Endpoint for Sale {
//!     type Output = Response;
//!
//!     fn base_path(&self) -> Option<&str> {
//!         Some("/mes-api/tridentApi")
//!     }
//!
//!     fn default_fields(&self) -> Vec<(&'static str, mes_client::FieldValue)> {
//!         vec![("transaction_type", "D".into())]
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut request = Request::new(Sale, Environment::Cert);
//!     request
//!         .set_field("profile_id", "94100000000000000001")
//!         .set_field("transaction_amount", "10.00");
//!
//!     let response = request.execute().await?;
//!     println!("{:?}", response.field("error_code"));
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod model;
pub mod options;
pub mod request;

// Re-exports for convenience
pub use client::{Endpoint, Error};
pub use model::{FieldValue, Fields, Response};
pub use options::{Environment, TransportOptions};
pub use request::Request;
