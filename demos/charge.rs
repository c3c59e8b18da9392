//! Card sale against the MeS Trident gateway.
//!
//! Run with:
//! ```bash
//! export MES_PROFILE_ID="your-profile-id"
//! export MES_PROFILE_KEY="your-profile-key"
//! RUST_LOG=mes_client=debug cargo run --example charge
//! ```

use std::time::Duration;

use mes_client::model::{FieldValue, Response};
use mes_client::{Endpoint, Environment, Request, TransportOptions};
use tracing_subscriber::EnvFilter;

/// Trident payment gateway, sale transaction.
struct Sale;

impl Endpoint for Sale {
    type Output = Response;

    fn base_path(&self) -> Option<&str> {
        Some("/mes-api/tridentApi")
    }

    fn default_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![("transaction_type", "D".into()), ("currency_code", "USD".into())]
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let profile_id =
        std::env::var("MES_PROFILE_ID").expect("MES_PROFILE_ID environment variable must be set");
    let profile_key =
        std::env::var("MES_PROFILE_KEY").expect("MES_PROFILE_KEY environment variable must be set");
    let environment: Environment = std::env::var("MES_ENV")
        .unwrap_or_else(|_| "test".to_string())
        .parse()?;

    let mut request = Request::new(Sale, environment)
        .with_transport_options(TransportOptions::default().with_timeout(Duration::from_secs(30)));

    request
        .set_field("profile_id", profile_id)
        .set_field("profile_key", profile_key)
        .set_field("card_number", "4012301230123010")
        .set_field("card_exp_date", "1230")
        .set_field("transaction_amount", "10.00")
        .set_field("invoice_number", 1001);

    println!("Sending sale to {}...", request.resolve_url());

    match request.execute().await {
        Ok(response) => {
            println!("\n=== Response ===");
            for (key, value) in response.fields() {
                println!("{}: {}", key, value);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(raw) = request.last_response() {
                eprintln!("Raw response ({}): {}", raw.status, raw.body);
            }
        }
    }

    Ok(())
}
