//! Gateway boundaries
//!
//! Every external service the checkout pipeline touches sits behind one of
//! these traits: the card terminal, the POS, the order store, and the local
//! print bridge. Concrete adapters are constructed once per application
//! session in [`Gateways::from_config`] and injected into the orchestrator;
//! nothing here is a global.

pub mod clover;
pub mod printer;
pub mod stripe;
pub mod supabase;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use shared::checkout::{NewOrder, NewOrderItem, OrderRecord, PosSale, SaleRecord, TicketPayload};

use crate::core::Config;

pub use clover::CloverGateway;
pub use printer::PrinterBridgeGateway;
pub use stripe::StripeTerminalGateway;
pub use supabase::SupabaseOrderStore;

/// Adapter-level failures
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request rejected with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("payment confirmation timed out after {attempts} polls")]
    Timeout { attempts: u32 },

    #[error("response could not be decoded: {0}")]
    Decode(String),

    #[error("payment was declined: {0}")]
    Declined(String),

    #[error("gateway is not configured: {0}")]
    NotConfigured(&'static str),
}

/// Result of a captured charge
#[derive(Debug, Clone)]
pub struct ChargeOutcome {
    pub charge_id: String,
}

/// Map a non-success response to [`GatewayError::Status`], keeping the body
/// for the log line.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Card payment terminal
///
/// `amount` is a decimal value in the display unit; conversion to minor
/// units is the adapter's responsibility.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, amount: f64) -> Result<ChargeOutcome, GatewayError>;
}

/// Backing order database
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create_order(&self, order: &NewOrder) -> Result<OrderRecord, GatewayError>;
    async fn create_order_items(
        &self,
        order_id: &str,
        items: &[NewOrderItem],
    ) -> Result<(), GatewayError>;
}

/// Point-of-sale system (sales recording + kitchen ticket triggering)
#[async_trait]
pub trait PosGateway: Send + Sync {
    async fn record_sale(&self, sale: &SaleRecord) -> Result<PosSale, GatewayError>;
}

/// Local receipt/kitchen print bridge
#[async_trait]
pub trait PrintGateway: Send + Sync {
    async fn print_ticket(&self, ticket: &TicketPayload) -> Result<(), GatewayError>;
}

/// The injected gateway set of one application session
#[derive(Clone)]
pub struct Gateways {
    pub payment: Arc<dyn PaymentGateway>,
    pub orders: Arc<dyn OrderStore>,
    pub pos: Arc<dyn PosGateway>,
    pub printer: Arc<dyn PrintGateway>,
}

impl Gateways {
    /// Build the production adapters from configuration.
    ///
    /// One `reqwest::Client` with the configured request timeout is shared
    /// by all adapters; a stuck call fails when the timeout fires instead of
    /// blocking the pipeline indefinitely.
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            payment: Arc::new(StripeTerminalGateway::new(client.clone(), config)),
            orders: Arc::new(SupabaseOrderStore::new(
                client.clone(),
                &config.supabase_url,
                &config.supabase_anon_key,
            )),
            pos: Arc::new(CloverGateway::new(client.clone(), config)),
            printer: Arc::new(PrinterBridgeGateway::new(client, &config.printer_bridge_url)),
        })
    }
}
