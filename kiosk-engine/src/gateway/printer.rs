//! Local print bridge adapter
//!
//! Forwards the structured ticket payload to the receipt/kitchen bridge on
//! the LAN. Fire-and-forget from the pipeline's perspective; the caller
//! treats failures as soft.

use async_trait::async_trait;
use reqwest::Client;

use shared::checkout::TicketPayload;

use super::{GatewayError, PrintGateway, ensure_success};

/// Ticket printing through the local HTTP bridge
#[derive(Debug, Clone)]
pub struct PrinterBridgeGateway {
    client: Client,
    base_url: String,
}

impl PrinterBridgeGateway {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PrintGateway for PrinterBridgeGateway {
    async fn print_ticket(&self, ticket: &TicketPayload) -> Result<(), GatewayError> {
        let url = format!("{}/print", self.base_url.trim_end_matches('/'));
        let response = self.client.post(url).json(ticket).send().await?;
        ensure_success(response).await?;

        tracing::debug!(order_id = %ticket.order_id, "Ticket sent to print bridge");
        Ok(())
    }
}
