//! Clover POS adapter
//!
//! Records a completed kiosk sale: create the order, attach the line items,
//! record the payment against the configured tender, then lock the order so
//! it lands in sales reporting. Line-item sub-requests are issued
//! concurrently and awaited jointly; the stage succeeds only if all of them
//! succeed.

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use shared::checkout::{OrderType, PosSale, SaleLine, SaleRecord};
use shared::money::to_minor_units;
use shared::util::now_millis;

use crate::core::Config;

use super::{GatewayError, PosGateway, ensure_success};

/// Sales recording through the Clover REST API
pub struct CloverGateway {
    client: Client,
    base_url: String,
    merchant_id: String,
    api_token: String,
    tender_id: String,
    order_type_dine_in: Option<String>,
    order_type_to_go: Option<String>,
}

impl CloverGateway {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.clover_api_url.clone(),
            merchant_id: config.clover_merchant_id.clone(),
            api_token: config.clover_api_token.clone(),
            tender_id: config.clover_tender_id.clone(),
            order_type_dine_in: config.clover_order_type_dine_in.clone(),
            order_type_to_go: config.clover_order_type_to_go.clone(),
        }
    }

    fn merchant_url(&self, path: &str) -> String {
        format!(
            "{}/v3/merchants/{}{}",
            self.base_url.trim_end_matches('/'),
            self.merchant_id,
            path
        )
    }

    fn order_type_id(&self, order_type: OrderType) -> Option<&String> {
        match order_type {
            OrderType::DineIn => self.order_type_dine_in.as_ref(),
            OrderType::ToGo => self.order_type_to_go.as_ref(),
        }
    }

    async fn post_json(
        &self,
        url: String,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, GatewayError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await?;
        ensure_success(response).await
    }

    async fn create_order(&self, sale: &SaleRecord) -> Result<String, GatewayError> {
        let mut body = json!({
            "state": "open",
            "title": sale.table_label,
            "total": to_minor_units(sale.total_amount),
            "manualTransaction": false,
        });
        if let Some(type_id) = self.order_type_id(sale.order_type) {
            body["orderType"] = json!({ "id": type_id });
        }

        let order: CloverOrder = self
            .post_json(self.merchant_url("/orders"), body)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(order.id)
    }

    async fn add_line_item(&self, order_id: &str, line: &SaleLine) -> Result<(), GatewayError> {
        // Inventory-linked recording when the catalog id is known; free-text
        // name + price otherwise
        let body = match &line.external_id {
            Some(id) => json!({
                "item": { "id": id },
                "unitQty": line.quantity,
            }),
            None => json!({
                "name": line.name,
                "price": to_minor_units(line.unit_price),
                "unitQty": line.quantity,
            }),
        };

        self.post_json(self.merchant_url(&format!("/orders/{order_id}/line_items")), body)
            .await?;
        Ok(())
    }

    async fn record_payment(&self, order_id: &str, sale: &SaleRecord) -> Result<(), GatewayError> {
        let body = json!({
            "tender": { "id": self.tender_id },
            "amount": to_minor_units(sale.total_amount),
            "result": "SUCCESS",
            "tipAmount": to_minor_units(sale.tip_amount),
            "externalPaymentId": format!("KIOSK-{}", now_millis()),
        });
        self.post_json(self.merchant_url(&format!("/orders/{order_id}/payments")), body)
            .await?;
        Ok(())
    }

    async fn lock_order(&self, order_id: &str) -> Result<(), GatewayError> {
        self.post_json(
            self.merchant_url(&format!("/orders/{order_id}")),
            json!({ "state": "locked" }),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PosGateway for CloverGateway {
    async fn record_sale(&self, sale: &SaleRecord) -> Result<PosSale, GatewayError> {
        if self.merchant_id.is_empty() || self.api_token.is_empty() {
            return Err(GatewayError::NotConfigured("CLOVER_MERCHANT_ID"));
        }

        let order_id = self.create_order(sale).await?;
        tracing::debug!(order_id = %order_id, "Clover order created");

        // All line items in flight at once; any failure fails the stage
        try_join_all(
            sale.line_items
                .iter()
                .map(|line| self.add_line_item(&order_id, line)),
        )
        .await?;

        self.record_payment(&order_id, sale).await?;
        self.lock_order(&order_id).await?;

        tracing::info!(order_id = %order_id, "Clover sale locked");
        Ok(PosSale { order_id })
    }
}

#[derive(Debug, Deserialize)]
struct CloverOrder {
    id: String,
}
