//! Supabase order store adapter
//!
//! Writes the order record and its line rows through the REST API. The
//! insert returns the representation so the new row id can feed the rest of
//! the pipeline.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use shared::checkout::{NewOrder, NewOrderItem, OrderRecord};

use super::{GatewayError, OrderStore, ensure_success};

/// Order persistence through the Supabase REST API
#[derive(Debug, Clone)]
pub struct SupabaseOrderStore {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseOrderStore {
    pub fn new(client: Client, base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            anon_key: anon_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }
}

#[async_trait]
impl OrderStore for SupabaseOrderStore {
    async fn create_order(&self, order: &NewOrder) -> Result<OrderRecord, GatewayError> {
        let response = self
            .client
            .post(self.table_url("orders"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Prefer", "return=representation")
            .json(order)
            .send()
            .await?;

        let rows: Vec<OrderRecord> = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::Decode("insert returned no rows".to_string()))
    }

    async fn create_order_items(
        &self,
        order_id: &str,
        items: &[NewOrderItem],
    ) -> Result<(), GatewayError> {
        if items.is_empty() {
            return Ok(());
        }

        let rows: Vec<serde_json::Value> = items
            .iter()
            .map(|item| {
                json!({
                    "order_id": order_id,
                    "name": item.name,
                    "price": item.price,
                    "quantity": item.quantity,
                })
            })
            .collect();

        let response = self
            .client
            .post(self.table_url("order_items"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}
