//! Stripe Terminal payment adapter
//!
//! Charge flow: create a PaymentIntent in minor units, hand it to the
//! configured card reader, then poll the intent until it reaches a terminal
//! status. The poll budget is bounded; exhausting it is a timeout failure,
//! which the pipeline treats as fatal.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use shared::money::to_minor_units;

use crate::core::Config;

use super::{ChargeOutcome, GatewayError, PaymentGateway, ensure_success};

const STRIPE_API_URL: &str = "https://api.stripe.com";

/// Card-present payments through a Stripe Terminal reader
pub struct StripeTerminalGateway {
    client: Client,
    base_url: String,
    secret_key: String,
    reader_id: String,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl StripeTerminalGateway {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: STRIPE_API_URL.to_string(),
            secret_key: config.stripe_secret_key.clone(),
            reader_id: config.stripe_reader_id.clone(),
            poll_attempts: config.payment_poll_attempts,
            poll_interval: Duration::from_millis(config.payment_poll_interval_ms),
        }
    }

    /// Point the adapter at a different API host (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn create_payment_intent(&self, amount_minor: i64) -> Result<PaymentIntent, GatewayError> {
        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&[
                ("amount", amount_minor.to_string()),
                ("currency", "usd".to_string()),
                ("payment_method_types[]", "card_present".to_string()),
                ("capture_method", "automatic".to_string()),
            ])
            .send()
            .await?;

        ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn send_to_reader(&self, intent_id: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(format!(
                "{}/v1/terminal/readers/{}/process_payment_intent",
                self.base_url, self.reader_id
            ))
            .bearer_auth(&self.secret_key)
            .form(&[("payment_intent", intent_id)])
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, GatewayError> {
        let response = self
            .client
            .get(format!("{}/v1/payment_intents/{}", self.base_url, intent_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// Poll the intent until the reader confirms the capture.
    async fn await_confirmation(&self, intent_id: &str) -> Result<(), GatewayError> {
        for attempt in 1..=self.poll_attempts {
            tokio::time::sleep(self.poll_interval).await;

            let intent = self.retrieve_intent(intent_id).await?;
            match intent.status.as_str() {
                "succeeded" => {
                    tracing::debug!(intent = %intent_id, attempt, "Payment confirmed");
                    return Ok(());
                }
                "canceled" => {
                    return Err(GatewayError::Declined("payment was canceled".to_string()));
                }
                "requires_payment_method" if attempt == self.poll_attempts => {
                    // Reader never saw a successful presentment
                    return Err(GatewayError::Declined(
                        "no payment method was presented".to_string(),
                    ));
                }
                status => {
                    tracing::debug!(intent = %intent_id, attempt, status, "Awaiting card");
                }
            }
        }

        Err(GatewayError::Timeout {
            attempts: self.poll_attempts,
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeTerminalGateway {
    async fn charge(&self, amount: f64) -> Result<ChargeOutcome, GatewayError> {
        if self.secret_key.is_empty() {
            return Err(GatewayError::NotConfigured("STRIPE_SECRET_KEY"));
        }
        if self.reader_id.is_empty() {
            return Err(GatewayError::NotConfigured("STRIPE_TERMINAL_READER_ID"));
        }

        // Display units -> minor units at the gateway boundary
        let amount_minor = to_minor_units(amount);

        let intent = self.create_payment_intent(amount_minor).await?;
        tracing::info!(intent = %intent.id, amount_minor, "PaymentIntent created");

        self.send_to_reader(&intent.id).await?;
        tracing::info!(intent = %intent.id, reader = %self.reader_id, "Sent to reader");

        self.await_confirmation(&intent.id).await?;

        Ok(ChargeOutcome {
            charge_id: intent.id,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PaymentIntent {
    id: String,
    status: String,
}
