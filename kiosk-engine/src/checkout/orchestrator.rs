//! Payment orchestrator
//!
//! Runs the checkout side-effect pipeline in strict order:
//!
//! 1. **Charge** the card terminal (fatal on failure)
//! 2. **Persist** the order record and its lines (fatal)
//! 3. **POS sync** for sales recording and kitchen tickets (soft)
//! 4. **Print** the customer ticket on the local bridge (soft)
//!
//! POS sync and print must never run before charge + persist succeed: they
//! encode a sale that must correspond to a captured payment. Once the
//! customer has been charged, a POS or print failure is reported as a soft
//! warning instead of aborting.
//!
//! Known consistency gap: a successful charge followed by a failed
//! persistence write leaves a charged customer with no order record. The
//! payment gateway's own reporting is the reconciliation backstop.

use shared::cart::CartEntry;
use shared::checkout::{
    CheckoutContext, NewOrder, NewOrderItem, SaleLine, SaleRecord, TicketLine, TicketPayload,
    Totals,
};
use shared::util::now_millis;

use crate::gateway::{GatewayError, Gateways};

/// Fatal pipeline failures
///
/// Soft failures (POS sync, print) never surface here; they are flags on
/// [`CheckoutOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("card charge failed: {0}")]
    ChargeFailed(#[source] GatewayError),

    #[error("order persistence failed after charge {charge_id}: {source}")]
    PersistFailed {
        charge_id: String,
        #[source]
        source: GatewayError,
    },
}

/// Result of a completed pipeline run
///
/// Present only when charge and persist both succeeded. The soft-failure
/// flags let the presentation layer render warnings without blocking.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub charge_id: String,
    /// Order store row id
    pub order_id: String,
    /// POS-side order id, when the sale was recorded
    pub pos_order_id: Option<String>,
    pub pos_synced: bool,
    pub printed: bool,
}

/// Executes the ordered side-effect pipeline against the injected gateways
pub struct PaymentOrchestrator {
    gateways: Gateways,
    /// Literal label replacing the stand number on to-go orders, when set
    to_go_table_label: Option<String>,
}

impl PaymentOrchestrator {
    pub fn new(gateways: Gateways, to_go_table_label: Option<String>) -> Self {
        Self {
            gateways,
            to_go_table_label,
        }
    }

    /// Drain the cart against the gateways.
    ///
    /// The stages run strictly sequentially; each network round-trip
    /// completes or fails before the next begins.
    pub async fn process(
        &self,
        entries: &[CartEntry],
        context: &CheckoutContext,
        totals: &Totals,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let final_total = totals.final_total(context.tip);
        let table_label = context.table_label(self.to_go_table_label.as_deref());

        // 1. Charge
        tracing::info!(
            amount = final_total,
            table = %table_label,
            order_type = context.order_type.as_str(),
            "Charging card"
        );
        let charge = self
            .gateways
            .payment
            .charge(final_total)
            .await
            .map_err(|e| {
                tracing::error!(stage = "charge", error = %e, "Checkout aborted");
                CheckoutError::ChargeFailed(e)
            })?;

        // 2. Persist
        let order = NewOrder {
            total_amount: final_total,
            status: "paid".to_string(),
            table_number: context.table_number.clone(),
            order_type: context.order_type,
            tip_amount: context.tip,
        };
        let order_items: Vec<NewOrderItem> = entries
            .iter()
            .map(|e| NewOrderItem {
                name: e.name.clone(),
                price: e.line_total,
                quantity: e.quantity,
            })
            .collect();

        let record = async {
            let record = self.gateways.orders.create_order(&order).await?;
            self.gateways
                .orders
                .create_order_items(&record.id, &order_items)
                .await?;
            Ok::<_, GatewayError>(record)
        }
        .await
        .map_err(|e| {
            tracing::error!(
                stage = "persist",
                charge_id = %charge.charge_id,
                error = %e,
                "Order record lost after captured charge"
            );
            CheckoutError::PersistFailed {
                charge_id: charge.charge_id.clone(),
                source: e,
            }
        })?;

        tracing::info!(order_id = %record.id, charge_id = %charge.charge_id, "Order persisted");

        // 3. POS sync (soft)
        let sale = SaleRecord {
            line_items: entries
                .iter()
                .map(|e| SaleLine {
                    name: e.pos_name.clone().unwrap_or_else(|| e.name.clone()),
                    unit_price: e.line_total,
                    quantity: e.quantity,
                    external_id: e.external_id.clone(),
                })
                .collect(),
            total_amount: final_total,
            table_label: table_label.clone(),
            order_type: context.order_type,
            tip_amount: context.tip,
        };
        let pos_order_id = match self.gateways.pos.record_sale(&sale).await {
            Ok(pos_sale) => {
                tracing::info!(pos_order_id = %pos_sale.order_id, "POS sale recorded");
                Some(pos_sale.order_id)
            }
            Err(e) => {
                // Customer is already charged; surface as a warning only
                tracing::warn!(order_id = %record.id, error = %e, "POS sync failed");
                None
            }
        };
        let pos_synced = pos_order_id.is_some();

        // 4. Print (soft)
        let ticket = TicketPayload {
            order_id: pos_order_id.clone().unwrap_or_else(|| record.id.clone()),
            table_label,
            order_type: context.order_type,
            line_items: entries
                .iter()
                .map(|e| TicketLine {
                    name: e.name.clone(),
                    line_total: e.line_total,
                    options: e.selected_options.iter().map(|o| o.name.clone()).collect(),
                })
                .collect(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            card_fee: totals.card_fee,
            tip_amount: context.tip,
            total_amount: final_total,
            timestamp: now_millis(),
        };
        let printed = match self.gateways.printer.print_ticket(&ticket).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(order_id = %record.id, error = %e, "Ticket print failed");
                false
            }
        };

        Ok(CheckoutOutcome {
            charge_id: charge.charge_id,
            order_id: record.id,
            pos_order_id,
            pos_synced,
            printed,
        })
    }
}
