//! Checkout types
//!
//! The context collected by the checkout wizard, the derived totals, and the
//! wire contracts of the POS / print / order-store gateways.

use serde::{Deserialize, Serialize};

use crate::money::{to_decimal, to_f64};

/// Service type for an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    #[default]
    DineIn,
    ToGo,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine_in",
            OrderType::ToGo => "to_go",
        }
    }
}

/// Parameters collected across the wizard steps
///
/// Built incrementally; consumed exactly once by the payment orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutContext {
    /// Number-stand digits entered on the keypad (1-3 digits)
    pub table_number: String,
    pub order_type: OrderType,
    /// Non-negative tip in display currency units
    pub tip: f64,
}

impl CheckoutContext {
    /// Label shown on POS orders and tickets.
    ///
    /// `to_go_label` is the configured literal override for to-go orders;
    /// when `None` the entered stand number is preserved for both types.
    pub fn table_label(&self, to_go_label: Option<&str>) -> String {
        match (self.order_type, to_go_label) {
            (OrderType::ToGo, Some(label)) => label.to_string(),
            _ => format!("Table #{}", self.table_number),
        }
    }
}

/// Derived totals, never stored
///
/// Always recomputed from the live cart; each field is rounded to cents
/// half-up before entering the next formula.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Totals {
    /// Sum of entry line totals
    pub subtotal: f64,
    /// subtotal * tax rate
    pub tax: f64,
    /// (subtotal + tax) * card fee rate
    pub card_fee: f64,
    /// subtotal + tax + card fee, before tip
    pub grand_total: f64,
}

impl Totals {
    pub const ZERO: Totals = Totals {
        subtotal: 0.0,
        tax: 0.0,
        card_fee: 0.0,
        grand_total: 0.0,
    };

    /// The amount actually charged: grand total + tip.
    pub fn final_total(&self, tip: f64) -> f64 {
        to_f64(to_decimal(self.grand_total) + to_decimal(tip))
    }
}

// ============================================================================
// POS Gateway contract
// ============================================================================

/// One line of a POS sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub name: String,
    /// Unit price in display units; ignored by the POS when `external_id`
    /// resolves a catalog item
    pub unit_price: f64,
    pub quantity: i32,
    /// External catalog identifier for inventory-linked recording
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

/// Sale forwarded to the POS for sales recording and kitchen ticketing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    pub line_items: Vec<SaleLine>,
    pub total_amount: f64,
    pub table_label: String,
    pub order_type: OrderType,
    pub tip_amount: f64,
}

/// POS-side identifier of a recorded sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosSale {
    pub order_id: String,
}

// ============================================================================
// Print Gateway contract
// ============================================================================

/// One line of a printed ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketLine {
    pub name: String,
    pub line_total: f64,
    /// Chosen option names, already formatted for display
    #[serde(default)]
    pub options: Vec<String>,
}

/// Structured ticket payload for the local print bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketPayload {
    pub order_id: String,
    pub table_label: String,
    pub order_type: OrderType,
    pub line_items: Vec<TicketLine>,
    pub subtotal: f64,
    pub tax: f64,
    pub card_fee: f64,
    pub tip_amount: f64,
    pub total_amount: f64,
    /// UTC timestamp in milliseconds
    pub timestamp: i64,
}

// ============================================================================
// Order Store contract
// ============================================================================

/// New order row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub total_amount: f64,
    /// Always "paid" in the kiosk flow (the card was captured first)
    pub status: String,
    pub table_number: String,
    pub order_type: OrderType,
    pub tip_amount: f64,
}

/// Stored order row, as returned by the order store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub total_amount: f64,
    pub status: String,
    pub table_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// New order line row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}
