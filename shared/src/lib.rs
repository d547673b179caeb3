//! Shared types for the kiosk ordering system
//!
//! Domain models used across crates: menu catalog entities, cart entries,
//! checkout types, gateway wire contracts, and money helpers.

pub mod cart;
pub mod checkout;
pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use cart::{CartEntry, GroupId};
pub use checkout::{CheckoutContext, OrderType, Totals};
