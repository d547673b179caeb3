//! Kiosk Engine - self-service ordering session core
//!
//! # Architecture overview
//!
//! This crate is the headless core of a touchscreen self-service kiosk. The
//! front end renders menus and forwards taps; everything stateful lives here:
//!
//! - **catalog**: menu read side (categories, items, modifier groups) with
//!   bundle-rule resolution at load time
//! - **cart**: ordered cart store with set-meal bundling and group cascade
//!   removal
//! - **pricing**: derived totals (subtotal, tax, card fee, grand total)
//! - **checkout**: the wizard state machine and the payment orchestration
//!   pipeline (charge → persist → POS sync → print)
//! - **gateway**: injected clients for the payment terminal, POS, order
//!   store, and local print bridge
//! - **session**: single-owner session state plus the idle auto-reset monitor
//!
//! # Module structure
//!
//! ```text
//! kiosk-engine/src/
//! ├── core/          # Configuration, environment setup
//! ├── utils/         # Logging
//! ├── catalog/       # Providers, catalog index, bundle rules
//! ├── cart/          # Cart store, entry composition
//! ├── pricing/       # Totals calculator
//! ├── checkout/      # Wizard state machine, payment orchestrator
//! ├── gateway/       # Payment / POS / print / order-store adapters
//! └── session/       # Kiosk session, idle monitor
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod core;
pub mod gateway;
pub mod pricing;
pub mod session;
pub mod utils;

// Re-export public types
pub use cart::{CartError, CartStore};
pub use catalog::{Catalog, CatalogError, CatalogProvider};
pub use checkout::{
    CheckoutError, CheckoutOutcome, CheckoutWizard, PaymentOrchestrator, WizardError, WizardState,
};
pub use crate::core::Config;
pub use gateway::{Gateways, OrderStore, PaymentGateway, PosGateway, PrintGateway};
pub use session::{IdleMonitor, KioskSession};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
