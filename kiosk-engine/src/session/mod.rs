//! Kiosk session
//!
//! Single owner of all mutable session state: the cart, the checkout wizard,
//! and the active menu view. The front end calls the methods here from its
//! input-event handlers; the idle monitor observes the same state through a
//! shared handle. No two logical flows touch the state at once: wizard
//! inputs are synchronous, and the payment pipeline runs on a snapshot taken
//! while transitioning into `Processing`.

pub mod idle;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Notify;

use shared::cart::CartEntry;
use shared::checkout::{OrderType, Totals};
use shared::models::{Category, MenuItem, ModifierOption};

use crate::cart::{CartError, CartStore, compose_entries};
use crate::catalog::Catalog;
use crate::checkout::{
    CheckoutError, CheckoutOutcome, CheckoutWizard, PaymentOrchestrator, WizardError, WizardState,
};
use crate::core::Config;
use crate::gateway::Gateways;
use crate::pricing::{PricingRates, compute_totals};

pub use idle::IdleMonitor;

/// Session-level errors, one per layer
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unknown item: {0}")]
    UnknownItem(String),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// The mutable state of one kiosk session
pub(crate) struct SessionState {
    pub(crate) cart: CartStore,
    pub(crate) wizard: CheckoutWizard,
    pub(crate) active_category: Option<String>,
    pub(crate) last_outcome: Option<CheckoutOutcome>,
}

impl SessionState {
    fn new(default_category: Option<String>) -> Self {
        Self {
            cart: CartStore::new(),
            wizard: CheckoutWizard::new(),
            active_category: default_category,
            last_outcome: None,
        }
    }

    /// Full session reset: cart, context, wizard, menu view.
    pub(crate) fn reset(&mut self, default_category: Option<String>) {
        self.cart.clear();
        self.wizard.reset();
        self.active_category = default_category;
        self.last_outcome = None;
    }
}

/// One kiosk ordering session
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct KioskSession {
    state: Arc<RwLock<SessionState>>,
    catalog: Arc<Catalog>,
    orchestrator: Arc<PaymentOrchestrator>,
    rates: PricingRates,
    success_display: Duration,
    activity: Arc<Notify>,
}

impl KioskSession {
    pub fn new(catalog: Arc<Catalog>, gateways: Gateways, config: &Config) -> Self {
        let default_category = catalog.default_category().map(|c| c.name.clone());
        Self {
            state: Arc::new(RwLock::new(SessionState::new(default_category))),
            catalog,
            orchestrator: Arc::new(PaymentOrchestrator::new(
                gateways,
                config.to_go_table_label.clone(),
            )),
            rates: PricingRates::new(config.tax_rate, config.card_fee_rate),
            success_display: Duration::from_secs(config.success_display_secs),
            activity: Arc::new(Notify::new()),
        }
    }

    /// Record a user input event (pointer, touch, scroll); restarts the
    /// idle countdown.
    pub fn touch(&self) {
        self.activity.notify_waiters();
    }

    /// Build the idle monitor watching this session.
    pub fn idle_monitor(&self, timeout: Duration) -> IdleMonitor {
        IdleMonitor::new(
            self.state.clone(),
            self.activity.clone(),
            timeout,
            self.catalog.default_category().map(|c| c.name.clone()),
        )
    }

    // ========================================================================
    // Menu view
    // ========================================================================

    pub fn categories(&self) -> Vec<Category> {
        self.catalog.categories().to_vec()
    }

    pub fn active_category(&self) -> Option<String> {
        self.state.read().active_category.clone()
    }

    pub fn select_category(&self, name: &str) {
        self.touch();
        self.state.write().active_category = Some(name.to_string());
    }

    /// Items of the active category (pure read, no mutation).
    pub fn visible_items(&self) -> Vec<MenuItem> {
        match self.active_category() {
            Some(name) => self
                .catalog
                .items_in(&name)
                .into_iter()
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    // ========================================================================
    // Cart
    // ========================================================================

    /// Validate the selection and append the composed entries (parent plus
    /// any bundled companions) in one atomic update.
    pub fn add_to_cart(
        &self,
        item_id: &str,
        selected_options: &[ModifierOption],
    ) -> Result<(), SessionError> {
        self.touch();
        let item = self
            .catalog
            .item(item_id)
            .ok_or_else(|| SessionError::UnknownItem(item_id.to_string()))?;

        let entries = compose_entries(item, selected_options, &self.catalog)?;
        self.state.write().cart.append(entries);
        Ok(())
    }

    /// Remove an entry, cascading over its set group; unknown ids are a
    /// no-op. Returns the number of entries removed.
    pub fn remove_entry(&self, entry_id: &str) -> usize {
        self.touch();
        self.state.write().cart.remove(entry_id)
    }

    pub fn clear_cart(&self) {
        self.touch();
        self.state.write().cart.clear();
    }

    pub fn cart_entries(&self) -> Vec<CartEntry> {
        self.state.read().cart.entries().to_vec()
    }

    pub fn cart_len(&self) -> usize {
        self.state.read().cart.len()
    }

    /// Totals derived from the live cart on every call; nothing is cached.
    pub fn totals(&self) -> Totals {
        compute_totals(self.state.read().cart.entries(), &self.rates)
    }

    // ========================================================================
    // Checkout
    // ========================================================================

    pub fn wizard_state(&self) -> WizardState {
        self.state.read().wizard.state()
    }

    pub fn is_processing(&self) -> bool {
        self.state.read().wizard.is_processing()
    }

    pub fn last_outcome(&self) -> Option<CheckoutOutcome> {
        self.state.read().last_outcome.clone()
    }

    pub fn start_checkout(&self) -> Result<(), SessionError> {
        self.touch();
        let mut state = self.state.write();
        let cart_len = state.cart.len();
        state.wizard.start(cart_len)?;
        Ok(())
    }

    pub fn confirm_table(&self, table_number: &str) -> Result<(), SessionError> {
        self.touch();
        self.state.write().wizard.confirm_table(table_number)?;
        Ok(())
    }

    pub fn select_order_type(&self, order_type: OrderType) -> Result<(), SessionError> {
        self.touch();
        self.state.write().wizard.select_order_type(order_type)?;
        Ok(())
    }

    pub fn cancel_checkout(&self) -> Result<(), SessionError> {
        self.touch();
        self.state.write().wizard.cancel()?;
        Ok(())
    }

    /// `Failed --retry--> CollectingTable`, cart and context intact.
    pub fn retry_checkout(&self) -> Result<(), SessionError> {
        self.touch();
        self.state.write().wizard.retry()?;
        Ok(())
    }

    /// Select the tip and run the payment pipeline.
    ///
    /// The wizard transition into `Processing` is synchronous; the pipeline
    /// then runs on a snapshot of the cart so no lock is held across network
    /// round-trips. On success the cart is cleared, the context reset, and a
    /// return to the idle screen scheduled after the display interval. On
    /// fatal failure cart and context stay for retry.
    pub async fn checkout_with_tip(&self, tip: f64) -> Result<CheckoutOutcome, SessionError> {
        self.touch();

        let (context, entries, totals) = {
            let mut state = self.state.write();
            let context = state.wizard.select_tip(tip)?;
            let entries = state.cart.entries().to_vec();
            let totals = compute_totals(state.cart.entries(), &self.rates);
            (context, entries, totals)
        };

        match self.orchestrator.process(&entries, &context, &totals).await {
            Ok(outcome) => {
                {
                    let mut state = self.state.write();
                    state.wizard.finish_success()?;
                    state.cart.clear();
                    state.last_outcome = Some(outcome.clone());
                }
                self.schedule_return_to_idle();
                Ok(outcome)
            }
            Err(e) => {
                self.state.write().wizard.finish_failure()?;
                Err(e.into())
            }
        }
    }

    /// `Success --(auto, after display interval)--> Idle`
    fn schedule_return_to_idle(&self) {
        let state = self.state.clone();
        let default_category = self.catalog.default_category().map(|c| c.name.clone());
        let delay = self.success_display;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.write();
            if state.wizard.state() == WizardState::Success {
                state.wizard.acknowledge_success().ok();
                state.active_category = default_category;
            }
        });
    }

    /// Full session reset, guarded against an in-flight payment.
    pub fn reset(&self) {
        let mut state = self.state.write();
        if state.wizard.is_processing() {
            tracing::debug!("Reset skipped: payment in flight");
            return;
        }
        state.reset(self.catalog.default_category().map(|c| c.name.clone()));
    }
}
