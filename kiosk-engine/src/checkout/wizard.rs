//! Checkout wizard state machine
//!
//! Strictly linear flow:
//!
//! ```text
//! Idle → CollectingTable → CollectingOrderType → CollectingTip → Processing
//!                                                       → {Success | Failed} → Idle
//! ```
//!
//! Every forward transition is a pure, synchronous input validation.
//! `Processing` is the only state with asynchronous side effects; those are
//! owned by the payment orchestrator, not by this type.

use shared::checkout::{CheckoutContext, OrderType};

/// Wizard states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardState {
    #[default]
    Idle,
    CollectingTable,
    CollectingOrderType,
    CollectingTip,
    Processing,
    Success,
    Failed,
}

/// Wizard transition errors
///
/// Validation failures block the forward transition; no network call is
/// attempted and the collected context is left untouched.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WizardError {
    #[error("cannot start checkout with an empty cart")]
    EmptyCart,

    #[error("table number must be 1-3 digits, got \"{0}\"")]
    InvalidTableNumber(String),

    #[error("tip must be a non-negative amount, got {0}")]
    InvalidTip(f64),

    #[error("{action} is not valid in {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: WizardState,
    },
}

/// Checkout parameters collected so far
#[derive(Debug, Clone, Default)]
struct ContextDraft {
    table_number: Option<String>,
    order_type: Option<OrderType>,
}

/// The checkout wizard of one kiosk session
#[derive(Debug, Default)]
pub struct CheckoutWizard {
    state: WizardState,
    draft: ContextDraft,
}

impl CheckoutWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    /// True while the payment pipeline owns the session.
    pub fn is_processing(&self) -> bool {
        self.state == WizardState::Processing
    }

    /// `Idle --start--> CollectingTable`; requires a non-empty cart.
    pub fn start(&mut self, cart_len: usize) -> Result<(), WizardError> {
        self.expect(WizardState::Idle, "start")?;
        if cart_len == 0 {
            return Err(WizardError::EmptyCart);
        }
        self.state = WizardState::CollectingTable;
        Ok(())
    }

    /// `CollectingTable --confirm--> CollectingOrderType`
    pub fn confirm_table(&mut self, table_number: &str) -> Result<(), WizardError> {
        self.expect(WizardState::CollectingTable, "confirm_table")?;
        if !is_valid_table_number(table_number) {
            return Err(WizardError::InvalidTableNumber(table_number.to_string()));
        }
        self.draft.table_number = Some(table_number.to_string());
        self.state = WizardState::CollectingOrderType;
        Ok(())
    }

    /// `CollectingOrderType --select--> CollectingTip`
    pub fn select_order_type(&mut self, order_type: OrderType) -> Result<(), WizardError> {
        self.expect(WizardState::CollectingOrderType, "select_order_type")?;
        self.draft.order_type = Some(order_type);
        self.state = WizardState::CollectingTip;
        Ok(())
    }

    /// `CollectingTip --select--> Processing`
    ///
    /// Returns the completed context for the orchestrator. Tip selection
    /// always proceeds to payment; there is no cancel from this step.
    pub fn select_tip(&mut self, tip: f64) -> Result<CheckoutContext, WizardError> {
        self.expect(WizardState::CollectingTip, "select_tip")?;
        if !tip.is_finite() || tip < 0.0 {
            return Err(WizardError::InvalidTip(tip));
        }

        // Both unwraps are unreachable: the linear flow cannot enter
        // CollectingTip without passing the earlier steps.
        let context = CheckoutContext {
            table_number: self
                .draft
                .table_number
                .clone()
                .ok_or(WizardError::InvalidTransition {
                    action: "select_tip",
                    state: self.state,
                })?,
            order_type: self
                .draft
                .order_type
                .ok_or(WizardError::InvalidTransition {
                    action: "select_tip",
                    state: self.state,
                })?,
            tip,
        };
        self.state = WizardState::Processing;
        Ok(context)
    }

    /// Cancel from a collecting step; returns to `Idle` without touching the
    /// draft context. Not available once the tip step is reached.
    pub fn cancel(&mut self) -> Result<(), WizardError> {
        match self.state {
            WizardState::CollectingTable | WizardState::CollectingOrderType => {
                self.state = WizardState::Idle;
                Ok(())
            }
            WizardState::Failed => {
                self.state = WizardState::Idle;
                self.draft = ContextDraft::default();
                Ok(())
            }
            state => Err(WizardError::InvalidTransition {
                action: "cancel",
                state,
            }),
        }
    }

    /// `Processing --success--> Success`
    pub fn finish_success(&mut self) -> Result<(), WizardError> {
        self.expect(WizardState::Processing, "finish_success")?;
        self.state = WizardState::Success;
        self.draft = ContextDraft::default();
        Ok(())
    }

    /// `Processing --failure--> Failed`; the draft is preserved for retry.
    pub fn finish_failure(&mut self) -> Result<(), WizardError> {
        self.expect(WizardState::Processing, "finish_failure")?;
        self.state = WizardState::Failed;
        Ok(())
    }

    /// `Failed --retry--> CollectingTable`, keeping cart and context.
    pub fn retry(&mut self) -> Result<(), WizardError> {
        self.expect(WizardState::Failed, "retry")?;
        self.state = WizardState::CollectingTable;
        Ok(())
    }

    /// `Success --(auto, after display interval)--> Idle`
    pub fn acknowledge_success(&mut self) -> Result<(), WizardError> {
        self.expect(WizardState::Success, "acknowledge_success")?;
        self.state = WizardState::Idle;
        Ok(())
    }

    /// Unconditional return to `Idle`, dropping any collected context.
    /// Used by the full session reset; the caller guards against
    /// `Processing`.
    pub fn reset(&mut self) {
        self.state = WizardState::Idle;
        self.draft = ContextDraft::default();
    }

    fn expect(&self, state: WizardState, action: &'static str) -> Result<(), WizardError> {
        if self.state != state {
            return Err(WizardError::InvalidTransition {
                action,
                state: self.state,
            });
        }
        Ok(())
    }
}

/// Numeric-keypad input: non-empty digit string, 1-3 digits.
fn is_valid_table_number(value: &str) -> bool {
    !value.is_empty() && value.len() <= 3 && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard_at_tip() -> CheckoutWizard {
        let mut w = CheckoutWizard::new();
        w.start(1).unwrap();
        w.confirm_table("12").unwrap();
        w.select_order_type(OrderType::ToGo).unwrap();
        w
    }

    #[test]
    fn test_start_requires_non_empty_cart() {
        let mut w = CheckoutWizard::new();
        assert_eq!(w.start(0), Err(WizardError::EmptyCart));
        assert_eq!(w.state(), WizardState::Idle);

        w.start(2).unwrap();
        assert_eq!(w.state(), WizardState::CollectingTable);
    }

    #[test]
    fn test_happy_path_builds_context() {
        let mut w = wizard_at_tip();
        let context = w.select_tip(2.0).unwrap();
        assert_eq!(w.state(), WizardState::Processing);
        assert_eq!(context.table_number, "12");
        assert_eq!(context.order_type, OrderType::ToGo);
        assert_eq!(context.tip, 2.0);
    }

    #[test]
    fn test_table_number_validation() {
        let mut w = CheckoutWizard::new();
        w.start(1).unwrap();

        for bad in ["", "1234", "12a", "a", " 1"] {
            assert_eq!(
                w.confirm_table(bad),
                Err(WizardError::InvalidTableNumber(bad.to_string())),
                "input {bad:?}"
            );
            assert_eq!(w.state(), WizardState::CollectingTable);
        }

        w.confirm_table("7").unwrap();
        assert_eq!(w.state(), WizardState::CollectingOrderType);
    }

    #[test]
    fn test_order_type_unreachable_without_table() {
        let mut w = CheckoutWizard::new();
        w.start(1).unwrap();
        assert!(matches!(
            w.select_order_type(OrderType::DineIn),
            Err(WizardError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_processing_unreachable_without_table_and_type() {
        let mut w = CheckoutWizard::new();
        assert!(matches!(
            w.select_tip(1.0),
            Err(WizardError::InvalidTransition { .. })
        ));

        w.start(1).unwrap();
        assert!(matches!(
            w.select_tip(1.0),
            Err(WizardError::InvalidTransition { .. })
        ));

        w.confirm_table("3").unwrap();
        assert!(matches!(
            w.select_tip(1.0),
            Err(WizardError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_tip_validation() {
        let mut w = wizard_at_tip();
        assert_eq!(w.select_tip(-1.0), Err(WizardError::InvalidTip(-1.0)));
        assert!(matches!(w.select_tip(f64::NAN), Err(WizardError::InvalidTip(_))));
        assert_eq!(w.state(), WizardState::CollectingTip);

        w.select_tip(0.0).unwrap();
        assert_eq!(w.state(), WizardState::Processing);
    }

    #[test]
    fn test_cancel_from_collecting_steps() {
        let mut w = CheckoutWizard::new();
        w.start(1).unwrap();
        w.cancel().unwrap();
        assert_eq!(w.state(), WizardState::Idle);

        w.start(1).unwrap();
        w.confirm_table("5").unwrap();
        w.cancel().unwrap();
        assert_eq!(w.state(), WizardState::Idle);
    }

    #[test]
    fn test_no_cancel_from_tip_or_processing() {
        let mut w = wizard_at_tip();
        assert!(matches!(
            w.cancel(),
            Err(WizardError::InvalidTransition { .. })
        ));

        w.select_tip(0.0).unwrap();
        assert!(matches!(
            w.cancel(),
            Err(WizardError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_failure_preserves_draft_for_retry() {
        let mut w = wizard_at_tip();
        w.select_tip(2.0).unwrap();
        w.finish_failure().unwrap();
        assert_eq!(w.state(), WizardState::Failed);

        // Retry re-enters table collection with the draft intact; the
        // operator walks forward again without re-typing lost state.
        w.retry().unwrap();
        assert_eq!(w.state(), WizardState::CollectingTable);
        w.confirm_table("12").unwrap();
        w.select_order_type(OrderType::ToGo).unwrap();
        let context = w.select_tip(2.0).unwrap();
        assert_eq!(context.table_number, "12");
    }

    #[test]
    fn test_success_flow_returns_to_idle() {
        let mut w = wizard_at_tip();
        w.select_tip(0.0).unwrap();
        assert!(w.is_processing());

        w.finish_success().unwrap();
        assert_eq!(w.state(), WizardState::Success);

        w.acknowledge_success().unwrap();
        assert_eq!(w.state(), WizardState::Idle);

        // The next checkout starts from a clean draft
        assert!(matches!(
            w.select_tip(1.0),
            Err(WizardError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_cancel_from_failed_clears_draft() {
        let mut w = wizard_at_tip();
        w.select_tip(2.0).unwrap();
        w.finish_failure().unwrap();
        w.cancel().unwrap();
        assert_eq!(w.state(), WizardState::Idle);
    }

    #[test]
    fn test_reset_is_unconditional() {
        let mut w = wizard_at_tip();
        w.reset();
        assert_eq!(w.state(), WizardState::Idle);
    }
}
