//! Checkout flow
//!
//! - **wizard**: the linear parameter-collection state machine
//! - **orchestrator**: the charge → persist → POS sync → print pipeline
//!
//! The wizard validates inputs synchronously; the orchestrator owns the only
//! asynchronous state (`Processing`).

pub mod orchestrator;
pub mod wizard;

pub use orchestrator::{CheckoutError, CheckoutOutcome, PaymentOrchestrator};
pub use wizard::{CheckoutWizard, WizardError, WizardState};
