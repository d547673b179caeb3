//! Idle auto-reset monitor
//!
//! Maintains a single countdown restarted by every qualifying user input
//! event. On expiry the whole session resets to its initial state - unless
//! the wizard is mid-payment, in which case the expiry is skipped and the
//! countdown re-armed so an in-flight charge is never abandoned.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::checkout::WizardState;

use super::SessionState;

/// Background watcher over one session's activity
pub struct IdleMonitor {
    state: Arc<RwLock<SessionState>>,
    activity: Arc<Notify>,
    timeout: Duration,
    default_category: Option<String>,
}

impl IdleMonitor {
    pub(crate) fn new(
        state: Arc<RwLock<SessionState>>,
        activity: Arc<Notify>,
        timeout: Duration,
        default_category: Option<String>,
    ) -> Self {
        Self {
            state,
            activity,
            timeout,
            default_category,
        }
    }

    /// Run until the shutdown token fires.
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(timeout_secs = self.timeout.as_secs(), "Idle monitor started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Idle monitor received shutdown signal");
                    break;
                }
                _ = self.activity.notified() => {
                    // Qualifying input event: restart the countdown
                    continue;
                }
                _ = tokio::time::sleep(self.timeout) => {
                    self.on_expiry();
                }
            }
        }
    }

    fn on_expiry(&self) {
        let mut state = self.state.write();

        // Never abandon an in-flight charge
        if state.wizard.is_processing() {
            tracing::debug!("Idle expiry skipped: payment in flight");
            return;
        }

        let had_session = !state.cart.is_empty() || state.wizard.state() != WizardState::Idle;
        if had_session {
            tracing::info!(
                cart_len = state.cart.len(),
                wizard = ?state.wizard.state(),
                "Idle timeout, resetting session"
            );
        }
        state.reset(self.default_category.clone());
    }
}
