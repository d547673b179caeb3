/// Kiosk configuration - all tunables of the ordering session
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | SUPABASE_URL | http://localhost:54321 | Order store / catalog base URL |
/// | SUPABASE_ANON_KEY | (empty) | Order store API key |
/// | STRIPE_SECRET_KEY | (empty) | Payment gateway secret key |
/// | STRIPE_TERMINAL_READER_ID | (empty) | Card reader to drive |
/// | CLOVER_API_URL | https://api.clover.com | POS base URL |
/// | CLOVER_MERCHANT_ID | (empty) | POS merchant |
/// | CLOVER_API_TOKEN | (empty) | POS bearer token |
/// | CLOVER_TENDER_ID | (empty) | Tender used for kiosk payments |
/// | CLOVER_ORDER_TYPE_DINE_IN | (empty) | POS order-type id for dine-in |
/// | CLOVER_ORDER_TYPE_TO_GO | (empty) | POS order-type id for to-go |
/// | PRINTER_BRIDGE_URL | http://localhost:9100 | Local print bridge |
/// | TAX_RATE | 0.07 | Sales tax rate |
/// | CARD_FEE_RATE | 0.03 | Card fee rate (on tax-inclusive amount) |
/// | IDLE_TIMEOUT_SECS | 90 | Inactivity before session reset |
/// | SUCCESS_DISPLAY_SECS | 8 | Success screen dwell before reset |
/// | PAYMENT_POLL_ATTEMPTS | 30 | Card confirmation poll budget |
/// | PAYMENT_POLL_INTERVAL_MS | 2000 | Delay between confirmation polls |
/// | REQUEST_TIMEOUT_MS | 30000 | Per-request HTTP timeout |
/// | TO_GO_TABLE_LABEL | (unset) | Literal label replacing the stand number on to-go orders |
#[derive(Debug, Clone)]
pub struct Config {
    /// Order store / catalog base URL
    pub supabase_url: String,
    /// Order store API key
    pub supabase_anon_key: String,
    /// Payment gateway secret key
    pub stripe_secret_key: String,
    /// Card reader the charge is routed to
    pub stripe_reader_id: String,
    /// POS base URL
    pub clover_api_url: String,
    pub clover_merchant_id: String,
    pub clover_api_token: String,
    /// Tender recorded for kiosk payments
    pub clover_tender_id: String,
    /// POS order-type ids (optional; sale is untyped when absent)
    pub clover_order_type_dine_in: Option<String>,
    pub clover_order_type_to_go: Option<String>,
    /// Local receipt/kitchen print bridge
    pub printer_bridge_url: String,

    // === Pricing ===
    /// Sales tax rate applied to the subtotal
    pub tax_rate: f64,
    /// Card fee rate applied to the tax-inclusive amount
    pub card_fee_rate: f64,

    // === Session timing ===
    /// Inactivity window before the session resets to idle
    pub idle_timeout_secs: u64,
    /// How long the success screen stays up before auto-reset
    pub success_display_secs: u64,

    // === Payment confirmation polling ===
    pub payment_poll_attempts: u32,
    pub payment_poll_interval_ms: u64,

    /// Per-request HTTP timeout (milliseconds)
    pub request_timeout_ms: u64,

    /// When set, to-go orders carry this literal label instead of the
    /// entered stand number. Unset preserves the number for both types.
    pub to_go_table_label: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            supabase_url: std::env::var("SUPABASE_URL")
                .unwrap_or_else(|_| "http://localhost:54321".into()),
            supabase_anon_key: std::env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
            stripe_secret_key: std::env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            stripe_reader_id: std::env::var("STRIPE_TERMINAL_READER_ID").unwrap_or_default(),
            clover_api_url: std::env::var("CLOVER_API_URL")
                .unwrap_or_else(|_| "https://api.clover.com".into()),
            clover_merchant_id: std::env::var("CLOVER_MERCHANT_ID").unwrap_or_default(),
            clover_api_token: std::env::var("CLOVER_API_TOKEN").unwrap_or_default(),
            clover_tender_id: std::env::var("CLOVER_TENDER_ID").unwrap_or_default(),
            clover_order_type_dine_in: std::env::var("CLOVER_ORDER_TYPE_DINE_IN").ok(),
            clover_order_type_to_go: std::env::var("CLOVER_ORDER_TYPE_TO_GO").ok(),
            printer_bridge_url: std::env::var("PRINTER_BRIDGE_URL")
                .unwrap_or_else(|_| "http://localhost:9100".into()),
            tax_rate: std::env::var("TAX_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.07),
            card_fee_rate: std::env::var("CARD_FEE_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.03),
            idle_timeout_secs: std::env::var("IDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(90),
            success_display_secs: std::env::var("SUCCESS_DISPLAY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            payment_poll_attempts: std::env::var("PAYMENT_POLL_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            payment_poll_interval_ms: std::env::var("PAYMENT_POLL_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2000),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30000),
            to_go_table_label: std::env::var("TO_GO_TABLE_LABEL").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config {
            supabase_url: "http://localhost:54321".into(),
            supabase_anon_key: String::new(),
            stripe_secret_key: String::new(),
            stripe_reader_id: String::new(),
            clover_api_url: "https://api.clover.com".into(),
            clover_merchant_id: String::new(),
            clover_api_token: String::new(),
            clover_tender_id: String::new(),
            clover_order_type_dine_in: None,
            clover_order_type_to_go: None,
            printer_bridge_url: "http://localhost:9100".into(),
            tax_rate: 0.07,
            card_fee_rate: 0.03,
            idle_timeout_secs: 90,
            success_display_secs: 8,
            payment_poll_attempts: 30,
            payment_poll_interval_ms: 2000,
            request_timeout_ms: 30000,
            to_go_table_label: None,
        };
        assert_eq!(config.tax_rate, 0.07);
        assert_eq!(config.card_fee_rate, 0.03);
        assert!(config.to_go_table_label.is_none());
    }
}
