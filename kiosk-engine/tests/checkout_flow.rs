//! End-to-end session flow tests
//!
//! Drives a full kiosk session - browse, build a cart, walk the checkout
//! wizard, run the payment pipeline against mock gateways - and asserts the
//! ordering and failure-tolerance guarantees of the pipeline.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use kiosk_engine::catalog::{BundleRule, Catalog, CatalogData, StaticCatalogProvider};
use kiosk_engine::checkout::WizardState;
use kiosk_engine::gateway::{
    ChargeOutcome, GatewayError, Gateways, OrderStore, PaymentGateway, PosGateway, PrintGateway,
};
use kiosk_engine::session::{KioskSession, SessionError};
use kiosk_engine::Config;

use shared::checkout::{
    NewOrder, NewOrderItem, OrderRecord, OrderType, PosSale, SaleRecord, TicketPayload,
};
use shared::models::{Category, MenuItem, ModifierGroup, ModifierOption};

// ============================================================================
// Test fixtures
// ============================================================================

fn category(name: &str, sort_order: i32) -> Category {
    Category {
        id: format!("cat-{name}"),
        name: name.to_string(),
        sort_order,
    }
}

fn item(id: &str, name: &str, category: &str, price: f64) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        pos_name: None,
        price,
        category: category.to_string(),
        description: None,
        image: None,
        modifier_groups: vec![],
        is_available: true,
        external_id: None,
    }
}

fn option(name: &str, price: f64) -> ModifierOption {
    ModifierOption {
        name: name.to_string(),
        price,
    }
}

async fn test_catalog() -> Arc<Catalog> {
    let mut special = item("sp1", "Burger Special", "Special", 13.5);
    special.description = Some("1/4 lb patty, comes with Fries and a Drink".to_string());
    special.external_id = Some("CLV-SP1".to_string());

    let mut shake = item("mk1", "Milkshake", "Drinks", 6.5);
    shake.modifier_groups = vec!["Size".to_string(), "Flavor".to_string()];

    let mut modifier_groups = HashMap::new();
    modifier_groups.insert(
        "Size".to_string(),
        ModifierGroup {
            name: "Size".to_string(),
            options: vec![option("Small", 0.0), option("Large", 1.5)],
            required: true,
            single_select: true,
        },
    );
    modifier_groups.insert(
        "Flavor".to_string(),
        ModifierGroup {
            name: "Flavor".to_string(),
            options: vec![option("Vanilla", 0.0), option("Chocolate", 0.0)],
            required: true,
            single_select: true,
        },
    );

    let data = CatalogData {
        categories: vec![
            category("Special", 1),
            category("Sides", 2),
            category("Drinks", 3),
        ],
        items: vec![
            special,
            shake,
            item("ff1", "1/2 FF", "Sides", 3.0),
            item("dr1", "Soft Drink", "Drinks", 2.5),
        ],
        modifier_groups,
    };

    let provider = StaticCatalogProvider::new(data);
    Arc::new(Catalog::load(&provider, &BundleRule::defaults()).await.unwrap())
}

fn test_config() -> Config {
    Config {
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
        success_display_secs: 0,
        payment_poll_attempts: 3,
        payment_poll_interval_ms: 1,
        request_timeout_ms: 1000,
        to_go_table_label: None,
    }
}

// ============================================================================
// Mock gateways
// ============================================================================

/// Shared call journal: stage names in invocation order, plus captured
/// arguments the assertions care about.
#[derive(Default)]
struct Journal {
    stages: Mutex<Vec<&'static str>>,
    charged_amount: Mutex<Option<f64>>,
    sale: Mutex<Option<SaleRecord>>,
    ticket: Mutex<Option<TicketPayload>>,
}

#[derive(Clone, Copy, Default)]
struct FailurePlan {
    charge: bool,
    persist: bool,
    pos: bool,
    print: bool,
}

struct MockPayment {
    journal: Arc<Journal>,
    fail: bool,
}

#[async_trait]
impl PaymentGateway for MockPayment {
    async fn charge(&self, amount: f64) -> Result<ChargeOutcome, GatewayError> {
        self.journal.stages.lock().push("charge");
        *self.journal.charged_amount.lock() = Some(amount);
        if self.fail {
            return Err(GatewayError::Declined("do not honor".to_string()));
        }
        Ok(ChargeOutcome {
            charge_id: "pi_test".to_string(),
        })
    }
}

struct MockOrders {
    journal: Arc<Journal>,
    fail: bool,
}

#[async_trait]
impl OrderStore for MockOrders {
    async fn create_order(&self, order: &NewOrder) -> Result<OrderRecord, GatewayError> {
        self.journal.stages.lock().push("create_order");
        if self.fail {
            return Err(GatewayError::Status {
                status: 500,
                body: "insert failed".to_string(),
            });
        }
        Ok(OrderRecord {
            id: "ord_test".to_string(),
            total_amount: order.total_amount,
            status: order.status.clone(),
            table_number: order.table_number.clone(),
            created_at: None,
        })
    }

    async fn create_order_items(
        &self,
        _order_id: &str,
        _items: &[NewOrderItem],
    ) -> Result<(), GatewayError> {
        self.journal.stages.lock().push("create_order_items");
        Ok(())
    }
}

struct MockPos {
    journal: Arc<Journal>,
    fail: bool,
}

#[async_trait]
impl PosGateway for MockPos {
    async fn record_sale(&self, sale: &SaleRecord) -> Result<PosSale, GatewayError> {
        self.journal.stages.lock().push("record_sale");
        *self.journal.sale.lock() = Some(sale.clone());
        if self.fail {
            return Err(GatewayError::Status {
                status: 502,
                body: "pos offline".to_string(),
            });
        }
        Ok(PosSale {
            order_id: "clv_test".to_string(),
        })
    }
}

struct MockPrinter {
    journal: Arc<Journal>,
    fail: bool,
}

#[async_trait]
impl PrintGateway for MockPrinter {
    async fn print_ticket(&self, ticket: &TicketPayload) -> Result<(), GatewayError> {
        self.journal.stages.lock().push("print");
        *self.journal.ticket.lock() = Some(ticket.clone());
        if self.fail {
            return Err(GatewayError::Status {
                status: 503,
                body: "bridge offline".to_string(),
            });
        }
        Ok(())
    }
}

fn mock_gateways(journal: &Arc<Journal>, plan: FailurePlan) -> Gateways {
    Gateways {
        payment: Arc::new(MockPayment {
            journal: journal.clone(),
            fail: plan.charge,
        }),
        orders: Arc::new(MockOrders {
            journal: journal.clone(),
            fail: plan.persist,
        }),
        pos: Arc::new(MockPos {
            journal: journal.clone(),
            fail: plan.pos,
        }),
        printer: Arc::new(MockPrinter {
            journal: journal.clone(),
            fail: plan.print,
        }),
    }
}

async fn session_with(plan: FailurePlan) -> (KioskSession, Arc<Journal>) {
    let catalog = test_catalog().await;
    let journal = Arc::new(Journal::default());
    let session = KioskSession::new(catalog, mock_gateways(&journal, plan), &test_config());
    (session, journal)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_full_checkout_happy_path() {
    let (session, journal) = session_with(FailurePlan::default()).await;

    // Browse: default view is the lowest-sorted category
    assert_eq!(session.active_category().as_deref(), Some("Special"));
    assert_eq!(session.visible_items().len(), 1);

    // Set meal expands into a group of three
    session.add_to_cart("sp1", &[]).unwrap();
    assert_eq!(session.cart_len(), 3);

    // Milkshake with the required picks
    session
        .add_to_cart("mk1", &[option("Large", 1.5), option("Vanilla", 0.0)])
        .unwrap();
    assert_eq!(session.cart_len(), 4);

    // subtotal 13.50 + 8.00 = 21.50; tax 1.505 -> 1.51 (half-up);
    // fee 3% of 23.01 = 0.6903 -> 0.69; grand 23.70
    let totals = session.totals();
    assert_eq!(totals.subtotal, 21.5);
    assert_eq!(totals.tax, 1.51);
    assert_eq!(totals.card_fee, 0.69);
    assert_eq!(totals.grand_total, 23.7);

    // Wizard walk
    session.start_checkout().unwrap();
    session.confirm_table("12").unwrap();
    session.select_order_type(OrderType::ToGo).unwrap();
    let outcome = session.checkout_with_tip(2.0).await.unwrap();

    assert_eq!(outcome.charge_id, "pi_test");
    assert_eq!(outcome.order_id, "ord_test");
    assert!(outcome.pos_synced);
    assert!(outcome.printed);

    // Charged amount is the final total: grand + tip
    assert_eq!(*journal.charged_amount.lock(), Some(25.7));

    // Side effects ran in the stated order
    assert_eq!(
        *journal.stages.lock(),
        vec![
            "charge",
            "create_order",
            "create_order_items",
            "record_sale",
            "print"
        ]
    );

    // Sale carries the stand-number label and tip
    let sale = journal.sale.lock().clone().unwrap();
    assert_eq!(sale.table_label, "Table #12");
    assert_eq!(sale.order_type, OrderType::ToGo);
    assert_eq!(sale.tip_amount, 2.0);
    assert_eq!(sale.line_items.len(), 4);
    // Inventory-linked line keeps its external id
    assert_eq!(sale.line_items[0].external_id.as_deref(), Some("CLV-SP1"));

    // Ticket prefers the POS order id and itemizes the totals
    let ticket = journal.ticket.lock().clone().unwrap();
    assert_eq!(ticket.order_id, "clv_test");
    assert_eq!(ticket.subtotal, 21.5);
    assert_eq!(ticket.total_amount, 25.7);

    // Cart cleared, context consumed, auto-return to idle
    assert_eq!(session.cart_len(), 0);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(session.wizard_state(), WizardState::Idle);
}

#[tokio::test]
async fn test_removing_any_set_member_cascades() {
    let (session, _) = session_with(FailurePlan::default()).await;

    session.add_to_cart("sp1", &[]).unwrap();
    session.add_to_cart("dr1", &[]).unwrap();
    assert_eq!(session.cart_len(), 4);

    // Target the bundled drink companion; the whole set goes
    let entries = session.cart_entries();
    let companion = entries.iter().find(|e| e.name == "(Set) Soft Drink").unwrap();
    assert_eq!(session.remove_entry(&companion.entry_id), 3);

    // Only the standalone drink remains
    let remaining = session.cart_entries();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Soft Drink");
    assert!(remaining[0].group_id.is_none());
}

#[tokio::test]
async fn test_required_modifier_blocks_add_without_network() {
    let (session, journal) = session_with(FailurePlan::default()).await;

    let err = session.add_to_cart("mk1", &[]).unwrap_err();
    assert!(matches!(err, SessionError::Cart(_)));
    assert_eq!(session.cart_len(), 0);
    assert!(journal.stages.lock().is_empty());
}

#[tokio::test]
async fn test_checkout_unreachable_with_empty_cart() {
    let (session, journal) = session_with(FailurePlan::default()).await;

    assert!(matches!(
        session.start_checkout(),
        Err(SessionError::Wizard(_))
    ));
    assert_eq!(session.wizard_state(), WizardState::Idle);
    assert!(journal.stages.lock().is_empty());
}

#[tokio::test]
async fn test_declined_charge_preserves_cart_for_retry() {
    let (session, journal) = session_with(FailurePlan {
        charge: true,
        ..Default::default()
    })
    .await;

    session.add_to_cart("sp1", &[]).unwrap();
    session.start_checkout().unwrap();
    session.confirm_table("7").unwrap();
    session.select_order_type(OrderType::DineIn).unwrap();

    let err = session.checkout_with_tip(0.0).await.unwrap_err();
    assert!(matches!(err, SessionError::Checkout(_)));

    // Failed state, cart untouched, nothing past the charge ran
    assert_eq!(session.wizard_state(), WizardState::Failed);
    assert_eq!(session.cart_len(), 3);
    assert_eq!(*journal.stages.lock(), vec!["charge"]);

    // Operator retries from the table step
    session.retry_checkout().unwrap();
    assert_eq!(session.wizard_state(), WizardState::CollectingTable);
}

#[tokio::test]
async fn test_persist_failure_is_fatal_and_keeps_cart() {
    let (session, journal) = session_with(FailurePlan {
        persist: true,
        ..Default::default()
    })
    .await;

    session.add_to_cart("sp1", &[]).unwrap();
    session.start_checkout().unwrap();
    session.confirm_table("9").unwrap();
    session.select_order_type(OrderType::DineIn).unwrap();

    session.checkout_with_tip(0.0).await.unwrap_err();

    assert_eq!(session.wizard_state(), WizardState::Failed);
    assert_eq!(session.cart_len(), 3);
    // Charge ran, persist was attempted, soft stages never started
    assert_eq!(*journal.stages.lock(), vec!["charge", "create_order"]);
}

#[tokio::test]
async fn test_soft_failures_still_complete_checkout() {
    let (session, _) = session_with(FailurePlan {
        pos: true,
        print: true,
        ..Default::default()
    })
    .await;

    session.add_to_cart("sp1", &[]).unwrap();
    session.start_checkout().unwrap();
    session.confirm_table("3").unwrap();
    session.select_order_type(OrderType::DineIn).unwrap();

    let outcome = session.checkout_with_tip(1.0).await.unwrap();
    assert!(!outcome.pos_synced);
    assert!(!outcome.printed);
    // Ticket fell back to the store order id before the print attempt
    assert_eq!(outcome.order_id, "ord_test");

    // Customer was charged and the order exists: success, cart cleared
    assert_eq!(session.cart_len(), 0);
    assert!(session.last_outcome().is_some());
}

#[tokio::test]
async fn test_idle_monitor_resets_abandoned_session() {
    let (session, _) = session_with(FailurePlan::default()).await;

    let shutdown = CancellationToken::new();
    let monitor = session.idle_monitor(Duration::from_millis(40));
    let handle = tokio::spawn(monitor.run(shutdown.clone()));

    session.add_to_cart("sp1", &[]).unwrap();
    session.select_category("Drinks");

    // Activity inside the window defers the reset
    tokio::time::sleep(Duration::from_millis(25)).await;
    session.touch();
    tokio::time::sleep(Duration::from_millis(25)).await;
    assert_eq!(session.cart_len(), 3);

    // Walk away: the session resets to its initial state
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(session.cart_len(), 0);
    assert_eq!(session.wizard_state(), WizardState::Idle);
    assert_eq!(session.active_category().as_deref(), Some("Special"));

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_to_go_label_override_is_explicit_config() {
    let catalog = test_catalog().await;
    let journal = Arc::new(Journal::default());
    let mut config = test_config();
    config.to_go_table_label = Some("To Go".to_string());
    let session = KioskSession::new(
        catalog,
        mock_gateways(&journal, FailurePlan::default()),
        &config,
    );

    session.add_to_cart("sp1", &[]).unwrap();
    session.start_checkout().unwrap();
    session.confirm_table("12").unwrap();
    session.select_order_type(OrderType::ToGo).unwrap();
    session.checkout_with_tip(0.0).await.unwrap();

    let sale = journal.sale.lock().clone().unwrap();
    assert_eq!(sale.table_label, "To Go");
}
