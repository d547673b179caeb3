//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu item entity
///
/// Snapshot of a sellable product as shown on the kiosk. `pos_name` is the
/// name the POS system knows the item by when `external_id` is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    /// Display name
    pub name: String,
    /// POS-matching name (may differ from the display name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_name: Option<String>,
    /// Unit price in display currency units (2-dp semantics)
    pub price: f64,
    /// Category reference (category name)
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image reference (URL or path)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Ordered list of modifier-group names
    #[serde(default)]
    pub modifier_groups: Vec<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    /// External POS catalog identifier (inventory-linked recording)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

fn default_true() -> bool {
    true
}

impl MenuItem {
    /// Name match used by bundle-rule resolution: exact display name or
    /// POS name.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.pos_name.as_deref() == Some(name)
    }

    /// Lower-cased description for keyword matching; empty when absent.
    pub fn description_lower(&self) -> String {
        self.description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
    }
}
