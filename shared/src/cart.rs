//! Cart entry types
//!
//! A `CartEntry` is composed at add-time from a `MenuItem` snapshot plus the
//! chosen modifier options. Entries created together as one "set" selection
//! share a `GroupId`; standalone entries have none.

use serde::{Deserialize, Serialize};

use crate::models::{MenuItem, ModifierOption};

/// Opaque token linking cart entries created together as one set selection.
pub type GroupId = String;

/// A single cart line
///
/// Item fields are snapshotted at add-time; later catalog changes never
/// affect a cart in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartEntry {
    /// Process-unique entry identifier
    pub entry_id: String,
    /// Source item identifier
    pub item_id: String,
    /// Display name (prefixed for bundled companions)
    pub name: String,
    /// POS-matching name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_name: Option<String>,
    /// Category the item was added from
    pub category: String,
    /// External POS catalog identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Chosen modifier options
    #[serde(default)]
    pub selected_options: Vec<ModifierOption>,
    /// item price + sum of option prices; zero for bundled companions
    pub line_total: f64,
    /// Always 1 in the current kiosk flow
    pub quantity: i32,
    /// Set-group token; entries sharing it are removed together
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// True for zero-priced companions added by a bundle rule
    #[serde(default)]
    pub bundled: bool,
}

impl CartEntry {
    /// Build a standalone entry from an item snapshot and chosen options.
    pub fn new(item: &MenuItem, selected_options: Vec<ModifierOption>, line_total: f64) -> Self {
        Self {
            entry_id: uuid::Uuid::new_v4().to_string(),
            item_id: item.id.clone(),
            name: item.name.clone(),
            pos_name: item.pos_name.clone(),
            category: item.category.clone(),
            external_id: item.external_id.clone(),
            selected_options,
            line_total,
            quantity: 1,
            group_id: None,
            bundled: false,
        }
    }

    /// Build a zero-priced companion entry belonging to `group_id`.
    pub fn bundled_companion(item: &MenuItem, label_prefix: &str, group_id: GroupId) -> Self {
        Self {
            entry_id: uuid::Uuid::new_v4().to_string(),
            item_id: item.id.clone(),
            name: format!("{}{}", label_prefix, item.name),
            pos_name: item.pos_name.clone(),
            category: item.category.clone(),
            external_id: item.external_id.clone(),
            selected_options: vec![],
            line_total: 0.0,
            quantity: 1,
            group_id: Some(group_id),
            bundled: true,
        }
    }

    /// Whether this entry belongs to the given group.
    pub fn in_group(&self, group_id: &str) -> bool {
        self.group_id.as_deref() == Some(group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> MenuItem {
        MenuItem {
            id: "item-7".to_string(),
            name: "Soft Drink".to_string(),
            pos_name: Some("Soft Drink".to_string()),
            price: 2.5,
            category: "Drinks".to_string(),
            description: None,
            image: None,
            modifier_groups: vec![],
            is_available: true,
            external_id: Some("CLV-7".to_string()),
        }
    }

    #[test]
    fn test_new_entry_is_standalone() {
        let entry = CartEntry::new(&item(), vec![], 2.5);
        assert!(entry.group_id.is_none());
        assert!(!entry.bundled);
        assert_eq!(entry.quantity, 1);
        assert_eq!(entry.line_total, 2.5);
    }

    #[test]
    fn test_bundled_companion_is_free_and_prefixed() {
        let entry = CartEntry::bundled_companion(&item(), "(Set) ", "grp-1".to_string());
        assert_eq!(entry.name, "(Set) Soft Drink");
        assert_eq!(entry.line_total, 0.0);
        assert!(entry.bundled);
        assert!(entry.in_group("grp-1"));
        assert!(!entry.in_group("grp-2"));
    }

    #[test]
    fn test_entry_ids_are_unique() {
        let a = CartEntry::new(&item(), vec![], 2.5);
        let b = CartEntry::new(&item(), vec![], 2.5);
        assert_ne!(a.entry_id, b.entry_id);
    }
}
