//! Declarative set-meal bundle rules
//!
//! A rule fires when an item of the rule's category carries one of the
//! keywords in its description; the companion item is then added to the cart
//! at zero price under the same group id. Rules are resolved against the
//! catalog once at load time.

use serde::{Deserialize, Serialize};
use shared::models::MenuItem;

/// Unresolved bundle rule, as configured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleRule {
    /// Category whose items this rule applies to
    pub category: String,
    /// Case-insensitive description keywords; any match triggers the rule
    pub keywords: Vec<String>,
    /// Candidate companion item names (display or POS name); the first one
    /// present in the catalog wins
    pub companion_names: Vec<String>,
    /// Prefix marking the companion entry as bundled, e.g. "(Set) "
    pub label_prefix: String,
}

impl BundleRule {
    /// The rule table observed in production: "Special" items bundle a side
    /// of fries and/or a soft drink depending on their description.
    pub fn defaults() -> Vec<BundleRule> {
        vec![
            BundleRule {
                category: "Special".to_string(),
                keywords: vec!["fries".to_string(), "ff".to_string()],
                companion_names: vec!["1/2 FF".to_string(), "French Fries".to_string()],
                label_prefix: "(Set) ".to_string(),
            },
            BundleRule {
                category: "Special".to_string(),
                keywords: vec!["drink".to_string()],
                companion_names: vec!["Soft Drink".to_string()],
                label_prefix: "(Set) ".to_string(),
            },
        ]
    }

    /// Resolve the companion reference against the loaded item list.
    ///
    /// Returns `None` when no candidate name matches any item; the caller
    /// skips the rule in that case (absence of a companion is not an error).
    pub fn resolve(&self, items: &[MenuItem]) -> Option<ResolvedBundleRule> {
        let companion = self
            .companion_names
            .iter()
            .find_map(|name| items.iter().find(|i| i.matches_name(name)))?;

        Some(ResolvedBundleRule {
            category: self.category.clone(),
            keywords: self.keywords.iter().map(|k| k.to_lowercase()).collect(),
            companion: companion.clone(),
            label_prefix: self.label_prefix.clone(),
        })
    }
}

/// Bundle rule with the companion item resolved
#[derive(Debug, Clone)]
pub struct ResolvedBundleRule {
    pub category: String,
    pub keywords: Vec<String>,
    pub companion: MenuItem,
    pub label_prefix: String,
}

impl ResolvedBundleRule {
    /// Whether adding `item` triggers this rule.
    pub fn triggers_on(&self, item: &MenuItem) -> bool {
        if item.category != self.category {
            return false;
        }
        let desc = item.description_lower();
        self.keywords.iter().any(|k| desc.contains(k.as_str()))
    }
}
