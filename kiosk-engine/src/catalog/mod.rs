//! Menu catalog read side
//!
//! A [`CatalogProvider`] fetches raw catalog data (categories, items,
//! modifier groups); [`Catalog::build`] indexes it for the session: category
//! ordering, availability filtering, and one-time bundle-rule resolution.

pub mod bundle;
pub mod provider;
pub mod supabase;

use std::collections::HashMap;

use shared::models::{Category, MenuItem, ModifierGroup};

pub use bundle::{BundleRule, ResolvedBundleRule};
pub use provider::{CatalogProvider, StaticCatalogProvider};
pub use supabase::SupabaseCatalogProvider;

/// Raw catalog payload as fetched by a provider
#[derive(Debug, Clone, Default)]
pub struct CatalogData {
    pub categories: Vec<Category>,
    pub items: Vec<MenuItem>,
    pub modifier_groups: HashMap<String, ModifierGroup>,
}

/// Catalog fetch/decode errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog request rejected with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("catalog payload could not be decoded: {0}")]
    Decode(String),
}

/// Indexed, immutable menu catalog for one session
///
/// Categories are sorted by their explicit `sort_order`; unavailable items
/// are dropped at load; bundle rules are resolved against the item list once
/// here instead of being re-scanned on every add.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<Category>,
    items: Vec<MenuItem>,
    modifier_groups: HashMap<String, ModifierGroup>,
    bundles: Vec<ResolvedBundleRule>,
}

impl Catalog {
    /// Fetch from a provider and index in one step.
    pub async fn load(
        provider: &dyn CatalogProvider,
        rules: &[BundleRule],
    ) -> Result<Self, CatalogError> {
        Ok(Self::build(provider.fetch().await?, rules))
    }

    /// Index fetched data and resolve the bundle-rule table.
    pub fn build(data: CatalogData, rules: &[BundleRule]) -> Self {
        let mut categories = data.categories;
        categories.sort_by_key(|c| c.sort_order);

        let items: Vec<MenuItem> = data
            .items
            .into_iter()
            .filter(|i| i.is_available)
            .collect();

        let mut bundles = Vec::new();
        for rule in rules {
            match rule.resolve(&items) {
                Some(resolved) => bundles.push(resolved),
                None => {
                    tracing::warn!(
                        category = %rule.category,
                        companions = ?rule.companion_names,
                        "Bundle rule has no resolvable companion item, skipping"
                    );
                }
            }
        }

        tracing::info!(
            categories = categories.len(),
            items = items.len(),
            modifier_groups = data.modifier_groups.len(),
            bundles = bundles.len(),
            "Catalog indexed"
        );

        Self {
            categories,
            items,
            modifier_groups: data.modifier_groups,
            bundles,
        }
    }

    /// Ordered category list.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The category the menu view shows by default (lowest sort order).
    pub fn default_category(&self) -> Option<&Category> {
        self.categories.first()
    }

    /// All available items.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Pure read filter: the items of one category, no mutation.
    pub fn items_in(&self, category_name: &str) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|i| i.category == category_name)
            .collect()
    }

    /// Look up an item by id.
    pub fn item(&self, item_id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Look up an item by display or POS name.
    pub fn find_item_by_name(&self, name: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.matches_name(name))
    }

    /// Resolve a modifier group by its name key.
    pub fn modifier_group(&self, name: &str) -> Option<&ModifierGroup> {
        self.modifier_groups.get(name)
    }

    /// Bundle rules triggered by adding `item`.
    pub fn bundle_companions(&self, item: &MenuItem) -> Vec<&ResolvedBundleRule> {
        self.bundles
            .iter()
            .filter(|rule| rule.triggers_on(item))
            .collect()
    }
}
