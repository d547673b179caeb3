//! Supabase catalog provider
//!
//! Performs the nested REST select (categories → items → junction →
//! modifier groups → modifiers) in one round trip and maps the rows to the
//! shared catalog models. Deep nesting mirrors the schema: the junction
//! table rows carry the group, the group carries its options.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use shared::models::{Category, MenuItem, ModifierGroup, ModifierOption};

use super::{CatalogData, CatalogError, CatalogProvider};

const CATALOG_SELECT: &str = "id,name,sort_order,\
items(id,name,pos_name,price,description,image_url,is_available,clover_id,\
item_modifier_groups(modifier_groups(name,required,single_select,modifiers(name,price))))";

/// Catalog provider backed by the Supabase REST API
#[derive(Debug, Clone)]
pub struct SupabaseCatalogProvider {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseCatalogProvider {
    pub fn new(client: Client, base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            anon_key: anon_key.into(),
        }
    }

    fn map_rows(rows: Vec<CategoryRow>) -> CatalogData {
        let mut categories = Vec::new();
        let mut items = Vec::new();
        let mut modifier_groups: HashMap<String, ModifierGroup> = HashMap::new();

        for row in rows {
            categories.push(Category {
                id: row.id,
                name: row.name.clone(),
                sort_order: row.sort_order.unwrap_or_default(),
            });

            for item_row in row.items {
                // Sold-out items never reach the menu
                if !item_row.is_available.unwrap_or(true) {
                    continue;
                }

                let mut group_names = Vec::new();
                for junction in item_row.item_modifier_groups {
                    let Some(group_row) = junction.modifier_groups else {
                        continue;
                    };
                    group_names.push(group_row.name.clone());

                    // Groups are shared across items; first occurrence wins
                    modifier_groups
                        .entry(group_row.name.clone())
                        .or_insert_with(|| ModifierGroup {
                            name: group_row.name,
                            options: group_row
                                .modifiers
                                .into_iter()
                                .map(|m| ModifierOption {
                                    name: m.name,
                                    price: m.price,
                                })
                                .collect(),
                            required: group_row.required.unwrap_or(false),
                            single_select: group_row.single_select.unwrap_or(false),
                        });
                }

                items.push(MenuItem {
                    id: item_row.id,
                    name: item_row.name,
                    pos_name: item_row.pos_name,
                    price: item_row.price,
                    category: row.name.clone(),
                    description: item_row.description,
                    image: item_row.image_url,
                    modifier_groups: group_names,
                    is_available: true,
                    external_id: item_row.clover_id,
                });
            }
        }

        CatalogData {
            categories,
            items,
            modifier_groups,
        }
    }
}

#[async_trait]
impl CatalogProvider for SupabaseCatalogProvider {
    async fn fetch(&self) -> Result<CatalogData, CatalogError> {
        let url = format!(
            "{}/rest/v1/categories",
            self.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .get(&url)
            .query(&[("select", CATALOG_SELECT), ("order", "sort_order.asc")])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<CategoryRow> = response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))?;

        let data = Self::map_rows(rows);
        tracing::info!(
            categories = data.categories.len(),
            items = data.items.len(),
            "Fetched menu data"
        );
        Ok(data)
    }
}

// ============================================================================
// Row types (REST response shape)
// ============================================================================

#[derive(Debug, Deserialize)]
struct CategoryRow {
    id: String,
    name: String,
    sort_order: Option<i32>,
    #[serde(default)]
    items: Vec<ItemRow>,
}

#[derive(Debug, Deserialize)]
struct ItemRow {
    id: String,
    name: String,
    pos_name: Option<String>,
    price: f64,
    description: Option<String>,
    image_url: Option<String>,
    is_available: Option<bool>,
    clover_id: Option<String>,
    #[serde(default)]
    item_modifier_groups: Vec<JunctionRow>,
}

#[derive(Debug, Deserialize)]
struct JunctionRow {
    modifier_groups: Option<ModifierGroupRow>,
}

#[derive(Debug, Deserialize)]
struct ModifierGroupRow {
    name: String,
    required: Option<bool>,
    single_select: Option<bool>,
    #[serde(default)]
    modifiers: Vec<ModifierRow>,
}

#[derive(Debug, Deserialize)]
struct ModifierRow {
    name: String,
    price: f64,
}
