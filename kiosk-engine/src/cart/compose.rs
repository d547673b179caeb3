//! Cart entry composition
//!
//! Turns a tapped item plus its chosen options into the list of entries one
//! add produces: the priced parent entry and, for set-meal items, the
//! zero-priced companions the bundle rules contribute. Selection validation
//! happens here, before anything is created.

use shared::cart::CartEntry;
use shared::models::{MenuItem, ModifierOption};
use shared::money::{to_decimal, to_f64};

use crate::catalog::Catalog;

use super::CartError;

/// Validate a selection and compose the entries it produces.
///
/// All returned entries are meant to be appended to the cart in one atomic
/// update. Entries of a set share one fresh group id; a standalone add
/// yields a single ungrouped entry.
pub fn compose_entries(
    item: &MenuItem,
    selected_options: &[ModifierOption],
    catalog: &Catalog,
) -> Result<Vec<CartEntry>, CartError> {
    validate_price(item.price)?;
    for option in selected_options {
        validate_price(option.price)?;
    }
    validate_selection(item, selected_options, catalog)?;

    // Line total = item price + sum of option prices
    let line_total = to_f64(
        to_decimal(item.price)
            + selected_options
                .iter()
                .map(|o| to_decimal(o.price))
                .sum::<rust_decimal::Decimal>(),
    );

    let mut parent = CartEntry::new(item, selected_options.to_vec(), line_total);

    // Rule-based set expansion: each triggered rule contributes at most one
    // zero-priced companion; no companion is not an error.
    let companions = catalog.bundle_companions(item);
    if companions.is_empty() {
        return Ok(vec![parent]);
    }

    let group_id = uuid::Uuid::new_v4().to_string();
    parent.group_id = Some(group_id.clone());

    let mut entries = vec![parent];
    for rule in companions {
        tracing::debug!(
            item = %item.name,
            companion = %rule.companion.name,
            "Bundle rule triggered"
        );
        entries.push(CartEntry::bundled_companion(
            &rule.companion,
            &rule.label_prefix,
            group_id.clone(),
        ));
    }

    Ok(entries)
}

fn validate_price(value: f64) -> Result<(), CartError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CartError::InvalidPrice(value));
    }
    Ok(())
}

/// Enforce the `required` / `single_select` flags of every modifier group
/// the item names. Group names without a catalog entry are ignored.
fn validate_selection(
    item: &MenuItem,
    selected_options: &[ModifierOption],
    catalog: &Catalog,
) -> Result<(), CartError> {
    for group_name in &item.modifier_groups {
        let Some(group) = catalog.modifier_group(group_name) else {
            continue;
        };

        let picked = selected_options
            .iter()
            .filter(|o| group.contains_option(&o.name))
            .count();

        if group.required && picked == 0 {
            return Err(CartError::MissingRequiredOption(group.name.clone()));
        }
        if group.single_select && picked > 1 {
            return Err(CartError::MultipleOptionsInSingleSelect(group.name.clone()));
        }
    }
    Ok(())
}
