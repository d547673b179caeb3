//! Pricing engine
//!
//! Pure derivation of totals from the live cart. Totals are recomputed on
//! every read; nothing here is cached, so a stored total can never diverge
//! from the cart contents.
//!
//! Formula (rates from configuration):
//!
//! ```text
//! subtotal   = Σ line totals
//! tax        = subtotal * tax_rate
//! card_fee   = (subtotal + tax) * card_fee_rate
//! grand      = subtotal + tax + card_fee
//! ```
//!
//! Each derived field is rounded to cents (half-up) before entering the next
//! formula; the card fee is computed on the tax-inclusive amount.

use rust_decimal::Decimal;

use shared::cart::CartEntry;
use shared::checkout::Totals;
use shared::money::{to_decimal, to_f64};

/// Fixed configuration rates
#[derive(Debug, Clone, Copy)]
pub struct PricingRates {
    /// Sales tax rate, e.g. 0.07
    pub tax_rate: f64,
    /// Card fee rate on the tax-inclusive amount, e.g. 0.03
    pub card_fee_rate: f64,
}

impl PricingRates {
    pub fn new(tax_rate: f64, card_fee_rate: f64) -> Self {
        Self {
            tax_rate,
            card_fee_rate,
        }
    }
}

/// Derive the totals of the given cart entries.
pub fn compute_totals(entries: &[CartEntry], rates: &PricingRates) -> Totals {
    let subtotal_dec: Decimal = entries.iter().map(|e| to_decimal(e.line_total)).sum();
    let subtotal = to_f64(subtotal_dec);

    let tax = to_f64(to_decimal(subtotal) * to_decimal(rates.tax_rate));
    let card_fee = to_f64(
        (to_decimal(subtotal) + to_decimal(tax)) * to_decimal(rates.card_fee_rate),
    );
    let grand_total = to_f64(to_decimal(subtotal) + to_decimal(tax) + to_decimal(card_fee));

    Totals {
        subtotal,
        tax,
        card_fee,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::MenuItem;

    fn entry(line_total: f64) -> CartEntry {
        let item = MenuItem {
            id: "i1".to_string(),
            name: "Item".to_string(),
            pos_name: None,
            price: line_total,
            category: "Mains".to_string(),
            description: None,
            image: None,
            modifier_groups: vec![],
            is_available: true,
            external_id: None,
        };
        CartEntry::new(&item, vec![], line_total)
    }

    const RATES: PricingRates = PricingRates {
        tax_rate: 0.07,
        card_fee_rate: 0.03,
    };

    #[test]
    fn test_ten_dollar_scenario() {
        // $10.00 item: tax 0.70, card fee on 10.70 rounds 0.321 -> 0.32
        let totals = compute_totals(&[entry(10.0)], &RATES);
        assert_eq!(totals.subtotal, 10.0);
        assert_eq!(totals.tax, 0.70);
        assert_eq!(totals.card_fee, 0.32);
        assert_eq!(totals.grand_total, 11.02);
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let totals = compute_totals(&[], &RATES);
        assert_eq!(totals, Totals::ZERO);
    }

    #[test]
    fn test_grand_total_is_sum_of_rounded_fields() {
        for cents in [1_i64, 99, 333, 1999, 123456] {
            let amount = cents as f64 / 100.0;
            let totals = compute_totals(&[entry(amount)], &RATES);
            let recomposed = shared::money::to_f64(
                to_decimal(totals.subtotal) + to_decimal(totals.tax) + to_decimal(totals.card_fee),
            );
            assert_eq!(totals.grand_total, recomposed, "cents = {cents}");
        }
    }

    #[test]
    fn test_recompute_is_stable() {
        // A no-op re-render must see identical totals
        let entries = vec![entry(4.75), entry(12.3), entry(0.0)];
        let first = compute_totals(&entries, &RATES);
        let second = compute_totals(&entries, &RATES);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_priced_companions_do_not_change_totals() {
        let with_companion = vec![entry(13.5), entry(0.0), entry(0.0)];
        let without = vec![entry(13.5)];
        assert_eq!(
            compute_totals(&with_companion, &RATES),
            compute_totals(&without, &RATES)
        );
    }

    #[test]
    fn test_fee_applies_to_tax_inclusive_amount() {
        // subtotal 100.00 -> tax 7.00 -> fee 3% of 107.00 = 3.21 (not 3.00)
        let totals = compute_totals(&[entry(100.0)], &RATES);
        assert_eq!(totals.tax, 7.0);
        assert_eq!(totals.card_fee, 3.21);
        assert_eq!(totals.grand_total, 110.21);
    }
}
