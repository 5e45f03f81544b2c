//! Gain computation for products.
//!
//! The shop's margin depends on the ownership mode:
//!
//! - consigned (depot): `gain = sale_price * consignment_percent / 100 - surcharge`
//! - owned stock:       `gain = sale_price - surcharge - purchase_price`
//!
//! Both the create and the update path of the product service feed this one
//! function with *merged* values (stored model overlaid with the incoming
//! patch), so the two call sites cannot drift apart.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Priced attributes of a product, after merging stored and incoming values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceInputs {
    pub sale_price: Decimal,
    pub purchase_price: Option<Decimal>,
    pub is_consigned: bool,
    pub consignment_percent: Option<Decimal>,
    pub surcharge: Decimal,
}

impl PriceInputs {
    /// Overlay an update patch on stored values, field by field. Fields the
    /// caller omitted keep their stored value; an explicit value wins.
    pub fn merged(
        stored: &crate::entities::product::Model,
        patch: &crate::services::products::UpdateProduct,
    ) -> Self {
        Self {
            sale_price: patch.sale_price.unwrap_or(stored.sale_price),
            purchase_price: patch.purchase_price.or(stored.purchase_price),
            is_consigned: patch.is_consigned.unwrap_or(stored.is_consigned),
            consignment_percent: patch.consignment_percent.or(stored.consignment_percent),
            surcharge: patch.surcharge.unwrap_or(stored.surcharge),
        }
    }
}

/// Computes the shop's gain. Deterministic and side-effect free; a negative
/// result is recorded as-is, never rejected.
pub fn compute_gain(inputs: &PriceInputs) -> Decimal {
    if inputs.is_consigned {
        // Depot mode: the purchase price is irrelevant, the shop keeps a
        // percentage of the sale.
        let percent = inputs.consignment_percent.unwrap_or(Decimal::ZERO);
        inputs.sale_price * percent / dec!(100) - inputs.surcharge
    } else {
        inputs.sale_price - inputs.surcharge - inputs.purchase_price.unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn inputs(
        sale: Decimal,
        purchase: Option<Decimal>,
        consigned: bool,
        percent: Option<Decimal>,
        surcharge: Decimal,
    ) -> PriceInputs {
        PriceInputs {
            sale_price: sale,
            purchase_price: purchase,
            is_consigned: consigned,
            consignment_percent: percent,
            surcharge,
        }
    }

    #[test_case(dec!(100), Some(dec!(20)), dec!(5), dec!(15) ; "20 percent of 100 minus 5")]
    #[test_case(dec!(100), Some(dec!(0)), dec!(0), dec!(0) ; "zero percent keeps nothing")]
    #[test_case(dec!(100), None, dec!(5), dec!(-5) ; "missing percent treated as zero")]
    #[test_case(dec!(59.90), Some(dec!(50)), dec!(0), dec!(29.95) ; "fractional prices stay exact")]
    fn consigned_gain(sale: Decimal, percent: Option<Decimal>, surcharge: Decimal, want: Decimal) {
        let gain = compute_gain(&inputs(sale, None, true, percent, surcharge));
        assert_eq!(gain, want);
    }

    #[test_case(dec!(100), Some(dec!(60)), dec!(5), dec!(35) ; "100 minus 5 minus 60")]
    #[test_case(dec!(100), None, dec!(5), dec!(95) ; "missing purchase price treated as zero")]
    #[test_case(dec!(10), Some(dec!(20)), dec!(5), dec!(-15) ; "negative gain is recorded")]
    fn owned_gain(sale: Decimal, purchase: Option<Decimal>, surcharge: Decimal, want: Decimal) {
        let gain = compute_gain(&inputs(sale, purchase, false, None, surcharge));
        assert_eq!(gain, want);
    }

    #[test]
    fn consigned_gain_ignores_purchase_price() {
        let with_purchase = inputs(dec!(100), Some(dec!(999)), true, Some(dec!(20)), dec!(5));
        let without = inputs(dec!(100), None, true, Some(dec!(20)), dec!(5));
        assert_eq!(compute_gain(&with_purchase), compute_gain(&without));
    }

    #[test]
    fn recomputation_is_idempotent() {
        let i = inputs(dec!(250), Some(dec!(120)), false, None, dec!(12.50));
        assert_eq!(compute_gain(&i), compute_gain(&i));
    }
}
