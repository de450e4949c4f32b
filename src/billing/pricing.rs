use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;
use crate::decimal::Money;
use crate::errors::{BillingError, Result};

/// per-student monthly price with each discount step as a line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub group_count: usize,
    /// base price times group count, before any discount
    pub undiscounted: Money,
    /// bundled total from the group-count step table
    pub bundle_total: Money,
    /// what the bundle saves against the undiscounted total
    pub bundle_saving: Money,
    /// flat sibling deduction actually applied (never drives the price negative)
    pub sibling_deduction: Money,
    pub final_monthly_price: Money,
}

/// price a student's enrollment through the discount table
///
/// group-count bundle first, then the flat sibling deduction, floored at zero
pub fn quote_monthly_price(
    config: &PricingConfig,
    student_name: &str,
    group_count: usize,
    has_sister: bool,
) -> Result<PriceQuote> {
    if group_count == 0 {
        return Err(BillingError::NotEnrolled {
            student: student_name.to_string(),
        });
    }

    let undiscounted = config.base_price_per_group * Decimal::from(group_count as u64);
    let bundle_total = config.bundle_total(group_count);
    let bundle_saving = undiscounted.saturating_sub(bundle_total);

    let sibling_deduction = if has_sister {
        // the deduction cannot take the price below zero
        config.sibling_discount.min(bundle_total)
    } else {
        Money::ZERO
    };
    let final_monthly_price = bundle_total.saturating_sub(sibling_deduction);

    Ok(PriceQuote {
        group_count,
        undiscounted,
        bundle_total,
        bundle_saving,
        sibling_deduction,
        final_monthly_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_single_group_full_price() {
        let quote =
            quote_monthly_price(&PricingConfig::default(), "דנה", 1, false).unwrap();
        assert_eq!(quote.final_monthly_price, Money::from_major(180));
        assert_eq!(quote.bundle_saving, Money::ZERO);
        assert_eq!(quote.sibling_deduction, Money::ZERO);
    }

    #[test]
    fn test_two_groups_bundle_not_double() {
        let quote =
            quote_monthly_price(&PricingConfig::default(), "דנה", 2, false).unwrap();
        assert_eq!(quote.undiscounted, Money::from_major(360));
        assert_eq!(quote.final_monthly_price, Money::from_major(280));
        assert_eq!(quote.bundle_saving, Money::from_major(80));
    }

    #[test]
    fn test_three_plus_groups_share_a_bundle() {
        let config = PricingConfig::default();
        let three = quote_monthly_price(&config, "דנה", 3, false).unwrap();
        let five = quote_monthly_price(&config, "דנה", 5, false).unwrap();
        assert_eq!(three.bundle_total, five.bundle_total);
        assert_eq!(three.final_monthly_price, Money::from_major(360));
    }

    #[test]
    fn test_sibling_discount_after_bundle() {
        let quote =
            quote_monthly_price(&PricingConfig::default(), "דנה", 2, true).unwrap();
        assert_eq!(quote.sibling_deduction, Money::from_major(30));
        assert_eq!(quote.final_monthly_price, Money::from_major(250));
    }

    #[test]
    fn test_sibling_discount_never_negative() {
        let config = PricingConfig {
            base_price_per_group: Money::from_decimal(dec!(20)),
            sibling_discount: Money::from_decimal(dec!(50)),
            ..PricingConfig::default()
        };
        let quote = quote_monthly_price(&config, "דנה", 1, true).unwrap();
        assert_eq!(quote.final_monthly_price, Money::ZERO);
        assert_eq!(quote.sibling_deduction, Money::from_major(20));
    }

    #[test]
    fn test_empty_enrollment_fails() {
        let err =
            quote_monthly_price(&PricingConfig::default(), "דנה", 0, false).unwrap_err();
        assert!(matches!(err, BillingError::NotEnrolled { .. }));
    }
}
