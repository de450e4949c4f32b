use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// studio price card: discount-table breakpoints and proration constants
///
/// the multi-group prices are a step function over group count, not a
/// percentage discount, so every breakpoint lives here rather than in
/// calculation code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// monthly price for a single group enrollment
    pub base_price_per_group: Money,
    /// bundled monthly total for two groups
    pub two_group_total: Money,
    /// bundled monthly total for three or more groups
    pub three_plus_group_total: Money,
    /// flat deduction when a sibling is also enrolled
    pub sibling_discount: Money,
    /// meetings in the partial first month at or above which a full month is charged
    pub full_month_meeting_threshold: u32,
    /// nominal meetings per month used for the per-meeting proration rate
    pub nominal_meetings_per_month: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_price_per_group: Money::from_decimal(dec!(180)),
            two_group_total: Money::from_decimal(dec!(280)),
            three_plus_group_total: Money::from_decimal(dec!(360)),
            sibling_discount: Money::from_decimal(dec!(30)),
            full_month_meeting_threshold: 3,
            nominal_meetings_per_month: 4,
        }
    }
}

impl PricingConfig {
    /// bundled monthly total for a given enrolled-group count
    ///
    /// zero groups is the caller's error to surface; this returns zero for it
    pub fn bundle_total(&self, group_count: usize) -> Money {
        match group_count {
            0 => Money::ZERO,
            1 => self.base_price_per_group,
            2 => self.two_group_total,
            _ => self.three_plus_group_total,
        }
    }

    /// per-meeting rate for proportional first-month billing
    pub fn per_meeting_rate(&self, monthly_price: Money) -> Money {
        monthly_price / Decimal::from(self.nominal_meetings_per_month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_totals_improve_per_group() {
        let config = PricingConfig::default();
        let one = config.bundle_total(1).as_decimal();
        let two = config.bundle_total(2).as_decimal() / dec!(2);
        let three = config.bundle_total(3).as_decimal() / dec!(3);
        assert!(one > two);
        assert!(two > three);
    }

    #[test]
    fn test_bundle_is_step_function() {
        let config = PricingConfig::default();
        assert_eq!(config.bundle_total(3), config.bundle_total(5));
        assert_eq!(config.bundle_total(0), Money::ZERO);
    }

    #[test]
    fn test_per_meeting_rate() {
        let config = PricingConfig::default();
        let rate = config.per_meeting_rate(Money::from_major(180));
        assert_eq!(rate, Money::from_major(45));
    }
}
