pub mod explain;
pub mod pricing;
pub mod proration;
pub mod reconcile;
pub mod schedule;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::records::{opt_wire_date, wire_date};
use crate::types::{CalculationMethod, PaymentKind};

pub use explain::{narrative, PaymentExplanation};
pub use pricing::{quote_monthly_price, PriceQuote};
pub use proration::{first_month_payment, prorate};
pub use reconcile::{reconcile, total_paid, CourseProjection, PaidTotal, Reconciliation};
pub use schedule::{project_meetings, MeetingProjection};

/// full breakdown of a payment calculation over a billing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub group_name: String,
    pub monthly_price: Money,
    /// billed months for display, first partial month included
    pub total_months: u32,
    pub first_month_meetings: u32,
    /// false when the group's weekday could not be resolved and the
    /// meeting count soft-failed to zero
    pub schedule_known: bool,
    pub first_month_full_price: bool,
    pub first_month_payment: Money,
    pub remaining_months: u32,
    pub remaining_months_payment: Money,
    pub total_payment: Money,
    #[serde(with = "wire_date")]
    pub start_date: NaiveDate,
    #[serde(with = "wire_date")]
    pub end_date: NaiveDate,
    /// present in until-now mode only
    #[serde(default, with = "opt_wire_date", skip_serializing_if = "Option::is_none")]
    pub current_date: Option<NaiveDate>,
    pub calculation_method: CalculationMethod,
    pub payment_type: PaymentKind,
}

impl PaymentBreakdown {
    /// all-zero breakdown for a join date still in the future
    pub fn not_started(
        group_name: String,
        monthly_price: Money,
        start_date: NaiveDate,
        end_date: NaiveDate,
        current_date: NaiveDate,
    ) -> Self {
        Self {
            group_name,
            monthly_price,
            total_months: 0,
            first_month_meetings: 0,
            schedule_known: true,
            first_month_full_price: false,
            first_month_payment: Money::ZERO,
            remaining_months: 0,
            remaining_months_payment: Money::ZERO,
            total_payment: Money::ZERO,
            start_date,
            end_date,
            current_date: Some(current_date),
            calculation_method: CalculationMethod::NotStarted,
            payment_type: PaymentKind::UntilNow,
        }
    }
}
