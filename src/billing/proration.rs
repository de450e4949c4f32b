use chrono::NaiveDate;

use crate::billing::schedule::project_meetings;
use crate::billing::PaymentBreakdown;
use crate::calendar::{end_of_month, months_between};
use crate::config::PricingConfig;
use crate::decimal::Money;
use crate::records::Group;
use crate::types::{CalculationMethod, PaymentKind};

/// first-month charge for a partial month with this many meetings
///
/// at or above the threshold the month is charged in full regardless of its
/// true day count; below it the charge is a linear per-meeting rate against a
/// nominal four meetings per month
pub fn first_month_payment(config: &PricingConfig, monthly_price: Money, meetings: u32) -> Money {
    if meetings >= config.full_month_meeting_threshold {
        monthly_price
    } else {
        config.per_meeting_rate(monthly_price) * meetings
    }
}

/// bill `monthly_price` over `start..=end` with first-month proration
///
/// the first partial month is charged by its projected meeting count; every
/// month after it bills at the full monthly price. in until-now mode the
/// first-month meeting window is additionally capped at the current date, so
/// meetings that have not happened yet are never charged proportionally.
pub fn prorate(
    config: &PricingConfig,
    group: &Group,
    monthly_price: Money,
    start: NaiveDate,
    end: NaiveDate,
    kind: PaymentKind,
    current_date: Option<NaiveDate>,
) -> PaymentBreakdown {
    let total_months = months_between(start, end);
    let end_of_first_month = end_of_month(start);

    // whole requested period sits inside one calendar month
    if total_months == 0 {
        let window_end = match (kind, current_date) {
            (PaymentKind::UntilNow, Some(now)) => end.min(now),
            _ => end,
        };
        let projection = project_meetings(group, start, window_end);
        let meetings = projection.billable_count();
        let payment = first_month_payment(config, monthly_price, meetings);
        let full_price = meetings >= config.full_month_meeting_threshold;

        return PaymentBreakdown {
            group_name: group.name.clone(),
            monthly_price,
            total_months: 1,
            first_month_meetings: meetings,
            schedule_known: projection.is_known(),
            first_month_full_price: full_price,
            first_month_payment: payment,
            remaining_months: 0,
            remaining_months_payment: Money::ZERO,
            total_payment: payment,
            start_date: start,
            end_date: end,
            current_date,
            calculation_method: if full_price {
                CalculationMethod::FullPrice
            } else {
                CalculationMethod::Proportional
            },
            payment_type: kind,
        };
    }

    let projection = project_meetings(group, start, end_of_first_month);
    let meetings = projection.billable_count();
    let first_payment = first_month_payment(config, monthly_price, meetings);
    let full_price = meetings >= config.full_month_meeting_threshold;

    // every month after the first bills in full
    let remaining_months = total_months;
    let remaining_payment = monthly_price * remaining_months;

    PaymentBreakdown {
        group_name: group.name.clone(),
        monthly_price,
        total_months: total_months + 1,
        first_month_meetings: meetings,
        schedule_known: projection.is_known(),
        first_month_full_price: full_price,
        first_month_payment: first_payment,
        remaining_months,
        remaining_months_payment: remaining_payment,
        total_payment: first_payment + remaining_payment,
        start_date: start,
        end_date: end,
        current_date,
        calculation_method: if full_price {
            CalculationMethod::FullPrice
        } else {
            CalculationMethod::Proportional
        },
        payment_type: kind,
    }
}
