use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::decimal::Money;
use crate::records::{opt_wire_date, Payment};
use crate::types::BalanceStatus;

/// sum of a student's recorded payments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaidTotal {
    pub total: Money,
    /// payments whose amount parsed as a non-negative number
    pub counted: usize,
    /// entries skipped because the amount text did not parse
    pub skipped: usize,
}

/// sum recorded payments, skipping non-numeric amounts
///
/// a skipped entry is logged and counted, never fatal
pub fn total_paid(payments: &[Payment]) -> PaidTotal {
    let mut total = Money::ZERO;
    let mut counted = 0;
    let mut skipped = 0;

    for payment in payments {
        match payment.parsed_amount() {
            Some(amount) => {
                total += amount;
                counted += 1;
            }
            None => {
                warn!(amount = %payment.amount, date = %payment.date, "skipping unparseable payment amount");
                skipped += 1;
            }
        }
    }

    PaidTotal {
        total,
        counted,
        skipped,
    }
}

/// balance of required against paid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub total_required: Money,
    pub paid: PaidTotal,
    /// required minus paid; positive is owed, negative is credit
    pub balance: Money,
    pub status: BalanceStatus,
}

/// reconcile a required total against recorded payments
pub fn reconcile(total_required: Money, payments: &[Payment]) -> Reconciliation {
    let paid = total_paid(payments);
    let balance = total_required - paid.total;
    let status = if balance.is_positive() {
        BalanceStatus::Owed
    } else if balance.is_negative() {
        BalanceStatus::Credit
    } else {
        BalanceStatus::Settled
    };

    Reconciliation {
        total_required,
        paid,
        balance,
        status,
    }
}

/// projection of what remains due through a known course end date
///
/// reported alongside the until-now balance so a settled or in-credit student
/// still sees what the rest of the course will cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourseProjection {
    #[serde(default, with = "opt_wire_date")]
    pub course_end: Option<NaiveDate>,
    /// required total from enrollment through course end
    pub required_through_end: Money,
    /// still unpaid through course end, floored at zero
    pub remaining_due: Money,
}

impl CourseProjection {
    pub fn new(course_end: NaiveDate, required_through_end: Money, paid: Money) -> Self {
        Self {
            course_end: Some(course_end),
            required_through_end,
            remaining_due: required_through_end.saturating_sub(paid),
        }
    }

    /// does existing payment cover everything through course end
    pub fn fully_covered(&self) -> bool {
        self.remaining_due.is_zero()
    }
}
