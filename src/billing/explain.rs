use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::billing::pricing::PriceQuote;
use crate::billing::reconcile::{CourseProjection, Reconciliation};
use crate::billing::PaymentBreakdown;
use crate::records::format_wire_date;
use crate::types::{BalanceStatus, CalculationMethod};

/// fallback shown when narrative assembly fails; the numeric result is
/// returned regardless
const NARRATIVE_FALLBACK: &str = "לא ניתן להפיק סיכום תשלומים";

/// full payment explanation for one student: the numbers plus a narrative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentExplanation {
    pub student_id: String,
    pub student_name: String,
    pub quote: PriceQuote,
    pub breakdown: PaymentBreakdown,
    pub reconciliation: Reconciliation,
    /// present when any enrolled group carries a course end date
    pub course_projection: Option<CourseProjection>,
    pub narrative: String,
}

impl PaymentExplanation {
    pub fn assemble(
        student_id: String,
        student_name: String,
        quote: PriceQuote,
        breakdown: PaymentBreakdown,
        reconciliation: Reconciliation,
        course_projection: Option<CourseProjection>,
    ) -> Self {
        let narrative = narrative(
            &student_name,
            &quote,
            &breakdown,
            &reconciliation,
            course_projection.as_ref(),
        );
        Self {
            student_id,
            student_name,
            quote,
            breakdown,
            reconciliation,
            course_projection,
            narrative,
        }
    }
}

/// multi-line human-readable summary of a payment explanation
///
/// assembly never propagates a failure; a formatting problem degrades to a
/// fallback string so the numeric result always comes through
pub fn narrative(
    student_name: &str,
    quote: &PriceQuote,
    breakdown: &PaymentBreakdown,
    reconciliation: &Reconciliation,
    course_projection: Option<&CourseProjection>,
) -> String {
    match render(student_name, quote, breakdown, reconciliation, course_projection) {
        Ok(text) => text,
        Err(e) => {
            warn!(student = %student_name, error = %e, "narrative assembly failed");
            NARRATIVE_FALLBACK.to_string()
        }
    }
}

fn render(
    student_name: &str,
    quote: &PriceQuote,
    breakdown: &PaymentBreakdown,
    reconciliation: &Reconciliation,
    course_projection: Option<&CourseProjection>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "סיכום תשלומים - {} ({})", student_name, breakdown.group_name)?;

    // price derivation line items
    if quote.group_count == 1 && quote.sibling_deduction.is_zero() {
        writeln!(out, "מחיר חודשי: {}₪ (קבוצה אחת)", quote.final_monthly_price)?;
    } else {
        writeln!(
            out,
            "מחיר בסיס: {} קבוצות - {}₪",
            quote.group_count, quote.undiscounted
        )?;
        if quote.bundle_saving.is_positive() {
            writeln!(
                out,
                "מחיר מסלול: {}₪ (חיסכון {}₪)",
                quote.bundle_total, quote.bundle_saving
            )?;
        }
        if quote.sibling_deduction.is_positive() {
            writeln!(out, "הנחת אחות בחוג: -{}₪", quote.sibling_deduction)?;
        }
        writeln!(out, "מחיר חודשי סופי: {}₪", quote.final_monthly_price)?;
    }

    writeln!(
        out,
        "תקופה: {} - {}",
        format_wire_date(breakdown.start_date),
        format_wire_date(breakdown.end_date)
    )?;

    match breakdown.calculation_method {
        CalculationMethod::NotStarted => {
            writeln!(out, "המסלול טרם החל - אין חיוב")?;
        }
        CalculationMethod::FullPrice => {
            writeln!(
                out,
                "חודש ראשון: {} מפגשים - חיוב חודש מלא {}₪",
                breakdown.first_month_meetings, breakdown.first_month_payment
            )?;
        }
        CalculationMethod::Proportional => {
            writeln!(
                out,
                "חודש ראשון: {} מפגשים - חיוב יחסי {}₪",
                breakdown.first_month_meetings, breakdown.first_month_payment
            )?;
        }
    }

    if !breakdown.schedule_known {
        writeln!(out, "הערה: יום החוג לא זוהה, המפגשים לא נספרו")?;
    }

    if breakdown.remaining_months > 0 {
        writeln!(
            out,
            "חודשים נוספים: {} × {}₪ = {}₪",
            breakdown.remaining_months, breakdown.monthly_price, breakdown.remaining_months_payment
        )?;
    }

    writeln!(out, "סה\"כ לתשלום: {}₪", breakdown.total_payment)?;
    if reconciliation.paid.skipped > 0 {
        writeln!(
            out,
            "שולם: {}₪ ({} תשלומים, {} רשומות לא נקלטו)",
            reconciliation.paid.total, reconciliation.paid.counted, reconciliation.paid.skipped
        )?;
    } else {
        writeln!(
            out,
            "שולם: {}₪ ({} תשלומים)",
            reconciliation.paid.total, reconciliation.paid.counted
        )?;
    }

    match reconciliation.status {
        BalanceStatus::Owed => writeln!(out, "יתרה לתשלום: {}₪", reconciliation.balance)?,
        BalanceStatus::Settled => writeln!(out, "שולם במלואו")?,
        BalanceStatus::Credit => {
            writeln!(out, "יתרת זכות: {}₪", reconciliation.balance.abs())?
        }
    }

    if let Some(projection) = course_projection {
        let end = projection
            .course_end
            .map(format_wire_date)
            .unwrap_or_else(|| "לא ידוע".to_string());
        if projection.fully_covered() {
            writeln!(out, "עד סוף הקורס ({}): היתרה מכסה את כל התשלומים", end)?;
        } else {
            writeln!(
                out,
                "עד סוף הקורס ({}): נותרו {}₪ לתשלום",
                end, projection.remaining_due
            )?;
        }
    }

    Ok(out)
}
