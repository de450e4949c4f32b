use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::billing::explain::PaymentExplanation;
use crate::billing::pricing::{quote_monthly_price, PriceQuote};
use crate::billing::proration::prorate;
use crate::billing::reconcile::{reconcile, CourseProjection};
use crate::billing::PaymentBreakdown;
use crate::calendar::end_of_month;
use crate::config::PricingConfig;
use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::records::{Group, Student};
use crate::store::StudioStore;
use crate::types::PaymentKind;

/// per-student entry in a batch summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub student_id: String,
    pub student_name: String,
    pub outcome: SummaryOutcome,
}

/// outcome of one student's calculation within a batch
///
/// a failed student degrades to an error entry instead of aborting the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SummaryOutcome {
    Calculated(Box<PaymentExplanation>),
    Failed { error: String },
}

/// the payment engine's query surface
///
/// pure reads over a store: every call re-loads the records it needs, so the
/// result always reflects the files as they are on disk
pub struct PaymentCalculator<S: StudioStore> {
    store: S,
    config: PricingConfig,
}

impl<S: StudioStore> PaymentCalculator<S> {
    /// calculator with the studio's default price card
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: PricingConfig::default(),
        }
    }

    /// calculator with an explicit price card
    pub fn with_config(store: S, config: PricingConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// look up a group by its sequential id
    pub fn group(&self, id: i64) -> Result<Group> {
        self.store.group_by_id(id)
    }

    /// look up a group by its unique name
    pub fn group_by_name(&self, name: &str) -> Result<Group> {
        self.store.group_by_name(name)
    }

    /// monthly price for a student through the discount table
    pub fn monthly_price_for_student(&self, student_id: &str) -> Result<PriceQuote> {
        let student = self.store.student_by_id(student_id)?;
        self.enrolled_groups(&student)?;
        quote_monthly_price(
            &self.config,
            &student.name,
            student.group_names().len(),
            student.has_sister,
        )
    }

    /// payment owed for a group enrollment from `start` through the end of
    /// the current month (legacy path: the group's own stored price)
    pub fn payment_until_now(
        &self,
        group_id: i64,
        start: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentBreakdown> {
        let group = self.store.group_by_id(group_id)?;
        let monthly_price = self.group_price(&group)?;
        Ok(self.prorate_until_now(&group, monthly_price, start, time_provider))
    }

    /// payment owed for a group enrollment over an explicit period
    pub fn payment_for_period(
        &self,
        group_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PaymentBreakdown> {
        let group = self.store.group_by_id(group_id)?;
        let monthly_price = self.group_price(&group)?;
        Ok(prorate(
            &self.config,
            &group,
            monthly_price,
            start,
            end,
            PaymentKind::Period,
            None,
        ))
    }

    /// dispatch between the two end-date modes
    pub fn calculate_payment(
        &self,
        group_id: i64,
        start: NaiveDate,
        end: Option<NaiveDate>,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentBreakdown> {
        match end {
            Some(end) => self.payment_for_period(group_id, start, end),
            None => self.payment_until_now(group_id, start, time_provider),
        }
    }

    /// dispatch with system time
    pub fn calculate_payment_now(
        &self,
        group_id: i64,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<PaymentBreakdown> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.calculate_payment(group_id, start, end, &time)
    }

    /// total-only convenience over [`Self::payment_until_now`]
    pub fn payment_amount_until_now(
        &self,
        group_id: i64,
        start: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<Money> {
        Ok(self
            .payment_until_now(group_id, start, time_provider)?
            .total_payment)
    }

    /// total-only convenience over [`Self::payment_for_period`]
    pub fn payment_amount_for_period(
        &self,
        group_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Money> {
        Ok(self.payment_for_period(group_id, start, end)?.total_payment)
    }

    /// payment owed by a student from their join date through the end of the
    /// current month, priced through the discount table
    pub fn student_payment_until_now(
        &self,
        student_id: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentBreakdown> {
        let student = self.store.student_by_id(student_id)?;
        let groups = self.enrolled_groups(&student)?;
        let quote = self.quote_for(&student)?;
        Ok(self.prorate_until_now(
            &groups[0],
            quote.final_monthly_price,
            student.join_date,
            time_provider,
        ))
    }

    /// payment owed by a student from their join date through `end`
    pub fn student_payment_for_period(
        &self,
        student_id: &str,
        end: NaiveDate,
    ) -> Result<PaymentBreakdown> {
        let student = self.store.student_by_id(student_id)?;
        let groups = self.enrolled_groups(&student)?;
        let quote = self.quote_for(&student)?;
        Ok(prorate(
            &self.config,
            &groups[0],
            quote.final_monthly_price,
            student.join_date,
            end,
            PaymentKind::Period,
            None,
        ))
    }

    /// full payment explanation for a student: breakdown, reconciliation
    /// against recorded payments, optional whole-course projection, narrative
    ///
    /// `from` defaults to the join date; with no `to` the window runs until
    /// the end of the current month
    pub fn explain_student_payments(
        &self,
        student_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentExplanation> {
        let student = self.store.student_by_id(student_id)?;
        self.explain_student(&student, from, to, time_provider)
    }

    /// explanation with system time
    pub fn explain_student_payments_now(
        &self,
        student_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<PaymentExplanation> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.explain_student_payments(student_id, from, to, &time)
    }

    /// until-now explanation for every student on file
    ///
    /// one malformed record degrades to a `Failed` entry with a warning; it
    /// never aborts the rest of the batch
    pub fn summarize_all_students(
        &self,
        time_provider: &SafeTimeProvider,
    ) -> Result<Vec<StudentSummary>> {
        let students = self.store.load_students()?;
        let mut summaries = Vec::with_capacity(students.len());

        for student in students {
            let outcome = match self.explain_student(&student, None, None, time_provider) {
                Ok(explanation) => SummaryOutcome::Calculated(Box::new(explanation)),
                Err(e) => {
                    warn!(student = %student.name, error = %e, "skipping student in batch summary");
                    SummaryOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            summaries.push(StudentSummary {
                student_id: student.id,
                student_name: student.name,
                outcome,
            });
        }

        Ok(summaries)
    }

    fn explain_student(
        &self,
        student: &Student,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentExplanation> {
        let groups = self.enrolled_groups(student)?;
        let quote = self.quote_for(student)?;
        let primary = &groups[0];
        let start = from.unwrap_or(student.join_date);

        let breakdown = match to {
            Some(end) => prorate(
                &self.config,
                primary,
                quote.final_monthly_price,
                start,
                end,
                PaymentKind::Period,
                None,
            ),
            None => self.prorate_until_now(primary, quote.final_monthly_price, start, time_provider),
        };

        let reconciliation = reconcile(breakdown.total_payment, &student.payments);

        // whole-course projection when any enrolled group knows its end date
        let course_end = groups.iter().filter_map(|g| g.group_end_date).max();
        let course_projection = course_end.map(|end| {
            let through_end = prorate(
                &self.config,
                primary,
                quote.final_monthly_price,
                start,
                end.max(start),
                PaymentKind::Period,
                None,
            );
            CourseProjection::new(end, through_end.total_payment, reconciliation.paid.total)
        });

        Ok(PaymentExplanation::assemble(
            student.id.clone(),
            student.name.clone(),
            quote,
            breakdown,
            reconciliation,
            course_projection,
        ))
    }

    fn prorate_until_now(
        &self,
        group: &Group,
        monthly_price: Money,
        start: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> PaymentBreakdown {
        let now = time_provider.now().date_naive();
        let end = end_of_month(now);
        if start > now {
            return PaymentBreakdown::not_started(
                group.name.clone(),
                monthly_price,
                start,
                end,
                now,
            );
        }
        prorate(
            &self.config,
            group,
            monthly_price,
            start,
            end,
            PaymentKind::UntilNow,
            Some(now),
        )
    }

    fn group_price(&self, group: &Group) -> Result<Money> {
        if group.price.is_zero() {
            return Err(BillingError::MissingPrice {
                group: group.name.clone(),
            });
        }
        Ok(group.price)
    }

    fn quote_for(&self, student: &Student) -> Result<PriceQuote> {
        quote_monthly_price(
            &self.config,
            &student.name,
            student.group_names().len(),
            student.has_sister,
        )
    }

    /// resolve a student's enrolled group names against the groups file
    ///
    /// an empty enrollment or a dangling group reference is an error here,
    /// before any arithmetic can run on garbage
    fn enrolled_groups(&self, student: &Student) -> Result<Vec<Group>> {
        let names = student.group_names();
        if names.is_empty() {
            return Err(BillingError::NotEnrolled {
                student: student.name.clone(),
            });
        }
        let all = self.store.load_groups()?;
        names
            .into_iter()
            .map(|name| {
                all.iter()
                    .find(|g| g.name == name)
                    .cloned()
                    .ok_or_else(|| BillingError::GroupNameNotFound {
                        name: name.to_string(),
                    })
            })
            .collect()
    }
}
