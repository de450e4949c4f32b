pub mod billing;
pub mod calculator;
pub mod calendar;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod records;
pub mod store;
pub mod types;

// re-export key types
pub use billing::{
    MeetingProjection, PaidTotal, PaymentBreakdown, PaymentExplanation, PriceQuote,
    Reconciliation,
};
pub use billing::reconcile::CourseProjection;
pub use calculator::{PaymentCalculator, StudentSummary, SummaryOutcome};
pub use config::PricingConfig;
pub use decimal::Money;
pub use errors::{BillingError, Result};
pub use records::{Group, Payment, Student};
pub use store::{JsonFileStore, MemoryStore, StudioStore};
pub use types::{BalanceStatus, CalculationMethod, CourseDay, PaymentKind};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
