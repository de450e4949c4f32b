use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

/// weekly course day, stored in the groups file by its Hebrew name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseDay {
    #[serde(rename = "ראשון")]
    Sunday,
    #[serde(rename = "שני")]
    Monday,
    #[serde(rename = "שלישי")]
    Tuesday,
    #[serde(rename = "רביעי")]
    Wednesday,
    #[serde(rename = "חמישי")]
    Thursday,
    #[serde(rename = "שישי")]
    Friday,
    #[serde(rename = "שבת")]
    Saturday,
}

impl CourseDay {
    pub const ALL: [CourseDay; 7] = [
        CourseDay::Sunday,
        CourseDay::Monday,
        CourseDay::Tuesday,
        CourseDay::Wednesday,
        CourseDay::Thursday,
        CourseDay::Friday,
        CourseDay::Saturday,
    ];

    /// resolve a stored day name, `None` for unrecognized values
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "ראשון" => Some(CourseDay::Sunday),
            "שני" => Some(CourseDay::Monday),
            "שלישי" => Some(CourseDay::Tuesday),
            "רביעי" => Some(CourseDay::Wednesday),
            "חמישי" => Some(CourseDay::Thursday),
            "שישי" => Some(CourseDay::Friday),
            "שבת" => Some(CourseDay::Saturday),
            _ => None,
        }
    }

    /// stored Hebrew name
    pub fn name(&self) -> &'static str {
        match self {
            CourseDay::Sunday => "ראשון",
            CourseDay::Monday => "שני",
            CourseDay::Tuesday => "שלישי",
            CourseDay::Wednesday => "רביעי",
            CourseDay::Thursday => "חמישי",
            CourseDay::Friday => "שישי",
            CourseDay::Saturday => "שבת",
        }
    }

    /// calendar weekday this course day falls on
    pub fn weekday(&self) -> Weekday {
        match self {
            CourseDay::Sunday => Weekday::Sun,
            CourseDay::Monday => Weekday::Mon,
            CourseDay::Tuesday => Weekday::Tue,
            CourseDay::Wednesday => Weekday::Wed,
            CourseDay::Thursday => Weekday::Thu,
            CourseDay::Friday => Weekday::Fri,
            CourseDay::Saturday => Weekday::Sat,
        }
    }
}

impl fmt::Display for CourseDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// how a balance compares against the required total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStatus {
    /// required exceeds paid
    Owed,
    /// paid matches required exactly
    Settled,
    /// paid exceeds required
    Credit,
}

/// which rule produced the first-month charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationMethod {
    /// 3+ meetings in the partial month, charged as a complete month
    FullPrice,
    /// fewer than 3 meetings, charged price/4 per meeting
    Proportional,
    /// join date is in the future, nothing owed yet
    NotStarted,
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationMethod::FullPrice => write!(f, "Full price"),
            CalculationMethod::Proportional => write!(f, "Proportional (price/4 * meetings)"),
            CalculationMethod::NotStarted => write!(f, "Course hasn't started yet"),
        }
    }
}

/// end-date resolution mode for a payment calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentKind {
    /// billed through the end of the current calendar month
    UntilNow,
    /// billed through an explicit end date
    Period,
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentKind::UntilNow => write!(f, "Until current month end"),
            PaymentKind::Period => write!(f, "Full period payment"),
        }
    }
}
