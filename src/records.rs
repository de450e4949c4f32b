use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{BillingError, Result};

pub const WIRE_DATE_FORMAT: &str = "%d/%m/%Y";

/// parse a "dd/mm/yyyy" wire date
pub fn parse_wire_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), WIRE_DATE_FORMAT).map_err(|e| {
        BillingError::InvalidDate {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

/// format a date back to its "dd/mm/yyyy" wire form
pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

/// a weekly class offering with a fixed price and weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    /// monthly price stored on the group record (legacy single-group pricing)
    #[serde(default, with = "wire_money")]
    pub price: Money,
    /// stored day name, resolved lazily so one bad record stays a soft-fail
    #[serde(default)]
    pub day_of_week: Option<String>,
    #[serde(default)]
    pub teacher: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default, with = "opt_wire_date")]
    pub group_start_date: Option<NaiveDate>,
    #[serde(default, with = "opt_wire_date")]
    pub group_end_date: Option<NaiveDate>,
    /// roster names maintained by the enrollment screens
    #[serde(default)]
    pub students: Vec<String>,
}

/// an enrolled student with their recorded payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    /// legacy single-group field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// newer multi-group field; wins over `group` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    #[serde(default)]
    pub has_sister: bool,
    #[serde(with = "wire_date")]
    pub join_date: NaiveDate,
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// display status maintained by the enrollment screens, carried opaquely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
}

impl Student {
    /// enrolled group names, normalized across both wire fields
    pub fn group_names(&self) -> Vec<&str> {
        match &self.groups {
            Some(names) if !names.is_empty() => names.iter().map(String::as_str).collect(),
            _ => self.group.iter().map(String::as_str).collect(),
        }
    }
}

/// a recorded tuition payment, append-only from the engine's perspective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// raw wire text; not every historic entry parses as a number
    pub amount: String,
    pub date: String,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_number: Option<String>,
}

impl Payment {
    /// amount as money, `None` for non-numeric or negative entries
    pub fn parsed_amount(&self) -> Option<Money> {
        let amount = Money::from_str_exact(&self.amount).ok()?;
        if amount.is_negative() {
            return None;
        }
        Some(amount)
    }
}

/// serde adapter for "dd/mm/yyyy" dates
pub(crate) mod wire_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::WIRE_DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(WIRE_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), WIRE_DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// serde adapter for optional "dd/mm/yyyy" dates
pub(crate) mod opt_wire_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::WIRE_DATE_FORMAT;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format(WIRE_DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(s.trim(), WIRE_DATE_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

/// serde adapter for prices stored as either text or a bare number
pub(crate) mod wire_money {
    use rust_decimal::Decimal;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use crate::decimal::Money;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&money.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Money::from_str_exact(&s).map_err(serde::de::Error::custom),
            Raw::Number(n) => Decimal::try_from(n)
                .map(Money::from_decimal)
                .map_err(serde::de::Error::custom),
        }
    }
}
