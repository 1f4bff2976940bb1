//! Calendar-day helpers for the daily bonus.
//!
//! Dates are compared at day granularity in the player's local time zone.
//! The stored form matches `Date.prototype.toDateString()` so records
//! written by the browser build stay readable.

use chrono::{Local, NaiveDate};

/// `toDateString()` layout, e.g. `"Mon Oct 19 2026"`.
pub const DATE_FORMAT: &str = "%a %b %d %Y";

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The calendar day before `date`.
pub fn yesterday_of(date: NaiveDate) -> Option<NaiveDate> {
    date.pred_opt()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a stored date. Also accepts ISO `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

/// Serde adapter: `Option<NaiveDate>` <-> `""` / `"Mon Oct 19 2026"`.
pub mod date_string {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&super::format_date(*d)),
            None => serializer.serialize_str(""),
        }
    }

    /// `null` and unparseable strings read as "never claimed".
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        let parsed = super::parse_date(&raw);
        if parsed.is_none() && !raw.trim().is_empty() {
            log::warn!("Hamster Tap: unreadable lastDailyBonus {raw:?}, treating as never claimed");
        }
        Ok(parsed)
    }
}
