//! Date and time-of-day handling for meeting records.
//!
//! Instants are persisted as ISO-8601 strings with millisecond precision and a
//! `Z` suffix, which is the shape every stored collection already uses. On read
//! any RFC 3339 string is accepted, as is a bare `yyyy-MM-dd` calendar date.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, SubsecRound, TimeZone, Utc};

/// Format used for calendar dates in drafts and export file names.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used for times of day (`HH:mm`).
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M";

/// Serialize an instant the way stored collections expect it.
#[must_use]
pub fn to_iso(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Drop everything below the millisecond, so an instant equals its stored form.
#[must_use]
pub fn to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(3)
}

/// Parse a stored instant.
///
/// Accepts RFC 3339 timestamps with any offset and plain `yyyy-MM-dd` dates,
/// which are taken as midnight UTC.
#[must_use]
pub fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    parse_calendar_date(value).map(midnight_utc)
}

/// Parse a `yyyy-MM-dd` calendar date.
#[must_use]
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).ok()
}

/// Parse an `HH:mm` time of day.
#[must_use]
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_OF_DAY_FORMAT).ok()
}

/// The instant at midnight UTC on the given date.
#[must_use]
pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// `dd/MM/yyyy`
#[must_use]
pub fn format_date(instant: &DateTime<Utc>) -> String {
    instant.format("%d/%m/%Y").to_string()
}

/// `dd/MM/yyyy HH:mm`
#[must_use]
pub fn format_date_time(instant: &DateTime<Utc>) -> String {
    instant.format("%d/%m/%Y %H:%M").to_string()
}

/// `yyyy-MM-dd`
#[must_use]
pub fn format_iso_date(instant: &DateTime<Utc>) -> String {
    instant.format(ISO_DATE_FORMAT).to_string()
}

/// Serde adapter for instants stored as ISO-8601 strings.
pub mod iso_instant {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serialize an instant as an ISO-8601 string.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if writing the string fails.
    pub fn serialize<S: Serializer>(
        instant: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_iso(instant))
    }

    /// Deserialize an instant from an ISO-8601 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a string or cannot be parsed.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 instant: {raw}")))
    }
}
