use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

/// Reporting period carried by every summary.
///
/// Both ends keep the offset they were supplied with; nothing in this crate
/// converts between timezones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_date_order"))]
pub struct DateRange {
    #[serde(deserialize_with = "flexible_datetime::deserialize")]
    pub start_date: DateTime<FixedOffset>,
    #[serde(deserialize_with = "flexible_datetime::deserialize")]
    pub end_date: DateTime<FixedOffset>,
}

impl DateRange {
    pub fn new(start_date: DateTime<FixedOffset>, end_date: DateTime<FixedOffset>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }
}

fn validate_date_order(range: &DateRange) -> Result<(), ValidationError> {
    if range.start_date > range.end_date {
        let mut err = ValidationError::new("date_range");
        err.message = Some("startDate must not be after endDate".into());
        return Err(err);
    }
    Ok(())
}

/// Parses RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` timestamps and
/// plain `YYYY-MM-DD` dates. Values without an offset are read as `+00:00`.
pub fn parse_flexible_datetime(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }

    let utc = FixedOffset::east_opt(0)?;
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return utc.from_local_datetime(&naive).single();
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|naive| utc.from_local_datetime(&naive).single())
}

pub(crate) mod flexible_datetime {
    use super::*;
    use serde::de::Error;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_flexible_datetime(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid date or timestamp: {}", raw)))
    }

    pub fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_flexible_datetime(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date or timestamp: {}", raw))),
        }
    }
}
