use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc,
};
use thiserror::Error;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("date cannot be empty")]
    Empty,
    #[error("invalid date")]
    InvalidDate,
    #[error("invalid date format: expected RFC 3339, YYYY-MM-DD or YYYY-MM-DD HH:MM")]
    InvalidDateTime,
    #[error("invalid utc offset: expected +HH:MM or -HH:MM")]
    InvalidOffset,
    #[error("ambiguous local time: {0}")]
    AmbiguousLocalTime(String),
}

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

pub fn parse_offset(input: &str) -> Result<FixedOffset, TimeParseError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or(TimeParseError::InvalidOffset);
    }
    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(TimeParseError::InvalidOffset),
    };
    let (hours, minutes) = rest.split_once(':').ok_or(TimeParseError::InvalidOffset)?;
    let hours: i32 = hours.parse().map_err(|_| TimeParseError::InvalidOffset)?;
    let minutes: i32 = minutes.parse().map_err(|_| TimeParseError::InvalidOffset)?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return Err(TimeParseError::InvalidOffset);
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or(TimeParseError::InvalidOffset)
}

/// Parses an activity date. Inputs without an explicit offset are read in
/// `offset`; a bare date means midnight on that day.
pub fn parse_activity_date(input: &str, offset: FixedOffset) -> Result<i64, TimeParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimeParseError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc).timestamp());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or(TimeParseError::InvalidDate)?;
        return offset_to_utc_timestamp(naive, offset);
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return offset_to_utc_timestamp(dt, offset);
        }
    }

    Err(TimeParseError::InvalidDateTime)
}

pub fn format_rfc3339(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Calendar date of `ts` as seen from `offset`.
pub fn local_date(ts: i64, offset: FixedOffset) -> NaiveDate {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .with_timezone(&offset)
        .date_naive()
}

fn offset_to_utc_timestamp(
    naive: NaiveDateTime,
    offset: FixedOffset,
) -> Result<i64, TimeParseError> {
    let local = offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| TimeParseError::AmbiguousLocalTime(naive.to_string()))?;
    Ok(local.with_timezone(&Utc).timestamp())
}
