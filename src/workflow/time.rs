//! Local appointment time to canonical UTC instant

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

/// Accepted shapes of a local date-time, as produced by a
/// `datetime-local` style input
const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S%.f"];

/// Zone used to interpret the wall-clock time the user typed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalZone {
    /// The machine's local time zone, DST included
    #[default]
    System,
    /// A named IANA zone, DST included
    Named(Tz),
    Fixed(FixedOffset),
}

impl LocalZone {
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::Fixed)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        name.trim().parse::<Tz>().ok().map(Self::Named)
    }

    /// Resolve a wall-clock time. Times skipped by a DST jump do not exist;
    /// times repeated by a DST fold resolve to the earlier instant.
    pub fn to_utc(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::System => earliest(&Local, naive),
            Self::Named(tz) => earliest(tz, naive),
            Self::Fixed(offset) => earliest(offset, naive),
        }
    }
}

fn earliest<Z: TimeZone>(zone: &Z, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
    zone.from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Why a local time could not be converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeError {
    /// Not a date-time in any accepted shape
    Unparseable,
    /// Falls in a gap of the local zone
    Nonexistent,
}

pub fn parse_local(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Convert the entered local time into an ISO-8601 UTC string with
/// millisecond precision, e.g. `2024-05-01T03:30:00.000Z`
pub fn canonical_instant(value: &str, zone: &LocalZone) -> Result<String, TimeError> {
    let naive = parse_local(value).ok_or(TimeError::Unparseable)?;
    let instant = zone.to_utc(&naive).ok_or(TimeError::Nonexistent)?;
    Ok(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}
