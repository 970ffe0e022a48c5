//! Time utilities: the parse/format boundary between strings and instants.
//!
//! The scheduler only ever sees `DateTime<Tz>` and minute counts. Anything
//! that starts life as text ("9:00 AM", "2026-02-20 09:00") is converted here.

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

/// Formats accepted for a time of day, tried in order.
const TIME_OF_DAY_FORMATS: [&str; 3] = ["%I:%M %p", "%I:%M%p", "%H:%M"];
const CLOCK_FORMAT: &str = "%-I:%M %p";

/// Parse a time of day like "9:00 AM", "9:00pm" or "21:30".
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let trimmed = s.trim().to_uppercase();
    for fmt in TIME_OF_DAY_FORMATS {
        if let Ok(t) = NaiveTime::parse_from_str(&trimmed, fmt) {
            return Ok(t);
        }
    }
    anyhow::bail!("invalid time of day: '{s}'")
}

/// Anchor a time of day on the local calendar day of `reference`.
///
/// Returns `None` when that wall-clock time does not exist on that day
/// (spring-forward gap). Ambiguous times resolve to the earlier instant.
pub fn on_same_day(reference: DateTime<Tz>, time: NaiveTime) -> Option<DateTime<Tz>> {
    let local = reference.date_naive().and_time(time);
    reference.timezone().from_local_datetime(&local).earliest()
}

/// Parse a local start like "2026-02-20 09:00" in an IANA tz like "America/Chicago".
pub fn parse_local_start(local: &str, tz: Tz) -> Result<DateTime<Tz>> {
    let ndt = NaiveDateTime::parse_from_str(local.trim(), "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))?;

    tz.from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow::anyhow!("ambiguous or invalid local time (DST?): {local} {tz}"))
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {name}"))
}

/// Render a clock time the way the UI shows it: "9:00 AM".
pub fn format_clock(dt: DateTime<Tz>) -> String {
    dt.format(CLOCK_FORMAT).to_string()
}

/// Same rendering as [`format_clock`] for a bare wall-clock time.
pub fn format_time_of_day(t: NaiveTime) -> String {
    t.format(CLOCK_FORMAT).to_string()
}

/// Serde adapter for `DateTime<Tz>`.
///
/// Written as RFC 3339 with the zone name appended in brackets, e.g.
/// `2026-02-20T09:00:00-06:00[America/Chicago]`, so a round trip keeps
/// the zone and not just the offset.
pub mod zoned_serde {
    use chrono::{DateTime, SecondsFormat};
    use chrono_tz::Tz;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Tz>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!(
            "{}[{}]",
            dt.to_rfc3339_opts(SecondsFormat::Secs, false),
            dt.timezone().name()
        ))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Tz>, D::Error> {
        let raw = String::deserialize(d)?;
        let (stamp, zone) = match raw.split_once('[') {
            Some((stamp, rest)) => (stamp, rest.trim_end_matches(']')),
            None => (raw.as_str(), "UTC"),
        };
        let tz: Tz = zone
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid timezone: {zone}")))?;
        let fixed = DateTime::parse_from_rfc3339(stamp).map_err(de::Error::custom)?;
        Ok(fixed.with_timezone(&tz))
    }
}
