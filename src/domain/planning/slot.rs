//! Half-day slots and wall-clock timestamps.
//!
//! # Zone bridging
//!
//! Interventions are stored with their *local* wall-clock digits tagged as
//! UTC: "9am local" is persisted as `...T09:00:00.000Z` whatever the real
//! offset is. The external workflow integration is time-zone unaware and reads
//! the hour digits directly, so the store, that integration and the planning
//! views all agree on `9` meaning morning start. [`WallClock`] is therefore a
//! naive date-time; it is never converted between zones.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::foundation::ValidationError;

const SERIALIZED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Morning or afternoon half of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Period {
    Am,
    Pm,
}

impl Period {
    /// Wall-clock hour at which the period starts.
    pub fn start_hour(&self) -> u32 {
        match self {
            Period::Am => 9,
            Period::Pm => 14,
        }
    }

    /// Wall-clock hour at which the period ends.
    pub fn end_hour(&self) -> u32 {
        match self {
            Period::Am => 12,
            Period::Pm => 17,
        }
    }

    /// Label shown on agenda entries.
    pub fn label(&self) -> &'static str {
        match self {
            Period::Am => "Matin",
            Period::Pm => "Après-midi",
        }
    }

    /// Human readable window, e.g. `9h - 12h`.
    pub fn time_range_label(&self) -> &'static str {
        match self {
            Period::Am => "9h - 12h",
            Period::Pm => "14h - 17h",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Am => write!(f, "AM"),
            Period::Pm => write!(f, "PM"),
        }
    }
}

/// A local wall-clock date-time, serialized with the zone-bridging convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WallClock(NaiveDateTime);

impl WallClock {
    pub fn new(value: NaiveDateTime) -> Self {
        Self(value)
    }

    /// Builds a wall-clock value on `date` at a whole hour.
    ///
    /// Hours past 23 saturate to midnight of the same day rather than panic.
    pub fn at_hour(date: NaiveDate, hour: u32) -> Self {
        let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
        Self(date.and_time(time))
    }

    pub fn as_naive(&self) -> &NaiveDateTime {
        &self.0
    }

    /// Local calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// Local hour of day.
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Signed length of `self - earlier` in fractional hours.
    pub fn hours_since(&self, earlier: &WallClock) -> f64 {
        (self.0 - earlier.0).num_seconds() as f64 / 3600.0
    }
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serialize_slot_timestamp(self))
    }
}

impl Serialize for WallClock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&serialize_slot_timestamp(self))
    }
}

impl<'de> Deserialize<'de> for WallClock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_slot_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

/// A calendar date paired with a half-day period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub period: Period,
}

impl Slot {
    pub fn new(date: NaiveDate, period: Period) -> Self {
        Self { date, period }
    }

    /// The slot a timestamp falls in.
    pub fn of(timestamp: &WallClock) -> Self {
        Self {
            date: timestamp.date(),
            period: period_of(timestamp),
        }
    }

    /// Start and end of this slot.
    pub fn window(&self) -> (WallClock, WallClock) {
        slot_window(self.date, self.period)
    }

    /// Whether dropping something starting at `start` onto this slot changes nothing.
    ///
    /// Compares local date and local hour, never raw instants, so that values
    /// round-tripped through the store compare equal.
    pub fn same_slot_as(&self, start: &WallClock) -> bool {
        start.date() == self.date && start.hour() == self.period.start_hour()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.period)
    }
}

/// Start and end wall-clock values of a half-day slot.
pub fn slot_window(date: NaiveDate, period: Period) -> (WallClock, WallClock) {
    (
        WallClock::at_hour(date, period.start_hour()),
        WallClock::at_hour(date, period.end_hour()),
    )
}

/// Classifies a timestamp as morning (hour < 12) or afternoon.
pub fn period_of(timestamp: &WallClock) -> Period {
    if timestamp.hour() < 12 {
        Period::Am
    } else {
        Period::Pm
    }
}

/// Renders the local digits verbatim with a `Z` suffix.
pub fn serialize_slot_timestamp(timestamp: &WallClock) -> String {
    timestamp.0.format(SERIALIZED_FORMAT).to_string()
}

/// Inverse of [`serialize_slot_timestamp`].
///
/// Accepts `Z`, an explicit offset, or no zone at all. With an explicit offset
/// the digits are kept as written and the offset is discarded.
pub fn parse_slot_timestamp(raw: &str) -> Result<WallClock, ValidationError> {
    let raw = raw.trim();
    if let Ok(with_zone) = DateTime::parse_from_rfc3339(raw) {
        return Ok(WallClock(with_zone.naive_local()));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(WallClock)
        .ok_or_else(|| {
            ValidationError::invalid_format("timestamp", format!("unrecognised value '{}'", raw))
        })
}

/// Year/month/day/hour/minute/second tuple, used to compare wall-clock fields.
#[cfg(test)]
fn fields(timestamp: &WallClock) -> (i32, u32, u32, u32, u32, u32) {
    let dt = timestamp.as_naive();
    (
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn morning_window_is_nine_to_noon() {
        let (start, end) = slot_window(date(2024, 3, 4), Period::Am);
        assert_eq!(serialize_slot_timestamp(&start), "2024-03-04T09:00:00.000Z");
        assert_eq!(serialize_slot_timestamp(&end), "2024-03-04T12:00:00.000Z");
    }

    #[test]
    fn afternoon_window_is_two_to_five() {
        let (start, end) = slot_window(date(2024, 3, 4), Period::Pm);
        assert_eq!(start.hour(), 14);
        assert_eq!(end.hour(), 17);
        assert_eq!(end.hours_since(&start), 3.0);
    }

    #[test]
    fn period_boundary_is_noon() {
        let d = date(2024, 3, 4);
        assert_eq!(period_of(&WallClock::at_hour(d, 11)), Period::Am);
        assert_eq!(period_of(&WallClock::at_hour(d, 12)), Period::Pm);
        assert_eq!(period_of(&WallClock::at_hour(d, 0)), Period::Am);
    }

    #[test]
    fn offset_digits_are_kept_verbatim() {
        let parsed = parse_slot_timestamp("2024-03-04T09:00:00+02:00").unwrap();
        assert_eq!(parsed.hour(), 9);
        assert_eq!(parsed.date(), date(2024, 3, 4));
    }

    #[test]
    fn store_formats_are_accepted() {
        for raw in [
            "2024-03-04T14:00:00.000Z",
            "2024-03-04T14:00:00+00:00",
            "2024-03-04T14:00:00",
            "2024-03-04 14:00:00",
        ] {
            let parsed = parse_slot_timestamp(raw).unwrap();
            assert_eq!(parsed.hour(), 14, "failed for {}", raw);
        }
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_slot_timestamp("tomorrow morning").is_err());
    }

    #[test]
    fn same_slot_compares_date_and_hour() {
        let slot = Slot::new(date(2024, 3, 4), Period::Am);
        assert!(slot.same_slot_as(&WallClock::at_hour(date(2024, 3, 4), 9)));
        assert!(!slot.same_slot_as(&WallClock::at_hour(date(2024, 3, 4), 10)));
        assert!(!slot.same_slot_as(&WallClock::at_hour(date(2024, 3, 5), 9)));
    }

    #[test]
    fn wall_clock_serde_uses_zone_bridging_format() {
        let ts = WallClock::at_hour(date(2024, 2, 29), 14);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-02-29T14:00:00.000Z\"");
        let back: WallClock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn period_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Period::Am).unwrap(), "\"AM\"");
        assert_eq!(serde_json::from_str::<Period>("\"PM\"").unwrap(), Period::Pm);
    }

    proptest! {
        #[test]
        fn serialize_then_parse_preserves_fields(
            y in 1970i32..2100,
            m in 1u32..=12,
            d in 1u32..=28,
            h in 0u32..24,
            min in 0u32..60,
            s in 0u32..60,
        ) {
            let original = WallClock::new(
                NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap(),
            );
            let parsed = parse_slot_timestamp(&serialize_slot_timestamp(&original)).unwrap();
            prop_assert_eq!(fields(&parsed), fields(&original));
        }
    }
}
