//! Time Window Filter
//!
//! Maps the named window tokens from the dashboard selector to fixed
//! lookback durations and applies the threshold filter.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::events::SysmonEvent;

/// Named lookback window selected on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFilter {
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "1m")]
    OneMinute,
}

impl TimeFilter {
    /// Every filter token, widest window first
    pub const ALL: [TimeFilter; 7] = [
        TimeFilter::SevenDays,
        TimeFilter::OneDay,
        TimeFilter::SixHours,
        TimeFilter::OneHour,
        TimeFilter::ThirtyMinutes,
        TimeFilter::FiveMinutes,
        TimeFilter::OneMinute,
    ];

    /// Lookback duration in milliseconds
    pub fn duration_ms(&self) -> i64 {
        match self {
            TimeFilter::SevenDays => 7 * 24 * 60 * 60 * 1000,
            TimeFilter::OneDay => 24 * 60 * 60 * 1000,
            TimeFilter::SixHours => 6 * 60 * 60 * 1000,
            TimeFilter::OneHour => 60 * 60 * 1000,
            TimeFilter::ThirtyMinutes => 30 * 60 * 1000,
            TimeFilter::FiveMinutes => 5 * 60 * 1000,
            TimeFilter::OneMinute => 60 * 1000,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::milliseconds(self.duration_ms())
    }

    /// Oldest instant still inside the window for the given `now`
    pub fn threshold(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::SevenDays => "7d",
            TimeFilter::OneDay => "1d",
            TimeFilter::SixHours => "6h",
            TimeFilter::OneHour => "1h",
            TimeFilter::ThirtyMinutes => "30m",
            TimeFilter::FiveMinutes => "5m",
            TimeFilter::OneMinute => "1m",
        }
    }
}

impl Default for TimeFilter {
    fn default() -> Self {
        TimeFilter::OneDay
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized filter token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTimeFilter(pub String);

impl fmt::Display for UnknownTimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown time filter token: {}", self.0)
    }
}

impl std::error::Error for UnknownTimeFilter {}

impl FromStr for TimeFilter {
    type Err = UnknownTimeFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(TimeFilter::SevenDays),
            "1d" => Ok(TimeFilter::OneDay),
            "6h" => Ok(TimeFilter::SixHours),
            "1h" => Ok(TimeFilter::OneHour),
            "30m" => Ok(TimeFilter::ThirtyMinutes),
            "5m" => Ok(TimeFilter::FiveMinutes),
            "1m" => Ok(TimeFilter::OneMinute),
            other => Err(UnknownTimeFilter(other.to_string())),
        }
    }
}

/// Retain the events whose parsed timestamp is strictly newer than
/// `now - duration`.
///
/// Events with an unparseable timestamp are excluded, never an error.
/// Stateless and idempotent: re-filtering an already filtered set with the
/// same filter and a non-decreasing `now` never grows the set.
pub fn filter_events_by_time(
    events: &[SysmonEvent],
    filter: TimeFilter,
    now: DateTime<Utc>,
) -> Vec<SysmonEvent> {
    let threshold = filter.threshold(now);
    events
        .iter()
        .filter(|event| match event.parsed_timestamp() {
            Some(ts) => ts > threshold,
            None => false,
        })
        .cloned()
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::events::{DnsQueryEvent, EventCommon};
    use chrono::TimeZone;

    fn dns_at(timestamp: &str) -> SysmonEvent {
        SysmonEvent::DnsQuery(DnsQueryEvent {
            common: EventCommon {
                timestamp: timestamp.to_string(),
                event_id: 22,
                process_id: "100".to_string(),
                image: "C:\\Windows\\System32\\svchost.exe".to_string(),
                category: None,
            },
            query_name: "example.com".to_string(),
            query_status: "0".to_string(),
        })
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_duration_table() {
        assert_eq!(TimeFilter::SevenDays.duration_ms(), 604_800_000);
        assert_eq!(TimeFilter::OneDay.duration_ms(), 86_400_000);
        assert_eq!(TimeFilter::SixHours.duration_ms(), 21_600_000);
        assert_eq!(TimeFilter::OneHour.duration_ms(), 3_600_000);
        assert_eq!(TimeFilter::ThirtyMinutes.duration_ms(), 1_800_000);
        assert_eq!(TimeFilter::FiveMinutes.duration_ms(), 300_000);
        assert_eq!(TimeFilter::OneMinute.duration_ms(), 60_000);
    }

    #[test]
    fn test_token_round_trip() {
        for filter in TimeFilter::ALL {
            assert_eq!(filter.as_str().parse::<TimeFilter>().unwrap(), filter);
            let json = serde_json::to_string(&filter).unwrap();
            assert_eq!(json, format!("\"{}\"", filter.as_str()));
        }
        assert!("2w".parse::<TimeFilter>().is_err());
    }

    #[test]
    fn test_threshold_is_strict() {
        let now = fixed_now();
        // Exactly at the boundary: excluded (strictly greater required)
        let boundary = dns_at("2024-05-01T11:00:00Z");
        let inside = dns_at("2024-05-01T11:00:01Z");
        let events = vec![boundary, inside.clone()];

        let kept = filter_events_by_time(&events, TimeFilter::OneHour, now);
        assert_eq!(kept, vec![inside]);
    }

    #[test]
    fn test_unparseable_timestamp_excluded() {
        let events = vec![dns_at("yesterday-ish"), dns_at("2024-05-01T11:59:00Z")];
        let kept = filter_events_by_time(&events, TimeFilter::OneHour, fixed_now());
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_widening_window_is_superset() {
        let now = fixed_now();
        let events = vec![
            dns_at("2024-05-01T11:30:00Z"), // inside 1h
            dns_at("2024-05-01T02:00:00Z"), // inside 1d only
            dns_at("2024-04-20T00:00:00Z"), // outside both
        ];

        let hour = filter_events_by_time(&events, TimeFilter::OneHour, now);
        let day = filter_events_by_time(&events, TimeFilter::OneDay, now);

        assert_eq!(hour.len(), 1);
        assert_eq!(day.len(), 2);
        for event in &hour {
            assert!(day.contains(event));
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let now = fixed_now();
        let events = vec![
            dns_at("2024-05-01T11:30:00Z"),
            dns_at("2024-05-01T10:00:00Z"),
        ];

        let once = filter_events_by_time(&events, TimeFilter::OneHour, now);
        let twice = filter_events_by_time(&once, TimeFilter::OneHour, now);
        assert_eq!(once, twice);
    }
}
