//! Activity Graph Bucketizer
//!
//! Partitions the filtered event set into fixed-width time buckets and
//! tallies DNS, file and network activity per bucket. The graph tracks only
//! those three surfaces; process-create events are never counted here.

use chrono::{DateTime, Local, Timelike, Utc};
use serde::Serialize;

use super::events::{EventKind, SysmonEvent};
use super::time_filter::{filter_events_by_time, TimeFilter};

/// Bucket label on the graph axis.
///
/// Every filter labels buckets with their absolute start instant, except
/// `1d` which uses local hour-of-day for the 24-hour day-cycle axis. This
/// asymmetry is a deliberate display choice; bucket assignment always works
/// on start instants, never on these labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BucketLabel {
    /// Local hour of day, 0-23 (only for the `1d` filter)
    HourOfDay(u32),
    /// Bucket start as Unix epoch milliseconds
    EpochMillis(i64),
}

/// One time bucket of the activity graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphDataPoint {
    /// Bucket label, oldest bucket first
    pub bucket: BucketLabel,
    /// DNS queries in this bucket
    pub websites: u64,
    /// File-create events in this bucket
    pub files: u64,
    /// Network connections in this bucket
    pub network: u64,
}

/// Bucket count and width for a filter: (intervals, width in ms)
fn intervals_for(filter: TimeFilter) -> (usize, i64) {
    match filter {
        TimeFilter::SevenDays => (168, 60 * 60 * 1000),
        TimeFilter::OneDay => (24, 60 * 60 * 1000),
        TimeFilter::SixHours => (12, 30 * 60 * 1000),
        TimeFilter::OneHour => (12, 5 * 60 * 1000),
        TimeFilter::ThirtyMinutes => (30, 60 * 1000),
        TimeFilter::FiveMinutes => (5, 60 * 1000),
        TimeFilter::OneMinute => (60, 1000),
    }
}

fn label_for(filter: TimeFilter, start_ms: i64) -> BucketLabel {
    if filter == TimeFilter::OneDay {
        let hour = DateTime::<Utc>::from_timestamp_millis(start_ms)
            .map(|dt| dt.with_timezone(&Local).hour())
            .unwrap_or(0);
        BucketLabel::HourOfDay(hour)
    } else {
        BucketLabel::EpochMillis(start_ms)
    }
}

/// Build the time-bucketed activity series for the graph.
///
/// Output always has exactly the bucket count of the filter's interval
/// table, in ascending chronological order, spanning back from `now`.
/// Filtered events older than the first bucket start are dropped silently;
/// the last bucket captures everything at or after its start.
pub fn process_logs_for_graph(
    events: &[SysmonEvent],
    filter: TimeFilter,
    now: DateTime<Utc>,
) -> Vec<GraphDataPoint> {
    let filtered = filter_events_by_time(events, filter, now);
    let (count, width_ms) = intervals_for(filter);
    let now_ms = now.timestamp_millis();

    let starts: Vec<i64> = (0..count)
        .map(|i| now_ms - ((count - 1 - i) as i64) * width_ms)
        .collect();

    let mut points: Vec<GraphDataPoint> = starts
        .iter()
        .map(|&start| GraphDataPoint {
            bucket: label_for(filter, start),
            websites: 0,
            files: 0,
            network: 0,
        })
        .collect();

    for event in &filtered {
        let Some(ts) = event.parsed_timestamp() else {
            continue;
        };
        let t = ts.timestamp_millis();

        // Last bucket whose start <= t, with the next bucket starting after t
        let mut slot = None;
        for i in 0..count {
            if starts[i] <= t && (i + 1 == count || t < starts[i + 1]) {
                slot = Some(i);
                break;
            }
        }
        let Some(i) = slot else {
            continue;
        };

        match event.kind() {
            EventKind::DnsQuery => points[i].websites += 1,
            EventKind::FileCreate => points[i].files += 1,
            EventKind::NetworkConnect => points[i].network += 1,
            EventKind::ProcessCreate => {}
        }
    }

    points
}

// ============================================================================
// TESTS
// ============================================================================
