//! Recent Activity Summarizer
//!
//! Most recent activity per category, capped at ten entries each, with
//! display-ready fields for the dashboard lists.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use super::events::SysmonEvent;
use super::time_filter::{filter_events_by_time, TimeFilter};
use crate::constants::MAX_RECENT_ENTRIES;

/// Display format for entry times, matching the dashboard's locale string
const TIME_OF_DAY_FORMAT: &str = "%-I:%M:%S %p";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebsiteEntry {
    /// DNS query name
    pub domain: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Final path segment of the target file
    pub name: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkEntry {
    pub source: String,
    pub destination: String,
    pub time: String,
}

/// Three independent most-recent-first lists, one per category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecentActivity {
    pub websites: Vec<WebsiteEntry>,
    pub files: Vec<FileEntry>,
    pub network: Vec<NetworkEntry>,
}

/// Last `\`-separated segment of a Windows path.
///
/// A path ending in the separator yields an empty string.
fn file_basename(path: &str) -> &str {
    path.rsplit('\\').next().unwrap_or_default()
}

fn time_of_day(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format(TIME_OF_DAY_FORMAT).to_string()
}

fn entry_time(event: &SysmonEvent) -> String {
    event.parsed_timestamp().map(time_of_day).unwrap_or_default()
}

/// Summarize the most recent activity per category inside the window.
///
/// Entries are sorted by timestamp descending before truncation, so the
/// result does not depend on upstream delivery order. Fewer than ten
/// matches return all of them; zero matches return an empty list.
pub fn process_recent_activities(
    events: &[SysmonEvent],
    filter: TimeFilter,
    now: DateTime<Utc>,
) -> RecentActivity {
    let mut filtered = filter_events_by_time(events, filter, now);
    filtered.sort_by_key(|event| {
        std::cmp::Reverse(event.parsed_timestamp().unwrap_or(DateTime::<Utc>::MIN_UTC))
    });

    let websites = filtered
        .iter()
        .filter_map(|event| match event {
            SysmonEvent::DnsQuery(dns) => Some(WebsiteEntry {
                domain: dns.query_name.clone(),
                time: entry_time(event),
            }),
            _ => None,
        })
        .take(MAX_RECENT_ENTRIES)
        .collect();

    let files = filtered
        .iter()
        .filter_map(|event| match event {
            SysmonEvent::FileCreate(file) => Some(FileEntry {
                name: file_basename(&file.target_filename).to_string(),
                time: entry_time(event),
            }),
            _ => None,
        })
        .take(MAX_RECENT_ENTRIES)
        .collect();

    let network = filtered
        .iter()
        .filter_map(|event| match event {
            SysmonEvent::NetworkConnect(conn) => Some(NetworkEntry {
                source: conn.source_ip.clone(),
                destination: conn.destination_ip.clone(),
                time: entry_time(event),
            }),
            _ => None,
        })
        .take(MAX_RECENT_ENTRIES)
        .collect();

    RecentActivity { websites, files, network }
}

// ============================================================================
// TESTS
// ============================================================================
