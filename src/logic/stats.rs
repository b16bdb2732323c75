//! Statistics Aggregator
//!
//! Totals, per-category counts and cardinalities over the filtered window,
//! feeding the dashboard stat cards.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

use super::events::SysmonEvent;
use super::time_filter::{filter_events_by_time, TimeFilter};

/// Summary counters over one filtered window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_events: usize,
    /// Distinct process identifiers
    pub unique_processes: usize,
    pub network_connections: usize,
    pub file_operations: usize,
    pub dns_queries: usize,
    /// Distinct destination IPs among network events
    pub unique_destinations: usize,
}

/// Compute the stat-card counters for the given window.
///
/// Total for any input; an empty sequence yields all-zero stats.
pub fn compute_stats(events: &[SysmonEvent], filter: TimeFilter, now: DateTime<Utc>) -> Stats {
    let filtered = filter_events_by_time(events, filter, now);

    let mut processes: HashSet<&str> = HashSet::new();
    let mut destinations: HashSet<&str> = HashSet::new();
    let mut network_connections = 0;
    let mut file_operations = 0;
    let mut dns_queries = 0;

    for event in &filtered {
        processes.insert(event.process_id());
        match event {
            SysmonEvent::NetworkConnect(conn) => {
                network_connections += 1;
                destinations.insert(conn.destination_ip.as_str());
            }
            SysmonEvent::FileCreate(_) => file_operations += 1,
            SysmonEvent::DnsQuery(_) => dns_queries += 1,
            SysmonEvent::ProcessCreate(_) => {}
        }
    }

    Stats {
        total_events: filtered.len(),
        unique_processes: processes.len(),
        network_connections,
        file_operations,
        dns_queries,
        unique_destinations: destinations.len(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::events::{
        DnsQueryEvent, EventCommon, FileCreateEvent, NetworkConnectEvent, ProcessCreateEvent,
    };
    use chrono::{Duration, TimeZone};

    fn common(timestamp: DateTime<Utc>, event_id: u32, process_id: &str) -> EventCommon {
        EventCommon {
            timestamp: timestamp.to_rfc3339(),
            event_id,
            process_id: process_id.to_string(),
            image: "C:\\Windows\\System32\\svchost.exe".to_string(),
            category: None,
        }
    }

    fn dns(ts: DateTime<Utc>, process_id: &str) -> SysmonEvent {
        SysmonEvent::DnsQuery(DnsQueryEvent {
            common: common(ts, 22, process_id),
            query_name: "example.com".to_string(),
            query_status: "0".to_string(),
        })
    }

    fn file(ts: DateTime<Utc>, process_id: &str) -> SysmonEvent {
        SysmonEvent::FileCreate(FileCreateEvent {
            common: common(ts, 11, process_id),
            target_filename: "C:\\tmp\\x.txt".to_string(),
        })
    }

    fn network(ts: DateTime<Utc>, process_id: &str, destination: &str) -> SysmonEvent {
        SysmonEvent::NetworkConnect(NetworkConnectEvent {
            common: common(ts, 3, process_id),
            destination_ip: destination.to_string(),
            source_ip: "10.0.0.1".to_string(),
            destination_port: "443".to_string(),
            protocol: "tcp".to_string(),
            destination_hostname: None,
        })
    }

    fn process(ts: DateTime<Utc>, process_id: &str) -> SysmonEvent {
        SysmonEvent::ProcessCreate(ProcessCreateEvent {
            common: common(ts, 1, process_id),
            command_line: "cmd.exe".to_string(),
            parent_image: "C:\\Windows\\explorer.exe".to_string(),
            integrity_level: "Medium".to_string(),
        })
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_per_category_counts() {
        let now = fixed_now();
        let events = vec![
            process(now, "1"),
            network(now, "2", "1.1.1.1"),
            network(now, "2", "8.8.8.8"),
            file(now, "3"),
            dns(now, "4"),
            dns(now, "4"),
            dns(now, "4"),
        ];

        let stats = compute_stats(&events, TimeFilter::OneHour, now);
        assert_eq!(stats.total_events, 7);
        assert_eq!(stats.network_connections, 2);
        assert_eq!(stats.file_operations, 1);
        assert_eq!(stats.dns_queries, 3);
    }

    #[test]
    fn test_unique_processes_under_duplicates() {
        let now = fixed_now();
        // Five events sharing one process id
        let events: Vec<SysmonEvent> = (0..5)
            .map(|i| dns(now - Duration::seconds(i), "4242"))
            .collect();

        let stats = compute_stats(&events, TimeFilter::OneHour, now);
        assert_eq!(stats.total_events, 5);
        assert_eq!(stats.unique_processes, 1);
    }

    #[test]
    fn test_unique_destinations() {
        let now = fixed_now();
        let events = vec![
            network(now, "1", "1.1.1.1"),
            network(now, "2", "1.1.1.1"),
            network(now, "3", "8.8.8.8"),
            // DNS events carry no destination IP and must not contribute
            dns(now, "4"),
        ];

        let stats = compute_stats(&events, TimeFilter::OneHour, now);
        assert_eq!(stats.unique_destinations, 2);
        assert_eq!(stats.unique_processes, 4);
    }

    #[test]
    fn test_window_applies_before_counting() {
        // dns at now, file_create two hours ago, filter 1h
        let now = fixed_now();
        let events = vec![dns(now, "1"), file(now - Duration::hours(2), "2")];

        let stats = compute_stats(&events, TimeFilter::OneHour, now);
        assert_eq!(stats.dns_queries, 1);
        assert_eq!(stats.file_operations, 0);
        assert_eq!(stats.total_events, 1);
        assert_eq!(stats.unique_processes, 1);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let stats = compute_stats(&[], TimeFilter::SevenDays, fixed_now());
        assert_eq!(stats, Stats::default());
    }
}
