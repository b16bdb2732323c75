//! Dashboard Snapshot
//!
//! One refresh cycle's worth of view models, all computed from the same raw
//! event snapshot with one captured instant so bucket boundaries and filter
//! thresholds agree.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::events::SysmonEvent;
use super::graph::{process_logs_for_graph, GraphDataPoint};
use super::recent::{process_recent_activities, RecentActivity};
use super::stats::{compute_stats, Stats};
use super::time_filter::TimeFilter;

/// The three view models behind the dashboard, plus when and how they were
/// computed. Pure data, recreated from scratch on every refresh.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub filter: TimeFilter,
    pub graph: Vec<GraphDataPoint>,
    pub recent: RecentActivity,
    pub stats: Stats,
}

/// Run all three aggregators over one event snapshot.
pub fn build_snapshot(
    events: &[SysmonEvent],
    filter: TimeFilter,
    now: DateTime<Utc>,
) -> DashboardSnapshot {
    DashboardSnapshot {
        generated_at: now,
        filter,
        graph: process_logs_for_graph(events, filter, now),
        recent: process_recent_activities(events, filter, now),
        stats: compute_stats(events, filter, now),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::events::{DnsQueryEvent, EventCommon};
    use chrono::TimeZone;

    fn dns(ts: DateTime<Utc>) -> SysmonEvent {
        SysmonEvent::DnsQuery(DnsQueryEvent {
            common: EventCommon {
                timestamp: ts.to_rfc3339(),
                event_id: 22,
                process_id: "100".to_string(),
                image: "C:\\Windows\\System32\\svchost.exe".to_string(),
                category: None,
            },
            query_name: "example.com".to_string(),
            query_status: "0".to_string(),
        })
    }

    #[test]
    fn test_snapshot_views_agree() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let events = vec![dns(now)];

        let snapshot = build_snapshot(&events, TimeFilter::OneHour, now);
        assert_eq!(snapshot.generated_at, now);
        assert_eq!(snapshot.filter, TimeFilter::OneHour);
        assert_eq!(snapshot.stats.dns_queries, 1);
        assert_eq!(snapshot.recent.websites.len(), 1);
        let websites: u64 = snapshot.graph.iter().map(|p| p.websites).sum();
        assert_eq!(websites, 1);
    }

    #[test]
    fn test_empty_snapshot_is_structurally_valid() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let snapshot = build_snapshot(&[], TimeFilter::OneDay, now);
        assert_eq!(snapshot.graph.len(), 24);
        assert!(snapshot.recent.websites.is_empty());
        assert_eq!(snapshot.stats.total_events, 0);
    }
}
