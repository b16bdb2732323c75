//! Sysmon Dashboard Core - Event Aggregation Engine
//!
//! Takes a heterogeneous stream of Sysmon monitoring events, filters it by a
//! selectable time window and produces the three view models behind the
//! dashboard: time-bucketed graph series, recent activity per category and
//! cardinality statistics. A cancellable poller drives the refresh cycles.
//!
//! Log collection, the HTTP server in front of it and all rendering live
//! outside this crate.

pub mod constants;
pub mod logic;

pub use logic::dashboard::{build_snapshot, DashboardSnapshot};
pub use logic::events::{parse_logs_payload, EventKind, SysmonEvent};
pub use logic::graph::{process_logs_for_graph, BucketLabel, GraphDataPoint};
pub use logic::poller::{Poller, PollerConfig, PollerStatus};
pub use logic::recent::{process_recent_activities, RecentActivity};
pub use logic::source::{FileLogSource, HttpLogSource, LogSource, SourceError};
pub use logic::stats::{compute_stats, Stats};
pub use logic::time_filter::{filter_events_by_time, TimeFilter};

/// Initialize logging for the embedding application.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .try_init();
}
