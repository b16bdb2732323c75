//! Dashboard Poller
//!
//! Background refresh loop: every interval, fetch the current raw event
//! snapshot from the log source and recompute the dashboard view models.
//! Computations are pure; the loop only swaps the latest result in place.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::dashboard::{build_snapshot, DashboardSnapshot};
use super::source::LogSource;
use super::time_filter::TimeFilter;
use crate::constants;

/// Poller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Refresh interval in milliseconds
    pub refresh_interval_ms: u64,
    /// Initially selected time window
    pub filter: TimeFilter,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: constants::get_refresh_interval_ms(),
            filter: TimeFilter::default(),
        }
    }
}

/// Refresh loop health, for the dashboard header
#[derive(Debug, Clone, Default, Serialize)]
pub struct PollerStatus {
    /// Completed fetch attempts, successful or not
    pub cycles: u64,
    /// Events in the last successful snapshot
    pub events_last_cycle: usize,
    pub last_refresh: Option<DateTime<Utc>>,
    /// Error of the most recent cycle, cleared on success
    pub last_error: Option<String>,
}

struct Shared {
    snapshot: RwLock<Option<DashboardSnapshot>>,
    status: RwLock<PollerStatus>,
    filter: RwLock<TimeFilter>,
}

/// Handle to a running refresh loop.
///
/// Dropping the handle (or calling [`Poller::stop`]) aborts the task: the
/// pending timer is cleared and a mid-flight cycle's result is discarded.
pub struct Poller {
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl Poller {
    /// Spawn the refresh loop. The first cycle runs immediately.
    pub fn start<S: LogSource + 'static>(source: S, config: PollerConfig) -> Self {
        let shared = Arc::new(Shared {
            snapshot: RwLock::new(None),
            status: RwLock::new(PollerStatus::default()),
            filter: RwLock::new(config.filter),
        });

        let interval = Duration::from_millis(config.refresh_interval_ms);
        let source: Arc<dyn LogSource> = Arc::new(source);
        let task = tokio::spawn(run_loop(source, Arc::clone(&shared), interval));

        log::info!(
            "Dashboard poller started (interval: {}ms, filter: {})",
            config.refresh_interval_ms,
            config.filter
        );
        Self { shared, task }
    }

    /// Most recent successful snapshot, if any cycle has completed
    pub fn latest(&self) -> Option<DashboardSnapshot> {
        self.shared.snapshot.read().clone()
    }

    pub fn status(&self) -> PollerStatus {
        self.shared.status.read().clone()
    }

    pub fn filter(&self) -> TimeFilter {
        *self.shared.filter.read()
    }

    /// Change the selected window; takes effect on the next cycle.
    pub fn set_filter(&self, filter: TimeFilter) {
        *self.shared.filter.write() = filter;
        log::debug!("Time filter set to {}", filter);
    }

    /// Stop the refresh loop.
    pub fn stop(&self) {
        self.task.abort();
        log::info!("Dashboard poller stopped");
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_loop(source: Arc<dyn LogSource>, shared: Arc<Shared>, interval: Duration) {
    loop {
        run_cycle(source.as_ref(), &shared).await;
        sleep(interval).await;
    }
}

/// One atomic fetch-then-recompute cycle.
///
/// A failed fetch records the error and leaves the previous snapshot
/// untouched; the loop keeps polling.
async fn run_cycle(source: &dyn LogSource, shared: &Shared) {
    let filter = *shared.filter.read();

    match source.fetch_logs().await {
        Ok(events) => {
            let snapshot = build_snapshot(&events, filter, Utc::now());
            log::debug!(
                "Refresh cycle: {} events, {} in window",
                events.len(),
                snapshot.stats.total_events
            );

            let mut status = shared.status.write();
            status.cycles += 1;
            status.events_last_cycle = events.len();
            status.last_refresh = Some(snapshot.generated_at);
            status.last_error = None;
            drop(status);

            *shared.snapshot.write() = Some(snapshot);
        }
        Err(e) => {
            log::warn!("Log fetch failed: {}", e);
            let mut status = shared.status.write();
            status.cycles += 1;
            status.last_error = Some(e.to_string());
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
