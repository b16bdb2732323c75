//! Logic Module - Classification & Aggregation Engines
//!
//! Pipeline: raw payload -> `events` -> `time_filter` -> {`graph`,
//! `recent`, `stats`} -> `dashboard` snapshot, driven by `poller` pulling
//! from a `source`.

pub mod dashboard;
pub mod events;
pub mod graph;
pub mod poller;
pub mod recent;
pub mod source;
pub mod stats;
pub mod time_filter;
