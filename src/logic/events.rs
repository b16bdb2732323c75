//! Sysmon Event Model
//!
//! Tagged representation of the four monitored Sysmon event kinds.
//! Category-specific fields only exist on their own variant, so access is
//! always gated by a kind match.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// EVENT KIND
// ============================================================================

/// Discriminant for the four monitored event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ProcessCreate,
    NetworkConnect,
    FileCreate,
    DnsQuery,
}

impl EventKind {
    /// Canonical Sysmon event ID for this kind
    pub fn event_id(&self) -> u32 {
        match self {
            EventKind::ProcessCreate => 1,
            EventKind::NetworkConnect => 3,
            EventKind::FileCreate => 11,
            EventKind::DnsQuery => 22,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ProcessCreate => "process_create",
            EventKind::NetworkConnect => "network_connect",
            EventKind::FileCreate => "file_create",
            EventKind::DnsQuery => "dns_query",
        }
    }
}

// ============================================================================
// EVENT PAYLOADS
// ============================================================================

/// Fields shared by every event kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCommon {
    /// ISO-8601 timestamp as delivered by the collector
    pub timestamp: String,
    pub event_id: u32,
    pub process_id: String,
    /// Process image path
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessCreateEvent {
    #[serde(flatten)]
    pub common: EventCommon,
    pub command_line: String,
    pub parent_image: String,
    pub integrity_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConnectEvent {
    #[serde(flatten)]
    pub common: EventCommon,
    pub destination_ip: String,
    pub source_ip: String,
    pub destination_port: String,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_hostname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCreateEvent {
    #[serde(flatten)]
    pub common: EventCommon,
    pub target_filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsQueryEvent {
    #[serde(flatten)]
    pub common: EventCommon,
    pub query_name: String,
    pub query_status: String,
}

// ============================================================================
// SYSMON EVENT (tagged union)
// ============================================================================

/// One monitoring event, discriminated on the `eventType` wire field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType", rename_all = "snake_case")]
pub enum SysmonEvent {
    ProcessCreate(ProcessCreateEvent),
    NetworkConnect(NetworkConnectEvent),
    FileCreate(FileCreateEvent),
    DnsQuery(DnsQueryEvent),
}

impl SysmonEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SysmonEvent::ProcessCreate(_) => EventKind::ProcessCreate,
            SysmonEvent::NetworkConnect(_) => EventKind::NetworkConnect,
            SysmonEvent::FileCreate(_) => EventKind::FileCreate,
            SysmonEvent::DnsQuery(_) => EventKind::DnsQuery,
        }
    }

    pub fn common(&self) -> &EventCommon {
        match self {
            SysmonEvent::ProcessCreate(e) => &e.common,
            SysmonEvent::NetworkConnect(e) => &e.common,
            SysmonEvent::FileCreate(e) => &e.common,
            SysmonEvent::DnsQuery(e) => &e.common,
        }
    }

    pub fn process_id(&self) -> &str {
        &self.common().process_id
    }

    /// Raw timestamp string as delivered on the wire
    pub fn timestamp(&self) -> &str {
        &self.common().timestamp
    }

    /// Parsed timestamp, or `None` when the wire string is unusable.
    ///
    /// Events without a parseable timestamp never pass the time filter.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.common().timestamp)
    }

    /// Does the stored `eventId` (and `category`, if present) agree with
    /// the `eventType` tag?
    pub fn is_consistent(&self) -> bool {
        let kind = self.kind();
        let common = self.common();
        if common.event_id != kind.event_id() {
            return false;
        }
        match &common.category {
            Some(label) => label == kind.as_str(),
            None => true,
        }
    }
}

/// Parse a collector timestamp. RFC 3339 first, then the naive Sysmon
/// `UtcTime` formats interpreted as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

// ============================================================================
// PAYLOAD NORMALIZATION
// ============================================================================

/// Normalize a raw `logs` payload into a sequence of events.
///
/// A JSON array maps element-wise, a single object wraps into a one-element
/// sequence, and anything else yields an empty sequence. Records that fail
/// to deserialize or whose `eventId`/`category` contradict their
/// `eventType` are dropped with a warning. Never panics.
pub fn parse_logs_payload(payload: &Value) -> Vec<SysmonEvent> {
    let records: Vec<&Value> = match payload {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![payload],
        Value::Null => Vec::new(),
        other => {
            log::warn!("Ignoring non-object logs payload: {}", other);
            Vec::new()
        }
    };

    let mut events = Vec::with_capacity(records.len());
    for record in records {
        match serde_json::from_value::<SysmonEvent>(record.clone()) {
            Ok(event) if event.is_consistent() => events.push(event),
            Ok(event) => {
                log::warn!(
                    "Dropping event with mismatched tag: eventType={} eventId={}",
                    event.kind().as_str(),
                    event.common().event_id
                );
            }
            Err(e) => {
                log::warn!("Skipping malformed log record: {}", e);
            }
        }
    }
    events
}

// ============================================================================
// TESTS
// ============================================================================
