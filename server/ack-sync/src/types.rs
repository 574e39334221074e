//! Core types for the sync job (JSON contracts + internal models).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Inbound types: nagios-api `/state`
// ---------------------------------------------------------------------------

/// Root of the nagios-api state document. Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StateResponse {
  #[serde(default)]
  pub success: Option<bool>,
  pub content: BTreeMap<String, RawHostEntry>,
}

/// nagios-api reports most integers as strings ("2", "0"), so both forms are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FlexInt {
  Int(i64),
  Str(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHostEntry {
  pub current_state: FlexInt,
  pub problem_has_been_acknowledged: FlexInt,
  pub active_checks_enabled: FlexInt,
  pub services: BTreeMap<String, RawServiceEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawServiceEntry {
  pub current_state: FlexInt,
  pub problem_has_been_acknowledged: FlexInt,
  pub active_checks_enabled: FlexInt,
}

// ---------------------------------------------------------------------------
// Inbound types: PagerDuty `/api/v1/incidents`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct IncidentsResponse {
  pub incidents: Vec<RawIncident>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawIncident {
  #[serde(default)]
  pub incident_key: Option<String>,
  pub status: IncidentStatus,
  pub trigger_type: String,
  #[serde(default)]
  pub trigger_summary_data: Option<TriggerSummaryData>,
  pub html_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerSummaryData {
  #[serde(default, rename = "HOSTNAME")]
  pub hostname: Option<String>,
}

// ---------------------------------------------------------------------------
// Incident status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
  Triggered,
  Acknowledged,
  Resolved,
}

impl IncidentStatus {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "triggered" => Some(Self::Triggered),
      "acknowledged" | "ack" => Some(Self::Acknowledged),
      "resolved" => Some(Self::Resolved),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Triggered => "triggered",
      Self::Acknowledged => "acknowledged",
      Self::Resolved => "resolved",
    }
  }

  /// Comma-joined filter value for the incidents query.
  pub fn join(statuses: &[IncidentStatus]) -> String {
    statuses
      .iter()
      .map(|s| s.as_str())
      .collect::<Vec<_>>()
      .join(",")
  }
}

// ---------------------------------------------------------------------------
// Internal normalized types
// ---------------------------------------------------------------------------

/// Validated Nagios snapshot, keyed by host name. Iteration order is stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitoringSnapshot {
  pub hosts: BTreeMap<String, HostEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostEntry {
  pub current_state: i64,
  pub acknowledged: bool,
  pub active_checks_enabled: bool,
  pub services: BTreeMap<String, ServiceEntry>,
}

/// `current_state == 0` is OK; any other value is a problem state.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEntry {
  pub current_state: i64,
  pub acknowledged: bool,
  pub active_checks_enabled: bool,
}

/// An unacknowledged alert pulled out of the snapshot. `service == None` is host-level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Problem {
  pub host: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub service: Option<String>,
  pub state: i64,
  pub acknowledged: bool,
  pub active_checks_enabled: bool,
}

impl Problem {
  pub fn is_host_level(&self) -> bool {
    self.service.is_none()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Incident {
  /// Free-text correlation token, usually embedding host and service names.
  pub key: String,
  pub status: IncidentStatus,
  pub trigger_type: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub summary_host: Option<String>,
  pub detail_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MatchedPair {
  pub problem: Problem,
  pub incident: Incident,
}

/// Acknowledgment to send back to Nagios. Serialized as the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AckRequest {
  pub host: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub service: Option<String>,
  pub comment: String,
}

// ---------------------------------------------------------------------------
// Output types (JSON contract: what we emit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AckOutcome {
  pub host: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub service: Option<String>,
  pub ok: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub response: Option<serde_json::Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
  pub started_at: DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
  pub host_problems: usize,
  pub service_problems: usize,
  pub incidents: usize,
  pub host_matches: usize,
  pub service_matches: usize,
  pub acks: Vec<AckOutcome>,
}

impl RunReport {
  pub fn acknowledged(&self) -> usize {
    self.acks.iter().filter(|a| a.ok).count()
  }

  pub fn failed(&self) -> usize {
    self.acks.iter().filter(|a| !a.ok).count()
  }
}
