//! Collaborator contracts for the reconciliation pass.
//!
//! The engine only talks to these traits, so tests swap in in-memory fakes and the
//! binary wires the HTTP clients from [`crate::nagios`] and [`crate::pagerduty`].

use std::time::Duration;

use reqwest::blocking::{Client, Response};

use crate::error::{Origin, SyncError};
use crate::types::{AckRequest, IncidentStatus, MonitoringSnapshot, RawIncident};

/// Read-only source of the current Nagios state.
pub trait SnapshotSource {
  fn fetch_snapshot(&self) -> Result<MonitoringSnapshot, SyncError>;
}

/// Read-only source of PagerDuty incidents in the given statuses.
///
/// Returns raw incidents; the engine applies the trigger-type filter.
pub trait IncidentSource {
  fn fetch_incidents(&self, statuses: &[IncidentStatus]) -> Result<Vec<RawIncident>, SyncError>;
}

/// Write-only acknowledgment action. One call per request.
pub trait AckSink {
  fn acknowledge(&self, request: &AckRequest) -> Result<serde_json::Value, SyncError>;
}

/// Blocking HTTP client with a bounded per-request timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<Client, SyncError> {
  Client::builder()
    .timeout(timeout)
    .user_agent(concat!("ack-sync/", env!("CARGO_PKG_VERSION")))
    .build()
    .map_err(|e| SyncError::config(format!("http client: {}", e)))
}

/// Describe a transport failure; timeouts are called out explicitly.
pub(crate) fn transport_reason(err: &reqwest::Error) -> String {
  if err.is_timeout() {
    format!("timed out: {}", err)
  } else {
    err.to_string()
  }
}

/// Send a request and require a 2xx status.
pub(crate) fn send(
  origin: Origin,
  request: reqwest::blocking::RequestBuilder,
) -> Result<Response, SyncError> {
  let response = request
    .send()
    .map_err(|e| SyncError::unreachable(origin, transport_reason(&e)))?;
  let status = response.status();
  if !status.is_success() {
    return Err(SyncError::unreachable(origin, format!("HTTP {}", status)));
  }
  Ok(response)
}
