//! nagios-api client: state snapshot reads and problem acknowledgments.

use reqwest::blocking::Client;
use tracing::debug;

use crate::client::{self, AckSink, SnapshotSource};
use crate::config::Config;
use crate::error::{Origin, SyncError};
use crate::normalize;
use crate::types::{AckRequest, MonitoringSnapshot, StateResponse};

/// Cheap to clone: clones share one connection pool.
#[derive(Clone)]
pub struct NagiosClient {
  http: Client,
  base_url: String,
}

impl NagiosClient {
  pub fn new(base_url: impl Into<String>, http: Client) -> Self {
    Self {
      http,
      base_url: base_url.into(),
    }
  }

  pub fn from_config(config: &Config) -> Result<Self, SyncError> {
    Ok(Self::new(
      config.nagios_base_url(),
      client::http_client(config.timeout)?,
    ))
  }

  fn url(&self, path: &str) -> String {
    format!("{}/{}", self.base_url, path)
  }
}

impl SnapshotSource for NagiosClient {
  fn fetch_snapshot(&self) -> Result<MonitoringSnapshot, SyncError> {
    let url = self.url("state");
    debug!(%url, "fetching nagios state");
    let response = client::send(Origin::Monitoring, self.http.get(&url))?;
    let body = response
      .text()
      .map_err(|e| SyncError::unreachable(Origin::Monitoring, client::transport_reason(&e)))?;
    let raw: StateResponse = serde_json::from_str(&body)
      .map_err(|e| SyncError::malformed(Origin::Monitoring, "state", &e.to_string()))?;
    normalize::snapshot(raw)
  }
}

impl AckSink for NagiosClient {
  fn acknowledge(&self, request: &AckRequest) -> Result<serde_json::Value, SyncError> {
    let fail = |reason: String| SyncError::Ack {
      host: request.host.clone(),
      service: request.service.clone(),
      reason,
    };

    let url = self.url("acknowledge_problem");
    let response = self
      .http
      .post(&url)
      .json(request)
      .send()
      .map_err(|e| fail(client::transport_reason(&e)))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().unwrap_or_default();
      return Err(fail(format!("HTTP {}: {}", status, body.trim())));
    }
    let body = response
      .text()
      .map_err(|e| fail(format!("reading response: {}", e)))?;
    Ok(ack_response(&body))
  }
}

/// Any 2xx is an accepted ack. Keep the body as JSON when it is JSON, as text
/// otherwise, and as null when there is none.
fn ack_response(body: &str) -> serde_json::Value {
  let body = body.trim();
  if body.is_empty() {
    return serde_json::Value::Null;
  }
  serde_json::from_str(body).unwrap_or_else(|_| serde_json::Value::String(body.to_string()))
}
