//! PagerDuty v1 incidents client.

use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use tracing::debug;

use crate::client::{self, IncidentSource};
use crate::config::Config;
use crate::error::{Origin, SyncError};
use crate::types::{IncidentStatus, IncidentsResponse, RawIncident};

pub struct PagerDutyClient {
  http: Client,
  base_url: String,
  api_key: String,
}

impl PagerDutyClient {
  pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, http: Client) -> Self {
    Self {
      http,
      base_url: base_url.into(),
      api_key: api_key.into(),
    }
  }

  pub fn from_config(config: &Config) -> Result<Self, SyncError> {
    Ok(Self::new(
      config.pagerduty_base_url(),
      config.pagerduty_api_key.clone(),
      client::http_client(config.timeout)?,
    ))
  }
}

impl IncidentSource for PagerDutyClient {
  fn fetch_incidents(&self, statuses: &[IncidentStatus]) -> Result<Vec<RawIncident>, SyncError> {
    let url = format!("{}/api/v1/incidents", self.base_url);
    let status = IncidentStatus::join(statuses);
    debug!(%url, %status, "fetching pagerduty incidents");

    let request = self
      .http
      .get(&url)
      .header(AUTHORIZATION, format!("Token token={}", self.api_key))
      .query(&[("status", status.as_str())]);
    let response = client::send(Origin::Incidents, request)?;
    let text = response
      .text()
      .map_err(|e| SyncError::unreachable(Origin::Incidents, client::transport_reason(&e)))?;
    let body: IncidentsResponse = serde_json::from_str(&text)
      .map_err(|e| SyncError::malformed(Origin::Incidents, "incidents", &e.to_string()))?;
    Ok(body.incidents)
  }
}
