//! One reconciliation pass: fetch, extract, correlate, decide, acknowledge.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::client::{AckSink, IncidentSource, SnapshotSource};
use crate::config::Config;
use crate::correlation;
use crate::decide;
use crate::error::SyncError;
use crate::extract;
use crate::nagios::NagiosClient;
use crate::normalize;
use crate::pagerduty::PagerDutyClient;
use crate::types::*;

/// Runs the sync pipeline. Holds no state between runs.
pub struct Reconciler {
  config: Config,
  snapshots: Box<dyn SnapshotSource>,
  incidents: Box<dyn IncidentSource>,
  sink: Box<dyn AckSink>,
}

impl Reconciler {
  pub fn new(
    config: Config,
    snapshots: Box<dyn SnapshotSource>,
    incidents: Box<dyn IncidentSource>,
    sink: Box<dyn AckSink>,
  ) -> Self {
    Self {
      config,
      snapshots,
      incidents,
      sink,
    }
  }

  /// Wire the HTTP collaborators described by `config`.
  pub fn from_config(config: Config) -> Result<Self, SyncError> {
    let nagios = NagiosClient::from_config(&config)?;
    let sink = nagios.clone();
    let pagerduty = PagerDutyClient::from_config(&config)?;
    Ok(Self::new(
      config,
      Box::new(nagios),
      Box::new(pagerduty),
      Box::new(sink),
    ))
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Run one pass.
  ///
  /// Either fetch failing aborts the run before any acknowledgment is sent.
  /// Individual acknowledgment failures are logged and recorded in the report.
  pub fn run(&self) -> Result<RunReport, SyncError> {
    let started_at = Utc::now();

    let snapshot = self.snapshots.fetch_snapshot()?;
    let problems = extract::extract(&snapshot);
    if problems.is_empty() {
      info!("no unacknowledged nagios problems");
    } else {
      info!(
        hosts = problems.hosts.len(),
        services = problems.services.len(),
        "nagios problems found"
      );
    }

    let raw = self
      .incidents
      .fetch_incidents(&self.config.incident_statuses)?;
    let fetched = raw.len();
    let incidents = normalize::integration_incidents(raw, &self.config.trigger_type);
    info!(
      fetched,
      integration = incidents.len(),
      trigger_type = %self.config.trigger_type,
      "pagerduty incidents fetched"
    );

    let correlation = correlation::correlate(&incidents, &problems.hosts, &problems.services);
    if !correlation.is_empty() {
      info!(
        services = correlation.services.len(),
        hosts = correlation.hosts.len(),
        "matches between nagios and pagerduty"
      );
      if let Ok(dump) = serde_json::to_string_pretty(&correlation.services) {
        debug!("service matches: {}", dump);
      }
      if let Ok(dump) = serde_json::to_string_pretty(&correlation.hosts) {
        debug!("host matches: {}", dump);
      }
    }

    let requests = decide::decide(&correlation, &self.config.ack_comment_prefix);
    let acks = requests.iter().map(|r| self.acknowledge(r)).collect();

    Ok(RunReport {
      started_at,
      finished_at: Utc::now(),
      host_problems: problems.hosts.len(),
      service_problems: problems.services.len(),
      incidents: incidents.len(),
      host_matches: correlation.hosts.len(),
      service_matches: correlation.services.len(),
      acks,
    })
  }

  fn acknowledge(&self, request: &AckRequest) -> AckOutcome {
    let service = request.service.as_deref().unwrap_or("-");
    match self.sink.acknowledge(request) {
      Ok(response) => {
        info!(host = %request.host, service, response = %response, "acknowledged in nagios");
        AckOutcome {
          host: request.host.clone(),
          service: request.service.clone(),
          ok: true,
          response: Some(response),
          error: None,
        }
      }
      Err(e) => {
        warn!(host = %request.host, service, error = %e, "acknowledgment failed");
        AckOutcome {
          host: request.host.clone(),
          service: request.service.clone(),
          ok: false,
          response: None,
          error: Some(e.to_string()),
        }
      }
    }
  }
}
