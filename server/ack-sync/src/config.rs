//! Job configuration: command-line flags with environment fallbacks.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::decide::DEFAULT_COMMENT_PREFIX;
use crate::error::SyncError;
use crate::types::IncidentStatus;

/// Sync PagerDuty acknowledgments back into Nagios.
#[derive(Debug, Clone, Parser)]
#[command(name = "ack-sync", version)]
pub struct Cli {
  /// PagerDuty subdomain, without `.pagerduty.com` (or a full base URL)
  #[arg(long, env = "PAGERDUTY_DOMAIN")]
  pub pagerduty_domain: Option<String>,

  /// PagerDuty API key
  #[arg(long, env = "PAGERDUTY_API_KEY", hide_env_values = true)]
  pub pagerduty_api_key: Option<String>,

  /// nagios-api endpoint, `host:port` or a full URL
  #[arg(long, env = "NAGIOS_API_ENDPOINT")]
  pub nagios_api: Option<String>,

  /// Write logs to this file instead of stderr
  #[arg(long, env = "ACK_SYNC_LOG_FILE")]
  pub log_file: Option<PathBuf>,

  /// Per-request timeout in seconds
  #[arg(long, env = "ACK_SYNC_TIMEOUT_SECS", default_value_t = 10)]
  pub timeout_secs: u64,

  /// Incident statuses to fetch from PagerDuty
  #[arg(
    long = "incident-status",
    value_delimiter = ',',
    default_value = "triggered,acknowledged"
  )]
  pub incident_statuses: Vec<String>,

  /// PagerDuty trigger type of incidents raised by Nagios
  #[arg(long, default_value = "nagios_trigger")]
  pub trigger_type: String,

  /// Prefix of the acknowledgment comment; the incident URL is appended
  #[arg(long, default_value = DEFAULT_COMMENT_PREFIX)]
  pub ack_comment_prefix: String,
}

/// Resolved configuration, passed explicitly into the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
  pub pagerduty_domain: String,
  pub pagerduty_api_key: String,
  pub nagios_api: String,
  pub log_file: Option<PathBuf>,
  pub timeout: Duration,
  pub incident_statuses: Vec<IncidentStatus>,
  pub trigger_type: String,
  pub ack_comment_prefix: String,
}

impl Config {
  /// Required values only; everything else takes its default.
  pub fn new(
    pagerduty_domain: impl Into<String>,
    pagerduty_api_key: impl Into<String>,
    nagios_api: impl Into<String>,
  ) -> Self {
    Self {
      pagerduty_domain: pagerduty_domain.into(),
      pagerduty_api_key: pagerduty_api_key.into(),
      nagios_api: nagios_api.into(),
      log_file: None,
      timeout: Duration::from_secs(10),
      incident_statuses: vec![IncidentStatus::Triggered, IncidentStatus::Acknowledged],
      trigger_type: "nagios_trigger".into(),
      ack_comment_prefix: DEFAULT_COMMENT_PREFIX.into(),
    }
  }

  /// Base URL of nagios-api. A bare `host:port` gets `http://`.
  pub fn nagios_base_url(&self) -> String {
    let raw = self.nagios_api.trim().trim_end_matches('/');
    if raw.contains("://") {
      raw.to_string()
    } else {
      format!("http://{}", raw)
    }
  }

  /// Base URL of the PagerDuty account. A bare subdomain expands to
  /// `https://<domain>.pagerduty.com`.
  pub fn pagerduty_base_url(&self) -> String {
    let raw = self.pagerduty_domain.trim().trim_end_matches('/');
    if raw.contains("://") {
      raw.to_string()
    } else {
      format!("https://{}.pagerduty.com", raw)
    }
  }
}

fn required(value: Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> String {
  match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
    Some(v) => v,
    None => {
      missing.push(name);
      String::new()
    }
  }
}

impl Cli {
  /// Validate flags into a [`Config`]. All missing required values are reported at once.
  pub fn into_config(self) -> Result<Config, SyncError> {
    let mut missing = Vec::new();
    let pagerduty_domain = required(
      self.pagerduty_domain,
      "--pagerduty-domain (PAGERDUTY_DOMAIN)",
      &mut missing,
    );
    let pagerduty_api_key = required(
      self.pagerduty_api_key,
      "--pagerduty-api-key (PAGERDUTY_API_KEY)",
      &mut missing,
    );
    let nagios_api = required(
      self.nagios_api,
      "--nagios-api (NAGIOS_API_ENDPOINT)",
      &mut missing,
    );
    if !missing.is_empty() {
      return Err(SyncError::config(format!("missing {}", missing.join(", "))));
    }

    if self.timeout_secs == 0 {
      return Err(SyncError::config("--timeout-secs must be at least 1"));
    }

    let mut incident_statuses = Vec::new();
    for raw in self.incident_statuses.iter().filter(|s| !s.trim().is_empty()) {
      let status = IncidentStatus::from_str_loose(raw).ok_or_else(|| {
        SyncError::config(format!(
          "--incident-status: unknown status {:?} (expected triggered|acknowledged|resolved)",
          raw
        ))
      })?;
      if !incident_statuses.contains(&status) {
        incident_statuses.push(status);
      }
    }
    if incident_statuses.is_empty() {
      return Err(SyncError::config("--incident-status must name at least one status"));
    }

    if self.trigger_type.trim().is_empty() {
      return Err(SyncError::config("--trigger-type must not be empty"));
    }

    Ok(Config {
      pagerduty_domain,
      pagerduty_api_key,
      nagios_api,
      log_file: self.log_file,
      timeout: Duration::from_secs(self.timeout_secs),
      incident_statuses,
      trigger_type: self.trigger_type.trim().to_string(),
      ack_comment_prefix: self.ack_comment_prefix,
    })
  }
}
