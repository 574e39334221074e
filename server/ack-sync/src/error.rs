//! Structured error types for the sync job.

use std::fmt;

use thiserror::Error;

/// Exit status for missing or invalid configuration.
pub const EXIT_CONFIG: i32 = 1;
/// Exit status when the Nagios snapshot cannot be fetched or decoded.
pub const EXIT_MONITORING_UNAVAILABLE: i32 = 3;
/// Exit status when the PagerDuty incident list cannot be fetched or decoded.
pub const EXIT_INCIDENTS_UNAVAILABLE: i32 = 4;

/// Which remote a fetch failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
  Monitoring,
  Incidents,
}

impl fmt::Display for Origin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Origin::Monitoring => f.write_str("nagios"),
      Origin::Incidents => f.write_str("pagerduty"),
    }
  }
}

#[derive(Debug, Error)]
pub enum SyncError {
  #[error("configuration: {0}")]
  Config(String),

  #[error("{origin} unreachable: {reason}")]
  Unreachable { origin: Origin, reason: String },

  #[error("{origin} payload: {reason}")]
  Malformed { origin: Origin, reason: String },

  #[error("acknowledge {host}{}: {reason}", .service.as_ref().map(|s| format!("/{s}")).unwrap_or_default())]
  Ack {
    host: String,
    service: Option<String>,
    reason: String,
  },

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl SyncError {
  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }

  pub fn unreachable(origin: Origin, reason: impl Into<String>) -> Self {
    Self::Unreachable {
      origin,
      reason: reason.into(),
    }
  }

  /// A decoded payload failed validation at `field`.
  pub fn malformed(origin: Origin, field: &str, reason: &str) -> Self {
    Self::Malformed {
      origin,
      reason: format!("{}: {}", field, reason),
    }
  }

  /// Process exit status for a fatal error. Ack failures are never fatal and fall
  /// through to the generic status.
  pub fn exit_code(&self) -> i32 {
    match self {
      Self::Config(_) => EXIT_CONFIG,
      Self::Unreachable { origin, .. } | Self::Malformed { origin, .. } => match origin {
        Origin::Monitoring => EXIT_MONITORING_UNAVAILABLE,
        Origin::Incidents => EXIT_INCIDENTS_UNAVAILABLE,
      },
      Self::Ack { .. } | Self::Json(_) => 1,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn monitoring_and_incident_failures_have_distinct_exit_codes() {
    let nagios = SyncError::unreachable(Origin::Monitoring, "connection refused");
    let pd = SyncError::malformed(Origin::Incidents, "incidents", "missing field");
    assert_eq!(nagios.exit_code(), EXIT_MONITORING_UNAVAILABLE);
    assert_eq!(pd.exit_code(), EXIT_INCIDENTS_UNAVAILABLE);
    assert_ne!(nagios.exit_code(), SyncError::config("x").exit_code());
  }

  #[test]
  fn ack_error_names_host_and_service() {
    let err = SyncError::Ack {
      host: "web1".into(),
      service: Some("PING".into()),
      reason: "HTTP 500".into(),
    };
    assert_eq!(err.to_string(), "acknowledge web1/PING: HTTP 500");

    let err = SyncError::Ack {
      host: "web1".into(),
      service: None,
      reason: "timed out".into(),
    };
    assert_eq!(err.to_string(), "acknowledge web1: timed out");
  }
}
