//! Normalize fetched payloads into canonical internal models.

use crate::error::{Origin, SyncError};
use crate::types::*;

/// Validate a nagios-api state document into a [`MonitoringSnapshot`].
///
/// Any entry with an unusable field fails the whole snapshot; reconciling against
/// a partially understood snapshot could acknowledge the wrong check.
pub fn snapshot(raw: StateResponse) -> Result<MonitoringSnapshot, SyncError> {
  if raw.success == Some(false) {
    return Err(SyncError::malformed(
      Origin::Monitoring,
      "success",
      "nagios-api reported failure",
    ));
  }

  let mut hosts = std::collections::BTreeMap::new();
  for (host, entry) in raw.content {
    let at = |field: &str| format!("content.{}.{}", host, field);

    let mut services = std::collections::BTreeMap::new();
    for (name, svc) in entry.services {
      let at = |field: &str| format!("content.{}.services.{}.{}", host, name, field);
      let service = ServiceEntry {
        current_state: state(&svc.current_state, &at("current_state"))?,
        acknowledged: flag(
          &svc.problem_has_been_acknowledged,
          &at("problem_has_been_acknowledged"),
        )?,
        active_checks_enabled: flag(&svc.active_checks_enabled, &at("active_checks_enabled"))?,
      };
      services.insert(name, service);
    }

    let host_entry = HostEntry {
      current_state: state(&entry.current_state, &at("current_state"))?,
      acknowledged: flag(
        &entry.problem_has_been_acknowledged,
        &at("problem_has_been_acknowledged"),
      )?,
      active_checks_enabled: flag(&entry.active_checks_enabled, &at("active_checks_enabled"))?,
      services,
    };
    hosts.insert(host, host_entry);
  }

  Ok(MonitoringSnapshot { hosts })
}

/// Convert raw PagerDuty incidents, keeping only those raised by the monitoring
/// integration (`trigger_type`). A null `incident_key` becomes an empty key.
pub fn integration_incidents(raw: Vec<RawIncident>, trigger_type: &str) -> Vec<Incident> {
  raw
    .into_iter()
    .filter(|i| i.trigger_type == trigger_type)
    .map(|i| Incident {
      key: i.incident_key.unwrap_or_default(),
      status: i.status,
      summary_host: i
        .trigger_summary_data
        .and_then(|d| d.hostname)
        .filter(|h| !h.is_empty()),
      trigger_type: i.trigger_type,
      detail_url: i.html_url,
    })
    .collect()
}

fn integer(v: &FlexInt, field: &str) -> Result<i64, SyncError> {
  match v {
    FlexInt::Int(n) => Ok(*n),
    FlexInt::Str(s) => s
      .trim()
      .parse::<i64>()
      .map_err(|_| SyncError::malformed(Origin::Monitoring, field, &format!("not an integer: {:?}", s))),
  }
}

fn state(v: &FlexInt, field: &str) -> Result<i64, SyncError> {
  let n = integer(v, field)?;
  if n < 0 {
    return Err(SyncError::malformed(Origin::Monitoring, field, "negative state"));
  }
  Ok(n)
}

fn flag(v: &FlexInt, field: &str) -> Result<bool, SyncError> {
  match integer(v, field)? {
    0 => Ok(false),
    1 => Ok(true),
    n => Err(SyncError::malformed(
      Origin::Monitoring,
      field,
      &format!("expected 0 or 1, got {}", n),
    )),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn parse(v: serde_json::Value) -> Result<MonitoringSnapshot, SyncError> {
    snapshot(serde_json::from_value(v).unwrap())
  }

  #[test]
  fn accepts_string_and_numeric_fields() {
    let snap = parse(json!({
      "success": true,
      "content": {
        "web1": {
          "current_state": "1",
          "problem_has_been_acknowledged": 0,
          "active_checks_enabled": "1",
          "services": {
            "PING": {
              "current_state": 2,
              "problem_has_been_acknowledged": "0",
              "active_checks_enabled": 1
            }
          }
        }
      }
    }))
    .unwrap();

    let web1 = &snap.hosts["web1"];
    assert_eq!(web1.current_state, 1);
    assert!(!web1.acknowledged);
    assert!(web1.active_checks_enabled);
    assert_eq!(web1.services["PING"].current_state, 2);
  }

  #[test]
  fn host_without_services_key_is_a_decode_error() {
    let raw = serde_json::from_value::<StateResponse>(json!({
      "content": {
        "web1": {
          "current_state": "2",
          "problem_has_been_acknowledged": "0",
          "active_checks_enabled": "1"
        }
      }
    }));
    let err = raw.unwrap_err();
    assert!(err.to_string().contains("services"), "{}", err);
  }

  #[test]
  fn empty_services_object_is_valid() {
    let snap = parse(json!({
      "content": {
        "db1": {
          "current_state": "0",
          "problem_has_been_acknowledged": "0",
          "active_checks_enabled": "1",
          "services": {}
        }
      }
    }))
    .unwrap();
    assert!(snap.hosts["db1"].services.is_empty());
  }

  #[test]
  fn missing_field_is_a_decode_error() {
    let raw = serde_json::from_value::<StateResponse>(json!({
      "content": {
        "web1": {
          "current_state": "2",
          "active_checks_enabled": "1"
        }
      }
    }));
    assert!(raw.is_err());
  }

  #[test]
  fn bad_flag_names_the_field() {
    let err = parse(json!({
      "content": {
        "web1": {
          "current_state": "0",
          "problem_has_been_acknowledged": "0",
          "active_checks_enabled": "1",
          "services": {
            "HTTP": {
              "current_state": "2",
              "problem_has_been_acknowledged": "yes",
              "active_checks_enabled": "1"
            }
          }
        }
      }
    }))
    .unwrap_err();
    assert_eq!(err.exit_code(), crate::error::EXIT_MONITORING_UNAVAILABLE);
    assert!(err
      .to_string()
      .contains("content.web1.services.HTTP.problem_has_been_acknowledged"));
  }

  #[test]
  fn reported_failure_is_rejected() {
    let err = parse(json!({ "success": false, "content": {} })).unwrap_err();
    assert!(err.to_string().contains("success"));
  }

  #[test]
  fn only_integration_incidents_survive() {
    let raw: IncidentsResponse = serde_json::from_value(json!({
      "incidents": [
        {
          "incident_key": "web1/PING",
          "status": "acknowledged",
          "trigger_type": "nagios_trigger",
          "trigger_summary_data": { "HOSTNAME": "web1", "SERVICEDESC": "PING" },
          "html_url": "https://acme.pagerduty.com/incidents/P1"
        },
        {
          "incident_key": null,
          "status": "triggered",
          "trigger_type": "web_trigger",
          "trigger_summary_data": { "subject": "manual page" },
          "html_url": "https://acme.pagerduty.com/incidents/P2"
        },
        {
          "incident_key": null,
          "status": "triggered",
          "trigger_type": "nagios_trigger",
          "html_url": "https://acme.pagerduty.com/incidents/P3"
        }
      ]
    }))
    .unwrap();

    let incidents = integration_incidents(raw.incidents, "nagios_trigger");
    assert_eq!(incidents.len(), 2);
    assert_eq!(incidents[0].key, "web1/PING");
    assert_eq!(incidents[0].summary_host.as_deref(), Some("web1"));
    assert_eq!(incidents[0].status, IncidentStatus::Acknowledged);
    assert_eq!(incidents[1].key, "");
    assert_eq!(incidents[1].summary_host, None);
  }

  #[test]
  fn unknown_incident_status_is_a_decode_error() {
    let raw = serde_json::from_value::<RawIncident>(json!({
      "incident_key": "k",
      "status": "snoozed",
      "trigger_type": "nagios_trigger",
      "html_url": "u"
    }));
    assert!(raw.is_err());
  }
}
