//! Pull unacknowledged problems out of a Nagios snapshot.
//!
//! Host checks and service checks are extracted independently: a host can be
//! down and still have its own failing services listed.

use crate::types::{MonitoringSnapshot, Problem};

/// Eligible problems from one snapshot, in snapshot (host name) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Problems {
  pub hosts: Vec<Problem>,
  pub services: Vec<Problem>,
}

impl Problems {
  pub fn is_empty(&self) -> bool {
    self.hosts.is_empty() && self.services.is_empty()
  }

  pub fn len(&self) -> usize {
    self.hosts.len() + self.services.len()
  }
}

/// A check is worth reconciling when it is failing, nobody has acked it yet,
/// and Nagios is still actively checking it.
fn eligible(current_state: i64, acknowledged: bool, active_checks_enabled: bool) -> bool {
  current_state != 0 && !acknowledged && active_checks_enabled
}

pub fn extract(snapshot: &MonitoringSnapshot) -> Problems {
  let mut out = Problems::default();

  for (host, entry) in &snapshot.hosts {
    if eligible(entry.current_state, entry.acknowledged, entry.active_checks_enabled) {
      out.hosts.push(Problem {
        host: host.clone(),
        service: None,
        state: entry.current_state,
        acknowledged: entry.acknowledged,
        active_checks_enabled: entry.active_checks_enabled,
      });
    }

    for (name, svc) in &entry.services {
      if eligible(svc.current_state, svc.acknowledged, svc.active_checks_enabled) {
        out.services.push(Problem {
          host: host.clone(),
          service: Some(name.clone()),
          state: svc.current_state,
          acknowledged: svc.acknowledged,
          active_checks_enabled: svc.active_checks_enabled,
        });
      }
    }
  }

  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{HostEntry, ServiceEntry};
  use std::collections::BTreeMap;

  fn svc(state: i64, acked: bool, active: bool) -> ServiceEntry {
    ServiceEntry {
      current_state: state,
      acknowledged: acked,
      active_checks_enabled: active,
    }
  }

  fn host(state: i64, services: Vec<(&str, ServiceEntry)>) -> HostEntry {
    HostEntry {
      current_state: state,
      acknowledged: false,
      active_checks_enabled: true,
      services: services
        .into_iter()
        .map(|(n, s)| (n.to_string(), s))
        .collect(),
    }
  }

  fn snapshot(hosts: Vec<(&str, HostEntry)>) -> MonitoringSnapshot {
    MonitoringSnapshot {
      hosts: hosts
        .into_iter()
        .map(|(n, h)| (n.to_string(), h))
        .collect::<BTreeMap<_, _>>(),
    }
  }

  #[test]
  fn ok_state_never_yields_a_problem() {
    let snap = snapshot(vec![
      ("web1", host(0, vec![("PING", svc(0, false, true)), ("HTTP", svc(0, false, true))])),
      ("web2", host(0, vec![])),
    ]);
    let problems = extract(&snap);
    assert!(problems.is_empty());
    assert_eq!(problems.len(), 0);
  }

  #[test]
  fn nonzero_states_are_all_problems() {
    let snap = snapshot(vec![(
      "web1",
      host(
        0,
        vec![
          ("DISK", svc(1, false, true)),
          ("PING", svc(2, false, true)),
          ("NTP", svc(3, false, true)),
        ],
      ),
    )]);
    let problems = extract(&snap);
    assert!(problems.hosts.is_empty());
    let states: Vec<i64> = problems.services.iter().map(|p| p.state).collect();
    assert_eq!(states, vec![1, 3, 2]);
    assert!(problems.services.iter().all(|p| p.host == "web1" && !p.is_host_level()));
  }

  #[test]
  fn acknowledged_and_passive_checks_are_skipped() {
    let snap = snapshot(vec![(
      "web1",
      host(
        0,
        vec![
          ("ACKED", svc(2, true, true)),
          ("PASSIVE", svc(2, false, false)),
          ("LIVE", svc(2, false, true)),
        ],
      ),
    )]);
    let problems = extract(&snap);
    assert_eq!(problems.services.len(), 1);
    assert_eq!(problems.services[0].service.as_deref(), Some("LIVE"));
  }

  #[test]
  fn host_and_service_problems_are_independent() {
    let with_services = snapshot(vec![("web1", host(1, vec![("PING", svc(2, false, true))]))]);
    let problems = extract(&with_services);
    assert_eq!(problems.hosts.len(), 1);
    assert_eq!(problems.services.len(), 1);
    assert!(problems.hosts[0].is_host_level());
    assert_eq!(problems.hosts[0].host, "web1");

    let without_services = snapshot(vec![("web1", host(1, vec![]))]);
    let problems = extract(&without_services);
    assert_eq!(problems.hosts.len(), 1);
    assert!(problems.services.is_empty());
  }

  #[test]
  fn acknowledged_host_still_reports_its_services() {
    let mut down = host(1, vec![("PING", svc(2, false, true))]);
    down.acknowledged = true;
    let problems = extract(&snapshot(vec![("web1", down)]));
    assert!(problems.hosts.is_empty());
    assert_eq!(problems.services.len(), 1);
  }
}
