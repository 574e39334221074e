//! Correlate Nagios problems to PagerDuty incidents.
//!
//! Host problems match on the structured `HOSTNAME` hint only (exact equality).
//! Service problems match when both the host and the service name occur anywhere
//! in the incident key. The key has no guaranteed delimiter, so this is substring
//! containment, and it over-matches when one service name contains another
//! (`PING` also matches a `web1/PING-mon-test-001` incident). Kept that way for
//! compatibility with existing incident keys.
//!
//! Plain nested loops: volumes are tens to low hundreds on each side.

use crate::types::{Incident, MatchedPair, Problem};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correlation {
  pub services: Vec<MatchedPair>,
  pub hosts: Vec<MatchedPair>,
}

impl Correlation {
  pub fn is_empty(&self) -> bool {
    self.services.is_empty() && self.hosts.is_empty()
  }
}

/// Exact host match against the incident's structured hint. Incidents without
/// a hint never match, even when the key mentions the host.
pub fn host_matches(problem: &Problem, incident: &Incident) -> bool {
  incident.summary_host.as_deref() == Some(problem.host.as_str())
}

/// Loose containment match of host and service name inside the incident key.
pub fn service_matches(problem: &Problem, incident: &Incident) -> bool {
  let service = match &problem.service {
    Some(s) => s,
    None => return false,
  };
  if problem.host.is_empty() || service.is_empty() {
    return false;
  }
  incident.key.contains(problem.host.as_str()) && incident.key.contains(service.as_str())
}

/// Pair every problem with every incident it matches. A problem may match
/// several incidents (duplicate open incidents); all pairs are kept.
pub fn correlate(
  incidents: &[Incident],
  host_problems: &[Problem],
  service_problems: &[Problem],
) -> Correlation {
  let mut out = Correlation::default();

  for problem in service_problems {
    for incident in incidents {
      if service_matches(problem, incident) {
        out.services.push(MatchedPair {
          problem: problem.clone(),
          incident: incident.clone(),
        });
      }
    }
  }

  for problem in host_problems {
    for incident in incidents {
      if host_matches(problem, incident) {
        out.hosts.push(MatchedPair {
          problem: problem.clone(),
          incident: incident.clone(),
        });
      }
    }
  }

  out
}
