//! Decide which matched pairs need an acknowledgment in Nagios.
//!
//! Pure: no I/O, same input gives the same requests in the same order
//! (service pairs first, then host pairs).

use crate::correlation::Correlation;
use crate::types::{AckRequest, IncidentStatus, MatchedPair};

/// Default comment prefix; the incident URL is appended.
pub const DEFAULT_COMMENT_PREFIX: &str = "Acknowledged in PagerDuty: ";

/// PagerDuty says acknowledged, Nagios does not.
pub fn needs_ack(pair: &MatchedPair) -> bool {
  pair.incident.status == IncidentStatus::Acknowledged && !pair.problem.acknowledged
}

fn request(pair: &MatchedPair, comment_prefix: &str, with_service: bool) -> AckRequest {
  AckRequest {
    host: pair.problem.host.clone(),
    service: if with_service {
      pair.problem.service.clone()
    } else {
      None
    },
    comment: format!("{}{}", comment_prefix, pair.incident.detail_url),
  }
}

pub fn decide(correlation: &Correlation, comment_prefix: &str) -> Vec<AckRequest> {
  let services = correlation
    .services
    .iter()
    .filter(|p| needs_ack(p))
    .map(|p| request(p, comment_prefix, true));

  let hosts = correlation
    .hosts
    .iter()
    .filter(|p| needs_ack(p))
    .map(|p| request(p, comment_prefix, false));

  services.chain(hosts).collect()
}
