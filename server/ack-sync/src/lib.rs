//! Nagios / PagerDuty acknowledgment sync: deterministic, single pass.
//!
//! Fetches the Nagios state snapshot and the open PagerDuty incidents, correlates
//! unacknowledged Nagios problems to incidents raised by the Nagios integration,
//! and acknowledges in Nagios whatever PagerDuty already shows as acknowledged.
//!
//! One direction only; nothing is written to PagerDuty and nothing persists
//! between runs.

pub mod client;
pub mod config;
pub mod correlation;
pub mod decide;
pub mod engine;
pub mod error;
pub mod extract;
pub mod nagios;
pub mod normalize;
pub mod pagerduty;
pub mod types;

pub use config::{Cli, Config};
pub use engine::Reconciler;
pub use error::{Origin, SyncError};
pub use types::{AckRequest, RunReport};
