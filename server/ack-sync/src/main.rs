//! Binary entrypoint: resolve configuration, run one pass, print the report.
//!
//! The report is written to stdout as a single JSON line. Logs go to stderr or
//! to `--log-file`. Exit status: 0 on a completed pass (even if individual
//! acknowledgments failed), 1 on bad configuration, 3 when Nagios is
//! unavailable, 4 when PagerDuty is unavailable.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::sync::Mutex;

use ack_sync::{Cli, Reconciler, SyncError};
use clap::{CommandFactory, Parser};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
  let config = match Cli::parse().into_config() {
    Ok(c) => c,
    Err(e) => {
      let _ = writeln!(io::stderr(), "ack-sync: {}\n", e);
      let _ = writeln!(io::stderr(), "{}", Cli::command().render_help());
      process::exit(e.exit_code());
    }
  };

  if let Err(e) = init_tracing(config.log_file.as_deref()) {
    let _ = writeln!(io::stderr(), "ack-sync: {}", e);
    process::exit(e.exit_code());
  }

  if let Err(e) = run(config) {
    error!(error = %e, "reconciliation aborted");
    process::exit(e.exit_code());
  }
}

fn run(config: ack_sync::Config) -> Result<(), SyncError> {
  let reconciler = Reconciler::from_config(config)?;
  info!(
    nagios = %reconciler.config().nagios_base_url(),
    pagerduty = %reconciler.config().pagerduty_base_url(),
    "starting reconciliation"
  );

  let report = reconciler.run()?;
  info!(
    acknowledged = report.acknowledged(),
    failed = report.failed(),
    "reconciliation complete"
  );

  let stdout = io::stdout();
  let mut out = stdout.lock();
  serde_json::to_writer(&mut out, &report)?;
  let _ = writeln!(out);
  let _ = out.flush();
  Ok(())
}

fn init_tracing(log_file: Option<&Path>) -> Result<(), SyncError> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
  match log_file {
    Some(path) => {
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| SyncError::config(format!("log file {}: {}", path.display(), e)))?;
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    }
    None => {
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    }
  }
  Ok(())
}
