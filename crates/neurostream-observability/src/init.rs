// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output always; with a log directory, also JSON files per crate
//! plus a combined file, rotated daily, in one folder per run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

const RUN_PREFIX: &str = "run_";
const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Default number of days to keep run folders
pub const DEFAULT_RETENTION_DAYS: u64 = 30;
/// Default number of most recent run folders to keep
pub const DEFAULT_RETENTION_RUNS: usize = 10;

/// Keeps file writers alive; dropping it flushes them.
pub struct LoggingGuard {
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// The run folder, if file logging is on
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Initialize logging
///
/// With a log directory, creates:
/// ```text
/// <log_dir>/
///   └── run_20250101_120000/
///       ├── neurostream-scheduler.log
///       ├── neurostream-neural.log
///       ├── ...
///       └── neurostream-all.log (combined)
/// ```
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags for filtering
/// * `log_dir` - Base directory for log files; `None` for console only
/// * `retention_days` - Keep run folders for N days (default: 30)
/// * `retention_runs` - Keep N most recent run folders (default: 10)
///
/// # Errors
/// Fails if the run folder cannot be created or a global subscriber is
/// already installed.
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    log_dir: Option<PathBuf>,
    retention_days: Option<u64>,
    retention_runs: Option<usize>,
) -> Result<LoggingGuard> {
    let env_filter = EnvFilter::try_new(debug_flags.to_filter_string())
        .context("Invalid log filter")?;

    let mut layers = Vec::new();
    let mut file_guards = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter.clone())
        .boxed();
    layers.push(console_layer);

    let run_folder = match log_dir {
        Some(base_log_dir) => {
            let timestamp = Utc::now().format(RUN_TIMESTAMP_FORMAT);
            let run_folder = base_log_dir.join(format!("{}{}", RUN_PREFIX, timestamp));
            std::fs::create_dir_all(&run_folder).with_context(|| {
                format!("Failed to create log directory: {}", run_folder.display())
            })?;

            cleanup_old_logs(
                &base_log_dir,
                retention_days.unwrap_or(DEFAULT_RETENTION_DAYS),
                retention_runs.unwrap_or(DEFAULT_RETENTION_RUNS),
            )?;

            for crate_name in crate::KNOWN_CRATES {
                let file_appender = rolling::daily(&run_folder, format!("{}.log", crate_name));
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                file_guards.push(guard);

                // Only this crate's events
                let crate_filter = EnvFilter::try_new(format!(
                    "off,{}={}",
                    crate_name.replace('-', "_"),
                    debug_flags.log_level(crate_name).to_string().to_lowercase()
                ))?;
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .with_filter(crate_filter)
                    .boxed();
                layers.push(file_layer);
            }

            let combined_appender = rolling::daily(&run_folder, "neurostream-all.log");
            let (combined_non_blocking, combined_guard) =
                tracing_appender::non_blocking(combined_appender);
            file_guards.push(combined_guard);

            let combined_layer = tracing_subscriber::fmt::layer()
                .with_writer(combined_non_blocking)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json()
                .with_filter(env_filter)
                .boxed();
            layers.push(combined_layer);

            Some(run_folder)
        }
        None => None,
    };

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(LoggingGuard {
        _file_guards: file_guards,
        log_dir: run_folder,
    })
}

/// Console-only logging with the default base level
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, None, None, None)
}

fn parse_run_timestamp(dir_name: &str) -> Option<DateTime<Utc>> {
    let timestamp = dir_name.strip_prefix(RUN_PREFIX)?;
    let naive = NaiveDateTime::parse_from_str(timestamp, RUN_TIMESTAMP_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Remove run folders older than `retention_days`, then the oldest ones
/// beyond `retention_runs`. Folders not named like a run are left alone.
fn cleanup_old_logs(base_log_dir: &Path, retention_days: u64, retention_runs: usize) -> Result<()> {
    if !base_log_dir.exists() {
        return Ok(());
    }

    let cutoff_date = Utc::now() - chrono::Duration::days(retention_days as i64);

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(dt) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_run_timestamp)
        {
            runs.push((path, dt));
        }
    }

    // Oldest first
    runs.sort_by_key(|(_, dt)| *dt);

    let expired = runs.iter().filter(|(_, dt)| *dt < cutoff_date).count();
    let excess = runs.len().saturating_sub(retention_runs);
    for (path, _) in runs.iter().take(expired.max(excess)) {
        if let Err(e) = std::fs::remove_dir_all(path) {
            eprintln!(
                "Warning: Failed to remove old log directory {}: {}",
                path.display(),
                e
            );
        }
    }

    Ok(())
}
