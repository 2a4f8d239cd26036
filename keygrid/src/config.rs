// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line configuration.

use std::time::Duration;

use clap::Parser;
use keygrid_navigator::DEFAULT_IDLE_TIMEOUT_MS;

/// Idle interval used when `--timeout` is absent or unusable.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(DEFAULT_IDLE_TIMEOUT_MS);

/// Command-line arguments.
#[derive(Debug, Default, Parser)]
#[command(
    name = "keygrid",
    version,
    about = "Move and click the pointer by typing grid codes",
    after_help = "Press Ctrl+H+T to show or hide the grid. Type a cell code such as `b0`, then a \
                  sub-cell letter, or press Enter to click the cell center. Ctrl+1..4 selects \
                  left, right, middle, or double click."
)]
pub struct Args {
    /// Seconds a visible overlay may sit idle before it hides itself
    #[arg(short, long, value_name = "SECONDS", allow_hyphen_values = true)]
    pub timeout: Option<String>,
}

/// Resolved runtime settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// How long the overlay may stay open without being used.
    pub idle_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl Config {
    /// Resolve `args`, substituting defaults for anything unusable.
    ///
    /// Never fails: a bad `--timeout` is logged and replaced by
    /// [`DEFAULT_IDLE_TIMEOUT`].
    pub fn from_args(args: &Args) -> Self {
        let idle_timeout = match args.timeout.as_deref() {
            None => DEFAULT_IDLE_TIMEOUT,
            Some(raw) => parse_timeout(raw).unwrap_or_else(|| {
                tracing::warn!(
                    value = raw,
                    default_secs = DEFAULT_IDLE_TIMEOUT.as_secs(),
                    "ignoring invalid --timeout, using default"
                );
                DEFAULT_IDLE_TIMEOUT
            }),
        };
        Self { idle_timeout }
    }

    /// The idle timeout in whole milliseconds, saturating.
    pub fn idle_timeout_ms(&self) -> u64 {
        u64::try_from(self.idle_timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Parse a timeout given in whole seconds. Zero and negative values are rejected.
pub fn parse_timeout(raw: &str) -> Option<Duration> {
    let secs: i64 = raw.trim().parse().ok()?;
    let secs = u64::try_from(secs).ok().filter(|&s| s > 0)?;
    Some(Duration::from_secs(secs))
}
