/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Subscriber setup for the `screenbank` binary.
//!
//! Level is controlled by the `RUST_LOG` env-var (e.g. `RUST_LOG=debug`).
//! Without it the default is `info`, or `debug` in debug mode so the
//! per-tick snapshots are visible.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LogDevice;

fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug { "debug" } else { "info" })
    })
}

/// Install the global subscriber writing to `device`.
///
/// # Errors
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init(device: &LogDevice, debug: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(debug));

    match device {
        LogDevice::Stdout => builder
            .with_writer(std::io::stdout)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?,
        LogDevice::Stderr => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?,
        LogDevice::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file: {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?
        }
    }

    Ok(())
}

/// Fallback used before the configuration (and its log device) is known.
pub fn init_default() {
    // Ignore the error: a subscriber may already be installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(false))
        .try_init();
}
