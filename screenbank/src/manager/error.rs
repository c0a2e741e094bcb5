/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the rotation manager.
//!
//! Two enums model the two failure layers:
//!
//! * [`ShowError`]: one screen could not show its content.  Recoverable: the
//!   manager logs it and carries on with the tick.
//! * [`ManagerError`]: the loop cannot continue.  The binary logs it and
//!   exits with status 1.

use std::path::PathBuf;

use thiserror::Error;

use crate::driver::DriverError;

// ── Per-screen failures ───────────────────────────────────────────────────────

/// Why a single render did not happen.
///
/// The two variants leave the screen in different states: a missing file does
/// not touch the offline flag, a driver failure sets it.
#[derive(Debug, Error)]
pub enum ShowError {
    /// The image file is not on disk.  The screen's offline flag is unchanged.
    #[error("image file does not exist: {}", path.display())]
    MissingFile { path: PathBuf },

    /// The driver rejected the render.  The screen is now marked offline.
    #[error("screen '{display}' is down: {source}")]
    Driver {
        display: String,
        #[source]
        source: DriverError,
    },
}

// ── Fatal loop errors ─────────────────────────────────────────────────────────

/// Conditions that stop the tick loop.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// The rotation queue was empty at the start of a tick.  With no reserve
    /// content no swap is possible, so the manager refuses to keep running.
    #[error("rotation queue is empty: every image is on a screen and nothing is left to rotate in")]
    QueueExhausted,

    /// The driver could not enumerate connected screens.
    #[error("failed to get the screen list: {0}")]
    Discovery(#[source] DriverError),
}
