/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Boundary to the screen hardware.
//!
//! The [`Manager`](crate::manager::Manager) never talks to devices directly; it
//! goes through a [`DriverAdapter`].  Production uses [`CommandDriver`], which
//! shells out to the `artistactrl` control program.  Tests use
//! `MockDriver`, which records every call; it is only built for tests or with
//! the `mock` feature.
//!
//! All operations are blocking.  A slow driver call stalls the whole tick loop;
//! there is no timeout.

pub mod command;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use command::CommandDriver;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockDriver;

use std::path::Path;

use thiserror::Error;

// ── Error type ────────────────────────────────────────────────────────────────

/// Failure of any driver operation.
///
/// Whether a failure is fatal depends on the operation, not on the variant:
/// the manager treats a failed `get_ids` as fatal, a failed `render` as
/// "screen offline" and a failed `set_id` as "retry next tick".
#[derive(Debug, Error)]
pub enum DriverError {
    /// The control program could not be started at all.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The control program exited with a non-zero status.
    #[error("driver call '{args}' failed (exit code {code:?}): {output}")]
    Failed {
        args: String,
        code: Option<i32>,
        output: String,
    },

    /// The control program succeeded but printed something other than the
    /// expected YAML.
    #[error("driver call '{args}' returned unparsable output: {source}")]
    UnparsableOutput {
        args: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The device did not respond (reported by in-process drivers).
    #[error("screen '{0}' is unavailable")]
    Unavailable(String),
}

// ── DriverAdapter ─────────────────────────────────────────────────────────────

/// Operations the rotation engine needs from the screen hardware.
pub trait DriverAdapter {
    /// Identifiers of every connected screen, in driver order.  An empty
    /// string marks a screen that has not been labeled yet.
    fn get_ids(&self) -> Result<Vec<String>, DriverError>;

    /// Re-program the screen currently known as `old_id` to answer to `new_id`.
    fn set_id(&self, old_id: &str, new_id: &str) -> Result<(), DriverError>;

    /// Show the image at `path` on screen `screen_id`.
    fn render(&self, path: &Path, screen_id: &str) -> Result<(), DriverError>;

    /// Blank every connected screen.
    fn blank_all(&self) -> Result<(), DriverError>;
}

impl<D: DriverAdapter + ?Sized> DriverAdapter for Box<D> {
    fn get_ids(&self) -> Result<Vec<String>, DriverError> {
        (**self).get_ids()
    }

    fn set_id(&self, old_id: &str, new_id: &str) -> Result<(), DriverError> {
        (**self).set_id(old_id, new_id)
    }

    fn render(&self, path: &Path, screen_id: &str) -> Result<(), DriverError> {
        (**self).render(path, screen_id)
    }

    fn blank_all(&self) -> Result<(), DriverError> {
        (**self).blank_all()
    }
}
