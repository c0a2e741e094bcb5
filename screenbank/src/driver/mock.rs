/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! In-process [`DriverAdapter`] for tests.
//!
//! `MockDriver` is a cheap handle over shared state: clone it, hand one copy
//! to the [`Manager`](crate::manager::Manager), and keep the other to script
//! the connected screens and inspect what the manager asked for.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{DriverAdapter, DriverError};

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    GetIds,
    SetId { old_id: String, new_id: String },
    Render { path: PathBuf, screen_id: String },
    BlankAll,
}

/// Scriptable state behind a [`MockDriver`].
#[derive(Debug, Default)]
pub struct MockDriverState {
    /// What `get_ids` reports.
    pub ids: Vec<String>,

    /// `get_ids` fails while set.
    pub fail_get_ids: bool,

    /// `set_id` fails while set.
    pub fail_set_id: bool,

    /// Screens whose renders fail.
    pub dead_screens: HashSet<String>,

    /// Every call, in order.
    pub calls: Vec<DriverCall>,
}

#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockDriverState>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose `get_ids` reports `ids`.
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let driver = Self::new();
        driver.state().ids = ids.into_iter().map(Into::into).collect();
        driver
    }

    /// Lock the shared state for scripting or inspection.
    pub fn state(&self) -> MutexGuard<'_, MockDriverState> {
        // A poisoned lock only means another test thread panicked mid-call;
        // the recorded data is still usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_dead(&self, screen_id: &str, dead: bool) {
        let mut state = self.state();
        if dead {
            state.dead_screens.insert(screen_id.to_string());
        } else {
            state.dead_screens.remove(screen_id);
        }
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.state().calls.clone()
    }

    /// Screen ids passed to `render`, in call order.
    pub fn rendered_screens(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                DriverCall::Render { screen_id, .. } => Some(screen_id.clone()),
                _ => None,
            })
            .collect()
    }

    /// `(old, new)` pairs passed to `set_id`, in call order.
    pub fn relabels(&self) -> Vec<(String, String)> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                DriverCall::SetId { old_id, new_id } => Some((old_id.clone(), new_id.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }
}

impl DriverAdapter for MockDriver {
    fn get_ids(&self) -> Result<Vec<String>, DriverError> {
        let mut state = self.state();
        state.calls.push(DriverCall::GetIds);
        if state.fail_get_ids {
            return Err(DriverError::Unavailable("usb bus".to_string()));
        }
        Ok(state.ids.clone())
    }

    fn set_id(&self, old_id: &str, new_id: &str) -> Result<(), DriverError> {
        let mut state = self.state();
        state.calls.push(DriverCall::SetId {
            old_id: old_id.to_string(),
            new_id: new_id.to_string(),
        });
        if state.fail_set_id {
            return Err(DriverError::Unavailable(old_id.to_string()));
        }
        if let Some(slot) = state.ids.iter_mut().find(|id| id.as_str() == old_id) {
            *slot = new_id.to_string();
        }
        Ok(())
    }

    fn render(&self, path: &Path, screen_id: &str) -> Result<(), DriverError> {
        let mut state = self.state();
        state.calls.push(DriverCall::Render {
            path: path.to_path_buf(),
            screen_id: screen_id.to_string(),
        });
        if state.dead_screens.contains(screen_id) {
            return Err(DriverError::Unavailable(screen_id.to_string()));
        }
        Ok(())
    }

    fn blank_all(&self) -> Result<(), DriverError> {
        self.state().calls.push(DriverCall::BlankAll);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
