/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Rotation manager for a bank of screens.
//!
//! [`Manager`] owns the ordered [`Display`] list and the [`RotationQueue`] and
//! drives them through a periodic tick:
//!
//! ```text
//! tick ─► check (queue not empty) ─► find_new_screens (≤ 1 relabel) ─► switch (≤ 1 swap)
//! ```
//!
//! # Round-robin sweep
//! `switch` keeps a scan cursor across ticks.  Each tick resumes where the
//! previous one stopped, so screens are retired left to right and a screen
//! that just received new content is looked at again on the next tick.  The
//! cursor only wraps to 0 when it sits on the last index; a tick that finds
//! nothing leaves it there.
//!
//! # Time
//! Every time-dependent operation takes `now: Instant` so callers (and tests)
//! decide what "now" is.
//!
//! # Example
//! ```rust,ignore
//! let mut manager = Manager::new(settings, screens, contents, CommandDriver::default());
//! manager.start(Instant::now());
//! manager.run(tokio::signal::ctrl_c()).await?;
//! ```

pub mod error;

pub use error::{ManagerError, ShowError};

use std::future::Future;
use std::path::Path;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::config::{RotationConfig, RotationSettings};
use crate::content::{find_display, Content, Display};
use crate::driver::DriverAdapter;
use crate::queue::RotationQueue;

// ── Tick results ──────────────────────────────────────────────────────────────

/// One swap performed by [`Manager::switch`].
#[derive(Debug, Clone, PartialEq)]
pub struct Swap {
    /// Index of the screen in the display list.
    pub index: usize,
    pub display: String,
    /// Content that went back to the queue tail.
    pub retired: String,
    /// Content taken from the queue head.
    pub incoming: String,
    /// `false` if the render failed (missing file or driver error).
    pub shown: bool,
}

/// One relabel issued by [`Manager::find_new_screens`].
#[derive(Debug, Clone, PartialEq)]
pub struct Relabel {
    /// Transient identifier reported by the driver (empty for a fresh screen).
    pub from: String,
    /// Offline slot the screen now answers to.
    pub to: String,
    /// `false` if the driver rejected the relabel; it will be retried next tick.
    pub applied: bool,
}

/// What a single [`Manager::tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Debug mode: nothing was changed, this is the current assignment.
    Snapshot(String),
    Advanced {
        relabel: Option<Relabel>,
        swap: Option<Swap>,
    },
}

// ── Manager ───────────────────────────────────────────────────────────────────

/// The rotation manager.
///
/// All state is mutated only from the tick loop; there is no interior
/// mutability and no locking.
pub struct Manager<D: DriverAdapter> {
    settings: RotationSettings,
    displays: Vec<Display>,
    queue: RotationQueue,
    /// Scan cursor for [`switch`](Self::switch).  Always `< displays.len()`
    /// when the list is non-empty.
    cursor: usize,
    driver: D,
}

impl<D: DriverAdapter> Manager<D> {
    /// Create a manager for `screens` (in scan order) and `contents` (in
    /// initial queue order).  Every screen starts empty and offline.
    pub fn new<S, C>(settings: RotationSettings, screens: S, contents: C, driver: D) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        C: IntoIterator<Item = Content>,
    {
        Self {
            settings,
            displays: screens.into_iter().map(Display::new).collect(),
            queue: contents.into_iter().collect(),
            cursor: 0,
            driver,
        }
    }

    /// Build a manager from a loaded configuration.
    pub fn from_config(config: &RotationConfig, driver: D) -> Self {
        Self::new(
            config.settings.clone(),
            config.screens.iter().cloned(),
            config.images.iter().map(|image| image.to_content()),
            driver,
        )
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn displays(&self) -> &[Display] {
        &self.displays
    }

    /// The display with identifier `id`.
    pub fn display(&self, id: &str) -> Option<&Display> {
        find_display(&self.displays, id).map(|index| &self.displays[index])
    }

    pub fn queue(&self) -> &RotationQueue {
        &self.queue
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn settings(&self) -> &RotationSettings {
        &self.settings
    }

    /// Total content under management: queued plus on screen.
    pub fn content_count(&self) -> usize {
        self.queue.len() + self.displays.iter().filter(|d| d.current.is_some()).count()
    }

    /// Add `content` to the queue tail.
    pub fn add_content(&mut self, content: Content) {
        self.queue.enqueue(content);
    }

    // ── Startup ───────────────────────────────────────────────────────────────

    /// Shuffle the queue once (when `random_start` is set) and fill every
    /// empty screen.
    pub fn start(&mut self, now: Instant) -> usize {
        self.start_with_rng(&mut rand::rng(), now)
    }

    /// [`start`](Self::start) with a caller-supplied random source.
    pub fn start_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R, now: Instant) -> usize {
        if self.settings.random_start {
            self.randomize_queue(rng);
        }
        self.fill(now)
    }

    pub fn randomize_queue<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.queue.shuffle(rng);
        debug!(order = ?self.queue.ids(), "queue shuffled");
    }

    /// Give every screen without content the next item from the queue.
    ///
    /// Occupied screens are never touched.  Stops early when the queue runs
    /// dry.  Returns the number of screens that received content.
    pub fn fill(&mut self, now: Instant) -> usize {
        let mut assigned = 0usize;
        let mut shown = 0usize;

        for index in 0..self.displays.len() {
            if self.displays[index].current.is_some() {
                continue;
            }
            let Some(content) = self.queue.dequeue_front() else {
                break;
            };
            assigned += 1;
            if self.show(index, content, now).is_ok() {
                shown += 1;
            }
        }

        info!(
            assigned = assigned,
            shown = shown,
            queued = self.queue.len(),
            "fill done"
        );
        assigned
    }

    // ── Tick ──────────────────────────────────────────────────────────────────

    /// Run one tick.
    ///
    /// In debug mode only a snapshot is taken.  Otherwise the queue check runs
    /// first, then discovery, then the round-robin advance.
    ///
    /// # Errors
    /// [`ManagerError::QueueExhausted`] before any driver call if the queue is
    /// empty; [`ManagerError::Discovery`] if the screen list cannot be read.
    pub fn tick(&mut self, now: Instant) -> Result<TickOutcome, ManagerError> {
        if self.settings.debug {
            let snapshot = self.snapshot();
            debug!("{}", snapshot);
            return Ok(TickOutcome::Snapshot(snapshot));
        }

        self.check()?;
        let relabel = self.find_new_screens()?;
        let swap = self.switch(now);

        Ok(TickOutcome::Advanced { relabel, swap })
    }

    /// Fail when there is no reserve content left to rotate in.
    pub fn check(&self) -> Result<(), ManagerError> {
        if self.queue.is_empty() {
            return Err(ManagerError::QueueExhausted);
        }
        Ok(())
    }

    /// Hand one freshly connected, unlabeled screen to the lowest-id offline
    /// slot.
    ///
    /// At most one relabel per call.  Local state is not changed: the slot
    /// comes back online only once a render to it succeeds.
    pub fn find_new_screens(&self) -> Result<Option<Relabel>, ManagerError> {
        let connected = self.driver.get_ids().map_err(ManagerError::Discovery)?;

        let Some(unlabeled) = connected.iter().find(|id| id.is_empty()) else {
            return Ok(None);
        };

        let Some(target) = self
            .displays
            .iter()
            .filter(|d| d.offline)
            .min_by(|a, b| a.cmp_id(b))
        else {
            debug!("unlabeled screen connected but no offline slot to give it");
            return Ok(None);
        };

        info!("Relabeling '{}' as '{}'", unlabeled, target.id);

        let applied = match self.driver.set_id(unlabeled, &target.id) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to relabel '{}' as '{}': {}", unlabeled, target.id, e);
                false
            }
        };

        Ok(Some(Relabel {
            from: unlabeled.clone(),
            to: target.id.clone(),
            applied,
        }))
    }

    /// Round-robin advance: retire the first expired screen at or after the
    /// cursor and replace its content with the queue head.
    ///
    /// Offline screens are not skipped.
    pub fn switch(&mut self, now: Instant) -> Option<Swap> {
        if self.displays.is_empty() {
            return None;
        }
        let last = self.displays.len() - 1;
        if self.cursor == last {
            self.cursor = 0;
        }

        for index in self.cursor..=last {
            self.cursor = index;

            let Some(retired) = self.displays[index]
                .current
                .take_if(|c| c.is_expired(now))
            else {
                continue;
            };
            let retired_id = retired.id.clone();
            let incoming = self.queue.rotate(retired);
            let incoming_id = incoming.id.clone();
            let shown = self.show(index, incoming, now).is_ok();

            let screen = self.displays[index].id.clone();
            info!(
                display = %screen,
                retired = %retired_id,
                incoming = %incoming_id,
                shown = shown,
                "swapped"
            );

            return Some(Swap {
                index,
                display: screen,
                retired: retired_id,
                incoming: incoming_id,
                shown,
            });
        }

        None
    }

    // ── Loop ──────────────────────────────────────────────────────────────────

    /// Tick forever, sleeping `tick_interval` between ticks, until a fatal
    /// error or until `shutdown` completes.
    ///
    /// Ticks are synchronous; `shutdown` is only observed while sleeping, so
    /// a tick is never interrupted part-way.
    pub async fn run<F: Future>(&mut self, shutdown: F) -> Result<(), ManagerError> {
        tokio::pin!(shutdown);

        info!(
            screens = self.displays.len(),
            queued = self.queue.len(),
            tick_s = self.settings.tick_interval.as_secs_f64(),
            debug = self.settings.debug,
            "tick loop started"
        );

        loop {
            self.tick(Instant::now())?;

            tokio::select! {
                _ = tokio::time::sleep(self.settings.tick_interval) => {}
                _ = &mut shutdown => {
                    warn!("shutdown requested, leaving tick loop");
                    return Ok(());
                }
            }
        }
    }

    /// Current assignment, e.g. `"[A:welcome] [B:-]"`.
    pub fn snapshot(&self) -> String {
        self.displays
            .iter()
            .map(|d| format!("[{}:{}]", d.id, d.content_id().unwrap_or("-")))
            .collect::<Vec<_>>()
            .join(" ")
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Assign `content` to screen `index`, then render it.  Failures are logged
    /// here and returned for the caller's bookkeeping.
    fn show(&mut self, index: usize, content: Content, now: Instant) -> Result<(), ShowError> {
        let result = Self::show_on(
            &mut self.displays[index],
            content,
            now,
            &self.settings.image_dir,
            &self.driver,
        );
        if let Err(e) = &result {
            error!(display = %self.displays[index].id, "{}", e);
        }
        result
    }

    /// Assignment and start time are set before any I/O, so a failed render
    /// still occupies the slot until the content expires.
    ///
    /// * missing file → `MissingFile`, offline flag untouched
    /// * driver error → `Driver`, screen marked offline
    /// * success      → screen marked online
    fn show_on(
        display: &mut Display,
        mut content: Content,
        now: Instant,
        image_dir: &Path,
        driver: &D,
    ) -> Result<(), ShowError> {
        content.display_start = Some(now);
        let path = image_dir.join(&content.file);
        display.current = Some(content);

        if !path.exists() {
            return Err(ShowError::MissingFile { path });
        }

        match driver.render(&path, &display.id) {
            Ok(()) => {
                display.offline = false;
                Ok(())
            }
            Err(source) => {
                display.offline = true;
                Err(ShowError::Driver {
                    display: display.id.clone(),
                    source,
                })
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
