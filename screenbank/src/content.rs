/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core data structures for the rotation engine.
//!
//! ```text
//! config ──► Content ──► RotationQueue ◄──(swap)──► Display.current
//!                         FIFO reserve               one slot per screen
//! ```
//!
//! # Ownership model
//! A [`Content`] value lives in exactly one place: either the
//! [`RotationQueue`](crate::queue::RotationQueue) or the `current` field of a
//! single [`Display`].  Content is moved between the two, never cloned, so the
//! "never both, never duplicated" rule is enforced by the compiler rather than
//! by bookkeeping.

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

// ── Content ───────────────────────────────────────────────────────────────────

/// One displayable item (an image file) with its show duration.
#[derive(Debug, PartialEq)]
pub struct Content {
    /// Identifier from the `images` section of the configuration.
    pub id: String,

    /// How long the item stays on a screen, in seconds.
    pub duration_s: f64,

    /// File name, resolved against the configured image directory.
    pub file: PathBuf,

    /// When the item was last assigned to a display.  `None` until the first
    /// assignment.
    pub display_start: Option<Instant>,
}

impl Content {
    pub fn new(id: impl Into<String>, duration_s: f64, file: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            duration_s,
            file: file.into(),
            display_start: None,
        }
    }

    /// Signed overrun in seconds: `(now − display_start) − duration`.
    ///
    /// * negative → duration not yet met
    /// * zero     → duration exactly met
    /// * positive → duration exceeded
    ///
    /// Content that has never been shown is treated as shown at `now`.
    pub fn overrun_s(&self, now: Instant) -> f64 {
        let shown_for = self
            .display_start
            .map(|start| now.saturating_duration_since(start).as_secs_f64())
            .unwrap_or(0.0);
        shown_for - self.duration_s
    }

    /// `true` once the item has been on screen strictly longer than its
    /// duration.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.overrun_s(now) > 0.0
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

/// One managed screen slot.
///
/// Screens start out offline: a slot only counts as online after the driver
/// has accepted a render for it.
#[derive(Debug)]
pub struct Display {
    /// Screen identifier as programmed into the device.
    pub id: String,

    /// Content currently assigned to this slot.
    pub current: Option<Content>,

    /// Set after a driver failure, cleared after a successful render.
    pub offline: bool,
}

impl Display {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            current: None,
            offline: true,
        }
    }

    /// Two displays refer to the same slot when their identifiers match.
    pub fn same_slot(&self, other: &Display) -> bool {
        self.id == other.id
    }

    /// Orders displays by identifier (used to pick the lowest offline slot).
    pub fn cmp_id(&self, other: &Display) -> Ordering {
        self.id.cmp(&other.id)
    }

    /// Identifier of the current content, if any.
    pub fn content_id(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.id.as_str())
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Returns the index of the display whose identifier is `id`.
pub fn find_display(displays: &[Display], id: &str) -> Option<usize> {
    displays.iter().position(|d| d.id == id)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    // ── Content ───────────────────────────────────────────────────────────────

    #[test]
    fn overrun_is_negative_before_duration() {
        let t0 = Instant::now();
        let mut c = Content::new("img", 5.0, "img.png");
        c.display_start = Some(t0);
        let over = c.overrun_s(t0 + Duration::from_secs(2));
        assert!((over - -3.0).abs() < 1e-9);
        assert!(!c.is_expired(t0 + Duration::from_secs(2)));
    }

    #[test]
    fn exactly_met_duration_is_not_expired() {
        let t0 = Instant::now();
        let mut c = Content::new("img", 2.0, "img.png");
        c.display_start = Some(t0);
        assert!(!c.is_expired(t0 + Duration::from_secs(2)));
        assert!(c.is_expired(t0 + Duration::from_millis(2_001)));
    }

    #[test]
    fn never_shown_content_is_not_expired() {
        let c = Content::new("img", 1.0, "img.png");
        assert!(!c.is_expired(Instant::now()));
    }

    #[test]
    fn zero_duration_expires_as_soon_as_time_passes() {
        let t0 = Instant::now();
        let mut c = Content::new("flash", 0.0, "flash.png");
        c.display_start = Some(t0);
        assert!(!c.is_expired(t0));
        assert!(c.is_expired(t0 + Duration::from_millis(1)));
    }

    // ── Display ───────────────────────────────────────────────────────────────

    #[test]
    fn new_display_is_offline_and_empty() {
        let d = Display::new("A");
        assert!(d.offline);
        assert!(d.current.is_none());
        assert_eq!(d.content_id(), None);
    }

    #[test]
    fn same_slot_compares_identifiers_only() {
        let mut a = Display::new("A");
        a.offline = false;
        let a2 = Display::new("A");
        let b = Display::new("B");
        assert!(a.same_slot(&a2));
        assert!(!a.same_slot(&b));
    }

    #[test]
    fn cmp_id_sorts_lexicographically() {
        let mut v = vec![Display::new("C"), Display::new("A"), Display::new("B")];
        v.sort_by(|x, y| x.cmp_id(y));
        let ids: Vec<_> = v.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["A", "B", "C"]);
    }

    #[test]
    fn find_display_by_identifier() {
        let v = vec![Display::new("A"), Display::new("B")];
        assert_eq!(find_display(&v, "B"), Some(1));
        assert_eq!(find_display(&v, "Z"), None);
    }
}
