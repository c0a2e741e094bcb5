/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! FIFO reserve of content not currently on any screen.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::content::Content;

/// Content waiting for a free (or expiring) screen.
///
/// Items leave from the head and return to the tail.  The only reordering is
/// [`shuffle`](Self::shuffle), applied once at startup when `random_start` is
/// configured.
#[derive(Debug, Default)]
pub struct RotationQueue {
    items: VecDeque<Content>,
}

impl RotationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `content` to the tail.
    pub fn enqueue(&mut self, content: Content) {
        self.items.push_back(content);
    }

    /// Remove and return the head, or `None` when the queue is empty.
    pub fn dequeue_front(&mut self) -> Option<Content> {
        self.items.pop_front()
    }

    /// Put `retired` at the tail and take the head.  On an empty queue the
    /// same item comes straight back.
    pub fn rotate(&mut self, retired: Content) -> Content {
        match self.items.pop_front() {
            Some(head) => {
                self.items.push_back(retired);
                head
            }
            None => retired,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Randomise the queue order in place.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.items.make_contiguous().shuffle(rng);
    }

    /// Content identifiers from head to tail.
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|c| c.id.as_str()).collect()
    }
}

impl FromIterator<Content> for RotationQueue {
    fn from_iter<I: IntoIterator<Item = Content>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn queue_of(ids: &[&str]) -> RotationQueue {
        ids.iter().map(|id| Content::new(*id, 1.0, "x.png")).collect()
    }

    #[test]
    fn fifo_order_is_preserved() {
        let mut q = queue_of(&["a", "b"]);
        q.enqueue(Content::new("c", 1.0, "c.png"));
        assert_eq!(q.dequeue_front().unwrap().id, "a");
        assert_eq!(q.dequeue_front().unwrap().id, "b");
        assert_eq!(q.dequeue_front().unwrap().id, "c");
        assert!(q.dequeue_front().is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn requeued_item_goes_to_the_tail() {
        let mut q = queue_of(&["a", "b", "c"]);
        let head = q.dequeue_front().unwrap();
        q.enqueue(head);
        assert_eq!(q.ids(), ["b", "c", "a"]);
    }

    #[test]
    fn rotate_swaps_head_for_retired_item() {
        let mut q = queue_of(&["b", "c"]);
        let head = q.rotate(Content::new("a", 1.0, "a.png"));
        assert_eq!(head.id, "b");
        assert_eq!(q.ids(), ["c", "a"]);
    }

    #[test]
    fn rotate_on_empty_queue_returns_the_same_item() {
        let mut q = RotationQueue::new();
        assert_eq!(q.rotate(Content::new("a", 1.0, "a.png")).id, "a");
        assert!(q.is_empty());
    }

    #[test]
    fn shuffle_keeps_every_item_exactly_once() {
        let ids = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let mut q = queue_of(&ids);
        let mut rng = StdRng::seed_from_u64(7);
        q.shuffle(&mut rng);

        let mut after: Vec<_> = q.ids().into_iter().map(String::from).collect();
        after.sort();
        assert_eq!(after, ids);
        assert_eq!(q.len(), ids.len());
    }

    #[test]
    fn shuffle_of_empty_queue_is_a_no_op() {
        let mut q = RotationQueue::new();
        q.shuffle(&mut StdRng::seed_from_u64(1));
        assert!(q.is_empty());
    }
}
