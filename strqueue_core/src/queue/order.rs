// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-place reordering: reversal and sorting.

use crate::config::SortStrategy;
use crate::trace::{ReverseEvent, SortEvent, Tracer};

use super::id::INVALID;
use super::merge::Links;
use super::store::StrQueue;

/// Counters collected by a single [`StrQueue::sort`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SortStats {
    /// Elements sorted.
    pub len: usize,
    /// Run merges performed.
    pub merges: usize,
    /// Payload comparisons performed.
    pub comparisons: usize,
}

impl StrQueue {
    /// Reverses the queue in place.
    ///
    /// Every link is redirected to its predecessor in a single pass, then
    /// head and tail trade places. No node is allocated, released, or
    /// copied. Queues with fewer than two nodes are left untouched.
    pub fn reverse(&mut self) {
        self.reverse_traced(&mut Tracer::none());
    }

    /// Like [`reverse`](Self::reverse), reporting to `tracer`.
    pub fn reverse_traced(&mut self, tracer: &mut Tracer<'_>) {
        if self.size < 2 {
            return;
        }
        let old_head = self.head;
        let mut prev = INVALID;
        let mut cur = self.head;
        while cur != INVALID {
            let next = self.next[cur as usize];
            self.next[cur as usize] = prev;
            prev = cur;
            cur = next;
        }
        self.head = prev;
        self.tail = old_head;

        tracer.reverse(&ReverseEvent {
            size: self.size,
            old_head,
            new_head: self.head,
        });
    }

    /// Sorts the queue in non-decreasing byte-wise order, in place.
    ///
    /// Nodes are relinked by a stable merge sort; payloads stay in their
    /// slots and nothing is allocated. The split policy is by length, and
    /// equal values keep their relative order. The merge shape follows
    /// [`QueueConfig::sort_strategy`](crate::config::QueueConfig::sort_strategy).
    /// Queues with fewer than two nodes are left untouched.
    pub fn sort(&mut self) -> SortStats {
        self.sort_traced(&mut Tracer::none())
    }

    /// Like [`sort`](Self::sort), reporting to `tracer`.
    pub fn sort_traced(&mut self, tracer: &mut Tracer<'_>) -> SortStats {
        if self.size < 2 {
            return SortStats {
                len: self.size,
                ..SortStats::default()
            };
        }

        let strategy = self.config.sort_strategy;
        let mut links = Links::new(&mut self.next, &self.value);
        let head = match strategy {
            SortStrategy::TopDown => links.sort_top_down(self.head, self.size, tracer),
            SortStrategy::BottomUp => links.sort_bottom_up(self.head, tracer),
        };
        // Rebuild the tail by walking to the new last node.
        let tail = links.run_end(head);
        let stats = SortStats {
            len: self.size,
            ..links.stats
        };
        self.head = head;
        self.tail = tail;

        tracer.sort(&SortEvent {
            strategy,
            size: stats.len,
            merges: stats.merges,
            comparisons: stats.comparisons,
        });
        stats
    }
}
