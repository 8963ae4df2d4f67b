// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Link-based merge sort over queue slots.
//!
//! Runs are chains of slot indices terminated by [`INVALID`]. Splitting walks
//! a fixed number of links (never inspects payloads), and merging repeatedly
//! takes the smaller head of the two runs, preferring the earlier run on
//! ties. Only `next` entries are rewritten; payloads never move.

use alloc::string::String;

#[cfg(feature = "trace-rich")]
use crate::trace::MergeEvent;
use crate::trace::Tracer;

use super::id::INVALID;
use super::order::SortStats;

/// Mutable link array paired with the read-only payloads it orders.
pub(crate) struct Links<'a> {
    next: &'a mut [u32],
    value: &'a [String],
    pub(crate) stats: SortStats,
}

impl<'a> Links<'a> {
    pub(crate) fn new(next: &'a mut [u32], value: &'a [String]) -> Self {
        Self {
            next,
            value,
            stats: SortStats::default(),
        }
    }

    /// Sorts the `len`-node run at `head` by recursive halving and returns
    /// the new head.
    pub(crate) fn sort_top_down(&mut self, head: u32, len: usize, tracer: &mut Tracer<'_>) -> u32 {
        if len < 2 {
            return head;
        }
        let left_len = len / 2;
        let right_len = len - left_len;
        let (right, _) = self.split_run(head, left_len);

        let left = self.sort_top_down(head, left_len, tracer);
        let right = self.sort_top_down(right, right_len, tracer);
        self.merge(left, left_len, right, right_len, tracer)
    }

    /// Sorts the run at `head` by merging adjacent runs of doubling width and
    /// returns the new head.
    pub(crate) fn sort_bottom_up(&mut self, mut head: u32, tracer: &mut Tracer<'_>) -> u32 {
        let mut width = 1_usize;
        loop {
            let mut rest = head;
            let mut merged_head = INVALID;
            let mut merged_tail = INVALID;
            let mut runs = 0_usize;

            while rest != INVALID {
                let left = rest;
                let (right, left_len) = self.split_run(left, width);
                let (after, right_len) = self.split_run(right, width);
                rest = after;

                let run = if right == INVALID {
                    left
                } else {
                    self.merge(left, left_len, right, right_len, tracer)
                };
                if merged_tail == INVALID {
                    merged_head = run;
                } else {
                    self.next[merged_tail as usize] = run;
                }
                merged_tail = self.run_end(run);
                runs += 1;
            }

            head = merged_head;
            if runs <= 1 {
                return head;
            }
            width = width.saturating_mul(2);
        }
    }

    /// Returns the last node of the non-empty run at `head`.
    pub(crate) fn run_end(&self, head: u32) -> u32 {
        let mut cur = head;
        while self.next[cur as usize] != INVALID {
            cur = self.next[cur as usize];
        }
        cur
    }

    /// Terminates the run at `head` after at most `count` nodes.
    ///
    /// Returns the detached remainder and the length actually kept.
    fn split_run(&mut self, head: u32, count: usize) -> (u32, usize) {
        if head == INVALID || count == 0 {
            return (head, 0);
        }
        let mut last = head;
        let mut len = 1;
        while len < count && self.next[last as usize] != INVALID {
            last = self.next[last as usize];
            len += 1;
        }
        let rest = self.next[last as usize];
        self.next[last as usize] = INVALID;
        (rest, len)
    }

    /// Merges two sorted runs and returns the head of the combined run.
    fn merge(
        &mut self,
        mut a: u32,
        left_len: usize,
        mut b: u32,
        right_len: usize,
        tracer: &mut Tracer<'_>,
    ) -> u32 {
        let mut head = INVALID;
        let mut last = INVALID;
        let mut comparisons = 0_usize;

        while a != INVALID && b != INVALID {
            comparisons += 1;
            // Ties go to the earlier run.
            let take = if self.value[b as usize] < self.value[a as usize] {
                let take = b;
                b = self.next[b as usize];
                take
            } else {
                let take = a;
                a = self.next[a as usize];
                take
            };
            if last == INVALID {
                head = take;
            } else {
                self.next[last as usize] = take;
            }
            last = take;
        }

        let rest = if a != INVALID { a } else { b };
        if last == INVALID {
            head = rest;
        } else {
            self.next[last as usize] = rest;
        }

        self.stats.merges += 1;
        self.stats.comparisons += comparisons;

        #[cfg(feature = "trace-rich")]
        tracer.merge(&MergeEvent {
            left_len,
            right_len,
            comparisons,
        });
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = (tracer, left_len, right_len);
        }

        head
    }
}
