// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON export for strqueue diagnostics.
//!
//! This crate provides [`TraceSink`](strqueue_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`json::export`]: writes a JSON array of events from recorded bytes.
//!
//! [`Tee`] forwards every event to two sinks, so a run can be printed and
//! recorded at once.

pub mod json;
pub mod pretty;
pub mod recorder;

use strqueue_core::trace::{
    AllocFailureEvent, InsertEvent, MergeEvent, RejectEvent, RemoveEvent, ReverseEvent, SortEvent,
    TraceSink,
};

/// A [`TraceSink`] that forwards each event to `A` and then `B`.
#[derive(Debug, Default)]
pub struct Tee<A, B> {
    /// First receiver.
    pub first: A,
    /// Second receiver.
    pub second: B,
}

impl<A: TraceSink, B: TraceSink> Tee<A, B> {
    /// Pairs two sinks.
    #[must_use]
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Splits the tee back into its sinks.
    #[must_use]
    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: TraceSink, B: TraceSink> TraceSink for Tee<A, B> {
    fn on_insert(&mut self, e: &InsertEvent) {
        self.first.on_insert(e);
        self.second.on_insert(e);
    }

    fn on_remove(&mut self, e: &RemoveEvent) {
        self.first.on_remove(e);
        self.second.on_remove(e);
    }

    fn on_reverse(&mut self, e: &ReverseEvent) {
        self.first.on_reverse(e);
        self.second.on_reverse(e);
    }

    fn on_sort(&mut self, e: &SortEvent) {
        self.first.on_sort(e);
        self.second.on_sort(e);
    }

    fn on_alloc_failure(&mut self, e: &AllocFailureEvent) {
        self.first.on_alloc_failure(e);
        self.second.on_alloc_failure(e);
    }

    fn on_reject(&mut self, e: &RejectEvent) {
        self.first.on_reject(e);
        self.second.on_reject(e);
    }

    fn on_merge(&mut self, e: &MergeEvent) {
        self.first.on_merge(e);
        self.second.on_merge(e);
    }
}
