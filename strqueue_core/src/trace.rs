// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for queue operations.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! queue's `*_traced` operations call as they complete. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`MergeEvent`] and the
//!   corresponding `TraceSink` method.

use crate::config::SortStrategy;
use crate::error::QueueError;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which queue operation an event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Insertion before the head.
    InsertHead,
    /// Insertion after the tail.
    InsertTail,
    /// Removal of the head.
    RemoveHead,
    /// In-place reversal.
    Reverse,
    /// In-place sort.
    Sort,
}

impl OpKind {
    /// Returns a short label for log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsertHead => "insert_head",
            Self::InsertTail => "insert_tail",
            Self::RemoveHead => "remove_head",
            Self::Reverse => "reverse",
            Self::Sort => "sort",
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a node has been linked into the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsertEvent {
    /// [`OpKind::InsertHead`] or [`OpKind::InsertTail`].
    pub op: OpKind,
    /// Slot that now holds the node.
    pub slot: u32,
    /// Payload length in bytes.
    pub value_len: usize,
    /// Element count after the insertion.
    pub size_after: usize,
}

/// Emitted after the head node has been detached and released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemoveEvent {
    /// Slot the node occupied.
    pub slot: u32,
    /// Payload length in bytes.
    pub value_len: usize,
    /// Payload bytes copied into the caller's buffer.
    pub copied: usize,
    /// Whether the copy was cut short by the buffer capacity.
    pub truncated: bool,
    /// Element count after the removal.
    pub size_after: usize,
}

/// Emitted after the queue has been reversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReverseEvent {
    /// Element count.
    pub size: usize,
    /// Head slot before reversal (now the tail).
    pub old_head: u32,
    /// Head slot after reversal (formerly the tail).
    pub new_head: u32,
}

/// Emitted after the queue has been sorted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortEvent {
    /// Strategy that ran.
    pub strategy: SortStrategy,
    /// Element count.
    pub size: usize,
    /// Run merges performed.
    pub merges: usize,
    /// Payload comparisons performed.
    pub comparisons: usize,
}

/// Emitted when an insertion could not obtain storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocFailureEvent {
    /// Operation that failed.
    pub op: OpKind,
    /// Payload bytes that were being copied.
    pub requested: usize,
    /// Whether the failure came from the configured fault schedule rather
    /// than the allocator.
    pub injected: bool,
}

/// Emitted when an operation is refused without touching the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RejectEvent {
    /// Operation that was refused.
    pub op: OpKind,
    /// Reason.
    pub error: QueueError,
}

/// A single run merge inside a sort.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeEvent {
    /// Length of the earlier run.
    pub left_len: usize,
    /// Length of the later run.
    pub right_len: usize,
    /// Comparisons this merge performed.
    pub comparisons: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from queue operations.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after an insertion.
    fn on_insert(&mut self, e: &InsertEvent) {
        _ = e;
    }

    /// Called after a head removal.
    fn on_remove(&mut self, e: &RemoveEvent) {
        _ = e;
    }

    /// Called after a reversal.
    fn on_reverse(&mut self, e: &ReverseEvent) {
        _ = e;
    }

    /// Called after a sort.
    fn on_sort(&mut self, e: &SortEvent) {
        _ = e;
    }

    /// Called when an insertion fails to obtain storage.
    fn on_alloc_failure(&mut self, e: &AllocFailureEvent) {
        _ = e;
    }

    /// Called when an operation is refused.
    fn on_reject(&mut self, e: &RejectEvent) {
        _ = e;
    }

    /// Called for each run merge (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_merge(&mut self, e: &MergeEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`InsertEvent`].
    #[inline]
    pub fn insert(&mut self, e: &InsertEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_insert(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RemoveEvent`].
    #[inline]
    pub fn remove(&mut self, e: &RemoveEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_remove(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ReverseEvent`].
    #[inline]
    pub fn reverse(&mut self, e: &ReverseEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reverse(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SortEvent`].
    #[inline]
    pub fn sort(&mut self, e: &SortEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_sort(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AllocFailureEvent`].
    #[inline]
    pub fn alloc_failure(&mut self, e: &AllocFailureEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_alloc_failure(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RejectEvent`].
    #[inline]
    pub fn reject(&mut self, e: &RejectEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reject(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MergeEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn merge(&mut self, e: &MergeEvent) {
        if let Some(s) = &mut self.sink {
            s.on_merge(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_insert() -> InsertEvent {
        InsertEvent {
            op: OpKind::InsertTail,
            slot: 3,
            value_len: 6,
            size_after: 4,
        }
    }

    #[test]
    fn op_labels() {
        assert_eq!(OpKind::InsertHead.as_str(), "insert_head");
        assert_eq!(OpKind::RemoveHead.as_str(), "remove_head");
        assert_eq!(OpKind::Sort.as_str(), "sort");
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_insert(&sample_insert());
        sink.on_sort(&SortEvent {
            strategy: SortStrategy::TopDown,
            size: 0,
            merges: 0,
            comparisons: 0,
        });
        sink.on_reject(&RejectEvent {
            op: OpKind::RemoveHead,
            error: QueueError::EmptyQueue,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.insert(&sample_insert());
        tracer.reverse(&ReverseEvent {
            size: 2,
            old_head: 0,
            new_head: 1,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            slots: Vec<u32>,
        }
        impl TraceSink for RecordingSink {
            fn on_insert(&mut self, e: &InsertEvent) {
                self.slots.push(e.slot);
            }
        }

        let mut sink = RecordingSink { slots: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.insert(&sample_insert());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.slots, &[3]);
    }
}
