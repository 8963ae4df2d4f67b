// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use strqueue_core::queue::INVALID;
use strqueue_core::trace::{
    AllocFailureEvent, InsertEvent, MergeEvent, RejectEvent, RemoveEvent, ReverseEvent, SortEvent,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    merges: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("merges", &self.merges)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    ///
    /// Per-merge lines are off; see [`with_merges`](Self::with_merges).
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            merges: false,
        }
    }

    /// Enables or disables one line per run merge during sorts.
    #[must_use]
    pub fn with_merges(mut self, merges: bool) -> Self {
        self.merges = merges;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Formats a slot index, showing `-` for the end-of-chain sentinel.
struct Slot(u32);

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == INVALID {
            f.write_str("-")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_insert(&mut self, e: &InsertEvent) {
        let _ = writeln!(
            self.writer,
            "[{}] slot={} len={} size={}",
            e.op.as_str(),
            e.slot,
            e.value_len,
            e.size_after,
        );
    }

    fn on_remove(&mut self, e: &RemoveEvent) {
        let truncated = if e.truncated { " TRUNCATED" } else { "" };
        let _ = writeln!(
            self.writer,
            "[remove_head] slot={} len={} copied={}{truncated} size={}",
            e.slot, e.value_len, e.copied, e.size_after,
        );
    }

    fn on_reverse(&mut self, e: &ReverseEvent) {
        let _ = writeln!(
            self.writer,
            "[reverse] size={} head={}->{}",
            e.size,
            Slot(e.old_head),
            Slot(e.new_head),
        );
    }

    fn on_sort(&mut self, e: &SortEvent) {
        let _ = writeln!(
            self.writer,
            "[sort] strategy={:?} size={} merges={} comparisons={}",
            e.strategy, e.size, e.merges, e.comparisons,
        );
    }

    fn on_alloc_failure(&mut self, e: &AllocFailureEvent) {
        let source = if e.injected { "injected" } else { "allocator" };
        let _ = writeln!(
            self.writer,
            "[alloc:FAILED] op={} requested={} source={source}",
            e.op.as_str(),
            e.requested,
        );
    }

    fn on_reject(&mut self, e: &RejectEvent) {
        let _ = writeln!(
            self.writer,
            "[reject] op={} reason={}",
            e.op.as_str(),
            e.error,
        );
    }

    fn on_merge(&mut self, e: &MergeEvent) {
        if !self.merges {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[merge] left={} right={} comparisons={}",
            e.left_len, e.right_len, e.comparisons,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strqueue_core::config::SortStrategy;
    use strqueue_core::error::QueueError;
    use strqueue_core::trace::OpKind;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_insert() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_insert(&InsertEvent {
            op: OpKind::InsertTail,
            slot: 3,
            value_len: 6,
            size_after: 4,
        });
        let output = output(sink);
        assert!(output.contains("[insert_tail]"), "got: {output}");
        assert!(output.contains("slot=3"), "got: {output}");
        assert!(output.contains("size=4"), "got: {output}");
    }

    #[test]
    fn pretty_print_truncated_remove() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_remove(&RemoveEvent {
            slot: 0,
            value_len: 6,
            copied: 3,
            truncated: true,
            size_after: 2,
        });
        let output = output(sink);
        assert!(output.contains("copied=3 TRUNCATED"), "got: {output}");
    }

    #[test]
    fn pretty_print_reject_and_sort() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_reject(&RejectEvent {
            op: OpKind::RemoveHead,
            error: QueueError::EmptyQueue,
        });
        sink.on_sort(&SortEvent {
            strategy: SortStrategy::BottomUp,
            size: 3,
            merges: 2,
            comparisons: 3,
        });
        let output = output(sink);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2, "got: {output}");
        assert_eq!(lines[0], "[reject] op=remove_head reason=queue is empty");
        assert!(lines[1].contains("strategy=BottomUp"), "got: {output}");
    }

    #[test]
    fn merges_are_opt_in() {
        let event = MergeEvent {
            left_len: 1,
            right_len: 1,
            comparisons: 1,
        };
        let mut quiet = PrettyPrintSink::with_writer(Vec::<u8>::new());
        quiet.on_merge(&event);
        assert!(output(quiet).is_empty());

        let mut loud = PrettyPrintSink::with_writer(Vec::<u8>::new()).with_merges(true);
        loud.on_merge(&event);
        assert!(output(loud).starts_with("[merge]"));
    }

    #[test]
    fn sentinel_slot_prints_dash() {
        assert_eq!(Slot(INVALID).to_string(), "-");
        assert_eq!(Slot(7).to_string(), "7");
    }
}
