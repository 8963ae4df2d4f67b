// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records, each introduced by a one
//! byte tag. Lengths and counts are widened to `u64`. [`decode`] reads them
//! back as an iterator of [`RecordedEvent`].

use strqueue_core::config::SortStrategy;
use strqueue_core::error::QueueError;
use strqueue_core::trace::{
    AllocFailureEvent, InsertEvent, MergeEvent, OpKind, RejectEvent, RemoveEvent, ReverseEvent,
    SortEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_INSERT: u8 = 1;
const TAG_REMOVE: u8 = 2;
const TAG_REVERSE: u8 = 3;
const TAG_SORT: u8 = 4;
const TAG_ALLOC_FAILURE: u8 = 5;
const TAG_REJECT: u8 = 6;
const TAG_MERGE: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_len(&mut self, v: usize) {
        let v = u64::try_from(v).unwrap_or(u64::MAX);
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_op(&mut self, op: OpKind) {
        self.write_u8(match op {
            OpKind::InsertHead => 0,
            OpKind::InsertTail => 1,
            OpKind::RemoveHead => 2,
            OpKind::Reverse => 3,
            OpKind::Sort => 4,
        });
    }

    fn write_strategy(&mut self, s: SortStrategy) {
        self.write_u8(match s {
            SortStrategy::TopDown => 0,
            SortStrategy::BottomUp => 1,
        });
    }

    fn write_error(&mut self, e: QueueError) {
        self.write_u8(match e {
            QueueError::AbsentQueue => 0,
            QueueError::EmptyQueue => 1,
            QueueError::Allocation => 2,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_insert(&mut self, e: &InsertEvent) {
        self.write_u8(TAG_INSERT);
        self.write_op(e.op);
        self.write_u32(e.slot);
        self.write_len(e.value_len);
        self.write_len(e.size_after);
    }

    fn on_remove(&mut self, e: &RemoveEvent) {
        self.write_u8(TAG_REMOVE);
        self.write_u32(e.slot);
        self.write_len(e.value_len);
        self.write_len(e.copied);
        self.write_bool(e.truncated);
        self.write_len(e.size_after);
    }

    fn on_reverse(&mut self, e: &ReverseEvent) {
        self.write_u8(TAG_REVERSE);
        self.write_len(e.size);
        self.write_u32(e.old_head);
        self.write_u32(e.new_head);
    }

    fn on_sort(&mut self, e: &SortEvent) {
        self.write_u8(TAG_SORT);
        self.write_strategy(e.strategy);
        self.write_len(e.size);
        self.write_len(e.merges);
        self.write_len(e.comparisons);
    }

    fn on_alloc_failure(&mut self, e: &AllocFailureEvent) {
        self.write_u8(TAG_ALLOC_FAILURE);
        self.write_op(e.op);
        self.write_len(e.requested);
        self.write_bool(e.injected);
    }

    fn on_reject(&mut self, e: &RejectEvent) {
        self.write_u8(TAG_REJECT);
        self.write_op(e.op);
        self.write_error(e.error);
    }

    fn on_merge(&mut self, e: &MergeEvent) {
        self.write_u8(TAG_MERGE);
        self.write_len(e.left_len);
        self.write_len(e.right_len);
        self.write_len(e.comparisons);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// An [`InsertEvent`].
    Insert(InsertEvent),
    /// A [`RemoveEvent`].
    Remove(RemoveEvent),
    /// A [`ReverseEvent`].
    Reverse(ReverseEvent),
    /// A [`SortEvent`].
    Sort(SortEvent),
    /// An [`AllocFailureEvent`].
    AllocFailure(AllocFailureEvent),
    /// A [`RejectEvent`].
    Reject(RejectEvent),
    /// A [`MergeEvent`].
    Merge(MergeEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos.checked_add(N)?)?;
        self.pos += N;
        bytes.try_into().ok()
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_len(&mut self) -> Option<usize> {
        usize::try_from(self.take().map(u64::from_le_bytes)?).ok()
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_op(&mut self) -> Option<OpKind> {
        Some(match self.read_u8()? {
            0 => OpKind::InsertHead,
            1 => OpKind::InsertTail,
            2 => OpKind::RemoveHead,
            3 => OpKind::Reverse,
            4 => OpKind::Sort,
            _ => return None,
        })
    }

    fn read_strategy(&mut self) -> Option<SortStrategy> {
        Some(match self.read_u8()? {
            0 => SortStrategy::TopDown,
            1 => SortStrategy::BottomUp,
            _ => return None,
        })
    }

    fn read_error(&mut self) -> Option<QueueError> {
        Some(match self.read_u8()? {
            0 => QueueError::AbsentQueue,
            1 => QueueError::EmptyQueue,
            2 => QueueError::Allocation,
            _ => return None,
        })
    }

    fn decode_insert(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Insert(InsertEvent {
            op: self.read_op()?,
            slot: self.read_u32()?,
            value_len: self.read_len()?,
            size_after: self.read_len()?,
        }))
    }

    fn decode_remove(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Remove(RemoveEvent {
            slot: self.read_u32()?,
            value_len: self.read_len()?,
            copied: self.read_len()?,
            truncated: self.read_bool()?,
            size_after: self.read_len()?,
        }))
    }

    fn decode_reverse(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Reverse(ReverseEvent {
            size: self.read_len()?,
            old_head: self.read_u32()?,
            new_head: self.read_u32()?,
        }))
    }

    fn decode_sort(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Sort(SortEvent {
            strategy: self.read_strategy()?,
            size: self.read_len()?,
            merges: self.read_len()?,
            comparisons: self.read_len()?,
        }))
    }

    fn decode_alloc_failure(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::AllocFailure(AllocFailureEvent {
            op: self.read_op()?,
            requested: self.read_len()?,
            injected: self.read_bool()?,
        }))
    }

    fn decode_reject(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Reject(RejectEvent {
            op: self.read_op()?,
            error: self.read_error()?,
        }))
    }

    fn decode_merge(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Merge(MergeEvent {
            left_len: self.read_len()?,
            right_len: self.read_len()?,
            comparisons: self.read_len()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_INSERT => self.decode_insert(),
            TAG_REMOVE => self.decode_remove(),
            TAG_REVERSE => self.decode_reverse(),
            TAG_SORT => self.decode_sort(),
            TAG_ALLOC_FAILURE => self.decode_alloc_failure(),
            TAG_REJECT => self.decode_reject(),
            TAG_MERGE => self.decode_merge(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use strqueue_core::config::{AllocFault, QueueConfig};
    use strqueue_core::queue::StrQueue;
    use strqueue_core::trace::Tracer;

    #[test]
    fn decodes_events_in_order() {
        let mut rec = RecorderSink::new();
        let insert = InsertEvent {
            op: OpKind::InsertHead,
            slot: 2,
            value_len: 6,
            size_after: 3,
        };
        let remove = RemoveEvent {
            slot: 2,
            value_len: 6,
            copied: 3,
            truncated: true,
            size_after: 2,
        };
        let reject = RejectEvent {
            op: OpKind::RemoveHead,
            error: QueueError::EmptyQueue,
        };
        rec.on_insert(&insert);
        rec.on_remove(&remove);
        rec.on_reject(&reject);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [
                RecordedEvent::Insert(insert),
                RecordedEvent::Remove(remove),
                RecordedEvent::Reject(reject),
            ]
        );
    }

    #[test]
    fn records_a_queue_session() {
        let mut rec = RecorderSink::new();
        let mut q = StrQueue::new();
        {
            let mut tracer = Tracer::new(&mut rec);
            q.insert_tail_traced("banana", &mut tracer).unwrap();
            q.insert_tail_traced("apple", &mut tracer).unwrap();
            q.insert_head_traced("cherry", &mut tracer).unwrap();
            q.sort_traced(&mut tracer);
            q.reverse_traced(&mut tracer);
            let mut buf = [0_u8; 4];
            q.remove_head_into_traced(Some(&mut buf), &mut tracer)
                .unwrap();
        }

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        let inserts = events
            .iter()
            .filter(|e| matches!(e, RecordedEvent::Insert(_)))
            .count();
        let merges = events
            .iter()
            .filter(|e| matches!(e, RecordedEvent::Merge(_)))
            .count();
        assert_eq!(inserts, 3);
        assert_eq!(merges, 2, "three nodes merge twice");
        match events.last() {
            Some(RecordedEvent::Remove(e)) => {
                assert_eq!(e.copied, 3);
                assert!(e.truncated);
                assert_eq!(e.size_after, 2);
            }
            other => panic!("expected Remove, got {other:?}"),
        }
        assert!(
            events
                .iter()
                .any(|e| matches!(e, RecordedEvent::Sort(s) if s.size == 3)),
            "sort recorded"
        );
    }

    #[test]
    fn records_injected_failures() {
        let config = QueueConfig::DEFAULT.with_alloc_fault(AllocFault::every(1));
        let mut q = StrQueue::with_config(config);
        let mut rec = RecorderSink::new();
        let mut tracer = Tracer::new(&mut rec);
        assert_eq!(
            q.insert_tail_traced("x", &mut tracer),
            Err(QueueError::Allocation)
        );
        drop(tracer);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [RecordedEvent::AllocFailure(AllocFailureEvent {
                op: OpKind::InsertTail,
                requested: 1,
                injected: true,
            })]
        );
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_reverse(&ReverseEvent {
            size: 4,
            old_head: 0,
            new_head: 3,
        });
        rec.on_reverse(&ReverseEvent {
            size: 4,
            old_head: 3,
            new_head: 0,
        });
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 1];
        assert_eq!(decode(cut).count(), 1);
    }

    #[test]
    fn unknown_enum_byte_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_sort(&SortEvent {
            strategy: SortStrategy::BottomUp,
            size: 2,
            merges: 1,
            comparisons: 1,
        });
        rec.on_reject(&RejectEvent {
            op: OpKind::Sort,
            error: QueueError::AbsentQueue,
        });
        rec.on_reject(&RejectEvent {
            op: OpKind::RemoveHead,
            error: QueueError::EmptyQueue,
        });
        let mut bytes = rec.into_bytes();

        // Strategy byte of the sort record.
        bytes[1] = 9;
        assert_eq!(decode(&bytes).count(), 0);

        // Error byte of the first reject record.
        bytes[1] = 1;
        let reject_error = 1 + 1 + 3 * 8 + 2;
        assert_eq!(bytes[reject_error], 0);
        bytes[reject_error] = 7;
        let events: Vec<_> = decode(&bytes).collect();
        assert_eq!(events.len(), 1, "got: {events:?}");
        assert!(matches!(events[0], RecordedEvent::Sort(_)));
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_merge(&MergeEvent {
            left_len: 1,
            right_len: 2,
            comparisons: 2,
        });
        let mut bytes = rec.into_bytes();
        bytes.push(0xff);
        bytes.extend_from_slice(&[0; 16]);
        assert_eq!(decode(&bytes).count(), 1);
    }
}
