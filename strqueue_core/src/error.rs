// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Queue error types.

use alloc::collections::TryReserveError;
use core::fmt;

/// Errors reported by queue operations.
///
/// Every failing operation leaves the queue exactly as it was before the
/// call: head, tail, and size are never observed out of sync.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueueError {
    /// The operation was invoked without a queue.
    AbsentQueue,
    /// A removal was attempted on a queue with no elements.
    EmptyQueue,
    /// Storage for a node or its string payload could not be obtained.
    Allocation,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AbsentQueue => write!(f, "no queue"),
            Self::EmptyQueue => write!(f, "queue is empty"),
            Self::Allocation => write!(f, "could not allocate queue storage"),
        }
    }
}

impl core::error::Error for QueueError {}

impl From<TryReserveError> for QueueError {
    fn from(_: TryReserveError) -> Self {
        Self::Allocation
    }
}

/// A broken structural invariant, reported by
/// [`StrQueue::check_invariants`](crate::queue::StrQueue::check_invariants).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvariantViolation {
    /// Exactly one of head and tail is set, or either disagrees with a zero
    /// or non-zero size.
    EndpointMismatch {
        /// Cached element count.
        size: usize,
        /// Whether a head node is recorded.
        has_head: bool,
        /// Whether a tail node is recorded.
        has_tail: bool,
    },
    /// Walking from head visited a different number of nodes than cached.
    SizeMismatch {
        /// Cached element count.
        cached: usize,
        /// Nodes reached by walking the chain (capped at `cached + 1`).
        walked: usize,
    },
    /// The last node reached from head is not the recorded tail.
    TailNotLast {
        /// Slot recorded as tail.
        tail: u32,
        /// Slot actually reached last.
        last: u32,
    },
    /// Live and free slots do not add up to the allocated slot count.
    SlotLeak {
        /// Live nodes.
        live: usize,
        /// Slots on the free list.
        free: usize,
        /// Slots allocated in total.
        slots: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::EndpointMismatch {
                size,
                has_head,
                has_tail,
            } => write!(
                f,
                "endpoints disagree with size {size} (head set: {has_head}, tail set: {has_tail})"
            ),
            Self::SizeMismatch { cached, walked } => {
                write!(f, "size is {cached} but {walked} nodes are reachable")
            }
            Self::TailNotLast { tail, last } => {
                write!(f, "tail is slot {tail} but the chain ends at slot {last}")
            }
            Self::SlotLeak { live, free, slots } => write!(
                f,
                "{live} live + {free} free slots do not account for {slots} allocated"
            ),
        }
    }
}

impl core::error::Error for InvariantViolation {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn queue_error_messages() {
        assert_eq!(QueueError::AbsentQueue.to_string(), "no queue");
        assert_eq!(QueueError::EmptyQueue.to_string(), "queue is empty");
        assert_eq!(
            QueueError::Allocation.to_string(),
            "could not allocate queue storage"
        );
    }

    #[test]
    fn violation_message_names_counts() {
        let msg = InvariantViolation::SizeMismatch {
            cached: 3,
            walked: 2,
        }
        .to_string();
        assert!(msg.contains("size is 3"), "got: {msg}");
        assert!(msg.contains("2 nodes"), "got: {msg}");
    }
}
