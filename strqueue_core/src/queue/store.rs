// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, linking, and removal.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::config::QueueConfig;
use crate::error::{InvariantViolation, QueueError};
use crate::trace::{AllocFailureEvent, InsertEvent, OpKind, RejectEvent, RemoveEvent, Tracer};

use super::id::{INVALID, SlotId};
use super::iter::Iter;

/// A singly linked queue of owned strings.
///
/// Nodes occupy slots in parallel arrays owned by the queue; each slot holds
/// a payload and the index of the next node. Released slots are recycled via
/// a free list, and per-slot generation counters distinguish a node from a
/// later node that reuses its slot.
///
/// The free list always has capacity for every allocated slot, so removal
/// never allocates and cannot fail for lack of memory.
pub struct StrQueue {
    // -- Node slots --
    pub(crate) value: Vec<String>,
    pub(crate) next: Vec<u32>,
    pub(crate) generation: Vec<u32>,

    // -- Allocation --
    pub(crate) free_list: Vec<u32>,
    pub(crate) slots: u32,
    alloc_attempts: u64,

    // -- Chain --
    pub(crate) head: u32,
    pub(crate) tail: u32,
    pub(crate) size: usize,

    pub(crate) config: QueueConfig,
}

impl Default for StrQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StrQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrQueue")
            .field("size", &self.size)
            .field("values", &self.iter().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl StrQueue {
    /// Creates an empty queue with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(QueueConfig::DEFAULT)
    }

    /// Creates an empty queue with the given configuration.
    ///
    /// If [`initial_capacity`](QueueConfig::initial_capacity) slots cannot be
    /// reserved, the queue is still created and obtains slots on demand.
    #[must_use]
    pub fn with_config(config: QueueConfig) -> Self {
        let mut queue = Self {
            value: Vec::new(),
            next: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            slots: 0,
            alloc_attempts: 0,
            head: INVALID,
            tail: INVALID,
            size: 0,
            config,
        };
        if config.initial_capacity > 0 {
            _ = queue.reserve_slots(config.initial_capacity);
        }
        queue
    }

    /// Creates an empty queue with room for `capacity` nodes.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Allocation`] if the slots cannot be reserved.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, QueueError> {
        let mut queue = Self::new();
        queue.reserve_slots(capacity)?;
        Ok(queue)
    }

    /// Returns the configuration the queue was created with.
    #[must_use]
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Releases every node and the queue itself.
    ///
    /// Equivalent to dropping the queue. Node storage is released slot by
    /// slot without recursion, so arbitrarily long queues are safe to drop.
    pub fn destroy(self) {
        drop(self);
    }

    /// Releases every node, leaving an empty queue that can be reused.
    ///
    /// Slot capacity is retained.
    pub fn clear(&mut self) {
        while self.head != INVALID {
            drop(self.unlink_head());
        }
    }

    // -- Insertion API --

    /// Copies `s` into a new node linked before the current head.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Allocation`] if storage for the node or its
    /// payload cannot be obtained. The queue is unchanged on failure.
    pub fn insert_head(&mut self, s: &str) -> Result<(), QueueError> {
        self.insert_head_traced(s, &mut Tracer::none())
    }

    /// Like [`insert_head`](Self::insert_head), reporting to `tracer`.
    ///
    /// # Errors
    ///
    /// See [`insert_head`](Self::insert_head).
    pub fn insert_head_traced(
        &mut self,
        s: &str,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), QueueError> {
        let idx = self.alloc_node(s, OpKind::InsertHead, tracer)?;
        self.next[idx as usize] = self.head;
        self.head = idx;
        if self.tail == INVALID {
            self.tail = idx;
        }
        self.size += 1;

        tracer.insert(&InsertEvent {
            op: OpKind::InsertHead,
            slot: idx,
            value_len: s.len(),
            size_after: self.size,
        });
        Ok(())
    }

    /// Copies `s` into a new node linked after the current tail.
    ///
    /// Runs in constant time using the cached tail.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Allocation`] if storage for the node or its
    /// payload cannot be obtained. The queue is unchanged on failure.
    pub fn insert_tail(&mut self, s: &str) -> Result<(), QueueError> {
        self.insert_tail_traced(s, &mut Tracer::none())
    }

    /// Like [`insert_tail`](Self::insert_tail), reporting to `tracer`.
    ///
    /// # Errors
    ///
    /// See [`insert_tail`](Self::insert_tail).
    pub fn insert_tail_traced(
        &mut self,
        s: &str,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), QueueError> {
        let idx = self.alloc_node(s, OpKind::InsertTail, tracer)?;
        if self.tail == INVALID {
            self.head = idx;
        } else {
            self.next[self.tail as usize] = idx;
        }
        self.tail = idx;
        self.size += 1;

        tracer.insert(&InsertEvent {
            op: OpKind::InsertTail,
            slot: idx,
            value_len: s.len(),
            size_after: self.size,
        });
        Ok(())
    }

    // -- Removal API --

    /// Detaches the head node and returns its payload.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::EmptyQueue`] if there is nothing to remove.
    pub fn remove_head(&mut self) -> Result<String, QueueError> {
        self.remove_head_traced(&mut Tracer::none())
    }

    /// Like [`remove_head`](Self::remove_head), reporting to `tracer`.
    ///
    /// # Errors
    ///
    /// See [`remove_head`](Self::remove_head).
    pub fn remove_head_traced(&mut self, tracer: &mut Tracer<'_>) -> Result<String, QueueError> {
        let (idx, value) = self.detach_head(tracer)?;
        tracer.remove(&RemoveEvent {
            slot: idx,
            value_len: value.len(),
            copied: 0,
            truncated: false,
            size_after: self.size,
        });
        Ok(value)
    }

    /// Detaches and releases the head node, copying its payload into `buf`.
    ///
    /// At most `buf.len() - 1` payload bytes are copied, followed by a NUL
    /// terminator. Longer payloads are truncated silently; a zero-length
    /// buffer receives nothing. Returns the number of payload bytes copied
    /// (zero when `buf` is `None`).
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::EmptyQueue`] if there is nothing to remove.
    pub fn remove_head_into(&mut self, buf: Option<&mut [u8]>) -> Result<usize, QueueError> {
        self.remove_head_into_traced(buf, &mut Tracer::none())
    }

    /// Like [`remove_head_into`](Self::remove_head_into), reporting to
    /// `tracer`.
    ///
    /// # Errors
    ///
    /// See [`remove_head_into`](Self::remove_head_into).
    pub fn remove_head_into_traced(
        &mut self,
        buf: Option<&mut [u8]>,
        tracer: &mut Tracer<'_>,
    ) -> Result<usize, QueueError> {
        let (idx, value) = self.detach_head(tracer)?;
        let requested = buf.is_some();
        let copied = buf.map_or(0, |buf| copy_truncated(&value, buf));

        tracer.remove(&RemoveEvent {
            slot: idx,
            value_len: value.len(),
            copied,
            truncated: requested && copied < value.len(),
            size_after: self.size,
        });
        Ok(copied)
    }

    // -- Query API --

    /// Returns the number of nodes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns whether the queue has no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the head payload without removing it.
    #[must_use]
    pub fn head(&self) -> Option<&str> {
        self.value_at(self.head)
    }

    /// Returns the tail payload without removing it.
    #[must_use]
    pub fn tail(&self) -> Option<&str> {
        self.value_at(self.tail)
    }

    /// Returns the identity of the head node.
    #[must_use]
    pub fn head_slot(&self) -> Option<SlotId> {
        self.slot_id(self.head)
    }

    /// Returns the identity of the tail node.
    #[must_use]
    pub fn tail_slot(&self) -> Option<SlotId> {
        self.slot_id(self.tail)
    }

    /// Returns an iterator over payloads from head to tail.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Walks the chain and verifies head, tail, size, and slot accounting.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let has_head = self.head != INVALID;
        let has_tail = self.tail != INVALID;
        if has_head != has_tail || has_head != (self.size > 0) {
            return Err(InvariantViolation::EndpointMismatch {
                size: self.size,
                has_head,
                has_tail,
            });
        }

        // Stop one past the cached size so a cycle cannot spin forever.
        let mut walked = 0;
        let mut last = INVALID;
        let mut cur = self.head;
        while cur != INVALID && walked <= self.size {
            last = cur;
            walked += 1;
            cur = self.next[cur as usize];
        }
        if walked != self.size {
            return Err(InvariantViolation::SizeMismatch {
                cached: self.size,
                walked,
            });
        }
        if last != self.tail {
            return Err(InvariantViolation::TailNotLast {
                tail: self.tail,
                last,
            });
        }

        let free = self.free_list.len();
        let slots = self.slots as usize;
        if self.size + free != slots {
            return Err(InvariantViolation::SlotLeak {
                live: self.size,
                free,
                slots,
            });
        }
        Ok(())
    }

    // -- Internal helpers --

    fn value_at(&self, idx: u32) -> Option<&str> {
        (idx != INVALID).then(|| self.value[idx as usize].as_str())
    }

    fn slot_id(&self, idx: u32) -> Option<SlotId> {
        (idx != INVALID).then(|| SlotId {
            idx,
            generation: self.generation[idx as usize],
        })
    }

    /// Ensures room for `additional` new slots in every slot array, and room
    /// on the free list for all of them.
    fn reserve_slots(&mut self, additional: usize) -> Result<(), QueueError> {
        let total = (self.slots as usize)
            .checked_add(additional)
            .filter(|&total| total <= INVALID as usize)
            .ok_or(QueueError::Allocation)?;
        let extra = total - self.value.len();
        self.value.try_reserve(extra)?;
        self.next.try_reserve(extra)?;
        self.generation.try_reserve(extra)?;
        self.free_list.try_reserve(total - self.free_list.len())?;
        Ok(())
    }

    /// Obtains a slot holding a copy of `s` with no successor.
    ///
    /// Nothing observable changes unless this succeeds.
    fn alloc_node(
        &mut self,
        s: &str,
        op: OpKind,
        tracer: &mut Tracer<'_>,
    ) -> Result<u32, QueueError> {
        self.alloc_attempts = self.alloc_attempts.saturating_add(1);
        let injected = self
            .config
            .alloc_fault
            .is_some_and(|fault| fault.fails(self.alloc_attempts));

        let copied = if injected {
            Err(QueueError::Allocation)
        } else {
            self.copy_payload(s)
        };
        match copied {
            Ok(value) => Ok(self.place(value)),
            Err(err) => {
                tracer.alloc_failure(&AllocFailureEvent {
                    op,
                    requested: s.len(),
                    injected,
                });
                Err(err)
            }
        }
    }

    fn copy_payload(&mut self, s: &str) -> Result<String, QueueError> {
        let mut value = String::new();
        value.try_reserve_exact(s.len())?;
        value.push_str(s);
        if self.free_list.is_empty() {
            self.reserve_slots(1)?;
        }
        Ok(value)
    }

    /// Stores `value` in a recycled or fresh slot. Capacity must already be
    /// reserved.
    fn place(&mut self, value: String) -> u32 {
        if let Some(idx) = self.free_list.pop() {
            self.value[idx as usize] = value;
            self.next[idx as usize] = INVALID;
            idx
        } else {
            let idx = self.slots;
            self.slots += 1;
            self.value.push(value);
            self.next.push(INVALID);
            self.generation.push(0);
            idx
        }
    }

    fn detach_head(&mut self, tracer: &mut Tracer<'_>) -> Result<(u32, String), QueueError> {
        if self.head == INVALID {
            tracer.reject(&RejectEvent {
                op: OpKind::RemoveHead,
                error: QueueError::EmptyQueue,
            });
            return Err(QueueError::EmptyQueue);
        }
        let idx = self.head;
        Ok((idx, self.unlink_head()))
    }

    /// Unlinks a non-empty queue's head node, recycles its slot, and returns
    /// the payload.
    fn unlink_head(&mut self) -> String {
        let idx = self.head;
        let i = idx as usize;
        let value = core::mem::take(&mut self.value[i]);

        self.head = self.next[i];
        self.next[i] = INVALID;
        if self.head == INVALID {
            self.tail = INVALID;
        }
        self.size -= 1;

        // Bump generation so ids taken before removal no longer match.
        self.generation[i] = self.generation[i].wrapping_add(1);
        debug_assert!(
            self.free_list.len() < self.free_list.capacity(),
            "free list capacity is reserved per slot"
        );
        self.free_list.push(idx);
        value
    }
}

/// Copies up to `buf.len() - 1` bytes of `value` into `buf` followed by a NUL
/// terminator. Returns the payload bytes copied.
fn copy_truncated(value: &str, buf: &mut [u8]) -> usize {
    let Some(room) = buf.len().checked_sub(1) else {
        return 0;
    };
    let n = room.min(value.len());
    buf[..n].copy_from_slice(&value.as_bytes()[..n]);
    buf[n] = 0;
    n
}
