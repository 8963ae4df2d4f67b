// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Singly linked queue of owned strings.
//!
//! `strqueue_core` provides [`StrQueue`](queue::StrQueue), a queue of owned
//! text values that supports insertion at both ends, removal at the head, an
//! O(1) size query, in-place reversal, and an in-place stable merge sort. It is
//! `no_std` compatible (with `alloc`) and stores nodes in struct-of-arrays
//! slots linked by index, so the queue exclusively owns every node and the
//! cached tail is a plain positional reference.
//!
//! # Architecture
//!
//! ```text
//!   caller ──► handle::*  (optional queue handles)
//!                 │
//!                 ▼
//!   StrQueue ── insert / remove / size          (queue::store)
//!       │
//!       ├──── reverse / sort ──► merge passes    (queue::order, queue::merge)
//!       │
//!       └──── Tracer ──► TraceSink               (trace)
//! ```
//!
//! **[`queue`]**: Slot storage, link bookkeeping, traversal, reversal, and
//! the link-based merge sort.
//!
//! **[`handle`]**: Free functions that accept an optional queue and report
//! [`QueueError::AbsentQueue`](error::QueueError::AbsentQueue) instead of
//! requiring a live queue at every call site.
//!
//! **[`config`]**: [`QueueConfig`](config::QueueConfig): initial capacity,
//! sort strategy, and deterministic allocation-failure injection.
//!
//! **[`error`]**: [`QueueError`](error::QueueError) and
//! [`InvariantViolation`](error::InvariantViolation).
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! queue instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-merge
//!   events emitted while sorting.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod error;
pub mod handle;
pub mod queue;
pub mod trace;
