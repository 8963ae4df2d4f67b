// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Queue data model.
//!
//! A [`StrQueue`] is an ordered chain of *nodes*. Each node holds:
//!
//! - An owned copy of a string payload. Inserting copies the caller's text;
//!   removing hands the payload back or copies it into a caller buffer.
//! - A link to the next node, or [`INVALID`] for the last node.
//!
//! Nodes live in struct-of-arrays slots owned by the queue, and links are
//! slot indices. The queue records the head slot, the tail slot, and the
//! element count, and every operation keeps the three consistent:
//!
//! - `size == 0` if and only if head and tail are both [`INVALID`].
//! - Walking from head visits exactly `size` nodes and ends at tail, whose
//!   link is [`INVALID`].
//!
//! Tail is a positional reference only. It is never used to release storage
//! and is re-pointed whenever the last node changes (insertion at the tail,
//! removal of the only node, reversal, sort).
//!
//! # Reordering
//!
//! [`reverse`](StrQueue::reverse) and [`sort`](StrQueue::sort) relink
//! existing nodes without allocating and without moving payloads between
//! slots. Sorting is a stable merge sort whose shape is chosen by
//! [`SortStrategy`](crate::config::SortStrategy).

mod id;
mod iter;
mod merge;
mod order;
mod store;

pub use id::{INVALID, SlotId};
pub use iter::Iter;
pub use order::SortStats;
pub use store::StrQueue;
