// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Call surface over optional queue handles.
//!
//! Drivers that model "no queue" as a legitimate state (for example a test
//! harness that has not created its queue yet, or has already freed it) hold
//! an `Option<StrQueue>`. The functions here take that option directly:
//!
//! - mutators report [`QueueError::AbsentQueue`] for `None`;
//! - [`size`] reports `0` for `None`;
//! - [`reverse`], [`sort`], and [`destroy`] do nothing for `None`.
//!
//! With a live queue each function forwards to the matching
//! [`StrQueue`] method.

use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::queue::{SortStats, StrQueue};
use crate::trace::{OpKind, RejectEvent, Tracer};

/// Creates an empty queue with the default configuration.
#[must_use]
pub fn create() -> StrQueue {
    StrQueue::new()
}

/// Creates an empty queue with the given configuration.
#[must_use]
pub fn create_with(config: QueueConfig) -> StrQueue {
    StrQueue::with_config(config)
}

/// Releases the queue and every node in it. Does nothing for `None`.
pub fn destroy(q: Option<StrQueue>) {
    if let Some(q) = q {
        q.destroy();
    }
}

/// Inserts a copy of `s` at the head.
///
/// # Errors
///
/// [`QueueError::AbsentQueue`] for `None`, otherwise as
/// [`StrQueue::insert_head`].
pub fn insert_head(q: Option<&mut StrQueue>, s: &str) -> Result<(), QueueError> {
    insert_head_traced(q, s, &mut Tracer::none())
}

/// Like [`insert_head`], reporting to `tracer`.
///
/// # Errors
///
/// See [`insert_head`].
pub fn insert_head_traced(
    q: Option<&mut StrQueue>,
    s: &str,
    tracer: &mut Tracer<'_>,
) -> Result<(), QueueError> {
    present(q, OpKind::InsertHead, tracer)?.insert_head_traced(s, tracer)
}

/// Inserts a copy of `s` at the tail.
///
/// # Errors
///
/// [`QueueError::AbsentQueue`] for `None`, otherwise as
/// [`StrQueue::insert_tail`].
pub fn insert_tail(q: Option<&mut StrQueue>, s: &str) -> Result<(), QueueError> {
    insert_tail_traced(q, s, &mut Tracer::none())
}

/// Like [`insert_tail`], reporting to `tracer`.
///
/// # Errors
///
/// See [`insert_tail`].
pub fn insert_tail_traced(
    q: Option<&mut StrQueue>,
    s: &str,
    tracer: &mut Tracer<'_>,
) -> Result<(), QueueError> {
    present(q, OpKind::InsertTail, tracer)?.insert_tail_traced(s, tracer)
}

/// Removes the head, copying a truncated, NUL-terminated payload into `buf`
/// when one is supplied. Returns the payload bytes copied.
///
/// # Errors
///
/// [`QueueError::AbsentQueue`] for `None`, otherwise as
/// [`StrQueue::remove_head_into`].
pub fn remove_head(q: Option<&mut StrQueue>, buf: Option<&mut [u8]>) -> Result<usize, QueueError> {
    remove_head_traced(q, buf, &mut Tracer::none())
}

/// Like [`remove_head`], reporting to `tracer`.
///
/// # Errors
///
/// See [`remove_head`].
pub fn remove_head_traced(
    q: Option<&mut StrQueue>,
    buf: Option<&mut [u8]>,
    tracer: &mut Tracer<'_>,
) -> Result<usize, QueueError> {
    present(q, OpKind::RemoveHead, tracer)?.remove_head_into_traced(buf, tracer)
}

/// Returns the element count, or `0` for `None`.
#[must_use]
pub fn size(q: Option<&StrQueue>) -> usize {
    q.map_or(0, StrQueue::size)
}

/// Reverses the queue in place. Does nothing for `None`.
pub fn reverse(q: Option<&mut StrQueue>) {
    reverse_traced(q, &mut Tracer::none());
}

/// Like [`reverse`], reporting to `tracer`.
pub fn reverse_traced(q: Option<&mut StrQueue>, tracer: &mut Tracer<'_>) {
    if let Some(q) = q {
        q.reverse_traced(tracer);
    }
}

/// Sorts the queue in place. Does nothing for `None`.
pub fn sort(q: Option<&mut StrQueue>) -> SortStats {
    sort_traced(q, &mut Tracer::none())
}

/// Like [`sort`], reporting to `tracer`.
pub fn sort_traced(q: Option<&mut StrQueue>, tracer: &mut Tracer<'_>) -> SortStats {
    q.map_or_else(SortStats::default, |q| q.sort_traced(tracer))
}

fn present<'q>(
    q: Option<&'q mut StrQueue>,
    op: OpKind,
    tracer: &mut Tracer<'_>,
) -> Result<&'q mut StrQueue, QueueError> {
    q.ok_or_else(|| {
        tracer.reject(&RejectEvent {
            op,
            error: QueueError::AbsentQueue,
        });
        QueueError::AbsentQueue
    })
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn absent_queue_is_reported_or_ignored() {
        assert_eq!(insert_head(None, "x"), Err(QueueError::AbsentQueue));
        assert_eq!(insert_tail(None, "x"), Err(QueueError::AbsentQueue));
        let mut buf = [0_u8; 8];
        assert_eq!(remove_head(None, Some(&mut buf)), Err(QueueError::AbsentQueue));
        assert_eq!(buf, [0; 8], "buffer untouched");
        assert_eq!(size(None), 0);
        reverse(None);
        assert_eq!(sort(None), SortStats::default());
        destroy(None);
    }

    #[test]
    fn scenario_through_handles() {
        let mut q = Some(create());
        insert_tail(q.as_mut(), "banana").unwrap();
        insert_tail(q.as_mut(), "apple").unwrap();
        insert_head(q.as_mut(), "cherry").unwrap();
        assert_eq!(size(q.as_ref()), 3);

        sort(q.as_mut());
        assert_eq!(
            q.as_ref().unwrap().iter().collect::<Vec<_>>(),
            ["apple", "banana", "cherry"]
        );
        reverse(q.as_mut());
        assert_eq!(
            q.as_ref().unwrap().iter().collect::<Vec<_>>(),
            ["cherry", "banana", "apple"]
        );

        let mut buf = [0_u8; 4];
        assert_eq!(remove_head(q.as_mut(), Some(&mut buf)), Ok(3));
        assert_eq!(&buf, b"che\0");
        assert_eq!(size(q.as_ref()), 2);

        destroy(q.take());
        assert_eq!(size(q.as_ref()), 0);
    }

    #[test]
    fn remove_from_fresh_queue_fails() {
        let mut q = Some(create());
        assert_eq!(remove_head(q.as_mut(), None), Err(QueueError::EmptyQueue));
        assert_eq!(size(q.as_ref()), 0);
    }

    #[test]
    fn sort_single_is_noop() {
        let mut q = Some(create_with(QueueConfig::low_stack()));
        insert_tail(q.as_mut(), "only").unwrap();
        let stats = sort(q.as_mut());
        assert_eq!(stats.merges, 0);
        assert_eq!(size(q.as_ref()), 1);
        assert_eq!(q.as_ref().unwrap().head(), Some("only"));
    }

    #[cfg(feature = "trace")]
    #[test]
    fn absent_queue_is_traced() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Rejects(Vec<RejectEvent>);
        impl TraceSink for Rejects {
            fn on_reject(&mut self, e: &RejectEvent) {
                self.0.push(*e);
            }
        }

        let mut sink = Rejects::default();
        let mut tracer = Tracer::new(&mut sink);
        _ = insert_tail_traced(None, "x", &mut tracer);
        _ = remove_head_traced(None, None, &mut tracer);
        drop(tracer);
        assert_eq!(sink.0.len(), 2);
        assert_eq!(sink.0[0].op, OpKind::InsertTail);
        assert_eq!(sink.0[1].error, QueueError::AbsentQueue);
    }
}
