// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chain traversal.

use core::iter::FusedIterator;

use super::id::INVALID;
use super::store::StrQueue;

/// An iterator over queue values from head to tail.
///
/// Created by [`StrQueue::iter`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    queue: &'a StrQueue,
    current: u32,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(queue: &'a StrQueue) -> Self {
        Self {
            queue,
            current: queue.head,
            remaining: queue.size,
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current as usize;
        self.current = self.queue.next[idx];
        self.remaining = self.remaining.saturating_sub(1);
        Some(self.queue.value[idx].as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a StrQueue {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
