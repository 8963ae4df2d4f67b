// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node slot identity.

use core::fmt;

/// Sentinel value indicating "no node" in link and endpoint fields.
pub const INVALID: u32 = u32::MAX;

/// Identity of the node occupying a slot in a [`StrQueue`](super::StrQueue).
///
/// Contains both a slot index and a generation counter. The generation is
/// bumped whenever a node is released, so a `SlotId` taken before a removal
/// never compares equal to the node that later reuses the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    /// Slot index into the queue's arrays.
    pub(crate) idx: u32,
    /// Generation counter of the slot when this id was taken.
    pub(crate) generation: u32,
}

impl SlotId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotId({}@gen{})", self.idx, self.generation)
    }
}
