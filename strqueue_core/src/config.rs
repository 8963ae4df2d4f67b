// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Queue configuration.
//!
//! A [`QueueConfig`] is fixed when the queue is created. It controls how many
//! node slots are reserved up front, which merge-sort strategy
//! [`StrQueue::sort`](crate::queue::StrQueue::sort) runs, and whether node
//! allocations should be made to fail on a deterministic schedule so callers
//! can exercise their allocation-failure paths.

use core::num::NonZeroU32;

/// Merge-sort shape used by [`StrQueue::sort`](crate::queue::StrQueue::sort).
///
/// Both strategies relink existing nodes only, split runs by length rather
/// than by value, and break ties in favor of the earlier run, so they produce
/// identical orders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortStrategy {
    /// Recursive halving. Stack depth grows with `log2(len)`.
    #[default]
    TopDown,
    /// Iterative merging of runs of width 1, 2, 4, and so on. Constant
    /// auxiliary space.
    BottomUp,
}

/// Deterministic allocation-failure schedule.
///
/// Every `every`-th node allocation attempt fails with
/// [`QueueError::Allocation`](crate::error::QueueError::Allocation) before any
/// memory is requested. Attempts are counted per queue, one for every call
/// to `insert_head` or `insert_tail`, and an attempt counts whether or not it
/// succeeds. An injected failure therefore consumes a slot in the schedule
/// just like a successful insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AllocFault {
    /// Period of the failure schedule.
    pub every: NonZeroU32,
}

impl AllocFault {
    /// Fails every `every`-th attempt, or returns `None` if `every` is zero.
    #[must_use]
    pub const fn every(every: u32) -> Option<Self> {
        match NonZeroU32::new(every) {
            Some(every) => Some(Self { every }),
            None => None,
        }
    }

    /// Returns whether the 1-based attempt number `attempt` should fail.
    #[inline]
    #[must_use]
    pub const fn fails(self, attempt: u64) -> bool {
        attempt != 0 && attempt % self.every.get() as u64 == 0
    }
}

/// Configuration for a [`StrQueue`](crate::queue::StrQueue).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QueueConfig {
    /// Node slots reserved at creation. Reservation failure at creation is
    /// ignored; slots are then obtained lazily on insertion.
    pub initial_capacity: usize,
    /// Merge-sort strategy.
    pub sort_strategy: SortStrategy,
    /// Optional allocation-failure schedule.
    pub alloc_fault: Option<AllocFault>,
}

impl QueueConfig {
    /// No pre-reserved slots, top-down sort, no injected failures.
    pub const DEFAULT: Self = Self {
        initial_capacity: 0,
        sort_strategy: SortStrategy::TopDown,
        alloc_fault: None,
    };

    /// Configuration for callers that must bound stack usage while sorting
    /// very long queues.
    #[must_use]
    pub const fn low_stack() -> Self {
        Self {
            sort_strategy: SortStrategy::BottomUp,
            ..Self::DEFAULT
        }
    }

    /// Returns this configuration with the given failure schedule.
    #[must_use]
    pub const fn with_alloc_fault(self, alloc_fault: Option<AllocFault>) -> Self {
        Self {
            alloc_fault,
            ..self
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_period_disables_faults() {
        assert_eq!(AllocFault::every(0), None);
    }

    #[test]
    fn fault_schedule_is_periodic() {
        let fault = AllocFault::every(3).unwrap();
        let failing: alloc::vec::Vec<u64> = (1..=9).filter(|&n| fault.fails(n)).collect();
        assert_eq!(failing, [3, 6, 9]);
    }

    #[test]
    fn low_stack_uses_bottom_up() {
        let config = QueueConfig::low_stack();
        assert_eq!(config.sort_strategy, SortStrategy::BottomUp);
        assert_eq!(config.initial_capacity, 0);
        assert!(config.alloc_fault.is_none(), "no faults by default");
    }
}
