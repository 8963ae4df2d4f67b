// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command execution against an optional queue and a shadow model.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use strqueue_core::config::{AllocFault, QueueConfig};
use strqueue_core::error::{InvariantViolation, QueueError};
use strqueue_core::handle;
use strqueue_core::queue::StrQueue;
use strqueue_core::trace::Tracer;

use crate::command::{Command, HarnessOption};

/// Removal buffer capacity used until `option length` changes it.
pub const DEFAULT_REMOVE_CAPACITY: usize = 1024;

/// Result of a command that passed its checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The command completed with nothing to report.
    Done,
    /// Insertions were attempted; some may have hit injected allocation
    /// failures.
    Inserted {
        /// Insertions attempted.
        attempted: u32,
        /// Insertions refused for lack of storage.
        failed: u32,
    },
    /// The head was removed. Holds the text copied out, if a buffer was
    /// used.
    Removed(Option<String>),
    /// Current size.
    Size(usize),
    /// Current contents, head first.
    Contents(Vec<String>),
    /// The queue correctly refused the command (no queue, or nothing to
    /// remove).
    Refused(QueueError),
}

/// A check that failed while executing a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecError {
    /// The queue reports a broken structural invariant.
    Inconsistent(InvariantViolation),
    /// The queue reports a different size than expected.
    SizeMismatch {
        /// Expected size.
        expected: usize,
        /// Reported size.
        actual: usize,
    },
    /// Traversal disagrees with the expected contents.
    ContentsMismatch {
        /// First differing position from head.
        position: usize,
    },
    /// The removed value is not the expected one.
    RemovedMismatch {
        /// Expected value (or its truncated prefix).
        expected: String,
        /// Value actually copied out.
        actual: String,
    },
    /// The copied-out value was not NUL terminated.
    MissingTerminator,
    /// After sorting, a value is smaller than its predecessor.
    NotSorted {
        /// Position of the out-of-order value.
        position: usize,
    },
    /// Reversal did not exchange the head and tail nodes.
    EndpointsNotSwapped,
    /// The queue returned an error the harness did not expect.
    Unexpected(QueueError),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inconsistent(violation) => write!(f, "inconsistent queue: {violation}"),
            Self::SizeMismatch { expected, actual } => {
                write!(f, "expected size {expected}, queue reports {actual}")
            }
            Self::ContentsMismatch { position } => {
                write!(f, "contents differ at position {position}")
            }
            Self::RemovedMismatch { expected, actual } => {
                write!(f, "removed `{actual}`, expected `{expected}`")
            }
            Self::MissingTerminator => write!(f, "removed value is not NUL terminated"),
            Self::NotSorted { position } => write!(f, "not sorted at position {position}"),
            Self::EndpointsNotSwapped => write!(f, "reverse did not swap head and tail"),
            Self::Unexpected(err) => write!(f, "unexpected error: {err}"),
        }
    }
}

impl core::error::Error for ExecError {}

/// Overall verdict of a harness run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Grade {
    /// Every command passed its checks.
    Pass,
    /// At least one command failed a check.
    Fail,
}

impl Grade {
    /// Returns a short label for summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

/// A failed command and its position in the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    /// 0-based command index.
    pub index: usize,
    /// What went wrong.
    pub error: ExecError,
}

/// Aggregated report returned by [`Harness::run`] and [`Harness::report`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessReport {
    /// Commands executed.
    pub commands: u64,
    /// Commands the queue correctly refused.
    pub refused: u64,
    /// Insertions that hit allocation failures.
    pub alloc_failures: u64,
    /// Commands that failed a check.
    pub failures: Vec<Failure>,
    /// Verdict.
    pub grade: Grade,
}

/// Drives a queue through commands and checks it against a shadow model.
///
/// The harness holds an `Option<StrQueue>` and goes through the
/// [`handle`] functions, so commands issued before `new` or after `free`
/// exercise the no-queue paths.
#[derive(Debug)]
pub struct Harness {
    queue: Option<StrQueue>,
    model: VecDeque<String>,
    config: QueueConfig,
    remove_capacity: usize,
    commands: u64,
    refused: u64,
    alloc_failures: u64,
    failures: Vec<Failure>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(QueueConfig::DEFAULT)
    }
}

impl Harness {
    /// Creates a harness with no queue. `config` applies to queues created
    /// by `new`.
    #[must_use]
    pub fn new(config: QueueConfig) -> Self {
        Self {
            queue: None,
            model: VecDeque::new(),
            config,
            remove_capacity: DEFAULT_REMOVE_CAPACITY,
            commands: 0,
            refused: 0,
            alloc_failures: 0,
            failures: Vec::new(),
        }
    }

    /// Returns the queue under test, if one exists.
    #[must_use]
    pub fn queue(&self) -> Option<&StrQueue> {
        self.queue.as_ref()
    }

    /// Returns the contents the queue is expected to hold.
    #[must_use]
    pub fn expected(&self) -> &VecDeque<String> {
        &self.model
    }

    /// Executes every command and returns the report.
    ///
    /// Failing commands are recorded and execution continues.
    pub fn run(&mut self, commands: &[Command], tracer: &mut Tracer<'_>) -> HarnessReport {
        for command in commands {
            _ = self.step(command, tracer);
        }
        self.report()
    }

    /// Executes one command, recording its result in the report.
    ///
    /// # Errors
    ///
    /// Returns the failed check, which is also recorded.
    pub fn step(
        &mut self,
        command: &Command,
        tracer: &mut Tracer<'_>,
    ) -> Result<Outcome, ExecError> {
        let index = usize::try_from(self.commands).unwrap_or(usize::MAX);
        self.commands = self.commands.saturating_add(1);
        let result = self.execute(command, tracer);
        match &result {
            Ok(Outcome::Refused(_)) => self.refused += 1,
            Ok(Outcome::Inserted { failed, .. }) => self.alloc_failures += u64::from(*failed),
            Ok(_) => {}
            Err(error) => self.failures.push(Failure {
                index,
                error: error.clone(),
            }),
        }
        result
    }

    /// Returns the report for the commands executed so far.
    #[must_use]
    pub fn report(&self) -> HarnessReport {
        HarnessReport {
            commands: self.commands,
            refused: self.refused,
            alloc_failures: self.alloc_failures,
            failures: self.failures.clone(),
            grade: if self.failures.is_empty() {
                Grade::Pass
            } else {
                Grade::Fail
            },
        }
    }

    /// Executes one command and checks the queue afterwards, without
    /// recording anything in the report.
    ///
    /// # Errors
    ///
    /// Returns the first check that failed.
    pub fn execute(
        &mut self,
        command: &Command,
        tracer: &mut Tracer<'_>,
    ) -> Result<Outcome, ExecError> {
        match command {
            Command::New => {
                handle::destroy(self.queue.take());
                self.queue = Some(handle::create_with(self.config));
                self.model.clear();
                self.verify()?;
                Ok(Outcome::Done)
            }
            Command::Free => {
                handle::destroy(self.queue.take());
                self.model.clear();
                Ok(Outcome::Done)
            }
            Command::InsertHead { value, repeat } => self.insert(value, *repeat, true, tracer),
            Command::InsertTail { value, repeat } => self.insert(value, *repeat, false, tracer),
            Command::RemoveHead { expected } => self.remove(expected.as_deref(), true, tracer),
            Command::RemoveHeadQuiet => self.remove(None, false, tracer),
            Command::Reverse => {
                let before = self.queue.as_ref().map(|q| (q.head_slot(), q.tail_slot()));
                handle::reverse_traced(self.queue.as_mut(), tracer);
                self.model.make_contiguous().reverse();
                if let (Some((head, tail)), Some(q)) = (before, self.queue.as_ref()) {
                    if q.head_slot() != tail || q.tail_slot() != head {
                        return Err(ExecError::EndpointsNotSwapped);
                    }
                }
                self.verify()?;
                Ok(Outcome::Done)
            }
            Command::Sort => {
                handle::sort_traced(self.queue.as_mut(), tracer);
                self.model.make_contiguous().sort();
                if let Some(q) = &self.queue {
                    let values: Vec<&str> = q.iter().collect();
                    if let Some(i) = values.windows(2).position(|w| w[0] > w[1]) {
                        return Err(ExecError::NotSorted { position: i + 1 });
                    }
                }
                self.verify()?;
                Ok(Outcome::Done)
            }
            Command::Size { expected } => {
                let actual = handle::size(self.queue.as_ref());
                let expected = expected.unwrap_or(self.model.len());
                if actual != expected {
                    return Err(ExecError::SizeMismatch { expected, actual });
                }
                self.verify()?;
                Ok(Outcome::Size(actual))
            }
            Command::Show => {
                self.verify()?;
                let contents = self
                    .queue
                    .as_ref()
                    .map(|q| q.iter().map(String::from).collect())
                    .unwrap_or_default();
                Ok(Outcome::Contents(contents))
            }
            Command::Set(option) => {
                match *option {
                    HarnessOption::RemoveCapacity(capacity) => self.remove_capacity = capacity,
                    HarnessOption::FailEvery(every) => {
                        self.config = self.config.with_alloc_fault(AllocFault::every(every));
                    }
                }
                Ok(Outcome::Done)
            }
        }
    }

    fn insert(
        &mut self,
        value: &str,
        repeat: u32,
        at_head: bool,
        tracer: &mut Tracer<'_>,
    ) -> Result<Outcome, ExecError> {
        let mut attempted = 0;
        let mut failed = 0;
        for _ in 0..repeat {
            attempted += 1;
            let result = if at_head {
                handle::insert_head_traced(self.queue.as_mut(), value, tracer)
            } else {
                handle::insert_tail_traced(self.queue.as_mut(), value, tracer)
            };
            match result {
                Ok(()) if at_head => self.model.push_front(value.into()),
                Ok(()) => self.model.push_back(value.into()),
                Err(QueueError::AbsentQueue) if self.queue.is_none() => {
                    return Ok(Outcome::Refused(QueueError::AbsentQueue));
                }
                Err(QueueError::Allocation) if self.queue_injects_faults() => failed += 1,
                Err(err) => return Err(ExecError::Unexpected(err)),
            }
            // A failed insertion must leave the queue as it was.
            self.verify()?;
        }
        Ok(Outcome::Inserted { attempted, failed })
    }

    fn remove(
        &mut self,
        expected: Option<&str>,
        copy_out: bool,
        tracer: &mut Tracer<'_>,
    ) -> Result<Outcome, ExecError> {
        let mut buf = if copy_out {
            vec![0_u8; self.remove_capacity]
        } else {
            Vec::new()
        };
        let out = copy_out.then_some(buf.as_mut_slice());

        let copied = match handle::remove_head_traced(self.queue.as_mut(), out, tracer) {
            Ok(copied) => copied,
            Err(QueueError::AbsentQueue) if self.queue.is_none() => {
                return Ok(Outcome::Refused(QueueError::AbsentQueue));
            }
            Err(QueueError::EmptyQueue) if self.model.is_empty() => {
                return Ok(Outcome::Refused(QueueError::EmptyQueue));
            }
            Err(err) => return Err(ExecError::Unexpected(err)),
        };
        let Some(removed) = self.model.pop_front() else {
            return Err(ExecError::SizeMismatch {
                expected: 0,
                actual: handle::size(self.queue.as_ref()) + 1,
            });
        };

        if let Some(expected) = expected {
            if removed != expected {
                return Err(ExecError::RemovedMismatch {
                    expected: expected.into(),
                    actual: removed,
                });
            }
        }

        let text = if copy_out {
            let keep = self.remove_capacity.saturating_sub(1).min(removed.len());
            let want = &removed.as_bytes()[..keep];
            if buf.get(..copied) != Some(want) {
                return Err(ExecError::RemovedMismatch {
                    expected: String::from_utf8_lossy(want).into_owned(),
                    actual: String::from_utf8_lossy(buf.get(..copied).unwrap_or_default())
                        .into_owned(),
                });
            }
            if self.remove_capacity > 0 && buf.get(copied) != Some(&0) {
                return Err(ExecError::MissingTerminator);
            }
            Some(String::from_utf8_lossy(want).into_owned())
        } else {
            None
        };

        self.verify()?;
        Ok(Outcome::Removed(text))
    }

    /// Whether the live queue was created with a fault schedule. Later
    /// `option fail` commands only affect queues created after them.
    fn queue_injects_faults(&self) -> bool {
        self.queue
            .as_ref()
            .is_some_and(|q| q.config().alloc_fault.is_some())
    }

    /// Checks structure, size, and contents against the model.
    fn verify(&self) -> Result<(), ExecError> {
        let Some(q) = &self.queue else {
            return Ok(());
        };
        q.check_invariants().map_err(ExecError::Inconsistent)?;
        if q.size() != self.model.len() {
            return Err(ExecError::SizeMismatch {
                expected: self.model.len(),
                actual: q.size(),
            });
        }
        if let Some(position) = q
            .iter()
            .zip(self.model.iter())
            .position(|(actual, expected)| actual != expected)
        {
            return Err(ExecError::ContentsMismatch { position });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_script;

    fn run_script(harness: &mut Harness, script: &str) -> HarnessReport {
        let commands = parse_script(script).unwrap();
        harness.run(&commands, &mut Tracer::none())
    }

    #[test]
    fn scenario_passes() {
        let mut harness = Harness::default();
        let report = run_script(
            &mut harness,
            "new\n\
             it banana\n\
             it apple\n\
             ih cherry\n\
             size 3\n\
             sort\n\
             reverse\n\
             option length 4\n\
             rh cherry\n\
             size 2\n",
        );
        assert_eq!(report.grade, Grade::Pass, "{:?}", report.failures);
        assert_eq!(report.commands, 10);
        let contents: Vec<&str> = harness.queue().unwrap().iter().collect();
        assert_eq!(contents, ["banana", "apple"]);
    }

    #[test]
    fn truncated_removal_is_reported() {
        let mut harness = Harness::default();
        let commands = parse_script("new\nit cherry\noption length 4\n").unwrap();
        harness.run(&commands, &mut Tracer::none());
        let outcome = harness
            .step(&Command::RemoveHead { expected: None }, &mut Tracer::none())
            .unwrap();
        assert_eq!(outcome, Outcome::Removed(Some("che".into())));
    }

    #[test]
    fn absent_and_empty_queues_are_refused() {
        let mut harness = Harness::default();
        let report = run_script(&mut harness, "ih x\nrh\nsize 0\nsort\nreverse\nnew\nrh\nfree\n");
        assert_eq!(report.grade, Grade::Pass, "{:?}", report.failures);
        assert_eq!(report.refused, 3);
    }

    #[test]
    fn wrong_expectations_fail() {
        let mut harness = Harness::default();
        let report = run_script(&mut harness, "new\nit a\nsize 2\nrh b\n");
        assert_eq!(report.grade, Grade::Fail);
        assert_eq!(
            report.failures,
            [
                Failure {
                    index: 2,
                    error: ExecError::SizeMismatch {
                        expected: 2,
                        actual: 1
                    }
                },
                Failure {
                    index: 3,
                    error: ExecError::RemovedMismatch {
                        expected: "b".into(),
                        actual: "a".into()
                    }
                },
            ]
        );
    }

    #[test]
    fn injected_failures_are_tolerated() {
        let mut harness = Harness::default();
        let report = run_script(&mut harness, "option fail 3\nnew\nit x 10\nsort\nreverse\n");
        assert_eq!(report.grade, Grade::Pass, "{:?}", report.failures);
        assert_eq!(report.alloc_failures, 3);
        assert_eq!(harness.queue().unwrap().size(), 7);
        assert_eq!(harness.expected().len(), 7);
    }

    #[test]
    fn fault_schedule_follows_queue_created_with_it() {
        let mut harness = Harness::default();
        let report = run_script(&mut harness, "option fail 2\nnew\noption fail 0\nit x 2\n");
        assert_eq!(report.grade, Grade::Pass, "{:?}", report.failures);
        assert_eq!(report.alloc_failures, 1);
        assert_eq!(harness.queue().unwrap().size(), 1);

        // A queue created after turning injection off never fails.
        let report = run_script(&mut harness, "new\nit y 4\nsize 4\n");
        assert_eq!(report.grade, Grade::Pass, "{:?}", report.failures);
        assert_eq!(report.alloc_failures, 1);
    }

    #[test]
    fn fault_set_after_new_leaves_live_queue_alone() {
        let mut harness = Harness::default();
        let report = run_script(&mut harness, "new\noption fail 1\nit x 3\nsize 3\n");
        assert_eq!(report.grade, Grade::Pass, "{:?}", report.failures);
        assert_eq!(report.alloc_failures, 0);
        assert!(harness.queue().unwrap().config().alloc_fault.is_none());

        // The next queue picks the schedule up.
        let report = run_script(&mut harness, "new\nit z 2\nsize 0\n");
        assert_eq!(report.grade, Grade::Pass, "{:?}", report.failures);
        assert_eq!(report.alloc_failures, 2);
    }

    #[test]
    fn quiet_removal_copies_nothing() {
        let mut harness = Harness::default();
        let commands = parse_script("new\nih a\nih b\n").unwrap();
        harness.run(&commands, &mut Tracer::none());
        let outcome = harness
            .step(&Command::RemoveHeadQuiet, &mut Tracer::none())
            .unwrap();
        assert_eq!(outcome, Outcome::Removed(None));
        assert_eq!(harness.expected().front().map(String::as_str), Some("a"));
    }

    #[test]
    fn zero_capacity_removal() {
        let mut harness = Harness::default();
        let report = run_script(&mut harness, "new\nit abc\noption length 0\nrh\nsize 0\n");
        assert_eq!(report.grade, Grade::Pass, "{:?}", report.failures);
    }

    #[test]
    fn show_lists_contents() {
        let mut harness = Harness::default();
        run_script(&mut harness, "new\nit b\nih a\n");
        let outcome = harness.step(&Command::Show, &mut Tracer::none()).unwrap();
        assert_eq!(outcome, Outcome::Contents(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn bottom_up_config_passes_stability_run() {
        let mut harness = Harness::new(QueueConfig::low_stack());
        let report = run_script(
            &mut harness,
            "new\nit m 3\nit c\nih z 2\nit a\nsort\nshow\nreverse\nsort\nrh a\nrh c\n",
        );
        assert_eq!(report.grade, Grade::Pass, "{:?}", report.failures);
    }

    #[test]
    fn grade_labels() {
        assert_eq!(Grade::Pass.as_str(), "PASS");
        assert_eq!(Grade::Fail.as_str(), "FAIL");
    }
}
