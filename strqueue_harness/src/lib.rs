// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-driven exerciser and consistency checker for strqueue queues.
//!
//! A [`Harness`] owns an optional queue and a shadow model of its expected
//! contents. Each [`Command`] is applied to both, then the queue is checked
//! for structural consistency and agreement with the model. Scripts are
//! plain text, one command per line (see [`command`] for the syntax).
//!
//! ```
//! use strqueue_core::trace::Tracer;
//! use strqueue_harness::{Grade, Harness, parse_script};
//!
//! let script = "new\nit banana\nit apple\nih cherry\nsort\nrh apple\nsize 2\n";
//! let commands = parse_script(script).unwrap();
//! let report = Harness::default().run(&commands, &mut Tracer::none());
//! assert_eq!(report.grade, Grade::Pass);
//! ```

#![no_std]

extern crate alloc;

pub mod command;
mod session;

pub use command::{Command, HarnessOption, ParseError, ParseErrorKind, parse_line, parse_script};
pub use session::{
    DEFAULT_REMOVE_CAPACITY, ExecError, Failure, Grade, Harness, HarnessReport, Outcome,
};
