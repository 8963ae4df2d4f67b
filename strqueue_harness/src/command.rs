// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Harness commands and the line-oriented script syntax.
//!
//! One command per line; blank lines and text after `#` are ignored.
//!
//! ```text
//! new                 create a queue (replacing any existing one)
//! free                release the queue
//! ih <str> [n]        insert <str> at the head, n times
//! it <str> [n]        insert <str> at the tail, n times
//! rh [str]            remove the head, optionally checking its value
//! rhq                 remove the head without copying it out
//! reverse             reverse in place
//! sort                sort in place
//! size [n]            report the size, optionally checking it
//! show                list the contents
//! option length <n>   capacity of the removal buffer
//! option fail <n>     fail every n-th allocation of new queues (0 = off)
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// A single harness command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create a queue, releasing any existing one.
    New,
    /// Release the queue.
    Free,
    /// Insert `value` at the head `repeat` times.
    InsertHead {
        /// Payload.
        value: String,
        /// Number of insertions.
        repeat: u32,
    },
    /// Insert `value` at the tail `repeat` times.
    InsertTail {
        /// Payload.
        value: String,
        /// Number of insertions.
        repeat: u32,
    },
    /// Remove the head through the removal buffer.
    RemoveHead {
        /// Value the removed node must hold, if given.
        expected: Option<String>,
    },
    /// Remove the head without a buffer.
    RemoveHeadQuiet,
    /// Reverse the queue.
    Reverse,
    /// Sort the queue.
    Sort,
    /// Query the size.
    Size {
        /// Size the queue must report, if given.
        expected: Option<usize>,
    },
    /// List the contents.
    Show,
    /// Change a harness option.
    Set(HarnessOption),
}

/// A harness option set by `option <name> <value>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HarnessOption {
    /// Capacity in bytes of the buffer handed to head removal.
    RemoveCapacity(usize),
    /// Allocation-failure period for queues created afterwards; `0` turns
    /// injection off.
    FailEvery(u32),
}

/// Why a script line could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The first word is not a known command.
    UnknownCommand(String),
    /// `option` named something other than `length` or `fail`.
    UnknownOption(String),
    /// A required argument is missing.
    MissingArgument(&'static str),
    /// An argument that must be a number is not.
    InvalidNumber(String),
    /// More arguments than the command accepts.
    UnexpectedArgument(String),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(word) => write!(f, "unknown command `{word}`"),
            Self::UnknownOption(name) => write!(f, "unknown option `{name}`"),
            Self::MissingArgument(what) => write!(f, "missing {what}"),
            Self::InvalidNumber(word) => write!(f, "`{word}` is not a valid number"),
            Self::UnexpectedArgument(word) => write!(f, "unexpected argument `{word}`"),
        }
    }
}

/// A parse failure with its 1-based script line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl core::error::Error for ParseError {}

/// Parses one script line. Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns the reason the line is not a valid command.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseErrorKind> {
    let line = line.split_once('#').map_or(line, |(code, _)| code);
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };

    let command = match name {
        "new" => Command::New,
        "free" => Command::Free,
        "ih" | "it" => {
            let value = words
                .next()
                .ok_or(ParseErrorKind::MissingArgument("value to insert"))?
                .to_string();
            let repeat = words.next().map_or(Ok(1), parse_number::<u32>)?;
            if name == "ih" {
                Command::InsertHead { value, repeat }
            } else {
                Command::InsertTail { value, repeat }
            }
        }
        "rh" => Command::RemoveHead {
            expected: words.next().map(ToString::to_string),
        },
        "rhq" => Command::RemoveHeadQuiet,
        "reverse" => Command::Reverse,
        "sort" => Command::Sort,
        "size" => Command::Size {
            expected: words.next().map(parse_number::<usize>).transpose()?,
        },
        "show" => Command::Show,
        "option" => {
            let option = words
                .next()
                .ok_or(ParseErrorKind::MissingArgument("option name"))?;
            let value = words
                .next()
                .ok_or(ParseErrorKind::MissingArgument("option value"))?;
            match option {
                "length" => Command::Set(HarnessOption::RemoveCapacity(parse_number(value)?)),
                "fail" => Command::Set(HarnessOption::FailEvery(parse_number(value)?)),
                other => return Err(ParseErrorKind::UnknownOption(other.to_string())),
            }
        }
        other => return Err(ParseErrorKind::UnknownCommand(other.to_string())),
    };

    match words.next() {
        Some(extra) => Err(ParseErrorKind::UnexpectedArgument(extra.to_string())),
        None => Ok(Some(command)),
    }
}

/// Parses a whole script, skipping blank and comment lines.
///
/// # Errors
///
/// Returns the first line that fails to parse.
pub fn parse_script(script: &str) -> Result<Vec<Command>, ParseError> {
    let mut commands = Vec::new();
    for (i, line) in script.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(command)) => commands.push(command),
            Ok(None) => {}
            Err(kind) => return Err(ParseError { line: i + 1, kind }),
        }
    }
    Ok(commands)
}

fn parse_number<T: core::str::FromStr>(word: &str) -> Result<T, ParseErrorKind> {
    word.parse()
        .map_err(|_| ParseErrorKind::InvalidNumber(word.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        let script = "\
            new\n\
            ih cherry\n\
            it banana 3\n\
            rh banana\n\
            rh\n\
            rhq\n\
            reverse\n\
            sort\n\
            size 2\n\
            size\n\
            show\n\
            option length 4\n\
            option fail 5\n\
            free\n";
        let commands = parse_script(script).unwrap();
        assert_eq!(
            commands,
            [
                Command::New,
                Command::InsertHead {
                    value: "cherry".into(),
                    repeat: 1
                },
                Command::InsertTail {
                    value: "banana".into(),
                    repeat: 3
                },
                Command::RemoveHead {
                    expected: Some("banana".into())
                },
                Command::RemoveHead { expected: None },
                Command::RemoveHeadQuiet,
                Command::Reverse,
                Command::Sort,
                Command::Size { expected: Some(2) },
                Command::Size { expected: None },
                Command::Show,
                Command::Set(HarnessOption::RemoveCapacity(4)),
                Command::Set(HarnessOption::FailEvery(5)),
                Command::Free,
            ]
        );
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   # just a note"), Ok(None));
        assert_eq!(parse_line("sort # trailing"), Ok(Some(Command::Sort)));
    }

    #[test]
    fn reports_line_numbers() {
        let err = parse_script("new\n\nbogus\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.kind, ParseErrorKind::UnknownCommand("bogus".into()));
        assert_eq!(
            alloc::format!("{err}"),
            "line 3: unknown command `bogus`"
        );
    }

    #[test]
    fn rejects_bad_arguments() {
        assert_eq!(
            parse_line("ih"),
            Err(ParseErrorKind::MissingArgument("value to insert"))
        );
        assert_eq!(
            parse_line("it x many"),
            Err(ParseErrorKind::InvalidNumber("many".into()))
        );
        assert_eq!(
            parse_line("reverse now"),
            Err(ParseErrorKind::UnexpectedArgument("now".into()))
        );
        assert_eq!(
            parse_line("option colour 3"),
            Err(ParseErrorKind::UnknownOption("colour".into()))
        );
        assert_eq!(
            parse_line("option length"),
            Err(ParseErrorKind::MissingArgument("option value"))
        );
        assert_eq!(
            parse_line("size -1"),
            Err(ParseErrorKind::InvalidNumber("-1".into()))
        );
    }
}
