// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Script-driven queue exercise that runs the tracing and diagnostics
//! pipeline end to end.
//!
//! ```text
//! queue_demo [SCRIPT] [--json OUT]
//! ```
//!
//! Reads harness commands from `SCRIPT` (`-` for stdin), or runs a built-in
//! scenario when no script is given. Every queue event is printed through a
//! [`PrettyPrintSink`](strqueue_debug::pretty::PrettyPrintSink) and recorded
//! by a [`RecorderSink`](strqueue_debug::recorder::RecorderSink); with
//! `--json` the recording is exported as JSON. Exits with status 1 when any
//! check fails.

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::process::ExitCode;

use strqueue_core::config::QueueConfig;
use strqueue_core::trace::Tracer;
use strqueue_debug::Tee;
use strqueue_debug::pretty::PrettyPrintSink;
use strqueue_debug::recorder::RecorderSink;
use strqueue_harness::{Grade, Harness, parse_script};

const SCENARIO: &str = "\
# Build, order, and drain a small queue.
rh              # no queue yet
new
it banana
it apple
ih cherry
size 3
sort
show
reverse
show
option length 4
rh cherry       # copied out as \"che\"
rhq
size 1
rh apple
rh              # empty
free
";

const USAGE: &str = "usage: queue_demo [SCRIPT] [--json OUT]";

#[derive(Debug, Default)]
struct Args {
    script: Option<String>,
    json: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => {
                let out = iter.next().ok_or("--json needs an output path")?;
                args.json = Some(out);
            }
            "-h" | "--help" => return Err(USAGE.into()),
            _ if args.script.is_none() => args.script = Some(arg),
            _ => return Err(format!("unexpected argument `{arg}`\n{USAGE}")),
        }
    }
    Ok(args)
}

fn load_script(path: Option<&str>) -> Result<String, Box<dyn Error>> {
    Ok(match path {
        None => SCENARIO.into(),
        Some("-") => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
        Some(path) => std::fs::read_to_string(path)?,
    })
}

fn run(args: &Args) -> Result<Grade, Box<dyn Error>> {
    let script = load_script(args.script.as_deref())?;
    let commands = parse_script(&script)?;

    // -- sinks -------------------------------------------------------------
    let pretty = PrettyPrintSink::new(Box::new(std::io::stdout())).with_merges(true);
    let mut sinks = Tee::new(pretty, RecorderSink::new());

    // -- harness -----------------------------------------------------------
    let mut harness = Harness::new(QueueConfig::DEFAULT);
    let report = {
        let mut tracer = Tracer::new(&mut sinks);
        harness.run(&commands, &mut tracer)
    };

    println!(
        "{} commands, {} refused, {} allocation failures: {}",
        report.commands,
        report.refused,
        report.alloc_failures,
        report.grade.as_str(),
    );
    for failure in &report.failures {
        println!("  command {}: {}", failure.index + 1, failure.error);
    }

    // -- export JSON -------------------------------------------------------
    if let Some(path) = &args.json {
        let (_, recorder) = sinks.into_parts();
        let mut writer = BufWriter::new(File::create(path)?);
        strqueue_debug::json::export(recorder.as_bytes(), &mut writer)?;
        println!("Wrote {path}");
    }

    Ok(report.grade)
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };
    match run(&args) {
        Ok(Grade::Pass) => ExitCode::SUCCESS,
        Ok(Grade::Fail) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("queue_demo: {err}");
            ExitCode::from(2)
        }
    }
}
