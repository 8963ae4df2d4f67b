// Copyright 2026 the Strqueue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON exporter for recorded traces.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes them to the given writer as a JSON array with one object per
//! event:
//!
//! ```json
//! { "seq": 0, "name": "insert_tail", "cat": "Queue", "args": { ... } }
//! ```
//!
//! `seq` is the event's position in the recording. Events carry no clock
//! readings, so order is the only time axis.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a pretty-printed JSON array.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes)
        .enumerate()
        .map(|(seq, recorded)| event_json(seq, &recorded))
        .collect();

    serde_json::to_writer_pretty(&mut *writer, &events)?;
    writeln!(writer)?;
    Ok(())
}

fn event_json(seq: usize, recorded: &RecordedEvent) -> Value {
    match recorded {
        RecordedEvent::Insert(e) => json!({
            "seq": seq,
            "name": e.op.as_str(),
            "cat": "Queue",
            "args": {
                "slot": e.slot,
                "value_len": e.value_len,
                "size_after": e.size_after,
            }
        }),
        RecordedEvent::Remove(e) => json!({
            "seq": seq,
            "name": "remove_head",
            "cat": "Queue",
            "args": {
                "slot": e.slot,
                "value_len": e.value_len,
                "copied": e.copied,
                "truncated": e.truncated,
                "size_after": e.size_after,
            }
        }),
        RecordedEvent::Reverse(e) => json!({
            "seq": seq,
            "name": "reverse",
            "cat": "Order",
            "args": {
                "size": e.size,
                "old_head": e.old_head,
                "new_head": e.new_head,
            }
        }),
        RecordedEvent::Sort(e) => json!({
            "seq": seq,
            "name": "sort",
            "cat": "Order",
            "args": {
                "strategy": format!("{:?}", e.strategy),
                "size": e.size,
                "merges": e.merges,
                "comparisons": e.comparisons,
            }
        }),
        RecordedEvent::AllocFailure(e) => json!({
            "seq": seq,
            "name": "alloc_failure",
            "cat": "Error",
            "args": {
                "op": e.op.as_str(),
                "requested": e.requested,
                "injected": e.injected,
            }
        }),
        RecordedEvent::Reject(e) => json!({
            "seq": seq,
            "name": "reject",
            "cat": "Error",
            "args": {
                "op": e.op.as_str(),
                "reason": e.error.to_string(),
            }
        }),
        RecordedEvent::Merge(e) => json!({
            "seq": seq,
            "name": "merge",
            "cat": "Rich",
            "args": {
                "left_len": e.left_len,
                "right_len": e.right_len,
                "comparisons": e.comparisons,
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use strqueue_core::error::QueueError;
    use strqueue_core::queue::StrQueue;
    use strqueue_core::trace::{OpKind, RejectEvent, TraceSink, Tracer};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        let mut q = StrQueue::new();
        {
            let mut tracer = Tracer::new(&mut rec);
            q.insert_tail_traced("b", &mut tracer).unwrap();
            q.insert_tail_traced("a", &mut tracer).unwrap();
            q.sort_traced(&mut tracer);
        }

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["name"], "insert_tail");
        assert_eq!(parsed[0]["seq"], 0);
        assert_eq!(parsed[1]["args"]["size_after"], 2);
        assert_eq!(parsed[2]["name"], "merge");
        assert_eq!(parsed[3]["name"], "sort");
        assert_eq!(parsed[3]["args"]["strategy"], "TopDown");
        assert_eq!(parsed[3]["args"]["merges"], 1);
    }

    #[test]
    fn export_reject_reason_is_readable() {
        let mut rec = RecorderSink::new();
        rec.on_reject(&RejectEvent {
            op: OpKind::InsertHead,
            error: QueueError::AbsentQueue,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["cat"], "Error");
        assert_eq!(parsed[0]["args"]["op"], "insert_head");
        assert_eq!(parsed[0]["args"]["reason"], "no queue");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
