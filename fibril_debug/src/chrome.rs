// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Recordings hold no wall-clock time, so the timeline is synthesized: tick
//! `k` starts at `k × slice`, and events inside a tick are offset by how much
//! of the tick's budget had been used when they happened (`budget −
//! remaining`, capped at `slice`).
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use fibril_core::time::Duration;

use crate::recorder::{RecordedEvent, decode};

/// Position of the tick being exported on the synthetic timeline.
#[derive(Clone, Copy, Debug)]
struct TickClock {
    start: u64,
    budget: Duration,
    slice: Duration,
}

impl TickClock {
    fn at(&self, remaining: Duration) -> u64 {
        let used = self.budget.saturating_sub(remaining).min(self.slice);
        self.start.saturating_add(used.as_micros())
    }
}

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Ticks become duration slices; units, commits, and errors become instants
/// inside them. `pid` is the render pass.
pub fn export(bytes: &[u8], slice: Duration, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut clock = TickClock {
        start: 0,
        budget: Duration::ZERO,
        slice,
    };
    // Timestamp of the most recent event, for events that carry no budget.
    let mut cursor = 0_u64;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::RenderStart(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "RenderStart",
                    "cat": "Render",
                    "ts": cursor,
                    "pid": e.pass,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "elements": e.elements,
                        "commit_mode": format!("{:?}", e.commit_mode),
                    }
                }));
            }
            RecordedEvent::TickBegin(e) => {
                clock = TickClock {
                    start: e.tick_index.saturating_mul(slice.as_micros()),
                    budget: e.budget,
                    slice,
                };
                cursor = clock.start;
                events.push(json!({
                    "ph": "B",
                    "name": "Tick",
                    "cat": "Scheduler",
                    "ts": cursor,
                    "pid": e.pass,
                    "tid": 0,
                    "args": {
                        "tick_index": e.tick_index,
                        "budget_us": e.budget.as_micros(),
                    }
                }));
            }
            RecordedEvent::Unit(e) => {
                cursor = clock.at(e.remaining);
                events.push(json!({
                    "ph": "i",
                    "name": "Unit",
                    "cat": "Work",
                    "ts": cursor,
                    "pid": e.pass,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "fiber": e.fiber,
                        "depth": e.depth,
                        "remaining_us": e.remaining.as_micros(),
                    }
                }));
            }
            RecordedEvent::TickEnd(e) => {
                cursor = clock.at(e.remaining);
                events.push(json!({
                    "ph": "E",
                    "name": "Tick",
                    "cat": "Scheduler",
                    "ts": cursor,
                    "pid": e.pass,
                    "tid": 0,
                    "args": {
                        "units": e.units,
                        "status": format!("{:?}", e.status),
                    }
                }));
            }
            RecordedEvent::Commit(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Commit",
                    "cat": "Render",
                    "ts": cursor,
                    "pid": e.pass,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "attached": e.attached,
                    }
                }));
            }
            RecordedEvent::RenderComplete(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "RenderComplete",
                    "cat": "Render",
                    "ts": cursor,
                    "pid": e.pass,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "fibers": e.fibers,
                        "ticks": e.ticks,
                        "units": e.units,
                    }
                }));
            }
            RecordedEvent::WorkError(e) => {
                // A failed unit ends its tick.
                events.push(json!({
                    "ph": "i",
                    "name": "WorkError",
                    "cat": "Work",
                    "ts": cursor,
                    "pid": e.pass,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "fiber": e.fiber,
                        "kind": format!("{:?}", e.kind),
                    }
                }));
                events.push(json!({
                    "ph": "E",
                    "name": "Tick",
                    "cat": "Scheduler",
                    "ts": cursor,
                    "pid": e.pass,
                    "tid": 0,
                }));
            }
            RecordedEvent::Materialize { pass, fiber, tag } => {
                events.push(json!({
                    "ph": "i",
                    "name": "Materialize",
                    "cat": "Host",
                    "ts": cursor,
                    "pid": pass,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "fiber": fiber,
                        "tag": tag,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use fibril_core::scheduler::TickStatus;
    use fibril_core::trace::{TickBeginEvent, TickEndEvent, TraceSink, UnitEvent};

    fn micros(v: &Value) -> u64 {
        v.as_u64().unwrap()
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_tick_begin(&TickBeginEvent {
            pass: 1,
            tick_index: 2,
            budget: Duration::from_millis(10),
        });
        rec.on_unit(&UnitEvent {
            pass: 1,
            tick_index: 2,
            fiber: 0,
            depth: 0,
            remaining: Duration::from_millis(10),
        });
        rec.on_unit(&UnitEvent {
            pass: 1,
            tick_index: 2,
            fiber: 1,
            depth: 1,
            remaining: Duration::from_millis(7),
        });
        rec.on_tick_end(&TickEndEvent {
            pass: 1,
            tick_index: 2,
            units: 2,
            status: TickStatus::Yielded,
            remaining: Duration::from_micros(500),
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), Duration::from_millis(16), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        // Should parse as a JSON array.
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "Tick");
        assert_eq!(micros(&parsed[0]["ts"]), 32_000, "tick 2 of 16 ms slices");

        assert_eq!(parsed[1]["name"], "Unit");
        assert_eq!(micros(&parsed[1]["ts"]), 32_000);
        assert_eq!(micros(&parsed[2]["ts"]), 35_000, "3 ms of budget used");
        assert_eq!(parsed[2]["args"]["depth"], 1);

        assert_eq!(parsed[3]["ph"], "E");
        assert_eq!(micros(&parsed[3]["ts"]), 41_500);
        assert_eq!(parsed[3]["args"]["status"], "Yielded");
    }

    #[test]
    fn unbounded_budget_stays_inside_slice() {
        let mut rec = RecorderSink::new();
        rec.on_tick_begin(&TickBeginEvent {
            pass: 1,
            tick_index: 1,
            budget: Duration::MAX,
        });
        rec.on_tick_end(&TickEndEvent {
            pass: 1,
            tick_index: 1,
            units: 9,
            status: TickStatus::Completed,
            remaining: Duration::MAX,
        });
        let mut out = Vec::new();
        export(rec.as_bytes(), Duration::from_millis(5), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(micros(&parsed[0]["ts"]), 5_000);
        assert_eq!(micros(&parsed[1]["ts"]), 5_000);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Duration::from_millis(16), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
