// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Idle budgets
//! are printed in milliseconds.

use std::io::Write;

use fibril_core::time::Duration;
use fibril_core::trace::{
    CommitEvent, MaterializeEvent, RenderCompleteEvent, RenderStartEvent, TickBeginEvent,
    TickEndEvent, TraceSink, UnitEvent, WorkErrorEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    units: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("units", &self.units)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            units: true,
        }
    }

    /// Sets whether per-unit and per-node lines are printed. On by default.
    #[must_use]
    pub fn with_units(mut self, units: bool) -> Self {
        self.units = units;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// Formats a budget as milliseconds, or `unbounded`.
fn ms(d: Duration) -> String {
    if d == Duration::MAX {
        "unbounded".to_owned()
    } else {
        format!("{:.3}ms", d.as_millis_f64())
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_render_start(&mut self, e: &RenderStartEvent) {
        let _ = writeln!(
            self.writer,
            "[render] pass={} elements={} commit={:?}",
            e.pass, e.elements, e.commit_mode,
        );
    }

    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[tick:begin] tick={} budget={}",
            e.tick_index,
            ms(e.budget),
        );
    }

    fn on_unit(&mut self, e: &UnitEvent) {
        if !self.units {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[unit] tick={} fiber={} depth={} remaining={}",
            e.tick_index,
            e.fiber,
            e.depth,
            ms(e.remaining),
        );
    }

    fn on_tick_end(&mut self, e: &TickEndEvent) {
        let _ = writeln!(
            self.writer,
            "[tick:end] tick={} units={} status={:?} remaining={}",
            e.tick_index,
            e.units,
            e.status,
            ms(e.remaining),
        );
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        let _ = writeln!(
            self.writer,
            "[commit] tick={} attached={}",
            e.tick_index, e.attached,
        );
    }

    fn on_render_complete(&mut self, e: &RenderCompleteEvent) {
        let _ = writeln!(
            self.writer,
            "[complete] pass={} fibers={} ticks={} units={}",
            e.pass, e.fibers, e.ticks, e.units,
        );
    }

    fn on_work_error(&mut self, e: &WorkErrorEvent) {
        let _ = writeln!(
            self.writer,
            "[error] tick={} fiber={} kind={:?}",
            e.tick_index, e.fiber, e.kind,
        );
    }

    fn on_materialize(&mut self, e: &MaterializeEvent<'_>) {
        if !self.units {
            return;
        }
        let _ = writeln!(self.writer, "[node] fiber={} <{}>", e.fiber, e.tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibril_core::scheduler::TickStatus;

    #[test]
    fn pretty_print_tick() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_tick_begin(&TickBeginEvent {
            pass: 1,
            tick_index: 3,
            budget: Duration::from_micros(12_500),
        });
        sink.on_tick_end(&TickEndEvent {
            pass: 1,
            tick_index: 3,
            units: 4,
            status: TickStatus::Yielded,
            remaining: Duration::from_micros(800),
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert_eq!(
            output,
            "[tick:begin] tick=3 budget=12.500ms\n\
             [tick:end] tick=3 units=4 status=Yielded remaining=0.800ms\n"
        );
    }

    #[test]
    fn unbounded_budget_is_spelled_out() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_tick_begin(&TickBeginEvent {
            pass: 1,
            tick_index: 0,
            budget: Duration::MAX,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("budget=unbounded"), "got: {output}");
    }

    #[test]
    fn unit_lines_can_be_silenced() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).with_units(false);
        sink.on_unit(&UnitEvent {
            pass: 1,
            tick_index: 0,
            fiber: 1,
            depth: 1,
            remaining: Duration::ZERO,
        });
        sink.on_materialize(&MaterializeEvent {
            pass: 1,
            fiber: 1,
            tag: "div",
        });
        assert!(sink.into_writer().is_empty());
    }
}
