// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for fibril
//! diagnostics.
//!
//! This crate provides [`TraceSink`](fibril_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//! - [`Tee`]: forwards every event to two sinks.

pub mod chrome;
pub mod pretty;
pub mod recorder;

use fibril_core::trace::{
    CommitEvent, MaterializeEvent, RenderCompleteEvent, RenderStartEvent, TickBeginEvent,
    TickEndEvent, TraceSink, UnitEvent, WorkErrorEvent,
};

/// A [`TraceSink`] that forwards every event to `A`, then to `B`.
#[derive(Debug, Default)]
pub struct Tee<A, B>(pub A, pub B);

impl<A: TraceSink, B: TraceSink> TraceSink for Tee<A, B> {
    fn on_render_start(&mut self, e: &RenderStartEvent) {
        self.0.on_render_start(e);
        self.1.on_render_start(e);
    }

    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        self.0.on_tick_begin(e);
        self.1.on_tick_begin(e);
    }

    fn on_unit(&mut self, e: &UnitEvent) {
        self.0.on_unit(e);
        self.1.on_unit(e);
    }

    fn on_tick_end(&mut self, e: &TickEndEvent) {
        self.0.on_tick_end(e);
        self.1.on_tick_end(e);
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        self.0.on_commit(e);
        self.1.on_commit(e);
    }

    fn on_render_complete(&mut self, e: &RenderCompleteEvent) {
        self.0.on_render_complete(e);
        self.1.on_render_complete(e);
    }

    fn on_work_error(&mut self, e: &WorkErrorEvent) {
        self.0.on_work_error(e);
        self.1.on_work_error(e);
    }

    fn on_materialize(&mut self, e: &MaterializeEvent<'_>) {
        self.0.on_materialize(e);
        self.1.on_materialize(e);
    }
}

#[cfg(test)]
mod tests {
    use fibril_core::deadline::SimulatedDeadline;
    use fibril_core::element;
    use fibril_core::element::Props;
    use fibril_core::host::MemoryHost;
    use fibril_core::scheduler::{SchedulerConfig, WorkLoop};
    use fibril_core::time::Duration;
    use fibril_core::trace::Tracer;

    use super::*;
    use crate::pretty::PrettyPrintSink;
    use crate::recorder::{RecordedEvent, RecorderSink, decode};

    #[test]
    fn records_a_real_render() {
        let mut host = MemoryHost::new();
        let container = host.create_container("body");
        let mut work = WorkLoop::new(host, SchedulerConfig::atomic());
        work.render(
            element!(
                "div",
                Some(Props::new().with("id", "foo")),
                element!("a", None, "bar"),
                element!("b", None),
            ),
            container,
        );

        let mut sink = Tee(
            RecorderSink::new(),
            PrettyPrintSink::with_writer(Vec::<u8>::new()),
        );
        let slice = SimulatedDeadline::new(Duration::ZERO, Duration::from_millis(1));
        while !work.is_idle() {
            slice.refill(Duration::from_millis(3));
            work.tick(&slice, &mut Tracer::new(&mut sink)).unwrap();
        }

        let Tee(rec, pretty) = sink;
        let events: Vec<_> = decode(rec.as_bytes()).collect();
        let units = events
            .iter()
            .filter(|e| matches!(e, RecordedEvent::Unit(_)))
            .count();
        assert_eq!(units, 5, "root plus four elements");
        let tags: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Materialize { tag, .. } => Some(tag.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(tags, ["div", "a", "TEXT_ELEMENT", "b"]);
        assert!(matches!(events.first(), Some(RecordedEvent::RenderStart(_))));
        assert!(matches!(
            events.last(),
            Some(RecordedEvent::RenderComplete(c)) if c.ticks == 2 && c.units == 5
        ));

        let text = String::from_utf8(pretty.into_writer()).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("[unit]")).count(), 5);
        assert!(text.contains("[commit] tick=1 attached=4"), "got: {text}");
    }
}
