// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative, deadline-driven rendering.
//!
//! The [`WorkLoop`] owns a [`Host`], a [`FiberTree`], and the single
//! `pending` slot naming the next fiber to perform. A host idle loop calls
//! [`WorkLoop::tick`] once per idle slice; the tick performs units of work
//! until the slice runs low or the pass completes, then returns so the host
//! can re-register for the next slice. See the [`WorkLoop`] docs for the
//! state machine.

use crate::deadline::{Deadline, Unbounded};
use crate::element::Element;
use crate::error::WorkError;
use crate::fiber::{CommitMode, FiberId, FiberTree, commit, perform_unit_of_work};
use crate::host::Host;
use crate::time::Duration;
use crate::trace::{
    CommitEvent, RenderCompleteEvent, RenderStartEvent, TickBeginEvent, TickEndEvent, Tracer,
    UnitEvent, WorkErrorEvent,
};

/// Configuration for the [`WorkLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// A tick stops before the next unit once the deadline reports less than
    /// this much time remaining.
    pub yield_threshold: Duration,
    /// When host nodes are attached to their parents.
    pub commit_mode: CommitMode,
}

impl SchedulerConfig {
    /// Browser idle callbacks: yield with under 1 ms left, attach as you go.
    #[must_use]
    pub const fn browser() -> Self {
        Self {
            yield_threshold: Duration::from_millis(1),
            commit_mode: CommitMode::Inline,
        }
    }

    /// Like [`browser`](Self::browser), but the host tree only changes once,
    /// in the tick that finishes the pass.
    #[must_use]
    pub const fn atomic() -> Self {
        Self {
            yield_threshold: Duration::from_millis(1),
            commit_mode: CommitMode::Deferred,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::browser()
    }
}

/// Why a tick returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TickStatus {
    /// The deadline ran low; work remains for a later tick.
    Yielded,
    /// The last fiber of the pass was performed (and committed) this tick.
    Completed,
    /// There was nothing to do.
    Idle,
}

/// Outcome of a successful [`WorkLoop::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Monotonic tick counter, starting at 0.
    pub tick_index: u64,
    /// Units of work performed during the tick.
    pub units: u32,
    /// Why the tick returned.
    pub status: TickStatus,
}

/// Drives incremental rendering of an element tree into a [`Host`].
///
/// # States
///
/// - **Armed**: [`pending`](Self::pending) names the next fiber to perform.
/// - **Idle**: `pending` is empty. Ticks do nothing until the next
///   [`render`](Self::render).
///
/// [`render`](Self::render) arms the loop. Each [`tick`](Self::tick) then
/// checks the deadline *before* every unit, so a slice that is already over
/// performs no work and leaves `pending` untouched. Units are performed in
/// depth-first pre-order, and the loop can stop between any two of them.
///
/// An empty `pending` means "nothing to do this tick", not that the loop is
/// finished for good: idle loops keep ticking it.
///
/// # Errors
///
/// A failing unit is reported from `tick` and leaves `pending` on the
/// failing fiber, with everything built so far intact. The next tick retries
/// that fiber. With [`CommitMode::Deferred`] a failed commit is retried the
/// same way.
///
/// # Usage
///
/// ```
/// use fibril_core::deadline::Unbounded;
/// use fibril_core::element;
/// use fibril_core::host::MemoryHost;
/// use fibril_core::scheduler::{SchedulerConfig, TickStatus, WorkLoop};
/// use fibril_core::trace::Tracer;
///
/// let mut host = MemoryHost::new();
/// let container = host.create_container("body");
/// let mut work = WorkLoop::new(host, SchedulerConfig::browser());
/// work.render(element!("p", None, "hi"), container);
///
/// let report = work.tick(&Unbounded, &mut Tracer::none()).unwrap();
/// assert_eq!(report.status, TickStatus::Completed);
/// assert_eq!(work.host().inner_markup(container), "<p>hi</p>");
/// ```
pub struct WorkLoop<H: Host> {
    host: H,
    tree: FiberTree<H::Node>,
    pending: Option<FiberId>,
    config: SchedulerConfig,
    next_tick: u64,
    // -- Current pass --
    elements: u32,
    started: bool,
    awaiting_commit: bool,
    pass_ticks: u32,
    pass_units: u32,
}

impl<H: Host> core::fmt::Debug for WorkLoop<H>
where
    H::Node: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WorkLoop")
            .field("pending", &self.pending)
            .field("config", &self.config)
            .field("next_tick", &self.next_tick)
            .field("fibers", &self.tree.len())
            .finish_non_exhaustive()
    }
}

impl<H: Host> WorkLoop<H> {
    /// Creates an idle work loop rendering into `host`.
    #[must_use]
    pub fn new(host: H, config: SchedulerConfig) -> Self {
        Self {
            host,
            tree: FiberTree::new(),
            pending: None,
            config,
            next_tick: 0,
            elements: 0,
            started: false,
            awaiting_commit: false,
            pass_ticks: 0,
            pass_units: 0,
        }
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the host mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consumes the loop and returns the host.
    #[must_use]
    pub fn into_host(self) -> H {
        self.host
    }

    /// Returns the fiber tree of the current pass.
    #[must_use]
    pub fn tree(&self) -> &FiberTree<H::Node> {
        &self.tree
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Returns the next fiber to perform, if any.
    #[must_use]
    pub fn pending(&self) -> Option<FiberId> {
        self.pending
    }

    /// Returns `true` if ticking would do nothing.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_none() && !self.awaiting_commit
    }

    /// Starts a render pass of `element` into `container`.
    ///
    /// Discards the previous pass, including any work it had left. The
    /// container's existing content is kept; the rendered tree is appended
    /// after it. Nothing touches the host until the next tick.
    pub fn render(&mut self, element: Element, container: H::Node) {
        self.elements = u32::try_from(element.subtree_len()).unwrap_or(u32::MAX);
        let root = self.tree.reset(container, element);
        self.pending = Some(root);
        self.started = false;
        self.awaiting_commit = false;
        self.pass_ticks = 0;
        self.pass_units = 0;
    }

    /// Performs units of work until `deadline` runs low or the pass is done.
    ///
    /// Before each unit the loop stops if nothing is pending or
    /// [`Deadline::time_remaining`] is below
    /// [`SchedulerConfig::yield_threshold`]. The deadline is queried exactly
    /// once per attempted unit and never after the last fiber.
    ///
    /// # Errors
    ///
    /// Returns the [`WorkError`] of the first failing unit (or deferred
    /// commit). `pending` is left on the failing fiber.
    pub fn tick<D: Deadline + ?Sized>(
        &mut self,
        deadline: &D,
        tracer: &mut Tracer<'_>,
    ) -> Result<TickReport, WorkError> {
        let tick_index = self.next_tick;
        self.next_tick += 1;
        let pass = self.tree.pass();

        let Some(mut fiber) = self.pending else {
            if self.awaiting_commit {
                self.finish(tick_index, tracer)?;
                return Ok(TickReport {
                    tick_index,
                    units: 0,
                    status: TickStatus::Completed,
                });
            }
            return Ok(TickReport {
                tick_index,
                units: 0,
                status: TickStatus::Idle,
            });
        };

        if !self.started {
            self.started = true;
            tracer.render_start(&RenderStartEvent {
                pass,
                elements: self.elements,
                commit_mode: self.config.commit_mode,
            });
        }
        self.pass_ticks += 1;

        let mut remaining = deadline.time_remaining();
        tracer.tick_begin(&TickBeginEvent {
            pass,
            tick_index,
            budget: remaining,
        });

        let mut units = 0;
        let status = loop {
            if remaining < self.config.yield_threshold {
                break TickStatus::Yielded;
            }
            let depth = self.tree.depth(fiber);
            #[cfg(feature = "trace-rich")]
            let fresh = self.tree.dom(fiber).is_none();

            let next = match perform_unit_of_work(
                &mut self.tree,
                &mut self.host,
                fiber,
                self.config.commit_mode,
            ) {
                Ok(next) => next,
                Err(err) => {
                    tracer.work_error(&WorkErrorEvent::new(&err, pass, tick_index));
                    return Err(err);
                }
            };

            #[cfg(feature = "trace-rich")]
            if fresh && let Some(ty) = self.tree.ty(fiber) {
                tracer.materialize(&crate::trace::MaterializeEvent {
                    pass,
                    fiber: fiber.index(),
                    tag: ty.as_str(),
                });
            }

            units += 1;
            self.pass_units += 1;
            tracer.unit(&UnitEvent {
                pass,
                tick_index,
                fiber: fiber.index(),
                depth,
                remaining,
            });

            self.pending = next;
            match next {
                Some(n) => fiber = n,
                None => break TickStatus::Completed,
            }
            remaining = deadline.time_remaining();
        };

        tracer.tick_end(&TickEndEvent {
            pass,
            tick_index,
            units,
            status,
            remaining,
        });

        if status == TickStatus::Completed {
            self.awaiting_commit = self.config.commit_mode == CommitMode::Deferred;
            self.finish(tick_index, tracer)?;
        }

        Ok(TickReport {
            tick_index,
            units,
            status,
        })
    }

    /// Runs the current pass to completion in one tick.
    ///
    /// # Errors
    ///
    /// As for [`tick`](Self::tick).
    pub fn flush(&mut self, tracer: &mut Tracer<'_>) -> Result<TickReport, WorkError> {
        self.tick(&Unbounded, tracer)
    }

    /// Commits a deferred pass if needed and reports completion.
    fn finish(&mut self, tick_index: u64, tracer: &mut Tracer<'_>) -> Result<(), WorkError> {
        let pass = self.tree.pass();
        if self.awaiting_commit {
            let attached = match commit(&mut self.tree, &mut self.host) {
                Ok(attached) => attached,
                Err(err) => {
                    tracer.work_error(&WorkErrorEvent::new(&err, pass, tick_index));
                    return Err(err);
                }
            };
            self.awaiting_commit = false;
            tracer.commit(&CommitEvent {
                pass,
                tick_index,
                attached,
            });
        }
        tracer.render_complete(&RenderCompleteEvent {
            pass,
            tick_index,
            fibers: u32::try_from(self.tree.len()).unwrap_or(u32::MAX),
            ticks: self.pass_ticks,
            units: self.pass_units,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::deadline::{Exhausted, SimulatedDeadline};
    use crate::element;
    use crate::element::{NODE_VALUE, PropValue, Props};
    use crate::host::{MemoryHost, NodeId};
    use crate::materialize::render_sync;

    fn setup(config: SchedulerConfig) -> (WorkLoop<MemoryHost>, NodeId) {
        let mut host = MemoryHost::new();
        let container = host.create_container("root");
        (WorkLoop::new(host, config), container)
    }

    fn scenario_one() -> Element {
        element!(
            "div",
            Some(Props::new().with("id", "foo")),
            element!("a", None, "bar"),
            element!("b", None),
        )
    }

    /// A slice long enough for exactly `units` units at 1 ms each.
    fn slice(units: u64) -> SimulatedDeadline {
        SimulatedDeadline::new(Duration::from_millis(units), Duration::from_millis(1))
    }

    #[test]
    fn scenario_div_with_id_link_text_and_empty_sibling() {
        let (mut work, container) = setup(SchedulerConfig::browser());
        work.render(scenario_one(), container);
        let report = work.flush(&mut Tracer::none()).unwrap();
        assert_eq!(report.status, TickStatus::Completed);

        let host = work.host();
        let kids = host.children(container);
        assert_eq!(kids.len(), 1, "container has only the div");
        let div = kids[0];
        assert_eq!(host.tag(div), Some("div"));
        assert_eq!(host.property(div, "id"), Some(&PropValue::from("foo")));
        assert_eq!(host.property(div, "className"), None);

        let (a, b) = (host.children(div)[0], host.children(div)[1]);
        assert_eq!(host.children(div).len(), 2);
        assert_eq!(host.tag(a), Some("a"));
        assert_eq!(host.children(a).len(), 1);
        let text = host.children(a)[0];
        assert!(host.is_text(text));
        assert_eq!(host.property(text, NODE_VALUE), Some(&PropValue::from("bar")));
        assert_eq!(host.tag(b), Some("b"));
        assert!(host.children(b).is_empty());
    }

    #[test]
    fn scenario_bare_string_child_becomes_one_text_fiber() {
        let (mut work, container) = setup(SchedulerConfig::browser());
        work.render(element!("h1", None, "bar"), container);
        work.flush(&mut Tracer::none()).unwrap();

        let tree = work.tree();
        let h1 = tree.child(tree.root().unwrap()).unwrap();
        let texts: Vec<_> = tree.children(h1).collect();
        assert_eq!(texts.len(), 1);
        let text = texts[0];
        assert!(tree.ty(text).unwrap().is_text());
        assert_eq!(tree.props(text).get(NODE_VALUE), Some(&PropValue::from("bar")));
        assert_eq!(tree.child(text), None);
        assert_eq!(work.host().inner_markup(container), "<h1>bar</h1>");
    }

    #[test]
    fn scenario_depth_three_resumes_at_next_fiber() {
        // root, div, p, i, "x", q: the budget runs out inside the deepest level.
        let el = element!(
            "div",
            None,
            element!("p", None, element!("i", None, "x")),
            element!("q", None),
        );
        let (mut work, container) = setup(SchedulerConfig::browser());
        work.render(el, container);

        let first = work.tick(&slice(4), &mut Tracer::none()).unwrap();
        assert_eq!(first.units, 4);
        assert_eq!(first.status, TickStatus::Yielded);
        let resume = work.pending().unwrap();
        assert!(work.tree().ty(resume).unwrap().is_text(), "stopped before the text leaf");
        assert_eq!(work.tree().depth(resume), 4);
        assert_eq!(work.host().inner_markup(container), "<div><p><i></i></p></div>");

        let second = work.tick(&slice(10), &mut Tracer::none()).unwrap();
        assert_eq!(second.units, 2);
        assert_eq!(second.status, TickStatus::Completed);
        assert_eq!(
            work.host().inner_markup(container),
            "<div><p><i>x</i></p><q></q></div>"
        );
        assert_eq!(work.host().node_count(), 6, "container plus five nodes, none twice");
    }

    #[test]
    fn preorder_visits_and_attaches_before_sibling() {
        let (mut work, container) = setup(SchedulerConfig::browser());
        work.render(element!("div", None, element!("a", None), element!("b", None)), container);

        // root, div, a
        work.tick(&slice(3), &mut Tracer::none()).unwrap();
        let b = work.pending().unwrap();
        assert_eq!(work.tree().ty(b).unwrap().as_str(), "b");
        assert_eq!(work.host().inner_markup(container), "<div><a></a></div>");

        let order: Vec<_> = work
            .tree()
            .preorder()
            .filter_map(|f| work.tree().ty(f).map(|t| t.as_str()))
            .collect();
        assert_eq!(order, ["div", "a", "b"]);
    }

    #[test]
    fn exhausted_deadline_runs_zero_units() {
        let (mut work, container) = setup(SchedulerConfig::browser());
        work.render(scenario_one(), container);
        let before = work.pending();

        let report = work.tick(&Exhausted, &mut Tracer::none()).unwrap();
        assert_eq!(report.units, 0);
        assert_eq!(report.status, TickStatus::Yielded);
        assert_eq!(work.pending(), before);
        assert_eq!(work.host().node_count(), 1, "only the container");
    }

    #[test]
    fn below_threshold_counts_as_exhausted() {
        let (mut work, container) = setup(SchedulerConfig::browser());
        work.render(scenario_one(), container);
        let d = SimulatedDeadline::new(Duration::from_micros(999), Duration::ZERO);
        assert_eq!(work.tick(&d, &mut Tracer::none()).unwrap().units, 0);
    }

    #[test]
    fn exactly_one_unit_per_fiber_then_idle() {
        let (mut work, container) = setup(SchedulerConfig::browser());
        let el = scenario_one();
        let elements = el.subtree_len();
        work.render(el, container);

        let mut units = 0;
        let mut ticks = 0;
        while !work.is_idle() {
            units += work.tick(&slice(2), &mut Tracer::none()).unwrap().units;
            ticks += 1;
            assert!(ticks < 100, "render never finished");
        }
        // One unit per element plus the root.
        assert_eq!(units as usize, elements + 1);
        assert_eq!(units as usize, work.tree().len());
        assert_eq!(work.pending(), None);

        for _ in 0..3 {
            let report = work.tick(&Unbounded, &mut Tracer::none()).unwrap();
            assert_eq!(report.status, TickStatus::Idle);
            assert_eq!(report.units, 0);
        }
        assert_eq!(work.pending(), None);
    }

    #[test]
    fn idle_before_any_render() {
        let (mut work, _) = setup(SchedulerConfig::browser());
        assert!(work.is_idle());
        let report = work.tick(&Unbounded, &mut Tracer::none()).unwrap();
        assert_eq!(report.status, TickStatus::Idle);
        assert_eq!(report.tick_index, 0);
        assert_eq!(work.tick(&Unbounded, &mut Tracer::none()).unwrap().tick_index, 1);
    }

    #[test]
    fn existing_container_content_is_kept() {
        let mut host = MemoryHost::new();
        let container = host.create_container("root");
        let old = host.create_element("hr").unwrap();
        host.append_child(&container, &old).unwrap();
        let mut work = WorkLoop::new(host, SchedulerConfig::browser());
        work.render(element!("p", None), container);
        work.flush(&mut Tracer::none()).unwrap();
        assert_eq!(work.host().inner_markup(container), "<hr></hr><p></p>");
    }

    #[test]
    fn deferred_commit_attaches_in_completing_tick() {
        let (mut work, container) = setup(SchedulerConfig::atomic());
        work.render(scenario_one(), container);

        let first = work.tick(&slice(3), &mut Tracer::none()).unwrap();
        assert_eq!(first.status, TickStatus::Yielded);
        assert!(work.host().children(container).is_empty());
        assert_eq!(work.host().append_count(), 0);

        let second = work.tick(&Unbounded, &mut Tracer::none()).unwrap();
        assert_eq!(second.status, TickStatus::Completed);
        assert!(work.is_idle());
        assert_eq!(
            work.host().inner_markup(container),
            "<div id=\"foo\"><a>bar</a><b></b></div>"
        );
    }

    #[test]
    fn incremental_matches_render_sync() {
        let mut host = MemoryHost::new();
        let sync_container = host.create_container("root");
        render_sync(&mut host, &scenario_one(), &sync_container).unwrap();
        let expected = host.inner_markup(sync_container);

        for config in [SchedulerConfig::browser(), SchedulerConfig::atomic()] {
            let (mut work, container) = setup(config);
            work.render(scenario_one(), container);
            while !work.is_idle() {
                work.tick(&slice(1), &mut Tracer::none()).unwrap();
            }
            assert_eq!(work.host().inner_markup(container), expected, "{config:?}");
        }
    }

    #[test]
    fn deep_chain_renders_and_drops() {
        const DEPTH: usize = 100_000;
        let mut el = element!("i", None);
        for _ in 1..DEPTH {
            el = element!("i", None, el);
        }

        let (mut work, container) = setup(SchedulerConfig::browser());
        work.render(el, container);
        let report = work.flush(&mut Tracer::none()).unwrap();
        assert_eq!(report.status, TickStatus::Completed);
        assert_eq!(report.units as usize, DEPTH + 1);
        assert_eq!(work.tree().len(), DEPTH + 1);
        assert_eq!(work.host().children(container).len(), 1);
        drop(work);
    }

    #[test]
    fn failed_unit_keeps_pending_and_retries() {
        let (mut work, container) = setup(SchedulerConfig::browser());
        work.host_mut().reject_tag("b");
        work.render(scenario_one(), container);

        let err = work.tick(&Unbounded, &mut Tracer::none()).unwrap_err();
        let failing = err.fiber();
        assert_eq!(work.pending(), Some(failing));
        assert_eq!(work.tree().ty(failing).unwrap().as_str(), "b");
        assert_eq!(
            work.host().inner_markup(container),
            "<div id=\"foo\"><a>bar</a></div>"
        );

        // Still failing: nothing moves.
        assert!(work.tick(&Unbounded, &mut Tracer::none()).is_err());
        assert_eq!(work.pending(), Some(failing));

        work.host_mut().accept_all_tags();
        let report = work.tick(&Unbounded, &mut Tracer::none()).unwrap();
        assert_eq!(report.units, 1, "resumed at the failing fiber");
        assert_eq!(report.status, TickStatus::Completed);
        assert_eq!(
            work.host().inner_markup(container),
            "<div id=\"foo\"><a>bar</a><b></b></div>"
        );
    }

    #[test]
    fn render_discards_previous_pass() {
        let (mut work, container) = setup(SchedulerConfig::browser());
        work.render(scenario_one(), container);
        work.tick(&slice(2), &mut Tracer::none()).unwrap();
        let stale = work.pending().unwrap();

        work.render(element!("p", None), container);
        assert!(!work.tree().is_current(stale));
        work.flush(&mut Tracer::none()).unwrap();
        // The first pass got as far as the div.
        assert_eq!(work.host().inner_markup(container), "<div id=\"foo\"></div><p></p>");
    }

    #[cfg(feature = "trace")]
    #[test]
    fn emits_events_in_order() {
        use alloc::string::String;
        use alloc::vec;
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Log(Vec<String>);
        impl TraceSink for Log {
            fn on_render_start(&mut self, e: &RenderStartEvent) {
                self.0.push(alloc::format!("start {}", e.elements));
            }
            fn on_tick_begin(&mut self, e: &TickBeginEvent) {
                self.0.push(alloc::format!("begin {}", e.tick_index));
            }
            fn on_unit(&mut self, e: &UnitEvent) {
                self.0.push(alloc::format!("unit {}", e.fiber));
            }
            fn on_tick_end(&mut self, e: &TickEndEvent) {
                self.0.push(alloc::format!("end {:?}", e.status));
            }
            fn on_commit(&mut self, e: &CommitEvent) {
                self.0.push(alloc::format!("commit {}", e.attached));
            }
            fn on_render_complete(&mut self, e: &RenderCompleteEvent) {
                self.0.push(alloc::format!("complete {} {}", e.ticks, e.units));
            }
        }

        let (mut work, container) = setup(SchedulerConfig::atomic());
        work.render(element!("div", None, element!("a", None)), container);
        let mut log = Log::default();
        work.tick(&slice(2), &mut Tracer::new(&mut log)).unwrap();
        work.tick(&Exhausted, &mut Tracer::new(&mut log)).unwrap();
        work.tick(&slice(5), &mut Tracer::new(&mut log)).unwrap();
        work.tick(&slice(5), &mut Tracer::new(&mut log)).unwrap();
        assert_eq!(
            log.0,
            vec![
                "start 2",
                "begin 0",
                "unit 0",
                "unit 1",
                "end Yielded",
                "begin 1",
                "end Yielded",
                "begin 2",
                "unit 2",
                "end Completed",
                "commit 2",
                "complete 3 3",
            ]
        );
    }

    #[cfg(feature = "trace")]
    #[test]
    fn failed_unit_reports_work_error_instead_of_tick_end() {
        use crate::trace::{TraceSink, WorkErrorKind};

        #[derive(Default)]
        struct Errors {
            errors: Vec<WorkErrorEvent>,
            tick_ends: u32,
        }
        impl TraceSink for Errors {
            fn on_tick_end(&mut self, _: &TickEndEvent) {
                self.tick_ends += 1;
            }
            fn on_work_error(&mut self, e: &WorkErrorEvent) {
                self.errors.push(*e);
            }
        }

        let (mut work, container) = setup(SchedulerConfig::browser());
        work.host_mut().reject_tag("b");
        work.render(scenario_one(), container);

        let mut sink = Errors::default();
        let err = work
            .tick(&Unbounded, &mut Tracer::new(&mut sink))
            .unwrap_err();
        assert_eq!(sink.tick_ends, 0, "an error ends the tick in place of TickEnd");
        assert_eq!(
            sink.errors,
            [WorkErrorEvent {
                pass: work.tree().pass(),
                tick_index: 0,
                fiber: err.fiber().index(),
                kind: WorkErrorKind::Materialize,
            }]
        );
        // root, div, a, text, then b.
        assert_eq!(sink.errors[0].fiber, 3);
        assert_eq!(work.pending(), Some(err.fiber()));

        work.host_mut().accept_all_tags();
        let report = work.tick(&Unbounded, &mut Tracer::new(&mut sink)).unwrap();
        assert_eq!(report.status, TickStatus::Completed);
        assert_eq!(sink.errors.len(), 1);
        assert_eq!(sink.tick_ends, 1);
    }
}
