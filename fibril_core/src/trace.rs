// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the work loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`WorkLoop`](crate::scheduler::WorkLoop) calls as a render progresses. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Events carry no wall-clock timestamps. They carry the remaining idle budget
//! as reported by the [`Deadline`](crate::deadline::Deadline), which is enough
//! to lay ticks and units out on a timeline.
//!
//! # Event order
//!
//! For one render pass:
//!
//! ```text
//! RenderStart
//! ( TickBegin  Unit*  ( TickEnd | WorkError ) )*
//! [ Commit ]  RenderComplete        (in the tick whose status is Completed)
//! ```
//!
//! Ticks that find no pending work emit nothing.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates [`MaterializeEvent`] and the
//!   corresponding `TraceSink` method.

use crate::error::WorkError;
use crate::fiber::CommitMode;
use crate::scheduler::TickStatus;
use crate::time::Duration;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which step of a unit of work failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkErrorKind {
    /// Creating the host node or assigning one of its properties.
    Materialize,
    /// Appending the host node to its parent's.
    Attach,
}

impl From<&WorkError> for WorkErrorKind {
    fn from(err: &WorkError) -> Self {
        match err {
            WorkError::Materialize { .. } => Self::Materialize,
            WorkError::Attach { .. } => Self::Attach,
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted on the first tick of a new render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderStartEvent {
    /// Render pass counter.
    pub pass: u32,
    /// Number of elements in the rendered tree.
    pub elements: u32,
    /// How host nodes are attached during this pass.
    pub commit_mode: CommitMode,
}

/// Emitted when a tick with pending work begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickBeginEvent {
    /// Render pass counter.
    pub pass: u32,
    /// Monotonic tick counter of the work loop.
    pub tick_index: u64,
    /// Time remaining at the first deadline query.
    pub budget: Duration,
}

/// Emitted after each unit of work succeeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitEvent {
    /// Render pass counter.
    pub pass: u32,
    /// Tick counter.
    pub tick_index: u64,
    /// Slot index of the performed fiber.
    pub fiber: u32,
    /// Depth of the performed fiber (the root is 0).
    pub depth: u32,
    /// Time remaining when the unit started.
    pub remaining: Duration,
}

/// Emitted when a tick stops without error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickEndEvent {
    /// Render pass counter.
    pub pass: u32,
    /// Tick counter.
    pub tick_index: u64,
    /// Units performed during the tick.
    pub units: u32,
    /// Why the tick stopped.
    pub status: TickStatus,
    /// Time remaining at the last deadline query.
    pub remaining: Duration,
}

/// Emitted after a deferred commit attached the finished tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitEvent {
    /// Render pass counter.
    pub pass: u32,
    /// Tick counter.
    pub tick_index: u64,
    /// Host nodes appended by the commit.
    pub attached: u32,
}

/// Emitted once every fiber of a pass has been performed (and committed).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderCompleteEvent {
    /// Render pass counter.
    pub pass: u32,
    /// Tick counter of the completing tick.
    pub tick_index: u64,
    /// Number of fibers in the finished tree, root included.
    pub fibers: u32,
    /// Ticks that performed work for this pass.
    pub ticks: u32,
    /// Units performed for this pass.
    pub units: u32,
}

/// Emitted when a unit of work fails. Ends the tick in place of
/// [`TickEndEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkErrorEvent {
    /// Render pass counter.
    pub pass: u32,
    /// Tick counter.
    pub tick_index: u64,
    /// Slot index of the failing fiber.
    pub fiber: u32,
    /// Which step failed.
    pub kind: WorkErrorKind,
}

impl WorkErrorEvent {
    /// Describes `err` as it happened during tick `tick_index` of `pass`.
    #[must_use]
    pub fn new(err: &WorkError, pass: u32, tick_index: u64) -> Self {
        Self {
            pass,
            tick_index,
            fiber: err.fiber().index(),
            kind: err.into(),
        }
    }
}

/// Emitted when a unit creates a host node (requires `trace-rich` feature).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaterializeEvent<'a> {
    /// Render pass counter.
    pub pass: u32,
    /// Slot index of the fiber.
    pub fiber: u32,
    /// Tag name, or the text sentinel for text nodes.
    pub tag: &'a str,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the work loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called on the first tick of a render pass.
    fn on_render_start(&mut self, e: &RenderStartEvent) {
        _ = e;
    }

    /// Called when a tick with pending work begins.
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        _ = e;
    }

    /// Called after each successful unit of work.
    fn on_unit(&mut self, e: &UnitEvent) {
        _ = e;
    }

    /// Called when a tick stops without error.
    fn on_tick_end(&mut self, e: &TickEndEvent) {
        _ = e;
    }

    /// Called after a deferred commit.
    fn on_commit(&mut self, e: &CommitEvent) {
        _ = e;
    }

    /// Called when a render pass completes.
    fn on_render_complete(&mut self, e: &RenderCompleteEvent) {
        _ = e;
    }

    /// Called when a unit of work fails.
    fn on_work_error(&mut self, e: &WorkErrorEvent) {
        _ = e;
    }

    /// Called when a host node is created (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_materialize(&mut self, e: &MaterializeEvent<'_>) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`RenderStartEvent`].
    #[inline]
    pub fn render_start(&mut self, e: &RenderStartEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_render_start(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TickBeginEvent`].
    #[inline]
    pub fn tick_begin(&mut self, e: &TickBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tick_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`UnitEvent`].
    #[inline]
    pub fn unit(&mut self, e: &UnitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_unit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TickEndEvent`].
    #[inline]
    pub fn tick_end(&mut self, e: &TickEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tick_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CommitEvent`].
    #[inline]
    pub fn commit(&mut self, e: &CommitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_commit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RenderCompleteEvent`].
    #[inline]
    pub fn render_complete(&mut self, e: &RenderCompleteEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_render_complete(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`WorkErrorEvent`].
    #[inline]
    pub fn work_error(&mut self, e: &WorkErrorEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_work_error(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MaterializeEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn materialize(&mut self, e: &MaterializeEvent<'_>) {
        if let Some(s) = &mut self.sink {
            s.on_materialize(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
