// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records, each led by a one-byte tag. [`decode`]
//! reads them back as an iterator of [`RecordedEvent`].
//!
//! Every record is fixed-size except [`MaterializeEvent`], which stores its
//! tag name as a length-prefixed UTF-8 string.

use fibril_core::fiber::CommitMode;
use fibril_core::scheduler::TickStatus;
use fibril_core::time::Duration;
use fibril_core::trace::{
    CommitEvent, MaterializeEvent, RenderCompleteEvent, RenderStartEvent, TickBeginEvent,
    TickEndEvent, TraceSink, UnitEvent, WorkErrorEvent, WorkErrorKind,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_RENDER_START: u8 = 1;
const TAG_TICK_BEGIN: u8 = 2;
const TAG_UNIT: u8 = 3;
const TAG_TICK_END: u8 = 4;
const TAG_COMMIT: u8 = 5;
const TAG_RENDER_COMPLETE: u8 = 6;
const TAG_WORK_ERROR: u8 = 7;
const TAG_MATERIALIZE: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_duration(&mut self, d: Duration) {
        self.write_u64(d.as_micros());
    }

    fn write_str(&mut self, s: &str) {
        let len = u32::try_from(s.len()).unwrap_or(u32::MAX);
        self.write_u32(len);
        self.buf.extend_from_slice(&s.as_bytes()[..len as usize]);
    }

    fn write_commit_mode(&mut self, m: CommitMode) {
        self.write_u8(match m {
            CommitMode::Inline => 0,
            CommitMode::Deferred => 1,
        });
    }

    fn write_status(&mut self, s: TickStatus) {
        self.write_u8(match s {
            TickStatus::Yielded => 0,
            TickStatus::Completed => 1,
            TickStatus::Idle => 2,
        });
    }

    fn write_error_kind(&mut self, k: WorkErrorKind) {
        self.write_u8(match k {
            WorkErrorKind::Materialize => 0,
            WorkErrorKind::Attach => 1,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_render_start(&mut self, e: &RenderStartEvent) {
        self.write_u8(TAG_RENDER_START);
        self.write_u32(e.pass);
        self.write_u32(e.elements);
        self.write_commit_mode(e.commit_mode);
    }

    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        self.write_u8(TAG_TICK_BEGIN);
        self.write_u32(e.pass);
        self.write_u64(e.tick_index);
        self.write_duration(e.budget);
    }

    fn on_unit(&mut self, e: &UnitEvent) {
        self.write_u8(TAG_UNIT);
        self.write_u32(e.pass);
        self.write_u64(e.tick_index);
        self.write_u32(e.fiber);
        self.write_u32(e.depth);
        self.write_duration(e.remaining);
    }

    fn on_tick_end(&mut self, e: &TickEndEvent) {
        self.write_u8(TAG_TICK_END);
        self.write_u32(e.pass);
        self.write_u64(e.tick_index);
        self.write_u32(e.units);
        self.write_status(e.status);
        self.write_duration(e.remaining);
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        self.write_u8(TAG_COMMIT);
        self.write_u32(e.pass);
        self.write_u64(e.tick_index);
        self.write_u32(e.attached);
    }

    fn on_render_complete(&mut self, e: &RenderCompleteEvent) {
        self.write_u8(TAG_RENDER_COMPLETE);
        self.write_u32(e.pass);
        self.write_u64(e.tick_index);
        self.write_u32(e.fibers);
        self.write_u32(e.ticks);
        self.write_u32(e.units);
    }

    fn on_work_error(&mut self, e: &WorkErrorEvent) {
        self.write_u8(TAG_WORK_ERROR);
        self.write_u32(e.pass);
        self.write_u64(e.tick_index);
        self.write_u32(e.fiber);
        self.write_error_kind(e.kind);
    }

    fn on_materialize(&mut self, e: &MaterializeEvent<'_>) {
        self.write_u8(TAG_MATERIALIZE);
        self.write_u32(e.pass);
        self.write_u32(e.fiber);
        self.write_str(e.tag);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`RenderStartEvent`].
    RenderStart(RenderStartEvent),
    /// A [`TickBeginEvent`].
    TickBegin(TickBeginEvent),
    /// A [`UnitEvent`].
    Unit(UnitEvent),
    /// A [`TickEndEvent`].
    TickEnd(TickEndEvent),
    /// A [`CommitEvent`].
    Commit(CommitEvent),
    /// A [`RenderCompleteEvent`].
    RenderComplete(RenderCompleteEvent),
    /// A [`WorkErrorEvent`].
    WorkError(WorkErrorEvent),
    /// A [`MaterializeEvent`], with its tag name owned.
    Materialize {
        /// Render pass counter.
        pass: u32,
        /// Slot index of the fiber.
        fiber: u32,
        /// Tag name.
        tag: String,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Stops at the end of the data, at a truncated record, or at an unknown tag.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_bytes(&mut self, len: usize) -> Option<&[u8]> {
        if self.remaining() < len {
            return None;
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.read_bytes(1)?[0])
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.read_bytes(4)?.try_into().ok()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.read_bytes(8)?.try_into().ok()?))
    }

    fn read_duration(&mut self) -> Option<Duration> {
        Some(Duration::from_micros(self.read_u64()?))
    }

    fn read_string(&mut self) -> Option<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).ok()
    }

    fn read_commit_mode(&mut self) -> Option<CommitMode> {
        Some(match self.read_u8()? {
            0 => CommitMode::Inline,
            _ => CommitMode::Deferred,
        })
    }

    fn read_status(&mut self) -> Option<TickStatus> {
        Some(match self.read_u8()? {
            0 => TickStatus::Yielded,
            1 => TickStatus::Completed,
            _ => TickStatus::Idle,
        })
    }

    fn read_error_kind(&mut self) -> Option<WorkErrorKind> {
        Some(match self.read_u8()? {
            0 => WorkErrorKind::Materialize,
            _ => WorkErrorKind::Attach,
        })
    }

    fn decode_render_start(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RenderStart(RenderStartEvent {
            pass: self.read_u32()?,
            elements: self.read_u32()?,
            commit_mode: self.read_commit_mode()?,
        }))
    }

    fn decode_tick_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TickBegin(TickBeginEvent {
            pass: self.read_u32()?,
            tick_index: self.read_u64()?,
            budget: self.read_duration()?,
        }))
    }

    fn decode_unit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Unit(UnitEvent {
            pass: self.read_u32()?,
            tick_index: self.read_u64()?,
            fiber: self.read_u32()?,
            depth: self.read_u32()?,
            remaining: self.read_duration()?,
        }))
    }

    fn decode_tick_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TickEnd(TickEndEvent {
            pass: self.read_u32()?,
            tick_index: self.read_u64()?,
            units: self.read_u32()?,
            status: self.read_status()?,
            remaining: self.read_duration()?,
        }))
    }

    fn decode_commit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Commit(CommitEvent {
            pass: self.read_u32()?,
            tick_index: self.read_u64()?,
            attached: self.read_u32()?,
        }))
    }

    fn decode_render_complete(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RenderComplete(RenderCompleteEvent {
            pass: self.read_u32()?,
            tick_index: self.read_u64()?,
            fibers: self.read_u32()?,
            ticks: self.read_u32()?,
            units: self.read_u32()?,
        }))
    }

    fn decode_work_error(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::WorkError(WorkErrorEvent {
            pass: self.read_u32()?,
            tick_index: self.read_u64()?,
            fiber: self.read_u32()?,
            kind: self.read_error_kind()?,
        }))
    }

    fn decode_materialize(&mut self) -> Option<RecordedEvent> {
        let pass = self.read_u32()?;
        let fiber = self.read_u32()?;
        let tag = self.read_string()?;
        Some(RecordedEvent::Materialize { pass, fiber, tag })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_RENDER_START => self.decode_render_start(),
            TAG_TICK_BEGIN => self.decode_tick_begin(),
            TAG_UNIT => self.decode_unit(),
            TAG_TICK_END => self.decode_tick_end(),
            TAG_COMMIT => self.decode_commit(),
            TAG_RENDER_COMPLETE => self.decode_render_complete(),
            TAG_WORK_ERROR => self.decode_work_error(),
            TAG_MATERIALIZE => self.decode_materialize(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
