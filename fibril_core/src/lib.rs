// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental, interruptible construction of host node trees.
//!
//! `fibril_core` turns an immutable tree of [`Element`](element::Element)
//! descriptions into a tree of host nodes (DOM nodes in a browser, or the
//! in-memory [`MemoryHost`](host::MemoryHost) in tests), one small unit of
//! work at a time, so rendering can be spread over many idle slices without
//! blocking the host. It is `no_std` compatible (with `alloc`) and stores
//! fibers in struct-of-arrays form with index handles.
//!
//! # Architecture
//!
//! ```text
//!   element!(..) ──► Element ──► WorkLoop::render()
//!                                     │
//!                                     ▼
//!   idle slice ──► WorkLoop::tick(deadline) ──► perform_unit_of_work()  (repeat)
//!                        │                            │
//!                        │                            ▼
//!                        │                      materialize() ──► Host
//!                        ▼
//!                   TickReport (Yielded | Completed | Idle)
//! ```
//!
//! **[`element`]**: Immutable, reference-counted element trees and the
//! [`element!`] builder. Bare strings and numbers become text elements.
//!
//! **[`host`]**: The four-operation [`Host`](host::Host) trait that node
//! backends implement, plus [`MemoryHost`](host::MemoryHost).
//!
//! **[`materialize`]**: One element type and its properties to one detached
//! host node, and the blocking [`render_sync`](materialize::render_sync).
//!
//! **[`fiber`]**: Struct-of-arrays fiber tree with pass-checked handles, and
//! the resumable pre-order unit of work.
//!
//! **[`scheduler`]**: The [`WorkLoop`](scheduler::WorkLoop): the `pending`
//! slot, per-tick deadline checks, and optional deferred commit.
//!
//! **[`deadline`]**: The [`Deadline`](deadline::Deadline) trait for idle
//! slices, with fixed and simulated implementations.
//!
//! **[`time`]**: Microsecond [`Duration`](time::Duration).
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! work-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates the
//!   per-node materialization event.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod deadline;
pub mod element;
pub mod error;
pub mod fiber;
pub mod host;
pub mod materialize;
pub mod scheduler;
pub mod time;
pub mod trace;
