// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for fibril.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`DomHost`]: DOM node creation, property assignment, and linking
//! - [`IdleLoop`]: `requestIdleCallback` tick source, with [`IdleSlice`] as
//!   the per-period [`Deadline`](fibril_core::deadline::Deadline)
//! - [`drive`]: ticks a shared [`WorkLoop`] from an [`IdleLoop`]

#![no_std]

extern crate alloc;

mod dom;
mod idle;

pub use dom::DomHost;
pub use fibril_core::host::Host;
pub use idle::{IdleLoop, IdleSlice};

use alloc::rc::Rc;
use core::cell::RefCell;

use fibril_core::error::WorkError;
use fibril_core::scheduler::WorkLoop;
use fibril_core::trace::Tracer;

/// Starts an [`IdleLoop`] that ticks `work` once per idle period.
///
/// The loop keeps re-registering while `work` is idle, so a later
/// [`WorkLoop::render`] through the same `Rc` is picked up on the next idle
/// period. Failed ticks are reported to `on_error`; the failing fiber is
/// retried on the next period.
///
/// Dropping the returned loop stops it.
pub fn drive<H>(
    work: Rc<RefCell<WorkLoop<H>>>,
    mut on_error: impl FnMut(&WorkError) + 'static,
) -> IdleLoop
where
    H: Host + 'static,
{
    let idle = IdleLoop::new(move |slice| {
        let result = work.borrow_mut().tick(slice, &mut Tracer::none());
        if let Err(err) = result {
            on_error(&err);
        }
    });
    idle.start();
    idle
}
