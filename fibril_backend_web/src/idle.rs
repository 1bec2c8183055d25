// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestIdleCallback` tick source.
//!
//! [`IdleLoop`] calls back once per browser idle period, handing over an
//! [`IdleSlice`] that implements [`Deadline`] from the callback's
//! [`IdleDeadline`][mdn]. `timeRemaining()` reports fractional milliseconds,
//! which are converted to microsecond [`Duration`]s.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/IdleDeadline

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::IdleDeadline;

use fibril_core::deadline::Deadline;
use fibril_core::time::Duration;

// Direct global bindings instead of `web_sys::Window` methods, so no Window
// object has to be fetched on every idle period.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestIdleCallback")]
    fn request_idle_callback(callback: &JsValue) -> u32;

    #[wasm_bindgen(js_name = "cancelIdleCallback")]
    fn cancel_idle_callback(handle: u32);
}

/// One browser idle period, as seen by the work loop.
pub struct IdleSlice {
    deadline: IdleDeadline,
    index: u64,
}

impl IdleSlice {
    /// Returns the zero-based index of this idle period within its loop.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns `true` if the callback ran because its timeout expired rather
    /// than because the browser was idle.
    #[must_use]
    pub fn did_timeout(&self) -> bool {
        self.deadline.did_timeout()
    }
}

impl Deadline for IdleSlice {
    fn time_remaining(&self) -> Duration {
        Duration::from_millis_f64(self.deadline.time_remaining())
    }
}

impl core::fmt::Debug for IdleSlice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdleSlice")
            .field("deadline", &"IdleDeadline")
            .field("index", &self.index)
            .finish()
    }
}

/// A `requestIdleCallback` loop that hands each idle period to a callback.
///
/// Create with [`IdleLoop::new`], then call [`start`](Self::start). The loop
/// re-registers itself after every callback, whether or not the callback
/// found anything to do, until [`stop`](Self::stop) is called or the
/// `IdleLoop` is dropped.
pub struct IdleLoop {
    inner: Rc<IdleInner>,
}

type IdleClosure = Closure<dyn FnMut(IdleDeadline)>;

struct IdleInner {
    /// The JS closure registered with `requestIdleCallback`.
    ///
    /// Kept in its own `RefCell` so it can be set once in `start()` and
    /// re-registered from inside itself while `callback` is borrowed.
    closure: RefCell<Option<IdleClosure>>,

    callback: RefCell<Box<dyn FnMut(&IdleSlice)>>,

    /// Becomes `IdleSlice::index`.
    slice_counter: Cell<u64>,

    running: Cell<bool>,

    /// Handle of the most recent `requestIdleCallback`, for cancellation.
    handle: Cell<u32>,
}

impl IdleLoop {
    /// Creates a new `IdleLoop` that is **not yet running**.
    pub fn new(callback: impl FnMut(&IdleSlice) + 'static) -> Self {
        Self {
            inner: Rc::new(IdleInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                slice_counter: Cell::new(0),
                running: Cell::new(false),
                handle: Cell::new(0),
            }),
        }
    }

    /// Starts the loop.
    ///
    /// If already running, this is a no-op.
    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);

        // Reuse the closure from an earlier start.
        if let Some(ref closure) = *self.inner.closure.borrow() {
            let handle = request_idle_callback(closure.as_ref().unchecked_ref());
            self.inner.handle.set(handle);
            return;
        }

        let inner = Rc::clone(&self.inner);
        let closure = Closure::wrap(Box::new(move |deadline: IdleDeadline| {
            if !inner.running.get() {
                return;
            }

            let index = inner.slice_counter.get();
            inner.slice_counter.set(index + 1);
            let slice = IdleSlice { deadline, index };

            // Scoped so it doesn't overlap with the `closure` RefCell.
            inner.callback.borrow_mut()(&slice);

            if inner.running.get()
                && let Some(ref closure) = *inner.closure.borrow()
            {
                let handle = request_idle_callback(closure.as_ref().unchecked_ref());
                inner.handle.set(handle);
            }
        }) as Box<dyn FnMut(IdleDeadline)>);

        let handle = request_idle_callback(closure.as_ref().unchecked_ref());
        self.inner.handle.set(handle);
        *self.inner.closure.borrow_mut() = Some(closure);
    }

    /// Stops the loop.
    ///
    /// The pending idle callback is cancelled. Work already handed to the
    /// callback is not undone. Can be restarted with [`start`](Self::start).
    pub fn stop(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        cancel_idle_callback(self.inner.handle.get());
    }

    /// Returns `true` if the loop is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Returns how many idle periods have been handed to the callback.
    #[must_use]
    pub fn slices(&self) -> u64 {
        self.inner.slice_counter.get()
    }
}

impl Drop for IdleLoop {
    fn drop(&mut self) {
        self.stop();
        // Drop the JS closure so it doesn't leak.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for IdleLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdleLoop")
            .field("running", &self.inner.running.get())
            .field("slice_counter", &self.inner.slice_counter.get())
            .finish_non_exhaustive()
    }
}
