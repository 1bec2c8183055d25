// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fiber identity.

use core::fmt;

/// Sentinel value indicating "no fiber" in link fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a fiber in a [`FiberTree`](super::FiberTree).
///
/// Contains the slot index and the render pass that created it. Starting a
/// new render discards every fiber of the previous pass, so handles from an
/// older pass are rejected.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiberId {
    /// Slot index into the tree's arrays.
    pub(crate) idx: u32,
    /// Render pass that created the fiber.
    pub(crate) pass: u32,
}

impl FiberId {
    /// Returns the raw slot index. The root of a pass is always slot 0.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the render pass counter.
    #[inline]
    #[must_use]
    pub const fn pass(self) -> u32 {
        self.pass
    }
}

impl fmt::Debug for FiberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FiberId({}@pass{})", self.idx, self.pass)
    }
}
