// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for materialization and units of work.

use core::fmt;

use crate::element::ElementType;
use crate::fiber::FiberId;
use crate::host::HostError;

/// Materializing an element into a host node failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterializeError {
    /// The element type being materialized.
    pub ty: ElementType,
    /// The host failure.
    pub source: HostError,
}

impl fmt::Display for MaterializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "materialization of {} failed", self.ty.as_str())
    }
}

impl core::error::Error for MaterializeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// A unit of work failed.
///
/// The failing fiber stays pending; the rest of the fiber tree is untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkError {
    /// The fiber's host node could not be created or populated.
    Materialize {
        /// The fiber being visited.
        fiber: FiberId,
        /// The underlying failure.
        error: MaterializeError,
    },
    /// The fiber's host node could not be attached to its parent's.
    Attach {
        /// The fiber being attached.
        fiber: FiberId,
        /// The underlying failure.
        error: HostError,
    },
}

impl WorkError {
    /// Returns the fiber whose unit of work failed.
    #[must_use]
    pub fn fiber(&self) -> FiberId {
        match self {
            Self::Materialize { fiber, .. } | Self::Attach { fiber, .. } => *fiber,
        }
    }
}

impl fmt::Display for WorkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Materialize { fiber, .. } => {
                write!(f, "unit of work for {fiber:?} failed to materialize")
            }
            Self::Attach { fiber, .. } => {
                write!(f, "unit of work for {fiber:?} failed to attach")
            }
        }
    }
}

impl core::error::Error for WorkError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Materialize { error, .. } => Some(error),
            Self::Attach { error, .. } => Some(error),
        }
    }
}
