// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fiber tree with struct-of-arrays storage and resumable pre-order walking.
//!
//! A fiber is the work record for one element: its host node once created,
//! and `parent`/`child`/`sibling` links. Child fibers are created lazily, when
//! their parent is performed, so the tree grows as the walk advances.
//!
//! The walk never recurses. [`next_unit_of_work`] finds the successor of any
//! fiber from its links alone, which is what lets a render stop after any
//! unit and resume later from a single saved [`FiberId`].

mod id;
mod traverse;
mod tree;
mod walk;

pub use id::{FiberId, INVALID};
pub use traverse::{Children, Preorder};
pub use tree::FiberTree;
pub use walk::{CommitMode, commit, next_unit_of_work, perform_unit_of_work};
