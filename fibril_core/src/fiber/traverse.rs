// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::id::{FiberId, INVALID};
use super::tree::FiberTree;
use super::walk::next_unit_of_work;

/// An iterator over the direct children of a fiber.
///
/// Created by [`FiberTree::children`].
#[derive(Debug)]
pub struct Children<'a, N> {
    tree: &'a FiberTree<N>,
    current: u32,
}

impl<'a, N> Children<'a, N> {
    pub(crate) fn new(tree: &'a FiberTree<N>, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl<N> Iterator for Children<'_, N> {
    type Item = FiberId;

    fn next(&mut self) -> Option<FiberId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.sibling[idx as usize];
        Some(self.tree.id_at(idx))
    }
}

/// A depth-first pre-order iterator over every fiber linked so far.
///
/// Follows the same child → sibling → ancestor's sibling order as the work
/// loop, so it visits fibers in exactly the order they are (or were)
/// performed. Created by [`FiberTree::preorder`].
#[derive(Debug)]
pub struct Preorder<'a, N> {
    tree: &'a FiberTree<N>,
    next: Option<FiberId>,
}

impl<'a, N> Preorder<'a, N> {
    pub(crate) fn new(tree: &'a FiberTree<N>) -> Self {
        Self {
            tree,
            next: tree.root(),
        }
    }
}

impl<N> Iterator for Preorder<'_, N> {
    type Item = FiberId;

    fn next(&mut self) -> Option<FiberId> {
        let current = self.next?;
        self.next = next_unit_of_work(self.tree, current);
        Some(current)
    }
}
