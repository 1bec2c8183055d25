// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The unit of work: materialize, attach, expand, advance.

use crate::error::WorkError;
use crate::host::Host;
use crate::materialize::materialize;

use super::id::{FiberId, INVALID};
use super::tree::FiberTree;

/// When host nodes are appended to their parent's host node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CommitMode {
    /// Attach each fiber's node while it is performed.
    ///
    /// A node is always attached before any of its descendants materialize,
    /// and a partially built tree is observable between ticks.
    #[default]
    Inline,
    /// Attach nothing while traversing; [`commit`] attaches every node in
    /// pre-order once traversal has completed.
    Deferred,
}

/// Performs one unit of work on `fiber` and returns the next fiber to
/// perform, or `None` once the whole tree has been visited.
///
/// 1. Materializes the fiber's host node if it has none.
/// 2. With [`CommitMode::Inline`], appends that node to the parent fiber's
///    node.
/// 3. Creates one fiber per pending child element: the first becomes
///    `child`, each later one the previous one's `sibling`.
/// 4. Picks the next fiber in depth-first pre-order (see
///    [`next_unit_of_work`]).
///
/// Each step runs at most once per fiber, so performing a fiber again never
/// creates a second host node, duplicates its children, or re-appends it.
///
/// On error nothing after the failing step has happened and the fiber can
/// be performed again; a node that was already materialized is kept.
///
/// # Panics
///
/// Panics if `fiber` is not from the tree's current pass.
pub fn perform_unit_of_work<H: Host + ?Sized>(
    tree: &mut FiberTree<H::Node>,
    host: &mut H,
    fiber: FiberId,
    mode: CommitMode,
) -> Result<Option<FiberId>, WorkError> {
    tree.validate(fiber);
    let idx = fiber.idx as usize;

    if tree.dom[idx].is_none() {
        let Some(element) = &tree.element[idx] else {
            unreachable!("the root is born materialized");
        };
        let node = materialize(host, element.ty(), element.props())
            .map_err(|error| WorkError::Materialize { fiber, error })?;
        tree.dom[idx] = Some(node);
    }

    if mode == CommitMode::Inline && !tree.attached[idx] {
        attach(tree, host, fiber)?;
    }

    if !tree.expanded[idx] {
        expand(tree, fiber);
    }

    Ok(next_unit_of_work(tree, fiber))
}

/// Returns the fiber after `fiber` in depth-first pre-order.
///
/// Prefers the first child; otherwise climbs through `parent` links,
/// starting at `fiber` itself, and returns the first sibling found. Returns
/// `None` when the climb passes the root.
///
/// Only links that already exist are followed, so a fiber that has not been
/// performed yet counts as a leaf.
///
/// # Panics
///
/// Panics if `fiber` is not from the tree's current pass.
#[must_use]
pub fn next_unit_of_work<N>(tree: &FiberTree<N>, fiber: FiberId) -> Option<FiberId> {
    tree.validate(fiber);
    let first_child = tree.child[fiber.idx as usize];
    if first_child != INVALID {
        return Some(tree.id_at(first_child));
    }
    let mut current = fiber.idx;
    while current != INVALID {
        let sibling = tree.sibling[current as usize];
        if sibling != INVALID {
            return Some(tree.id_at(sibling));
        }
        current = tree.parent[current as usize];
    }
    None
}

/// Appends every materialized, not yet attached fiber's node to its parent's
/// node, in pre-order. Returns how many nodes were attached.
///
/// Stops at the first failure; attached fibers are remembered, so calling
/// again resumes with the fiber that failed.
pub fn commit<H: Host + ?Sized>(
    tree: &mut FiberTree<H::Node>,
    host: &mut H,
) -> Result<u32, WorkError> {
    let mut attached = 0;
    let mut next = tree.root();
    while let Some(fiber) = next {
        let idx = fiber.idx as usize;
        if !tree.attached[idx] && tree.dom[idx].is_some() {
            attach(tree, host, fiber)?;
            attached += 1;
        }
        next = next_unit_of_work(tree, fiber);
    }
    Ok(attached)
}

fn attach<H: Host + ?Sized>(
    tree: &mut FiberTree<H::Node>,
    host: &mut H,
    fiber: FiberId,
) -> Result<(), WorkError> {
    let idx = fiber.idx as usize;
    let parent = tree.parent[idx];
    if parent != INVALID {
        let (Some(parent_dom), Some(dom)) = (&tree.dom[parent as usize], &tree.dom[idx]) else {
            unreachable!("parents are performed before their children");
        };
        host.append_child(parent_dom, dom)
            .map_err(|error| WorkError::Attach { fiber, error })?;
    }
    tree.attached[idx] = true;
    Ok(())
}

fn expand<N>(tree: &mut FiberTree<N>, fiber: FiberId) {
    let parent = fiber.idx;
    let children = tree.pending_children(fiber).to_vec();
    let mut prev = INVALID;
    for element in children {
        let idx = tree.push_child(parent, element);
        if prev == INVALID {
            tree.child[parent as usize] = idx;
        } else {
            tree.sibling[prev as usize] = idx;
        }
        prev = idx;
    }
    tree.expanded[parent as usize] = true;
}
