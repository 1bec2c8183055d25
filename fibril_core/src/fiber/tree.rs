// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays fiber storage with topology and host-node slots.

use alloc::vec::Vec;

use crate::element::{Element, ElementType, Props};

use super::id::{FiberId, INVALID};
use super::traverse::{Children, Preorder};

static NO_PROPS: Props = Props::new();

/// Struct-of-arrays storage for the fibers of one render pass.
///
/// Fibers are addressed by [`FiberId`] handles. Slot 0 is the synthetic root,
/// which wraps the container node and has the rendered element as its only
/// pending child. Links are raw slot indices with [`INVALID`] meaning "none":
///
/// - `parent` is a back-reference used only to climb when no sibling exists;
/// - `child` is the first child; later children hang off its `sibling` chain.
///
/// Every other fiber is the expansion of exactly one element, which it keeps
/// (a reference-counted clone) as the source of its type, properties, and
/// pending children.
#[derive(Debug)]
pub struct FiberTree<N> {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) child: Vec<u32>,
    pub(crate) sibling: Vec<u32>,
    pub(crate) depth: Vec<u32>,

    // -- Source --
    pub(crate) element: Vec<Option<Element>>,
    pub(crate) root_children: Vec<Element>,

    // -- Work state --
    pub(crate) dom: Vec<Option<N>>,
    pub(crate) expanded: Vec<bool>,
    pub(crate) attached: Vec<bool>,

    pub(crate) pass: u32,
}

impl<N> Default for FiberTree<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> FiberTree<N> {
    /// Creates an empty tree with no root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            child: Vec::new(),
            sibling: Vec::new(),
            depth: Vec::new(),
            element: Vec::new(),
            root_children: Vec::new(),
            dom: Vec::new(),
            expanded: Vec::new(),
            attached: Vec::new(),
            pass: 0,
        }
    }

    /// Discards every fiber and starts a new pass rooted at `container`.
    ///
    /// The root is born materialized (its host node is the container) and
    /// attached (it has no parent to attach to).
    pub(crate) fn reset(&mut self, container: N, element: Element) -> FiberId {
        self.parent.clear();
        self.child.clear();
        self.sibling.clear();
        self.depth.clear();
        self.element.clear();
        self.dom.clear();
        self.expanded.clear();
        self.attached.clear();
        self.root_children.clear();
        self.root_children.push(element);
        self.pass = self.pass.wrapping_add(1);

        let idx = self.push_slot(INVALID, 0, None);
        self.dom[idx as usize] = Some(container);
        self.attached[idx as usize] = true;
        self.id_at(idx)
    }

    /// Appends a fresh, unlinked fiber for `element` under `parent`.
    ///
    /// The caller links it into `child`/`sibling`.
    pub(crate) fn push_child(&mut self, parent: u32, element: Element) -> u32 {
        let depth = self.depth[parent as usize] + 1;
        self.push_slot(parent, depth, Some(element))
    }

    fn push_slot(&mut self, parent: u32, depth: u32, element: Option<Element>) -> u32 {
        let idx = u32::try_from(self.parent.len())
            .ok()
            .filter(|&idx| idx != INVALID)
            .expect("fiber count exceeds u32 index space");
        self.parent.push(parent);
        self.child.push(INVALID);
        self.sibling.push(INVALID);
        self.depth.push(depth);
        self.element.push(element);
        self.dom.push(None);
        self.expanded.push(false);
        self.attached.push(false);
        idx
    }

    // -- Queries --

    /// Returns the root fiber of the current pass, if a render has started.
    #[must_use]
    pub fn root(&self) -> Option<FiberId> {
        (!self.parent.is_empty()).then(|| self.id_at(0))
    }

    /// Returns the number of fibers created so far in this pass.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` if no render has started.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the current render pass counter.
    #[must_use]
    pub fn pass(&self) -> u32 {
        self.pass
    }

    /// Returns whether the handle belongs to the current pass.
    #[must_use]
    pub fn is_current(&self, id: FiberId) -> bool {
        id.pass == self.pass && (id.idx as usize) < self.parent.len()
    }

    /// Returns the element type, or `None` for the root.
    #[must_use]
    pub fn ty(&self, id: FiberId) -> Option<&ElementType> {
        self.validate(id);
        self.element[id.idx as usize].as_ref().map(Element::ty)
    }

    /// Returns the non-child properties. The root has none.
    #[must_use]
    pub fn props(&self, id: FiberId) -> &Props {
        self.validate(id);
        self.element[id.idx as usize]
            .as_ref()
            .map_or(&NO_PROPS, Element::props)
    }

    /// Returns the source element, or `None` for the root.
    #[must_use]
    pub fn element(&self, id: FiberId) -> Option<&Element> {
        self.validate(id);
        self.element[id.idx as usize].as_ref()
    }

    /// Returns the child elements this fiber expands into when performed.
    #[must_use]
    pub fn pending_children(&self, id: FiberId) -> &[Element] {
        self.validate(id);
        match &self.element[id.idx as usize] {
            Some(element) => element.children(),
            None => &self.root_children,
        }
    }

    /// Returns the parent fiber, if any.
    #[must_use]
    pub fn parent(&self, id: FiberId) -> Option<FiberId> {
        self.validate(id);
        self.link(self.parent[id.idx as usize])
    }

    /// Returns the first child fiber, if the fiber has been expanded and has
    /// children.
    #[must_use]
    pub fn child(&self, id: FiberId) -> Option<FiberId> {
        self.validate(id);
        self.link(self.child[id.idx as usize])
    }

    /// Returns the next sibling fiber, if any.
    #[must_use]
    pub fn sibling(&self, id: FiberId) -> Option<FiberId> {
        self.validate(id);
        self.link(self.sibling[id.idx as usize])
    }

    /// Returns the distance from the root (the root is at depth 0).
    #[must_use]
    pub fn depth(&self, id: FiberId) -> u32 {
        self.validate(id);
        self.depth[id.idx as usize]
    }

    /// Returns the host node, once materialized.
    #[must_use]
    pub fn dom(&self, id: FiberId) -> Option<&N> {
        self.validate(id);
        self.dom[id.idx as usize].as_ref()
    }

    /// Returns whether the fiber's children have been created.
    #[must_use]
    pub fn is_expanded(&self, id: FiberId) -> bool {
        self.validate(id);
        self.expanded[id.idx as usize]
    }

    /// Returns whether the fiber's host node has been appended to its
    /// parent's. Always `true` for the root.
    #[must_use]
    pub fn is_attached(&self, id: FiberId) -> bool {
        self.validate(id);
        self.attached[id.idx as usize]
    }

    /// Returns an iterator over the direct children of a fiber.
    #[must_use]
    pub fn children(&self, id: FiberId) -> Children<'_, N> {
        self.validate(id);
        Children::new(self, self.child[id.idx as usize])
    }

    /// Returns a pre-order iterator over every fiber linked so far.
    #[must_use]
    pub fn preorder(&self) -> Preorder<'_, N> {
        Preorder::new(self)
    }

    // -- Internal --

    pub(crate) fn id_at(&self, idx: u32) -> FiberId {
        FiberId {
            idx,
            pass: self.pass,
        }
    }

    fn link(&self, idx: u32) -> Option<FiberId> {
        (idx != INVALID).then(|| self.id_at(idx))
    }

    /// Panics if `id` is stale or out of range.
    pub(crate) fn validate(&self, id: FiberId) {
        assert!(
            id.pass == self.pass,
            "stale fiber handle {id:?} (current pass {})",
            self.pass
        );
        assert!(
            (id.idx as usize) < self.parent.len(),
            "fiber index {} out of range (len {})",
            id.idx,
            self.parent.len()
        );
    }
}
