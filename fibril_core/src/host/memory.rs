// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host tree.

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use super::{Host, HostError};
use crate::element::{NODE_VALUE, PropValue};

/// Handle to a node in a [`MemoryHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug)]
enum NodeKind {
    Element(String),
    Text,
}

#[derive(Clone, Debug)]
struct NodeData {
    kind: NodeKind,
    props: Vec<(String, PropValue)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A [`Host`] that keeps its node tree in plain vectors.
///
/// Nodes are never freed. Appending a node that already has a parent moves
/// it, as the DOM does. Tags registered with [`reject_tag`](Self::reject_tag)
/// make [`create_element`](Host::create_element) fail, which lets callers
/// exercise materialization errors.
#[derive(Clone, Debug, Default)]
pub struct MemoryHost {
    nodes: Vec<NodeData>,
    rejected_tags: Vec<String>,
    appends: u64,
}

impl MemoryHost {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached node to render into.
    ///
    /// Unlike [`create_element`](Host::create_element) this never fails.
    pub fn create_container(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(tag.to_owned()))
    }

    /// Makes future `create_element(tag)` calls fail.
    pub fn reject_tag(&mut self, tag: &str) {
        self.rejected_tags.push(tag.to_owned());
    }

    /// Lifts all [`reject_tag`](Self::reject_tag) registrations.
    pub fn accept_all_tags(&mut self) {
        self.rejected_tags.clear();
    }

    /// Returns the number of nodes ever created, containers included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of successful `append_child` calls.
    #[must_use]
    pub fn append_count(&self) -> u64 {
        self.appends
    }

    /// Returns the tag of an element node, or `None` for a text node.
    ///
    /// # Panics
    ///
    /// Panics if `node` did not come from this host.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).kind {
            NodeKind::Element(tag) => Some(tag),
            NodeKind::Text => None,
        }
    }

    /// Returns `true` if `node` is a text node.
    ///
    /// # Panics
    ///
    /// Panics if `node` did not come from this host.
    #[must_use]
    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.node(node).kind, NodeKind::Text)
    }

    /// Returns the value last assigned to `key` on `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` did not come from this host.
    #[must_use]
    pub fn property(&self, node: NodeId, key: &str) -> Option<&PropValue> {
        self.node(node)
            .props
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns the number of distinct properties assigned on `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` did not come from this host.
    #[must_use]
    pub fn property_count(&self, node: NodeId) -> usize {
        self.node(node).props.len()
    }

    /// Returns the children of `node` in order.
    ///
    /// # Panics
    ///
    /// Panics if `node` did not come from this host.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// Returns the parent of `node`, if attached.
    ///
    /// # Panics
    ///
    /// Panics if `node` did not come from this host.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    /// Serializes the subtree under `node` (exclusive) as markup.
    ///
    /// Element nodes print as `<tag key="value">…</tag>`, text nodes print
    /// their `nodeValue`. No escaping is performed.
    ///
    /// # Panics
    ///
    /// Panics if `node` did not come from this host.
    #[must_use]
    pub fn inner_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.write_markup(child, &mut out);
        }
        out
    }

    /// Serializes `node` and its subtree as markup.
    ///
    /// # Panics
    ///
    /// Panics if `node` did not come from this host.
    #[must_use]
    pub fn outer_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(node, &mut out);
        out
    }

    fn write_markup(&self, node: NodeId, out: &mut String) {
        let data = self.node(node);
        match &data.kind {
            NodeKind::Text => {
                if let Some(value) = self.property(node, NODE_VALUE) {
                    let _ = write!(out, "{value}");
                }
            }
            NodeKind::Element(tag) => {
                let _ = write!(out, "<{tag}");
                for (key, value) in &data.props {
                    let _ = write!(out, " {key}=\"{value}\"");
                }
                out.push('>');
                for &child in &data.children {
                    self.write_markup(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = u32::try_from(self.nodes.len()).expect("too many host nodes");
        self.nodes.push(NodeData {
            kind,
            props: Vec::new(),
            parent: None,
            children: Vec::new(),
        });
        NodeId(id)
    }

    fn node(&self, node: NodeId) -> &NodeData {
        self.nodes
            .get(node.0 as usize)
            .unwrap_or_else(|| panic!("unknown host node {}", node.0))
    }

    fn node_mut(&mut self, node: NodeId) -> &mut NodeData {
        self.nodes
            .get_mut(node.0 as usize)
            .unwrap_or_else(|| panic!("unknown host node {}", node.0))
    }
}

impl Host for MemoryHost {
    type Node = NodeId;

    fn create_element(&mut self, tag: &str) -> Result<NodeId, HostError> {
        if self.rejected_tags.iter().any(|t| t == tag) {
            return Err(HostError::CreateElement {
                tag: tag.to_owned(),
            });
        }
        Ok(self.push(NodeKind::Element(tag.to_owned())))
    }

    fn create_text_node(&mut self) -> Result<NodeId, HostError> {
        Ok(self.push(NodeKind::Text))
    }

    fn set_property(
        &mut self,
        node: &NodeId,
        key: &str,
        value: &PropValue,
    ) -> Result<(), HostError> {
        let props = &mut self.node_mut(*node).props;
        if let Some(slot) = props.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value.clone();
        } else {
            props.push((key.to_owned(), value.clone()));
        }
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        // A childless node cannot be an ancestor of `parent`.
        let has_children = !self.node(*child).children.is_empty();
        if parent == child || (has_children && self.is_ancestor(*child, *parent)) {
            return Err(HostError::AppendChild);
        }
        if let Some(old) = self.node(*child).parent {
            self.node_mut(old).children.retain(|c| c != child);
        }
        self.node_mut(*child).parent = Some(*parent);
        self.node_mut(*parent).children.push(*child);
        self.appends += 1;
        Ok(())
    }
}

impl MemoryHost {
    /// Returns `true` if `ancestor` is a proper ancestor of `node`.
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = self.node(node).parent;
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.node(p).parent;
        }
        false
    }
}
