// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for platform integrations.
//!
//! Everything the engine does to the output tree goes through the four
//! operations of [`Host`]:
//!
//! - **create a tagged node** by type name,
//! - **create a text node**,
//! - **assign a property** by key name on either kind of node,
//! - **append a child** under a parent node.
//!
//! The engine never reads host nodes back, never removes them, and never
//! clears a container. Backends implement [`Host`] over a real node tree
//! (e.g. `fibril_backend_web::DomHost` over the browser DOM);
//! [`MemoryHost`] is an in-memory implementation for tests and headless use.

mod memory;

use alloc::string::String;
use core::fmt;

use crate::element::PropValue;

pub use memory::{MemoryHost, NodeId};

/// Builds and links nodes in a platform-native output tree.
///
/// Property assignment is a direct key/value copy: implementations should
/// neither validate keys nor coerce values beyond what the platform itself
/// does when a property is set.
pub trait Host {
    /// Handle to a host node. Cloning must yield a handle to the same node.
    type Node: Clone;

    /// Creates a structural node for `tag`. The tag is not validated.
    fn create_element(&mut self, tag: &str) -> Result<Self::Node, HostError>;

    /// Creates an empty text node.
    fn create_text_node(&mut self) -> Result<Self::Node, HostError>;

    /// Assigns `value` to the property named `key` on `node`.
    fn set_property(
        &mut self,
        node: &Self::Node,
        key: &str,
        value: &PropValue,
    ) -> Result<(), HostError>;

    /// Appends `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;
}

/// A host primitive refused an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostError {
    /// Creating a node for the given tag failed.
    CreateElement {
        /// The requested tag.
        tag: String,
    },
    /// Creating a text node failed.
    CreateTextNode,
    /// Assigning the given property failed.
    SetProperty {
        /// The property key.
        key: String,
    },
    /// Appending a child failed.
    AppendChild,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateElement { tag } => write!(f, "host could not create <{tag}>"),
            Self::CreateTextNode => f.write_str("host could not create a text node"),
            Self::SetProperty { key } => write!(f, "host rejected property `{key}`"),
            Self::AppendChild => f.write_str("host could not append child node"),
        }
    }
}

impl core::error::Error for HostError {}
