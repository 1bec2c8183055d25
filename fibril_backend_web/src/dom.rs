// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM host nodes.
//!
//! [`DomHost`] implements [`Host`] over a `web_sys::Document`. Properties are
//! assigned as plain JS properties (`node[key] = value`, through
//! [`js_sys::Reflect::set`]), not as attributes, so `className`, `nodeValue`,
//! and friends behave as they do in hand-written DOM code.

use alloc::string::ToString;

use fibril_core::element::PropValue;
use fibril_core::host::{Host, HostError};
use wasm_bindgen::JsValue;
use web_sys::{Document, Node};

/// Creates and links live DOM nodes.
pub struct DomHost {
    document: Document,
}

impl core::fmt::Debug for DomHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomHost")
            .field("document", &"Document")
            .finish()
    }
}

impl DomHost {
    /// Creates a host that builds nodes owned by `document`.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Creates a host for the current window's document, if there is one.
    #[must_use]
    pub fn from_window() -> Option<Self> {
        web_sys::window()?.document().map(Self::new)
    }

    /// Returns the document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Looks up an existing element to render into.
    #[must_use]
    pub fn container_by_id(&self, id: &str) -> Option<Node> {
        self.document.get_element_by_id(id).map(Node::from)
    }
}

impl Host for DomHost {
    type Node = Node;

    fn create_element(&mut self, tag: &str) -> Result<Node, HostError> {
        self.document
            .create_element(tag)
            .map(Node::from)
            .map_err(|_| HostError::CreateElement {
                tag: tag.to_string(),
            })
    }

    fn create_text_node(&mut self) -> Result<Node, HostError> {
        Ok(self.document.create_text_node("").into())
    }

    fn set_property(&mut self, node: &Node, key: &str, value: &PropValue) -> Result<(), HostError> {
        match js_sys::Reflect::set(node, &JsValue::from_str(key), &to_js(value)) {
            Ok(true) => Ok(()),
            Ok(false) | Err(_) => Err(HostError::SetProperty {
                key: key.to_string(),
            }),
        }
    }

    fn append_child(&mut self, parent: &Node, child: &Node) -> Result<(), HostError> {
        parent
            .append_child(child)
            .map(drop)
            .map_err(|_| HostError::AppendChild)
    }
}

fn to_js(value: &PropValue) -> JsValue {
    match value {
        PropValue::Str(s) => JsValue::from_str(s),
        PropValue::Number(n) => JsValue::from_f64(*n),
        PropValue::Bool(b) => JsValue::from_bool(*b),
        PropValue::Null => JsValue::NULL,
    }
}
