// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning element types and properties into host nodes.
//!
//! [`materialize`] creates exactly one detached host node per call; it knows
//! nothing about trees. [`materialize_tree`] and [`render_sync`] are the
//! blocking alternative to the fiber work loop: they build a whole subtree in
//! one call, depth first, with no way to yield.

use alloc::vec::Vec;

use crate::element::{Element, ElementType, Props};
use crate::error::MaterializeError;
use crate::host::Host;

/// Creates one host node for `ty` and assigns every entry of `props` onto it.
///
/// Text types create a text node; tags create a structural node. Properties
/// are assigned in insertion order, unchecked and uncoerced. The node is not
/// attached anywhere.
pub fn materialize<H: Host + ?Sized>(
    host: &mut H,
    ty: &ElementType,
    props: &Props,
) -> Result<H::Node, MaterializeError> {
    let fail = |source| MaterializeError {
        ty: ty.clone(),
        source,
    };
    let node = match ty {
        ElementType::Text => host.create_text_node(),
        ElementType::Tag(tag) => host.create_element(tag),
    }
    .map_err(fail)?;
    for (key, value) in props.iter() {
        host.set_property(&node, key, value).map_err(fail)?;
    }
    Ok(node)
}

/// Materializes `element` and its whole subtree, returning the detached root.
///
/// Each node is attached to its parent as soon as the parent exists. Uses an
/// explicit stack, so deep trees do not grow the call stack.
pub fn materialize_tree<H: Host + ?Sized>(
    host: &mut H,
    element: &Element,
) -> Result<H::Node, MaterializeError> {
    let root = materialize(host, element.ty(), element.props())?;
    let mut stack: Vec<(H::Node, &Element)> = Vec::new();
    stack.push((root.clone(), element));
    while let Some((node, el)) = stack.pop() {
        let mut created = Vec::with_capacity(el.children().len());
        for child in el.children() {
            let child_node = materialize(host, child.ty(), child.props())?;
            host.append_child(&node, &child_node)
                .map_err(|source| MaterializeError {
                    ty: child.ty().clone(),
                    source,
                })?;
            created.push((child_node, child));
        }
        // Reverse so the first child is expanded first.
        stack.extend(created.into_iter().rev());
    }
    Ok(root)
}

/// Builds the host tree for `element` and appends it to `container` in one
/// blocking call.
pub fn render_sync<H: Host + ?Sized>(
    host: &mut H,
    element: &Element,
    container: &H::Node,
) -> Result<H::Node, MaterializeError> {
    let node = materialize_tree(host, element)?;
    host.append_child(container, &node)
        .map_err(|source| MaterializeError {
            ty: element.ty().clone(),
            source,
        })?;
    Ok(node)
}
