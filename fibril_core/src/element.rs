// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable element trees.
//!
//! An [`Element`] describes one node of the UI to build: a type (a host tag
//! name, or the text sentinel), an ordered property mapping, and an ordered
//! list of child elements. Scalars passed as children are wrapped into text
//! elements by [`build`], so every child of an element is itself an element.
//!
//! Elements are reference counted and never mutated after construction;
//! cloning one is a pointer copy.

use alloc::borrow::Cow;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Display name of [`ElementType::Text`].
pub const TEXT_ELEMENT: &str = "TEXT_ELEMENT";

/// Property key that text elements store their value under.
pub const NODE_VALUE: &str = "nodeValue";

/// Reserved key for the child list. Never stored in [`Props`].
pub const CHILDREN: &str = "children";

/// What kind of host node an element materializes into.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// A structural host node created by tag name (e.g. `"div"`).
    Tag(Cow<'static, str>),
    /// A text-bearing host node.
    Text,
}

impl ElementType {
    /// Returns the tag name, or [`TEXT_ELEMENT`] for text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Tag(tag) => tag,
            Self::Text => TEXT_ELEMENT,
        }
    }

    /// Returns `true` for [`ElementType::Text`].
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }
}

impl From<&'static str> for ElementType {
    /// The [`TEXT_ELEMENT`] sentinel maps to [`ElementType::Text`]; any other
    /// string becomes a tag, unvalidated.
    fn from(tag: &'static str) -> Self {
        if tag == TEXT_ELEMENT {
            Self::Text
        } else {
            Self::Tag(Cow::Borrowed(tag))
        }
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        if tag == TEXT_ELEMENT {
            Self::Text
        } else {
            Self::Tag(Cow::Owned(tag))
        }
    }
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property value, assigned verbatim onto host nodes.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    /// A string.
    Str(Cow<'static, str>),
    /// A number.
    Number(f64),
    /// A boolean.
    Bool(bool),
    /// An explicit null.
    Null,
}

impl From<&'static str> for PropValue {
    fn from(s: &'static str) -> Self {
        Self::Str(Cow::Borrowed(s))
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        Self::Str(Cow::Owned(s))
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for PropValue {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl fmt::Display for PropValue {
    /// Formats the value the way a host would stringify it for text content.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
        }
    }
}

/// An ordered key/value property mapping.
///
/// Insertion order is preserved. Setting an existing key replaces its value
/// in place, matching object-spread semantics. The [`CHILDREN`] key is
/// reserved for the element's child list and is never stored here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    entries: Vec<(Cow<'static, str>, PropValue)>,
}

impl Props {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets `key` to `value`, returning the updated mapping.
    #[must_use]
    pub fn with(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<PropValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key` to `value`. A [`CHILDREN`] key is dropped.
    pub fn set(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<PropValue>) {
        let key = key.into();
        if key == CHILDREN {
            return;
        }
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, PartialEq)]
struct ElementData {
    ty: ElementType,
    props: Props,
    children: Vec<Element>,
}

impl Drop for ElementData {
    // Tears the subtree down with an explicit stack, so arbitrarily deep
    // trees do not overflow the call stack.
    fn drop(&mut self) {
        let mut stack = core::mem::take(&mut self.children);
        while let Some(child) = stack.pop() {
            if let Ok(mut data) = Rc::try_unwrap(child.inner) {
                stack.append(&mut data.children);
            }
        }
    }
}

/// An immutable description of one node and its subtree.
#[derive(Clone, PartialEq)]
pub struct Element {
    inner: Rc<ElementData>,
}

impl Element {
    /// Returns the element type.
    #[must_use]
    pub fn ty(&self) -> &ElementType {
        &self.inner.ty
    }

    /// Returns the non-child properties.
    #[must_use]
    pub fn props(&self) -> &Props {
        &self.inner.props
    }

    /// Returns the child elements in order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.inner.children
    }

    /// Returns the number of elements in this subtree, including `self`.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = alloc::vec![self];
        while let Some(el) = stack.pop() {
            count += 1;
            stack.extend(el.children());
        }
        count
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("type", &self.inner.ty)
            .field("props", &self.inner.props)
            .field("children", &self.inner.children)
            .finish()
    }
}

/// One child argument to [`build`]: an element, or a scalar to wrap as text.
#[derive(Clone, Debug, PartialEq)]
pub enum Child {
    /// Kept as is.
    Element(Element),
    /// Wrapped with [`build_text`].
    Text(PropValue),
}

impl From<Element> for Child {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl From<&'static str> for Child {
    fn from(s: &'static str) -> Self {
        Self::Text(s.into())
    }
}

impl From<String> for Child {
    fn from(s: String) -> Self {
        Self::Text(s.into())
    }
}

impl From<f64> for Child {
    fn from(n: f64) -> Self {
        Self::Text(n.into())
    }
}

impl From<i32> for Child {
    fn from(n: i32) -> Self {
        Self::Text(n.into())
    }
}

impl From<u32> for Child {
    fn from(n: u32) -> Self {
        Self::Text(n.into())
    }
}

impl From<bool> for Child {
    fn from(b: bool) -> Self {
        Self::Text(b.into())
    }
}

impl From<PropValue> for Child {
    fn from(v: PropValue) -> Self {
        Self::Text(v)
    }
}

/// Builds an element from a type, optional properties, and children.
///
/// Scalar children are wrapped with [`build_text`]. Any [`CHILDREN`] key in
/// `props` has already been dropped by [`Props`]; the child list always comes
/// from `children`. Nothing is validated.
#[must_use]
pub fn build(
    ty: impl Into<ElementType>,
    props: Option<Props>,
    children: impl IntoIterator<Item = Child>,
) -> Element {
    let children = children
        .into_iter()
        .map(|child| match child {
            Child::Element(el) => el,
            Child::Text(value) => build_text(value),
        })
        .collect();
    Element {
        inner: Rc::new(ElementData {
            ty: ty.into(),
            props: props.unwrap_or_default(),
            children,
        }),
    }
}

/// Builds a text element whose `nodeValue` is `value`.
#[must_use]
pub fn build_text(value: impl Into<PropValue>) -> Element {
    Element {
        inner: Rc::new(ElementData {
            ty: ElementType::Text,
            props: Props::new().with(NODE_VALUE, value),
            children: Vec::new(),
        }),
    }
}

/// Builds an [`Element`] with variadic children of mixed kinds.
///
/// ```
/// use fibril_core::element;
/// use fibril_core::element::Props;
///
/// let el = element!(
///     "div",
///     Some(Props::new().with("id", "foo")),
///     element!("a", None, "bar"),
///     element!("b", None),
/// );
/// assert_eq!(el.children().len(), 2);
/// ```
#[macro_export]
macro_rules! element {
    ($ty:expr, $props:expr $(, $child:expr)* $(,)?) => {
        $crate::element::build(
            $ty,
            $props,
            [$($crate::element::Child::from($child)),*],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_keeps_type_props_and_order() {
        let el = build(
            "div",
            Some(Props::new().with("id", "foo")),
            [
                Child::from(build("a", None, [])),
                Child::from(build("b", None, [])),
            ],
        );
        assert_eq!(el.ty(), &ElementType::from("div"));
        assert_eq!(el.props().get("id"), Some(&PropValue::from("foo")));
        let tags: Vec<_> = el.children().iter().map(|c| c.ty().as_str()).collect();
        assert_eq!(tags, ["a", "b"]);
    }

    #[test]
    fn scalar_children_become_text_elements() {
        let el = element!("h1", None, "bar", 42, true);
        assert_eq!(el.children().len(), 3);
        for child in el.children() {
            assert!(child.ty().is_text());
            assert!(child.children().is_empty());
        }
        assert_eq!(
            el.children()[0].props().get(NODE_VALUE),
            Some(&PropValue::from("bar"))
        );
        assert_eq!(
            el.children()[1].props().get(NODE_VALUE),
            Some(&PropValue::Number(42.0))
        );
        assert_eq!(
            el.children()[2].props().get(NODE_VALUE),
            Some(&PropValue::Bool(true))
        );
    }

    #[test]
    fn build_text_shape() {
        let text = build_text("hello");
        assert_eq!(text.ty().as_str(), TEXT_ELEMENT);
        assert_eq!(text.props().len(), 1);
        assert!(text.children().is_empty());
    }

    #[test]
    fn missing_props_are_empty() {
        let el = build("br", None, []);
        assert!(el.props().is_empty());
        assert!(el.children().is_empty());
    }

    #[test]
    fn props_reset_keeps_position() {
        let props = Props::new()
            .with("id", "a")
            .with("title", "t")
            .with("id", "b");
        let keys: Vec<_> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["id", "title"]);
        assert_eq!(props.get("id"), Some(&PropValue::from("b")));
    }

    #[test]
    fn children_key_is_never_stored() {
        let props = Props::new().with(CHILDREN, "ignored").with("id", "x");
        assert_eq!(props.len(), 1);
        assert_eq!(props.get(CHILDREN), None);
    }

    #[test]
    fn text_sentinel_maps_to_text_type() {
        assert_eq!(ElementType::from(TEXT_ELEMENT), ElementType::Text);
        assert_eq!(
            ElementType::from(String::from(TEXT_ELEMENT)),
            ElementType::Text
        );
    }

    #[test]
    fn subtree_len_counts_every_node() {
        let el = element!(
            "div",
            None,
            element!("a", None, "bar"),
            element!("b", None)
        );
        assert_eq!(el.subtree_len(), 4);
    }

    #[test]
    fn elements_share_structure_on_clone() {
        let a = element!("p", None, "x");
        let b = a.clone();
        assert!(Rc::ptr_eq(&a.inner, &b.inner));
        assert_eq!(a, b);
    }

    fn chain(depth: usize) -> Element {
        let mut el = build("i", None, []);
        for _ in 1..depth {
            el = build("i", None, [Child::from(el)]);
        }
        el
    }

    #[test]
    fn deep_chain_drops_without_recursion() {
        let el = chain(200_000);
        assert_eq!(el.subtree_len(), 200_000);
        drop(el);
    }

    #[test]
    fn dropping_one_owner_keeps_shared_subtree() {
        let shared = chain(1_000);
        let parent = build("div", None, [Child::from(shared.clone())]);
        drop(parent);
        assert_eq!(shared.subtree_len(), 1_000);
        assert_eq!(Rc::strong_count(&shared.inner), 1);
    }
}
