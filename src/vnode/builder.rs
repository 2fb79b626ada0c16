//! Tree builder - from a nested-call description to a virtual tree.
//!
//! [`build`] is the single entry point a templating/desugaring layer
//! targets: kind + properties + arbitrarily nested children. Bare strings
//! become text leaves, empty entries are dropped, nested lists flatten in
//! place, and child order is preserved exactly.

use super::{ElementNode, TextNode, VNode};
use crate::component::{Component, ComponentDef};
use crate::error::TreeError;
use crate::types::PropValue;

// =============================================================================
// Inputs
// =============================================================================

/// What a node is built as: a host tag or a component definition.
#[derive(Clone)]
pub enum Kind {
    /// Primitive host tag name.
    Tag(String),
    /// Component definition, instantiated with no arguments.
    Def(ComponentDef),
}

impl From<&str> for Kind {
    fn from(tag: &str) -> Self {
        Kind::Tag(tag.to_string())
    }
}

impl From<String> for Kind {
    fn from(tag: String) -> Self {
        Kind::Tag(tag)
    }
}

impl From<ComponentDef> for Kind {
    fn from(def: ComponentDef) -> Self {
        Kind::Def(def)
    }
}

impl From<&ComponentDef> for Kind {
    fn from(def: &ComponentDef) -> Self {
        Kind::Def(def.clone())
    }
}

/// A child argument: possibly empty, possibly nested.
///
/// Loops that produce `Vec`s of children nest as [`Child::List`]; the
/// builder flattens them in place.
#[derive(Clone)]
pub enum Child {
    /// Skipped entirely.
    Empty,
    /// Literal text, wrapped as a text leaf.
    Text(String),
    /// An already-built node.
    Node(VNode),
    /// A nested sequence, flattened in order.
    List(Vec<Child>),
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Child::Node(node)
    }
}

impl From<Vec<Child>> for Child {
    fn from(children: Vec<Child>) -> Self {
        Child::List(children)
    }
}

impl From<Vec<VNode>> for Child {
    fn from(nodes: Vec<VNode>) -> Self {
        Child::List(nodes.into_iter().map(Child::Node).collect())
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(child: Option<T>) -> Self {
        match child {
            Some(child) => child.into(),
            None => Child::Empty,
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// The node being assembled; elements and components stage attributes and
/// children differently.
enum Built {
    Element(ElementNode),
    Component(Component),
}

impl Built {
    fn set_attribute(&mut self, name: &str, value: PropValue) {
        match self {
            // Copied as-is, no validation
            Built::Element(element) => {
                element.props.insert(name.to_string(), value);
            }
            // For a component, attributes are its construction parameters
            Built::Component(component) => component.set_prop(name, value),
        }
    }

    fn append_child(&mut self, child: VNode) {
        match self {
            Built::Element(element) => element.children.push(child),
            Built::Component(component) => component.push_child(child),
        }
    }

    fn into_vnode(self) -> VNode {
        match self {
            Built::Element(element) => VNode::Element(element),
            Built::Component(component) => VNode::Component(component),
        }
    }
}

/// Build a virtual node from kind, properties, and nested children.
///
/// A tag kind produces an element; a [`ComponentDef`] kind instantiates a
/// fresh component. Properties are staged via the node's attribute path
/// (elements copy them verbatim, components store them as `props`).
/// Children flatten recursively: empty entries are skipped, nested lists
/// are spliced in place, bare strings become text leaves. Output order
/// matches input order.
///
/// # Errors
///
/// [`TreeError::InvalidNodeKind`] when the tag is not a usable identifier
/// (empty, or containing characters a host tag cannot carry).
///
/// # Example
///
/// ```
/// use sprig::{Child, build};
///
/// let list = build(
///     "ul",
///     vec![("className", "menu".into())],
///     vec![
///         Child::from(build("li", vec![], "one").unwrap()),
///         Child::from(build("li", vec![], "two").unwrap()),
///     ],
/// )
/// .unwrap();
/// # let _ = list;
/// ```
pub fn build(
    kind: impl Into<Kind>,
    props: Vec<(&str, PropValue)>,
    children: impl Into<Child>,
) -> Result<VNode, TreeError> {
    let mut built = match kind.into() {
        Kind::Tag(tag) => {
            if !is_valid_tag(&tag) {
                return Err(TreeError::InvalidNodeKind(tag));
            }
            Built::Element(ElementNode::new(tag))
        }
        Kind::Def(def) => Built::Component(def.instantiate()),
    };

    for (name, value) in props {
        built.set_attribute(name, value);
    }

    append_flattened(&mut built, children.into());
    Ok(built.into_vnode())
}

fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn append_flattened(target: &mut Built, child: Child) {
    match child {
        Child::Empty => {}
        Child::List(children) => {
            for child in children {
                append_flattened(target, child);
            }
        }
        Child::Text(text) => target.append_child(VNode::Text(TextNode::new(text))),
        Child::Node(node) => target.append_child(node),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn text_contents(node: &VNode) -> Vec<String> {
        let VNode::Element(element) = node else {
            panic!("expected element");
        };
        element
            .children
            .iter()
            .map(|child| match child {
                VNode::Text(t) => t.content.clone(),
                _ => panic!("expected text child"),
            })
            .collect()
    }

    #[test]
    fn test_flattens_nested_children() {
        // ["x", ["y", null, "z"]] -> [x, y, z]
        let node = build(
            "div",
            vec![],
            vec![
                Child::from("x"),
                Child::List(vec![
                    Child::from("y"),
                    Child::from(None::<Child>),
                    Child::from("z"),
                ]),
            ],
        )
        .unwrap();

        assert_eq!(
            text_contents(&node),
            vec!["x", "y", "z"],
            "nulls dropped, nesting flattened, order preserved"
        );
    }

    #[test]
    fn test_child_order_preserved() {
        let items: Vec<Child> = (0..5).map(|i| Child::from(format!("item-{i}"))).collect();
        let node = build("ul", vec![], items).unwrap();
        assert_eq!(
            text_contents(&node),
            vec!["item-0", "item-1", "item-2", "item-3", "item-4"]
        );
    }

    #[test]
    fn test_element_props_copied_verbatim() {
        let node = build(
            "input",
            vec![("value", "abc".into()), ("rows", 3.into())],
            Child::Empty,
        )
        .unwrap();

        let VNode::Element(element) = &node else {
            panic!("expected element");
        };
        assert_eq!(element.props.get("value"), Some(&"abc".into()));
        assert_eq!(element.props.get("rows"), Some(&3.into()));
    }

    #[test]
    fn test_component_receives_props_and_children() {
        let def = crate::component::ComponentDef::new(|scope| {
            build("div", vec![], scope.children.to_vec())
        });

        let node = build(
            def,
            vec![("label", "go".into())],
            vec![Child::from("a"), Child::from("b")],
        )
        .unwrap();

        let VNode::Component(component) = &node else {
            panic!("expected component");
        };
        assert_eq!(component.prop("label"), Some("go".into()));
        assert_eq!(component.child_count(), 2);
    }

    #[test]
    fn test_invalid_tag_is_rejected() {
        for bad in ["", " ", "1div", "di v", "<div>"] {
            match build(bad, vec![], Child::Empty) {
                Err(TreeError::InvalidNodeKind(kind)) => assert_eq!(kind, bad),
                other => panic!("expected InvalidNodeKind for {bad:?}, got {other:?}"),
            }
        }
        assert!(build("h1", vec![], Child::Empty).is_ok());
        assert!(build("my-widget", vec![], Child::Empty).is_ok());
    }

    #[test]
    fn test_empty_children_allowed() {
        let node = build("br", vec![], Child::Empty).unwrap();
        let VNode::Element(element) = &node else {
            panic!("expected element");
        };
        assert!(element.children.is_empty());
    }
}
