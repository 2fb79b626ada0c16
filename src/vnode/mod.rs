//! Virtual node model.
//!
//! A [`VNode`] tree is the declarative description of what the host tree
//! should show: container elements, text leaves, and component instances
//! that expand to further trees.
//!
//! Before anything touches the host, a tree is resolved into a `vdom`
//! snapshot via [`VNode::vdom`]: every component is expanded recursively
//! through its render output until only elements and text remain. Each
//! element's resolved child list is memoized on it as `vchildren`; the
//! reconciler diffs those lists, never the raw `children`.

mod builder;

pub use builder::{Child, Kind, build};

use std::collections::BTreeMap;

use crate::component::Component;
use crate::error::TreeError;
use crate::host::{Cursor, NodeId};
use crate::types::PropValue;

// =============================================================================
// Node variants
// =============================================================================

/// One node in a declarative tree.
#[derive(Debug, Clone)]
pub enum VNode {
    /// A container of a host-renderable kind.
    Element(ElementNode),
    /// A text leaf.
    Text(TextNode),
    /// A component instance; resolved away before reconciliation.
    Component(Component),
}

/// A container node with properties and ordered children.
#[derive(Debug, Clone)]
pub struct ElementNode {
    /// Host tag this element renders as.
    pub kind: String,
    /// Staged properties, copied onto the host node at render.
    pub props: BTreeMap<String, PropValue>,
    /// Declarative children; may contain components.
    pub children: Vec<VNode>,
    /// Memoized component-free resolution of `children`.
    pub(crate) vchildren: Option<Vec<VNode>>,
    /// Host node this element created at its last render.
    pub(crate) node: Option<NodeId>,
    /// Position bracketing that node in its parent container.
    pub(crate) range: Option<Cursor>,
}

/// A text leaf.
#[derive(Debug, Clone)]
pub struct TextNode {
    /// Literal content.
    pub content: String,
    /// Position bracketing the host text node at its last render.
    pub(crate) range: Option<Cursor>,
}

impl ElementNode {
    /// A bare element of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            props: BTreeMap::new(),
            children: Vec::new(),
            vchildren: None,
            node: None,
            range: None,
        }
    }

    /// Resolve `children` into `vchildren` if not already done.
    pub(crate) fn ensure_vchildren(&mut self) -> Result<(), TreeError> {
        if self.vchildren.is_none() {
            let resolved = self
                .children
                .iter()
                .map(VNode::vdom)
                .collect::<Result<Vec<_>, _>>()?;
            self.vchildren = Some(resolved);
        }
        Ok(())
    }
}

impl TextNode {
    /// A text leaf with the given content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            range: None,
        }
    }
}

// =============================================================================
// Resolution
// =============================================================================

impl VNode {
    /// Resolve this tree into a `vdom` snapshot.
    ///
    /// Components are expanded recursively through their render output;
    /// the returned tree contains only [`VNode::Element`] and
    /// [`VNode::Text`], with every element's `vchildren` populated.
    pub fn vdom(&self) -> Result<VNode, TreeError> {
        match self {
            VNode::Text(text) => Ok(VNode::Text(TextNode::new(text.content.clone()))),
            VNode::Element(element) => {
                let vchildren = element
                    .children
                    .iter()
                    .map(VNode::vdom)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(VNode::Element(ElementNode {
                    kind: element.kind.clone(),
                    props: element.props.clone(),
                    children: Vec::new(),
                    vchildren: Some(vchildren),
                    node: None,
                    range: None,
                }))
            }
            VNode::Component(component) => component.vdom(),
        }
    }

    /// Position this node occupies in the host tree, if rendered.
    pub(crate) fn range(&self) -> Option<Cursor> {
        match self {
            VNode::Element(element) => element.range,
            VNode::Text(text) => text.range,
            VNode::Component(component) => component.cursor(),
        }
    }

    /// Take over the host position of an equivalent old node.
    pub(crate) fn adopt_position(&mut self, old: &VNode) {
        match (self, old) {
            (VNode::Element(new), VNode::Element(old)) => {
                new.range = old.range;
                new.node = old.node;
            }
            (VNode::Text(new), VNode::Text(old)) => {
                new.range = old.range;
            }
            _ => {}
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentDef;

    fn leaf_def() -> ComponentDef {
        ComponentDef::new(|scope| {
            let name = scope
                .prop("name")
                .and_then(|v| v.as_text().map(str::to_string))
                .unwrap_or_default();
            build("span", vec![], name.as_str())
        })
    }

    #[test]
    fn test_vdom_copies_elements_and_text() {
        let tree = build("div", vec![("title", "t".into())], "hello").unwrap();
        let vdom = tree.vdom().unwrap();

        let VNode::Element(element) = &vdom else {
            panic!("expected element root");
        };
        assert_eq!(element.kind, "div");
        assert_eq!(element.props.get("title"), Some(&"t".into()));

        let vchildren = element.vchildren.as_deref().expect("resolved children");
        assert_eq!(vchildren.len(), 1);
        let VNode::Text(text) = &vchildren[0] else {
            panic!("expected text child");
        };
        assert_eq!(text.content, "hello");
    }

    #[test]
    fn test_vdom_expands_nested_components() {
        let tree = build(
            "div",
            vec![],
            vec![
                Child::from(build(leaf_def(), vec![("name", "inner".into())], Child::Empty).unwrap()),
                Child::from("tail"),
            ],
        )
        .unwrap();

        let vdom = tree.vdom().unwrap();
        let VNode::Element(element) = &vdom else {
            panic!("expected element root");
        };
        let vchildren = element.vchildren.as_deref().unwrap();
        assert_eq!(vchildren.len(), 2);

        // The component resolved to its rendered span, not a component node
        let VNode::Element(span) = &vchildren[0] else {
            panic!("component must resolve to its render output");
        };
        assert_eq!(span.kind, "span");
        let span_children = span.vchildren.as_deref().unwrap();
        assert!(matches!(
            &span_children[0],
            VNode::Text(t) if t.content == "inner"
        ));

        assert!(matches!(&vchildren[1], VNode::Text(t) if t.content == "tail"));
    }

    #[test]
    fn test_snapshot_is_component_free() {
        fn assert_resolved(node: &VNode) {
            match node {
                VNode::Component(_) => panic!("snapshot contains a component"),
                VNode::Text(_) => {}
                VNode::Element(element) => {
                    for child in element.vchildren.as_deref().unwrap_or(&[]) {
                        assert_resolved(child);
                    }
                }
            }
        }

        let wrapper = ComponentDef::new(|_| {
            build(
                "section",
                vec![],
                Child::from(build(
                    ComponentDef::new(|_| build("em", vec![], "deep")),
                    vec![],
                    Child::Empty,
                )
                .unwrap()),
            )
        });

        let tree = build(wrapper, vec![], Child::Empty).unwrap();
        assert_resolved(&tree.vdom().unwrap());
    }
}
