//! In-memory host tree.
//!
//! Reference implementation of [`HostTree`]: an arena of element and text
//! nodes with positional children, an attribute map, and a bound-listener
//! table. The engine's test suites drive it the way a real backend (a
//! document tree, a terminal scene graph) would be driven.
//!
//! Removed nodes stay in the arena so handles held by old snapshots remain
//! inspectable; `remove` only detaches.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use super::{HostError, HostTree, NodeId};
use crate::types::{Event, EventHandler, PropValue};

enum Role {
    Element {
        tag: String,
        attrs: BTreeMap<String, PropValue>,
        listeners: HashMap<String, Vec<EventHandler>>,
        children: Vec<NodeId>,
    },
    Text(String),
}

/// Arena-backed host tree for tests and reference use.
#[derive(Default)]
pub struct MemoryTree {
    nodes: Vec<Role>,
}

impl MemoryTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached container to mount into.
    ///
    /// Convenience over [`HostTree::create_element`] for the common "give
    /// me a root" case; the container is an ordinary element.
    pub fn create_container(&mut self) -> NodeId {
        self.push(Role::Element {
            tag: "root".to_string(),
            attrs: BTreeMap::new(),
            listeners: HashMap::new(),
            children: Vec::new(),
        })
    }

    fn push(&mut self, role: Role) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(role);
        id
    }

    fn node(&self, id: NodeId) -> Result<&Role, HostError> {
        self.nodes.get(id.raw()).ok_or(HostError::UnknownNode(id))
    }

    fn element_mut(
        &mut self,
        id: NodeId,
    ) -> Result<
        (
            &mut BTreeMap<String, PropValue>,
            &mut HashMap<String, Vec<EventHandler>>,
            &mut Vec<NodeId>,
        ),
        HostError,
    > {
        match self.nodes.get_mut(id.raw()) {
            None => Err(HostError::UnknownNode(id)),
            Some(Role::Text(_)) => Err(HostError::NotAContainer(id)),
            Some(Role::Element {
                attrs,
                listeners,
                children,
                ..
            }) => Ok((attrs, listeners, children)),
        }
    }

    // =========================================================================
    // Inspection helpers (for assertions and host-side tooling)
    // =========================================================================

    /// Tag of an element node.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.node(id).ok()? {
            Role::Element { tag, .. } => Some(tag),
            Role::Text(_) => None,
        }
    }

    /// Content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.node(id).ok()? {
            Role::Text(content) => Some(content),
            Role::Element { .. } => None,
        }
    }

    /// Children of an element node; empty for text or unknown nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Ok(Role::Element { children, .. }) => children,
            _ => &[],
        }
    }

    /// A named attribute of an element node.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&PropValue> {
        match self.node(id).ok()? {
            Role::Element { attrs, .. } => attrs.get(name),
            Role::Text(_) => None,
        }
    }

    /// How many listeners are bound for `event` on a node.
    pub fn listener_count(&self, id: NodeId, event: &str) -> usize {
        match self.node(id) {
            Ok(Role::Element { listeners, .. }) => {
                listeners.get(event).map(Vec::len).unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Fire `event` at a node, invoking every listener bound under its
    /// name. Returns how many listeners ran.
    pub fn dispatch(&self, id: NodeId, event: &Event) -> usize {
        let handlers: Vec<EventHandler> = match self.node(id) {
            Ok(Role::Element { listeners, .. }) => {
                listeners.get(&event.name).cloned().unwrap_or_default()
            }
            _ => Vec::new(),
        };
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Print a subtree as HTML-ish markup, scalar attributes only.
    ///
    /// Attributes come out in name order; handler values are omitted.
    pub fn markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        match self.node(id) {
            Err(_) => {
                let _ = write!(out, "<?{}>", id.raw());
            }
            Ok(Role::Text(content)) => out.push_str(content),
            Ok(Role::Element {
                tag,
                attrs,
                children,
                ..
            }) => {
                let _ = write!(out, "<{tag}");
                for (name, value) in attrs {
                    match value {
                        PropValue::Text(s) => {
                            let _ = write!(out, " {name}=\"{s}\"");
                        }
                        PropValue::Number(n) => {
                            let _ = write!(out, " {name}=\"{n}\"");
                        }
                        PropValue::Bool(b) => {
                            let _ = write!(out, " {name}=\"{b}\"");
                        }
                        PropValue::Handler(_) => {}
                    }
                }
                out.push('>');
                for child in children {
                    self.write_markup(*child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

impl HostTree for MemoryTree {
    fn create_element(&mut self, kind: &str) -> Result<NodeId, HostError> {
        Ok(self.push(Role::Element {
            tag: kind.to_string(),
            attrs: BTreeMap::new(),
            listeners: HashMap::new(),
            children: Vec::new(),
        }))
    }

    fn create_text(&mut self, content: &str) -> Result<NodeId, HostError> {
        Ok(self.push(Role::Text(content.to_string())))
    }

    fn set_property(
        &mut self,
        node: NodeId,
        name: &str,
        value: &PropValue,
    ) -> Result<(), HostError> {
        let (attrs, _, _) = self.element_mut(node)?;
        attrs.insert(name.to_string(), value.clone());
        Ok(())
    }

    fn bind_event(
        &mut self,
        node: NodeId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError> {
        let (_, listeners, _) = self.element_mut(node)?;
        listeners.entry(event.to_string()).or_default().push(handler);
        Ok(())
    }

    fn insert(&mut self, parent: NodeId, index: usize, node: NodeId) -> Result<(), HostError> {
        if node.raw() >= self.nodes.len() {
            return Err(HostError::UnknownNode(node));
        }
        let (_, _, children) = self.element_mut(parent)?;
        if index > children.len() {
            return Err(HostError::IndexOutOfBounds {
                parent,
                index,
                len: children.len(),
            });
        }
        children.insert(index, node);
        Ok(())
    }

    fn remove(&mut self, parent: NodeId, index: usize) -> Result<NodeId, HostError> {
        let (_, _, children) = self.element_mut(parent)?;
        if index >= children.len() {
            return Err(HostError::IndexOutOfBounds {
                parent,
                index,
                len: children.len(),
            });
        }
        Ok(children.remove(index))
    }

    fn child_count(&self, parent: NodeId) -> Result<usize, HostError> {
        match self.node(parent)? {
            Role::Element { children, .. } => Ok(children.len()),
            Role::Text(_) => Err(HostError::NotAContainer(parent)),
        }
    }

    fn index_of(&self, parent: NodeId, node: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|c| *c == node)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_create_and_inspect() {
        let mut host = MemoryTree::new();
        let div = host.create_element("div").unwrap();
        let txt = host.create_text("hello").unwrap();

        assert_eq!(host.tag(div), Some("div"));
        assert_eq!(host.text(txt), Some("hello"));
        assert_eq!(host.tag(txt), None);
        assert_eq!(host.child_count(div).unwrap(), 0);
        assert_eq!(
            host.child_count(txt),
            Err(HostError::NotAContainer(txt)),
            "text nodes hold no children"
        );
    }

    #[test]
    fn test_insert_remove_index_of() {
        let mut host = MemoryTree::new();
        let root = host.create_container();
        let a = host.create_text("a").unwrap();
        let b = host.create_text("b").unwrap();
        let c = host.create_text("c").unwrap();

        host.insert(root, 0, a).unwrap();
        host.insert(root, 1, c).unwrap();
        host.insert(root, 1, b).unwrap();
        assert_eq!(host.children(root), &[a, b, c]);
        assert_eq!(host.index_of(root, c), Some(2));

        let removed = host.remove(root, 1).unwrap();
        assert_eq!(removed, b);
        assert_eq!(host.children(root), &[a, c]);
        assert_eq!(host.index_of(root, b), None);
        // Detached nodes stay inspectable
        assert_eq!(host.text(b), Some("b"));

        assert_eq!(
            host.insert(root, 5, b),
            Err(HostError::IndexOutOfBounds {
                parent: root,
                index: 5,
                len: 2
            })
        );
    }

    #[test]
    fn test_set_property_and_markup() {
        let mut host = MemoryTree::new();
        let div = host.create_element("div").unwrap();
        let txt = host.create_text("hi").unwrap();
        host.set_property(div, "class", &"card".into()).unwrap();
        host.set_property(div, "rows", &3.into()).unwrap();
        host.insert(div, 0, txt).unwrap();

        assert_eq!(host.markup(div), "<div class=\"card\" rows=\"3\">hi</div>");
        assert_eq!(
            host.set_property(txt, "class", &"x".into()),
            Err(HostError::NotAContainer(txt))
        );
    }

    #[test]
    fn test_bind_and_dispatch() {
        let mut host = MemoryTree::new();
        let button = host.create_element("button").unwrap();

        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        host.bind_event(
            button,
            "click",
            Rc::new(move |event: &Event| {
                assert_eq!(event.name, "click");
                hits_clone.set(hits_clone.get() + 1);
            }),
        )
        .unwrap();

        assert_eq!(host.listener_count(button, "click"), 1);
        assert_eq!(host.dispatch(button, &Event::new("click")), 1);
        assert_eq!(host.dispatch(button, &Event::new("click")), 1);
        assert_eq!(hits.get(), 2);
        assert_eq!(
            host.dispatch(button, &Event::new("hover")),
            0,
            "unbound events reach nobody"
        );
    }
}
