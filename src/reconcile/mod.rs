//! Reconciler - full render and positional diff/patch.
//!
//! Two operating modes share the cursor abstraction:
//!
//! - **Full render**: build host nodes for a whole subtree and replace a
//!   cursor's contents with the result, leaving the cursor bracketing the
//!   new node. Used at mount and whenever diffing gives up on a subtree.
//! - **Diff & patch**: walk an old and a new snapshot together and apply
//!   the smallest host mutation the comparison allows - nothing for
//!   equivalent nodes, in-place property writes for scalar-only changes,
//!   a bracketed subtree replacement otherwise.
//!
//! Matching is purely positional: children pair up index by index, never
//! by key or identity. An insertion in the middle of a child list
//! therefore cascades into replacements below it; that is the accepted
//! trade-off of this engine, not something callers need to work around.
//!
//! Excess trailing old children are deleted when the new list is shorter.
//! Property removal cannot be patched (the host API has no unset), so a
//! node whose old props do not all survive is replaced wholesale; so is
//! any node whose handler props change identity, since stale listeners
//! cannot be unbound from a kept node.

use tracing::{debug, trace};

use crate::component::Component;
use crate::error::TreeError;
use crate::host::{Cursor, HostTree, NodeId};
use crate::types::PropValue;
use crate::vnode::{ElementNode, TextNode, VNode};

// =============================================================================
// Render capability
// =============================================================================

/// Capability to render into a host position, implemented by every node
/// variant. Kept out of the public contract: callers go through
/// [`crate::mount`] and the component lifecycle.
pub(crate) trait Renderable {
    /// Replace the cursor's contents with this node's host rendering,
    /// leaving the cursor bracketing exactly the inserted node.
    fn render_into(&mut self, host: &mut dyn HostTree, cursor: &mut Cursor)
    -> Result<(), TreeError>;
}

impl Renderable for TextNode {
    fn render_into(
        &mut self,
        host: &mut dyn HostTree,
        cursor: &mut Cursor,
    ) -> Result<(), TreeError> {
        let node = host.create_text(&self.content)?;
        replace_contents(host, cursor, node)?;
        self.range = Some(*cursor);
        Ok(())
    }
}

impl Renderable for ElementNode {
    fn render_into(
        &mut self,
        host: &mut dyn HostTree,
        cursor: &mut Cursor,
    ) -> Result<(), TreeError> {
        let node = host.create_element(&self.kind)?;
        for (name, value) in &self.props {
            apply_prop(host, node, name, value)?;
        }

        self.ensure_vchildren()?;
        if let Some(children) = self.vchildren.as_mut() {
            for child in children.iter_mut() {
                // Fresh sub-cursor at the end of the new element's
                // current children
                let mut child_cursor = Cursor::collapsed(node, host.child_count(node)?);
                child.render_into(host, &mut child_cursor)?;
            }
        }

        replace_contents(host, cursor, node)?;
        self.node = Some(node);
        self.range = Some(*cursor);
        Ok(())
    }
}

impl Renderable for Component {
    fn render_into(
        &mut self,
        host: &mut dyn HostTree,
        cursor: &mut Cursor,
    ) -> Result<(), TreeError> {
        Component::mount(self, host, *cursor)?;
        if let Some(occupied) = self.cursor() {
            *cursor = occupied;
        }
        Ok(())
    }
}

impl Renderable for VNode {
    fn render_into(
        &mut self,
        host: &mut dyn HostTree,
        cursor: &mut Cursor,
    ) -> Result<(), TreeError> {
        match self {
            VNode::Element(element) => element.render_into(host, cursor),
            VNode::Text(text) => text.render_into(host, cursor),
            VNode::Component(component) => component.render_into(host, cursor),
        }
    }
}

/// Full render of a node into a cursor.
pub(crate) fn render_into(
    host: &mut dyn HostTree,
    node: &mut VNode,
    cursor: &mut Cursor,
) -> Result<(), TreeError> {
    node.render_into(host, cursor)
}

/// Delete the cursor's contents and insert `node`, leaving the cursor
/// bracketing exactly that node.
fn replace_contents(
    host: &mut dyn HostTree,
    cursor: &mut Cursor,
    node: NodeId,
) -> Result<(), TreeError> {
    cursor.delete_contents(host)?;
    cursor.insert(host, node)?;
    Ok(())
}

/// Apply one staged property to a host node.
///
/// `on<Name>` with a handler value binds the event named by `Name` with
/// its first character lower-cased; `className` maps to the host `class`
/// property; everything else is set verbatim.
fn apply_prop(
    host: &mut dyn HostTree,
    node: NodeId,
    name: &str,
    value: &PropValue,
) -> Result<(), TreeError> {
    if let PropValue::Handler(handler) = value {
        if let Some(event) = event_name(name) {
            host.bind_event(node, &event, handler.clone())?;
            return Ok(());
        }
    }
    if name == "className" {
        host.set_property(node, "class", value)?;
        return Ok(());
    }
    host.set_property(node, name, value)?;
    Ok(())
}

/// Host event name for an `on<Name>` property, if it is one.
fn event_name(prop: &str) -> Option<String> {
    let rest = prop.strip_prefix("on")?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    let mut name = String::new();
    name.extend(first.to_lowercase());
    name.push_str(chars.as_str());
    Some(name)
}

// =============================================================================
// Equivalence
// =============================================================================

/// Positional equivalence test.
///
/// True iff both nodes have the same kind, every property of `new` has an
/// identical value in `old` (absence counts as inequality; handlers
/// compare by identity), `old` carries no extra properties, and text
/// content matches for text nodes.
pub fn same_node(old: &VNode, new: &VNode) -> bool {
    match (old, new) {
        (VNode::Element(old), VNode::Element(new)) => {
            old.kind == new.kind
                && new
                    .props
                    .iter()
                    .all(|(name, value)| old.props.get(name) == Some(value))
                && old.props.len() <= new.props.len()
        }
        (VNode::Text(old), VNode::Text(new)) => old.content == new.content,
        _ => false,
    }
}

/// Whether a non-equivalent element pair can be patched in place.
///
/// Requires the same kind, every old property still present (the host
/// cannot unset), and every changed value scalar on both sides (a changed
/// handler cannot be unbound from a kept node). Fresh properties may be
/// anything, including handlers - binding on a kept node is safe.
fn patchable(old: &ElementNode, new: &ElementNode) -> bool {
    if old.kind != new.kind {
        return false;
    }
    if !old.props.keys().all(|name| new.props.contains_key(name)) {
        return false;
    }
    new.props.iter().all(|(name, value)| match old.props.get(name) {
        None => true,
        Some(existing) if existing == value => true,
        Some(existing) => existing.is_scalar() && value.is_scalar(),
    })
}

// =============================================================================
// Diff & patch
// =============================================================================

/// Diff an old snapshot against a new one and patch the host.
///
/// `old` must carry the ranges recorded by its own render; `new` ends up
/// carrying ranges for the positions it now occupies.
pub(crate) fn reconcile(
    host: &mut dyn HostTree,
    old: &VNode,
    new: &mut VNode,
) -> Result<(), TreeError> {
    // Snapshots are component-free; anything else reaching the diff is an
    // invariant breach upstream
    if matches!(old, VNode::Component(_)) || matches!(new, VNode::Component(_)) {
        return Err(TreeError::UnresolvedComponent);
    }

    if same_node(old, new) {
        // Position reuse, nothing to write at this node
        new.adopt_position(old);
        return diff_children(host, old, new);
    }

    if let (VNode::Element(old_element), VNode::Element(new_element)) = (old, &mut *new) {
        if patchable(old_element, new_element) {
            new_element.range = old_element.range;
            new_element.node = old_element.node;
            let node = new_element.node.ok_or(TreeError::Detached)?;
            for (name, value) in &new_element.props {
                if old_element.props.get(name) != Some(value) {
                    trace!(prop = %name, "patching property in place");
                    apply_prop(host, node, name, value)?;
                }
            }
            return diff_children(host, old, new);
        }
    }

    // Different node: replace the whole subtree in the old position
    let range = old.range().ok_or(TreeError::Detached)?;
    debug!("replacing subtree");
    let mut cursor = range;
    new.render_into(host, &mut cursor)
}

/// Positional walk of two resolved child lists.
fn diff_children(host: &mut dyn HostTree, old: &VNode, new: &mut VNode) -> Result<(), TreeError> {
    let (VNode::Element(old_element), VNode::Element(new_element)) = (old, new) else {
        return Ok(());
    };
    // Unresolved children: nothing below to diff
    let Some(new_children) = new_element.vchildren.as_mut() else {
        return Ok(());
    };
    let old_children: &[VNode] = old_element.vchildren.as_deref().unwrap_or(&[]);
    if new_children.is_empty() && old_children.is_empty() {
        return Ok(());
    }

    // Where fresh appends land: after the last old child, or at the end
    // of the kept element when the old list is empty
    let mut tail = match old_children.last() {
        Some(last) => {
            let mut cursor = last.range().ok_or(TreeError::Detached)?;
            cursor.collapse_to_end();
            cursor
        }
        None => {
            let node = new_element.node.ok_or(TreeError::Detached)?;
            Cursor::collapsed(node, host.child_count(node)?)
        }
    };

    for (index, new_child) in new_children.iter_mut().enumerate() {
        match old_children.get(index) {
            Some(old_child) => reconcile(host, old_child, new_child)?,
            None => {
                trace!(index, "appending child past the old tail");
                let mut cursor = tail;
                new_child.render_into(host, &mut cursor)?;
                tail = cursor;
                tail.collapse_to_end();
            }
        }
    }

    // Trailing removal, last-first so the recorded positions of earlier
    // siblings stay valid while we delete
    for old_child in old_children.iter().skip(new_children.len()).rev() {
        let mut cursor = old_child.range().ok_or(TreeError::Detached)?;
        trace!("removing trailing child");
        cursor.delete_contents(host)?;
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
