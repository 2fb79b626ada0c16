//! Component lifecycle - mount, state merge, re-render.
//!
//! A [`ComponentDef`] is the constructor reference the tree builder
//! instantiates; it owns nothing but the render closure. Each
//! instantiation produces a [`Component`]: a shared handle to an instance
//! holding `props` (set once by the builder), `state` (mutated only
//! through [`Component::set_state`]), positional `children`, and two
//! private fields - the cursor the instance currently occupies in the
//! host tree and the last `vdom` snapshot it rendered.
//!
//! Updates are synchronous: `set_state` merges, re-resolves the snapshot,
//! and patches the host before returning. There is no scheduler and no
//! batching; callers observe a fully patched tree immediately.

mod state;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::trace;

use crate::error::TreeError;
use crate::host::{Cursor, HostTree};
use crate::reconcile::{reconcile, render_into};
use crate::types::PropValue;
use crate::vnode::VNode;

/// Render closure: the user-defined mapping from a component's current
/// props/state/children to a virtual tree.
pub type RenderFn = dyn Fn(&RenderScope) -> Result<VNode, TreeError>;

// =============================================================================
// Render scope
// =============================================================================

/// What a render closure sees: the instance's current fields, read-only.
pub struct RenderScope<'a> {
    /// Construction parameters, set once by the builder.
    pub props: &'a BTreeMap<String, PropValue>,
    /// Current state.
    pub state: &'a Value,
    /// Children passed positionally by the builder.
    pub children: &'a [VNode],
}

impl RenderScope<'_> {
    /// Look up a prop by name.
    pub fn prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get(name)
    }

    /// Look up a state entry by key, `Null` when absent or state is not
    /// an object.
    pub fn state_entry(&self, key: &str) -> &Value {
        self.state.get(key).unwrap_or(&Value::Null)
    }
}

// =============================================================================
// Definition
// =============================================================================

/// A component definition - the "constructor reference" the builder
/// instantiates with no arguments.
#[derive(Clone)]
pub struct ComponentDef {
    render: Rc<RenderFn>,
}

impl ComponentDef {
    /// Define a component from its render closure.
    pub fn new(render: impl Fn(&RenderScope) -> Result<VNode, TreeError> + 'static) -> Self {
        Self {
            render: Rc::new(render),
        }
    }

    /// Instantiate a fresh, unmounted instance.
    pub fn instantiate(&self) -> Component {
        Component(Rc::new(RefCell::new(ComponentInstance {
            render: self.render.clone(),
            props: BTreeMap::new(),
            state: Value::Null,
            children: Vec::new(),
            cursor: None,
            snapshot: None,
        })))
    }
}

impl fmt::Debug for ComponentDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentDef({:p})", Rc::as_ptr(&self.render))
    }
}

// =============================================================================
// Instance
// =============================================================================

struct ComponentInstance {
    render: Rc<RenderFn>,
    props: BTreeMap<String, PropValue>,
    state: Value,
    children: Vec<VNode>,
    cursor: Option<Cursor>,
    snapshot: Option<VNode>,
}

/// Shared handle to a component instance.
///
/// Cloning the handle shares the instance; event handlers that need to
/// reach back into their component should hold a [`WeakComponent`] so the
/// tree does not keep itself alive.
#[derive(Clone)]
pub struct Component(Rc<RefCell<ComponentInstance>>);

impl Component {
    // =========================================================================
    // Builder-facing staging
    // =========================================================================

    pub(crate) fn set_prop(&self, name: &str, value: PropValue) {
        self.0.borrow_mut().props.insert(name.to_string(), value);
    }

    pub(crate) fn push_child(&self, child: VNode) {
        self.0.borrow_mut().children.push(child);
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// A construction parameter by name.
    pub fn prop(&self, name: &str) -> Option<PropValue> {
        self.0.borrow().props.get(name).cloned()
    }

    /// Number of children the builder passed.
    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// A copy of the current state.
    pub fn state(&self) -> Value {
        self.0.borrow().state.clone()
    }

    /// Whether the instance currently occupies a host position.
    pub fn is_mounted(&self) -> bool {
        self.0.borrow().cursor.is_some()
    }

    pub(crate) fn cursor(&self) -> Option<Cursor> {
        self.0.borrow().cursor
    }

    /// Downgrade to a weak handle for storage inside event handlers.
    pub fn downgrade(&self) -> WeakComponent {
        WeakComponent(Rc::downgrade(&self.0))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Resolve this instance's current `vdom` snapshot.
    ///
    /// Calls the render closure and expands the result until only
    /// elements and text remain.
    pub(crate) fn vdom(&self) -> Result<VNode, TreeError> {
        let tree = {
            let instance = self.0.borrow();
            let scope = RenderScope {
                props: &instance.props,
                state: &instance.state,
                children: &instance.children,
            };
            (instance.render)(&scope)?
        };
        tree.vdom()
    }

    /// First render into a host position.
    ///
    /// Stores the cursor, resolves the snapshot, and full-renders it -
    /// no diffing on first mount.
    pub fn mount(&self, host: &mut dyn HostTree, cursor: Cursor) -> Result<(), TreeError> {
        self.0.borrow_mut().cursor = Some(cursor);

        let mut snapshot = self.vdom()?;
        let mut target = cursor;
        render_into(host, &mut snapshot, &mut target)?;

        let mut instance = self.0.borrow_mut();
        instance.cursor = Some(target);
        instance.snapshot = Some(snapshot);
        Ok(())
    }

    /// Merge a partial state update, then re-render synchronously.
    ///
    /// A non-composite current state is replaced wholesale; otherwise the
    /// merge recurses per key: absent or scalar entries are overwritten,
    /// composite entries merge recursively. Called before the first mount
    /// this still records the state, so the eventual mount renders with
    /// it.
    pub fn set_state(&self, host: &mut dyn HostTree, partial: Value) -> Result<(), TreeError> {
        state::merge(&mut self.0.borrow_mut().state, partial);
        self.update(host)
    }

    /// Recompute the snapshot and patch the host.
    ///
    /// Diffs against the previous snapshot when one exists; with a cursor
    /// but no baseline snapshot this is a first-mount full replace.
    pub fn update(&self, host: &mut dyn HostTree) -> Result<(), TreeError> {
        let (cursor, previous) = {
            let mut instance = self.0.borrow_mut();
            (instance.cursor, instance.snapshot.take())
        };
        let Some(cursor) = cursor else {
            trace!("update before mount: state kept, nothing to patch");
            return Ok(());
        };

        let mut next = self.vdom()?;
        match previous {
            Some(old) => reconcile(host, &old, &mut next)?,
            None => {
                let mut target = cursor;
                render_into(host, &mut next, &mut target)?;
            }
        }

        let mut instance = self.0.borrow_mut();
        if let Some(range) = next.range() {
            instance.cursor = Some(range);
        }
        instance.snapshot = Some(next);
        Ok(())
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instance = self.0.borrow();
        f.debug_struct("Component")
            .field("props", &instance.props.len())
            .field("children", &instance.children.len())
            .field("mounted", &instance.cursor.is_some())
            .finish()
    }
}

/// Weak handle to a component instance.
#[derive(Clone)]
pub struct WeakComponent(Weak<RefCell<ComponentInstance>>);

impl WeakComponent {
    /// Upgrade back to a strong handle, if the instance is still alive.
    pub fn upgrade(&self) -> Option<Component> {
        self.0.upgrade().map(Component)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::host::MemoryTree;
    use crate::vnode::{Child, build};

    /// Counter: renders its `count` state inside a div.
    fn counter_def() -> ComponentDef {
        ComponentDef::new(|scope| {
            let count = scope.state_entry("count").as_i64().unwrap_or(0);
            build(
                "div",
                vec![("className", "counter".into())],
                format!("count: {count}"),
            )
        })
    }

    fn mounted_counter(host: &mut MemoryTree) -> (Component, crate::host::NodeId) {
        let root = host.create_container();
        let component = counter_def().instantiate();
        let cursor = Cursor::spanning(host, root).unwrap();
        component.mount(host, cursor).unwrap();
        (component, root)
    }

    #[test]
    fn test_mount_renders_snapshot() {
        let mut host = MemoryTree::new();
        let (component, root) = mounted_counter(&mut host);

        assert!(component.is_mounted());
        assert_eq!(
            host.markup(root),
            "<root><div class=\"counter\">count: 0</div></root>"
        );
    }

    #[test]
    fn test_set_state_rerenders_synchronously() {
        let mut host = MemoryTree::new();
        let (component, root) = mounted_counter(&mut host);

        component.set_state(&mut host, json!({"count": 3})).unwrap();
        assert_eq!(
            host.markup(root),
            "<root><div class=\"counter\">count: 3</div></root>",
            "caller must observe the patched tree immediately"
        );
        assert_eq!(component.state(), json!({"count": 3}));
    }

    #[test]
    fn test_set_state_merges_deeply() {
        let mut host = MemoryTree::new();
        let (component, _) = mounted_counter(&mut host);

        component
            .set_state(&mut host, json!({"a": {"x": 1, "y": 2}, "b": 3}))
            .unwrap();
        component.set_state(&mut host, json!({"a": {"x": 9}})).unwrap();
        assert_eq!(component.state(), json!({"a": {"x": 9, "y": 2}, "b": 3}));
    }

    #[test]
    fn test_set_state_before_mount_keeps_state() {
        let mut host = MemoryTree::new();
        let component = counter_def().instantiate();

        // No cursor yet: nothing to patch, state still lands
        component.set_state(&mut host, json!({"count": 7})).unwrap();
        assert!(!component.is_mounted());
        assert_eq!(component.state(), json!({"count": 7}));

        let root = host.create_container();
        let cursor = Cursor::spanning(&host, root).unwrap();
        component.mount(&mut host, cursor).unwrap();
        assert_eq!(
            host.markup(root),
            "<root><div class=\"counter\">count: 7</div></root>",
            "mount must render with the pre-mount state"
        );
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut host = MemoryTree::new();
        let (component, root) = mounted_counter(&mut host);
        component.set_state(&mut host, json!({"count": 1})).unwrap();

        let before_markup = host.markup(root);
        let before_child = host.children(root)[0];

        component.update(&mut host).unwrap();
        component.update(&mut host).unwrap();

        assert_eq!(host.markup(root), before_markup);
        assert_eq!(
            host.children(root)[0],
            before_child,
            "equivalent re-render must not touch the host node"
        );
    }

    #[test]
    fn test_weak_handle_upgrades_while_alive() {
        let component = counter_def().instantiate();
        let weak = component.downgrade();
        assert!(weak.upgrade().is_some());

        drop(component);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_children_render_through_scope() {
        let mut host = MemoryTree::new();
        let root = host.create_container();

        // Wraps whatever children it was given in a section
        let wrapper = ComponentDef::new(|scope| {
            build("section", vec![], scope.children.to_vec())
        });

        let tree = build(
            wrapper,
            vec![],
            vec![Child::from("a"), Child::from("b")],
        )
        .unwrap();
        let VNode::Component(component) = tree else {
            panic!("expected component");
        };

        let cursor = Cursor::spanning(&host, root).unwrap();
        component.mount(&mut host, cursor).unwrap();
        assert_eq!(host.markup(root), "<root><section>ab</section></root>");
    }
}
