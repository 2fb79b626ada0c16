//! # sprig
//!
//! Host-agnostic virtual tree reconciler for declarative UIs.
//!
//! A declarative description of a component tree is resolved into a
//! snapshot of plain elements and text, rendered into an abstract host
//! tree, and on every state change diffed against the previous snapshot
//! so only the parts that changed are re-rendered.
//!
//! ## Architecture
//!
//! ```text
//! build() tree → component vdom (elements/text only) → render via cursors
//!                       ↓ set_state
//!              old vs. new snapshot → positional diff → minimal host patch
//! ```
//!
//! The engine never owns a presentation tree: every mutation goes through
//! the [`HostTree`] trait and its [`Cursor`] insertion positions, passed
//! in explicitly. [`MemoryTree`] is the bundled reference host.
//!
//! Updates are synchronous and single-threaded: [`Component::set_state`]
//! merges, re-renders, and patches the host before it returns.
//!
//! ## Modules
//!
//! - [`types`] - Property values and event callbacks
//! - [`host`] - Host Tree API: node handles, cursors, the memory host
//! - [`vnode`] - Virtual node model and the tree builder
//! - [`component`] - Component lifecycle: mount, state merge, re-render
//! - [`reconcile`] - Full render and positional diff/patch
//! - [`mount`] - Root mount entry point
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use sprig::{Child, ComponentDef, MemoryTree, build, mount};
//!
//! let todo = ComponentDef::new(|scope| {
//!     let items = scope.state_entry("items").as_array().cloned().unwrap_or_default();
//!     let rows: Vec<Child> = items
//!         .iter()
//!         .filter_map(|item| item.as_str())
//!         .map(|item| build("li", vec![], item).map(Child::from))
//!         .collect::<Result<_, _>>()?;
//!     build("ul", vec![("className", "todo".into())], rows)
//! });
//!
//! let mut host = MemoryTree::new();
//! let container = host.create_container();
//! let root = todo.instantiate();
//! mount(&mut host, &root, container).unwrap();
//!
//! root.set_state(&mut host, json!({"items": ["write", "ship"]})).unwrap();
//! assert_eq!(
//!     host.markup(container),
//!     "<root><ul class=\"todo\"><li>write</li><li>ship</li></ul></root>",
//! );
//! ```

pub mod component;
pub mod error;
pub mod host;
pub mod mount;
pub mod reconcile;
pub mod types;
pub mod vnode;

// Re-export commonly used items
pub use component::{Component, ComponentDef, RenderFn, RenderScope, WeakComponent};
pub use error::TreeError;
pub use host::{Cursor, HostError, HostTree, MemoryTree, NodeId};
pub use mount::mount;
pub use reconcile::same_node;
pub use types::{Event, EventHandler, PropValue};
pub use vnode::{Child, ElementNode, Kind, TextNode, VNode, build};
