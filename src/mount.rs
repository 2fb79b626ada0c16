//! Root mount entry point.
//!
//! The only place the engine touches a pre-existing, externally-owned
//! host container: everything the container currently shows is deleted,
//! then the root component renders into the cleared span.

use tracing::debug;

use crate::component::Component;
use crate::error::TreeError;
use crate::host::{Cursor, HostTree, NodeId};

/// Attach a root component to a host container.
///
/// Builds a cursor spanning the container's entire current content,
/// deletes that content, and performs the component's first mount into
/// the cleared cursor.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use sprig::{ComponentDef, MemoryTree, build, mount};
///
/// let counter = ComponentDef::new(|scope| {
///     let count = scope.state_entry("count").as_i64().unwrap_or(0);
///     build("div", vec![], format!("count: {count}"))
/// });
///
/// let mut host = MemoryTree::new();
/// let container = host.create_container();
/// let root = counter.instantiate();
/// mount(&mut host, &root, container).unwrap();
///
/// root.set_state(&mut host, json!({"count": 1})).unwrap();
/// assert_eq!(host.markup(container), "<root><div>count: 1</div></root>");
/// ```
pub fn mount(
    host: &mut dyn HostTree,
    component: &Component,
    container: NodeId,
) -> Result<(), TreeError> {
    let mut cursor = Cursor::spanning(host, container)?;
    cursor.delete_contents(host)?;
    debug!(?container, "mounting root component");
    component.mount(host, cursor)
}

// =============================================================================
// Tests
// =============================================================================
