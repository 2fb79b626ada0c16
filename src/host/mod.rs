//! Host Tree API - the only boundary the core talks to.
//!
//! The reconciler never owns a presentation tree. It drives an abstract
//! host through this trait: node creation, property/event assignment, and
//! positional insert/remove. Positions inside a container are addressed
//! with [`Cursor`], an insertion cursor supporting insert, delete, and
//! re-anchoring around a node.
//!
//! [`MemoryTree`] is the reference implementation, used throughout the
//! test suites.

mod cursor;
mod memory;

pub use cursor::Cursor;
pub use memory::MemoryTree;

use thiserror::Error;

use crate::types::{EventHandler, PropValue};

// =============================================================================
// Node handles
// =============================================================================

/// Opaque handle to a node owned by the host tree.
///
/// The core treats handles as tokens: it stores and compares them but
/// never interprets the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Wrap a raw host-assigned value.
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// The raw value, for host-side bookkeeping.
    pub const fn raw(self) -> usize {
        self.0
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Failures reported by a host tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The handle does not name a live node.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// The node cannot hold children.
    #[error("node {0:?} does not hold children")]
    NotAContainer(NodeId),

    /// A child position outside the container's current bounds.
    #[error("index {index} out of bounds for node {parent:?} with {len} children")]
    IndexOutOfBounds {
        /// The container addressed.
        parent: NodeId,
        /// The offending child index.
        index: usize,
        /// The container's current child count.
        len: usize,
    },
}

// =============================================================================
// Host tree trait
// =============================================================================

/// Capabilities the core requires of a live presentation tree.
///
/// All mutation is positional: children are addressed by index within
/// their parent. The core is the sole writer; implementations do not need
/// interior synchronization.
pub trait HostTree {
    /// Create a detached container node of the given kind.
    fn create_element(&mut self, kind: &str) -> Result<NodeId, HostError>;

    /// Create a detached leaf node holding text.
    fn create_text(&mut self, content: &str) -> Result<NodeId, HostError>;

    /// Set a named property on a node.
    fn set_property(&mut self, node: NodeId, name: &str, value: &PropValue)
    -> Result<(), HostError>;

    /// Bind a named event on a node.
    fn bind_event(
        &mut self,
        node: NodeId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError>;

    /// Insert `node` at `index` within `parent`, shifting later siblings.
    fn insert(&mut self, parent: NodeId, index: usize, node: NodeId) -> Result<(), HostError>;

    /// Detach and return the child at `index` within `parent`.
    fn remove(&mut self, parent: NodeId, index: usize) -> Result<NodeId, HostError>;

    /// Number of children currently held by `parent`.
    fn child_count(&self, parent: NodeId) -> Result<usize, HostError>;

    /// Position of `node` within `parent`, if it is a child of it.
    fn index_of(&self, parent: NodeId, node: NodeId) -> Option<usize>;
}
