//! Insertion cursor - a contiguous span of child positions.
//!
//! A cursor brackets `start..end` within one host container. Collapsed
//! (`start == end`) it is a pure insertion point; non-collapsed it spans
//! content that `delete_contents` removes and a render pass replaces.
//!
//! Cursors are plain positions, not live references: a cursor recorded
//! before a sibling mutation can be invalidated by it. The reconciler
//! therefore threads cursors call-by-call within a pass and re-records
//! every range on each pass instead of trusting old ones.

use super::{HostError, HostTree, NodeId};

/// A position span within a host container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    container: NodeId,
    start: usize,
    end: usize,
}

impl Cursor {
    /// Cursor bracketing `start..end` within `container`.
    pub fn new(container: NodeId, start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self {
            container,
            start,
            end,
        }
    }

    /// Collapsed cursor at a single child position.
    pub fn collapsed(container: NodeId, index: usize) -> Self {
        Self::new(container, index, index)
    }

    /// Cursor spanning all current children of `container`.
    pub fn spanning(host: &dyn HostTree, container: NodeId) -> Result<Self, HostError> {
        Ok(Self::new(container, 0, host.child_count(container)?))
    }

    /// The container this cursor points into.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// First child position bracketed.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Position one past the last child bracketed.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Whether the cursor brackets nothing.
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Insert `node` at the cursor start.
    ///
    /// The inserted node becomes part of the bracketed span: `start` stays
    /// put and `end` grows past it. Inserting into a collapsed cursor
    /// leaves the cursor bracketing exactly the new node.
    pub fn insert(&mut self, host: &mut dyn HostTree, node: NodeId) -> Result<(), HostError> {
        host.insert(self.container, self.start, node)?;
        self.end += 1;
        Ok(())
    }

    /// Remove every child the cursor brackets, collapsing it.
    pub fn delete_contents(&mut self, host: &mut dyn HostTree) -> Result<(), HostError> {
        while self.end > self.start {
            host.remove(self.container, self.start)?;
            self.end -= 1;
        }
        Ok(())
    }

    /// Collapse to the position just past the bracketed span.
    pub fn collapse_to_end(&mut self) {
        self.start = self.end;
    }

    /// Re-anchor as a collapsed cursor immediately before `node`, which
    /// must currently be a child of the cursor's container.
    pub fn collapse_before(&mut self, host: &dyn HostTree, node: NodeId) -> Result<(), HostError> {
        let index = host
            .index_of(self.container, node)
            .ok_or(HostError::UnknownNode(node))?;
        self.start = index;
        self.end = index;
        Ok(())
    }

    /// Re-anchor as a collapsed cursor immediately after `node`, which
    /// must currently be a child of the cursor's container.
    pub fn collapse_after(&mut self, host: &dyn HostTree, node: NodeId) -> Result<(), HostError> {
        let index = host
            .index_of(self.container, node)
            .ok_or(HostError::UnknownNode(node))?;
        self.start = index + 1;
        self.end = index + 1;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryTree;

    fn tree_with_container() -> (MemoryTree, NodeId) {
        let mut host = MemoryTree::new();
        let root = host.create_container();
        (host, root)
    }

    #[test]
    fn test_insert_grows_span() {
        let (mut host, root) = tree_with_container();
        let a = host.create_text("a").unwrap();
        let b = host.create_text("b").unwrap();

        let mut cursor = Cursor::collapsed(root, 0);
        cursor.insert(&mut host, a).unwrap();
        assert_eq!((cursor.start(), cursor.end()), (0, 1));
        assert!(!cursor.is_collapsed());

        // Second insert at start lands before the first
        cursor.insert(&mut host, b).unwrap();
        assert_eq!(host.children(root), &[b, a]);
        assert_eq!((cursor.start(), cursor.end()), (0, 2));
    }

    #[test]
    fn test_delete_contents_collapses() {
        let (mut host, root) = tree_with_container();
        for content in ["a", "b", "c"] {
            let id = host.create_text(content).unwrap();
            let count = host.child_count(root).unwrap();
            host.insert(root, count, id).unwrap();
        }

        let mut cursor = Cursor::new(root, 1, 3);
        cursor.delete_contents(&mut host).unwrap();

        assert!(cursor.is_collapsed());
        assert_eq!(host.child_count(root).unwrap(), 1);
        assert_eq!(host.text(host.children(root)[0]), Some("a"));
    }

    #[test]
    fn test_spanning_covers_existing_children() {
        let (mut host, root) = tree_with_container();
        for content in ["a", "b"] {
            let id = host.create_text(content).unwrap();
            let count = host.child_count(root).unwrap();
            host.insert(root, count, id).unwrap();
        }

        let cursor = Cursor::spanning(&host, root).unwrap();
        assert_eq!((cursor.start(), cursor.end()), (0, 2));
    }

    #[test]
    fn test_collapse_around_node() {
        let (mut host, root) = tree_with_container();
        let a = host.create_text("a").unwrap();
        let b = host.create_text("b").unwrap();
        host.insert(root, 0, a).unwrap();
        host.insert(root, 1, b).unwrap();

        let mut cursor = Cursor::spanning(&host, root).unwrap();
        cursor.collapse_after(&host, a).unwrap();
        assert_eq!((cursor.start(), cursor.end()), (1, 1));

        cursor.collapse_before(&host, a).unwrap();
        assert_eq!((cursor.start(), cursor.end()), (0, 0));

        let stray = host.create_text("stray").unwrap();
        assert_eq!(
            cursor.collapse_after(&host, stray),
            Err(HostError::UnknownNode(stray)),
            "re-anchoring on a non-child must fail"
        );
    }

    #[test]
    fn test_collapse_to_end() {
        let (mut host, root) = tree_with_container();
        let a = host.create_text("a").unwrap();
        host.insert(root, 0, a).unwrap();

        let mut cursor = Cursor::new(root, 0, 1);
        cursor.collapse_to_end();
        assert_eq!((cursor.start(), cursor.end()), (1, 1));
    }
}
