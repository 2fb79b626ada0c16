//! Error types.

use thiserror::Error;

use crate::host::HostError;

/// Errors surfaced by building, rendering, and reconciling virtual trees.
///
/// A failure mid-pass leaves the host tree partially patched: the host is
/// non-transactional and there is no rollback.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A node was built with a kind that is neither a usable tag name nor
    /// a component definition.
    #[error("invalid node kind {0:?}")]
    InvalidNodeKind(String),

    /// Diffing was asked to reuse a node that has no recorded host
    /// position.
    #[error("node has no recorded host position")]
    Detached,

    /// A component survived into a snapshot that must contain only
    /// elements and text.
    #[error("snapshot still contains an unresolved component")]
    UnresolvedComponent,

    /// The host refused a mutation.
    #[error(transparent)]
    Host(#[from] HostError),
}
