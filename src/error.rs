use crate::tree::arena::NodeId;

/// Structural errors reported to the caller.
///
/// Degenerate inputs (zero weights, zero-area bounds, undersized groups)
/// are *not* errors; they produce documented degenerate outputs. Anything
/// in this enum indicates a programming error upstream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Attaching `child` under `parent` would make the tree cyclic
    /// (the parent already descends from the child, or is the child).
    #[error("cannot attach node {child:?} under {parent:?}: parent descends from child")]
    CycleDetected { parent: NodeId, child: NodeId },

    /// Two layouts were compared that do not describe the same structure.
    #[error("snapshot length mismatch: expected {expected} rectangles, got {actual}")]
    SnapshotMismatch { expected: usize, actual: usize },
}
