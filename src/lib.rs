// Space-filling layout engine: weighted trees with cached aggregation,
// rectangular treemap strategies, circle packing, and layout metrics.

pub mod error;
pub mod geom;
pub mod layout;
pub mod metrics;
pub mod pack;
pub mod tree;

pub use error::LayoutError;
pub use geom::{Circle, Rect, TOLERANCE};
pub use layout::{
    BinaryTreeLayout, LayoutStrategy, OrderedPivotLayout, PivotPolicy, SliceAndDice, SliceAxis,
    SliceDirection, SquarifiedLayout,
};
pub use metrics::{
    average_aspect_ratio, readability, stability, worst_aspect_ratio, LayoutSnapshot,
    READABILITY_ANGLE_TOLERANCE,
};
pub use pack::{
    enclose, pack_group, pack_layout, repack_ancestors, CircleNode, CircleTree, NoopObserver,
    PackConfig, PackControl, PackObserver, PackStatus,
};
pub use tree::arena::{HierarchyNode, NodeId, WeightTree, WeightedItem};
pub use tree::{build_tree, WeightSource};
