use compact_str::CompactString;

use crate::error::LayoutError;
use crate::geom::Rect;

/// Index into the arena `Vec<HierarchyNode>`. Uses u32 to save memory
/// (supports up to ~4 billion nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The geometric unit handed to a rectangular layout strategy: one per
/// direct child of the node being laid out.
///
/// `size` is the aggregated weight of the child subtree, `order` its
/// sibling sequence index, `depth` its distance from the tree root.
/// `bounds` is the strategy's output.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedItem {
    pub size: f64,
    pub order: u32,
    pub depth: u32,
    pub bounds: Rect,
}

/// A single node in the weighted hierarchy, stored in a flat arena.
///
/// A leaf's weight is its `declared_weight`. A composite normally ignores
/// its declared weight in favor of the cached sum over descendants
/// (`aggregates == true`); flipping `aggregates` off makes the declared
/// weight authoritative for that node.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    /// Display label (not used by any algorithm)
    pub label: CompactString,
    /// Leaf input weight, or the authoritative weight of a
    /// non-aggregating composite. Never negative.
    pub declared_weight: f64,
    /// Cached subtree weight sum; valid only while `weight_dirty` is false.
    pub(crate) aggregated_weight: f64,
    pub(crate) weight_dirty: bool,
    /// Whether a composite's weight is the sum of its children.
    pub aggregates: bool,
    /// This node's own geometry, written by `layout`.
    pub item: WeightedItem,
    /// Parent node index (None for the root)
    pub parent: Option<NodeId>,
    /// Direct children in sibling order. The order is semantic: it feeds
    /// `WeightedItem::order`, the ordered strategies and the readability
    /// metric.
    pub children: Vec<NodeId>,
    /// Depth in the tree (root = 0)
    pub depth: u32,
    /// Cached per-child items, one `WeightedItem` per direct child.
    pub(crate) items: Option<Vec<WeightedItem>>,
    /// Cached lowest-level sibling groups of this subtree.
    pub(crate) leaf_groups: Option<Vec<NodeId>>,
}

impl HierarchyNode {
    fn new(label: &str, weight: f64, parent: Option<NodeId>, depth: u32, order: u32) -> Self {
        HierarchyNode {
            label: CompactString::new(label),
            declared_weight: weight,
            aggregated_weight: 0.0,
            weight_dirty: true,
            aggregates: true,
            item: WeightedItem {
                size: weight,
                order,
                depth,
                bounds: Rect::ZERO,
            },
            parent,
            children: Vec::new(),
            depth,
            items: None,
            leaf_groups: None,
        }
    }
}

/// The weighted hierarchy stored as a flat arena of nodes.
///
/// Nodes reference each other only through [`NodeId`] indices; the parent
/// link is a non-owning index used for traversal and cache invalidation,
/// never for lifetime management. The tree must be structurally unchanged
/// for the duration of a layout pass.
pub struct WeightTree {
    /// All nodes in contiguous memory
    pub nodes: Vec<HierarchyNode>,
    /// Root node index
    pub root: NodeId,
}

impl WeightTree {
    /// Create a tree with a single root node of the given label.
    pub fn new(label: &str) -> Self {
        WeightTree {
            nodes: vec![HierarchyNode::new(label, 0.0, None, 0, 0)],
            root: NodeId(0),
        }
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.index()]
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> &mut HierarchyNode {
        &mut self.nodes[id.index()]
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Direct children of a node, in sibling order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.index()].children.is_empty()
    }

    /// Create a new node under `parent` and return its ID.
    pub fn push_child(&mut self, parent: NodeId, label: &str, weight: f64) -> NodeId {
        debug_assert!(weight >= 0.0, "node weights must be non-negative");
        let new_id = NodeId(self.nodes.len() as u32);
        let depth = self.nodes[parent.index()].depth + 1;
        let order = self.nodes[parent.index()].children.len() as u32;
        self.nodes
            .push(HierarchyNode::new(label, weight, Some(parent), depth, order));
        self.nodes[parent.index()].children.push(new_id);
        self.invalidate_to_root(parent);
        new_id
    }

    /// Attach an existing node as the last child of `parent`.
    ///
    /// Fails with [`LayoutError::CycleDetected`] when `parent` is the
    /// child itself or descends from it; a failed attach leaves both
    /// nodes' children untouched. A child already attached elsewhere is
    /// first detached from its old parent.
    pub fn adopt(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        // Cycle guard: walk up from the prospective parent before any
        // mutation.
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(LayoutError::CycleDetected { parent, child });
            }
            cursor = self.nodes[id.index()].parent;
        }

        if let Some(old_parent) = self.nodes[child.index()].parent {
            self.detach(old_parent, child);
        }

        let order = self.nodes[parent.index()].children.len() as u32;
        self.nodes[parent.index()].children.push(child);
        {
            let node = &mut self.nodes[child.index()];
            node.parent = Some(parent);
            node.item.order = order;
        }
        let depth = self.nodes[parent.index()].depth + 1;
        self.restamp_depths(child, depth);
        self.invalidate_to_root(parent);
        Ok(())
    }

    /// Overwrite a node's declared weight.
    pub fn set_weight(&mut self, id: NodeId, weight: f64) {
        debug_assert!(weight >= 0.0, "node weights must be non-negative");
        self.nodes[id.index()].declared_weight = weight;
        self.invalidate_to_root(id);
    }

    /// Control whether a composite's weight is the sum of its children.
    pub fn set_aggregates(&mut self, id: NodeId, aggregates: bool) {
        self.nodes[id.index()].aggregates = aggregates;
        self.invalidate_to_root(id);
    }

    /// Remove `child` from `old_parent`'s child list and restamp the
    /// remaining siblings' order indices.
    fn detach(&mut self, old_parent: NodeId, child: NodeId) {
        let children = &mut self.nodes[old_parent.index()].children;
        if let Some(pos) = children.iter().position(|&c| c == child) {
            children.remove(pos);
        }
        let remaining = self.nodes[old_parent.index()].children.clone();
        for (i, sibling) in remaining.into_iter().enumerate() {
            self.nodes[sibling.index()].item.order = i as u32;
        }
        self.nodes[child.index()].parent = None;
        self.invalidate_to_root(old_parent);
    }

    /// Restamp `depth` across a subtree after it moved.
    fn restamp_depths(&mut self, id: NodeId, depth: u32) {
        let mut stack = vec![(id, depth)];
        while let Some((node_id, d)) = stack.pop() {
            let node = &mut self.nodes[node_id.index()];
            node.depth = d;
            node.item.depth = d;
            for &c in &node.children {
                stack.push((c, d + 1));
            }
        }
    }

    /// Drop every cache on the path from `id` to the root.
    ///
    /// Called after any structural or weight edit, before the next read.
    pub(crate) fn invalidate_to_root(&mut self, id: NodeId) {
        let mut cursor = Some(id);
        while let Some(node_id) = cursor {
            let node = &mut self.nodes[node_id.index()];
            node.weight_dirty = true;
            node.items = None;
            node.leaf_groups = None;
            cursor = node.parent;
        }
    }
}
