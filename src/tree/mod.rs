pub mod aggregate;
pub mod arena;

use compact_str::CompactString;

use self::arena::{NodeId, WeightTree};
use crate::geom::Rect;
use crate::layout::LayoutStrategy;

/// A nested description of a weighted hierarchy, used to feed
/// [`build_tree`]. Callers assemble it with [`WeightSource::leaf`] and
/// [`WeightSource::group`] instead of wiring arena indices by hand.
#[derive(Debug, Clone)]
pub struct WeightSource {
    pub label: CompactString,
    /// Weight of a leaf. Ignored for groups, which aggregate their
    /// children.
    pub weight: f64,
    pub children: Vec<WeightSource>,
}

impl WeightSource {
    pub fn leaf(label: &str, weight: f64) -> Self {
        WeightSource {
            label: CompactString::new(label),
            weight,
            children: Vec::new(),
        }
    }

    pub fn group(label: &str, children: Vec<WeightSource>) -> Self {
        WeightSource {
            label: CompactString::new(label),
            weight: 0.0,
            children,
        }
    }
}

/// Build a [`WeightTree`] from a nested [`WeightSource`] description.
///
/// Sibling order in the source is preserved node for node; it is what
/// the ordered strategies and the readability metric later see. Uses an
/// explicit stack so deeply nested sources cannot overflow the call
/// stack.
pub fn build_tree(source: &WeightSource) -> WeightTree {
    let mut tree = WeightTree::new(source.label.as_str());
    tree.set_weight(tree.root, source.weight);

    let mut stack: Vec<(&WeightSource, NodeId)> = Vec::new();
    for child in source.children.iter().rev() {
        stack.push((child, tree.root));
    }
    while let Some((entry, parent)) = stack.pop() {
        let id = tree.push_child(parent, entry.label.as_str(), entry.weight);
        for child in entry.children.iter().rev() {
            stack.push((child, id));
        }
    }

    let leaves = tree
        .nodes
        .iter()
        .filter(|n| n.children.is_empty())
        .count();
    tracing::info!(
        "Built weight tree: {} nodes ({} composites, {} leaves)",
        tree.len(),
        tree.len() - leaves,
        leaves
    );

    tree
}

impl WeightTree {
    /// Lay out the subtree at `id` inside `bounds` with the given
    /// strategy.
    ///
    /// Writes this node's own item (aggregated weight plus the full
    /// `bounds`), asks the strategy to partition `bounds` across the
    /// direct children, then recurses into each child with its assigned
    /// rectangle. The per-node item cache is taken for the strategy call
    /// and put back afterwards, so a later [`WeightTree::items`] read
    /// sees the assigned bounds without recomputation.
    pub fn layout(&mut self, strategy: &dyn LayoutStrategy, id: NodeId, bounds: Rect) {
        let total = self.weight(id);
        {
            let node = &mut self.nodes[id.index()];
            node.item.bounds = bounds;
            node.item.size = total;
        }
        if self.nodes[id.index()].children.is_empty() {
            return;
        }

        self.ensure_items(id);
        let mut items = self.nodes[id.index()].items.take().unwrap_or_default();
        strategy.assign(&mut items, bounds);

        let children = self.nodes[id.index()].children.clone();
        debug_assert_eq!(children.len(), items.len());
        for (i, &child) in children.iter().enumerate() {
            self.layout(strategy, child, items[i].bounds);
        }
        self.nodes[id.index()].items = Some(items);
    }
}
