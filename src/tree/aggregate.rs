use super::arena::{NodeId, WeightTree, WeightedItem};

impl WeightTree {
    /// Aggregated weight of a subtree.
    ///
    /// A leaf (or a node marked as not aggregating) reports its declared
    /// weight. A composite reports the cached recursive sum over its
    /// children, recomputing it only when a structural or weight edit
    /// marked the path dirty. Repeated calls on an unchanged tree are
    /// idempotent.
    pub fn weight(&mut self, id: NodeId) -> f64 {
        let node = &self.nodes[id.index()];
        if node.children.is_empty() || !node.aggregates {
            return node.declared_weight;
        }
        if !node.weight_dirty {
            return node.aggregated_weight;
        }

        let children = node.children.clone();
        let mut total = 0.0;
        for child in children {
            total += self.weight(child);
        }
        let node = &mut self.nodes[id.index()];
        node.aggregated_weight = total;
        node.weight_dirty = false;
        total
    }

    /// One [`WeightedItem`] per direct child of `id`, in sibling order.
    ///
    /// Each item carries the child's aggregated weight, its sibling index
    /// as `order` and `depth = depth(id) + 1`. Computed on first call and
    /// cached until the next structural edit on the path to the root.
    pub fn items(&mut self, id: NodeId) -> &[WeightedItem] {
        self.ensure_items(id);
        self.nodes[id.index()].items.as_deref().unwrap_or(&[])
    }

    pub(crate) fn ensure_items(&mut self, id: NodeId) {
        if self.nodes[id.index()].items.is_some() {
            return;
        }
        let children = self.nodes[id.index()].children.clone();
        let depth = self.nodes[id.index()].depth + 1;
        let mut items = Vec::with_capacity(children.len());
        for (i, child) in children.into_iter().enumerate() {
            let size = self.weight(child);
            let bounds = self.nodes[child.index()].item.bounds;
            items.push(WeightedItem {
                size,
                order: i as u32,
                depth,
                bounds,
            });
        }
        self.nodes[id.index()].items = Some(items);
    }

    /// The lowest-level sibling groups of the subtree at `id`: every
    /// composite node whose direct children are all leaves, collected in
    /// reverse child order. Childless nodes contribute nothing.
    ///
    /// The readability metric weighs these groups by size.
    pub fn leaf_groups(&mut self, id: NodeId) -> &[NodeId] {
        if self.nodes[id.index()].leaf_groups.is_none() {
            let mut groups = Vec::new();
            self.collect_leaf_groups(id, &mut groups);
            self.nodes[id.index()].leaf_groups = Some(groups);
        }
        self.nodes[id.index()].leaf_groups.as_deref().unwrap_or(&[])
    }

    fn collect_leaf_groups(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let node = &self.nodes[id.index()];
        if node.children.is_empty() {
            return;
        }
        if node.children.iter().all(|&c| self.nodes[c.index()].children.is_empty()) {
            out.push(id);
            return;
        }
        for &child in node.children.iter().rev() {
            self.collect_leaf_groups(child, out);
        }
    }

    /// Copy of every node's own item across the subtree at `id`, parents
    /// before children. Handy for whole-layout metrics and diagnostics.
    pub fn subtree_items(&self, id: NodeId) -> Vec<WeightedItem> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id.index()];
            out.push(node.item);
            for &c in node.children.iter().rev() {
                stack.push(c);
            }
        }
        out
    }
}
