pub mod enclose;
mod frontier;

pub use enclose::enclose;

use compact_str::CompactString;

use crate::geom::{Circle, TOLERANCE};
use crate::tree::arena::NodeId;
use crate::tree::WeightSource;
use frontier::pack_siblings;

/// A single node of the circular layout tree.
#[derive(Debug, Clone)]
pub struct CircleNode {
    pub label: CompactString,
    /// Leaf input weight; after packing, composites hold the sum over
    /// their subtree.
    pub weight: f64,
    /// Assigned geometry. The center is relative to the parent's
    /// center, the radius absolute, so moving a parent never requires
    /// touching descendants.
    pub circle: Circle,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Nodes below this one. Only used to size progress reports.
    pub descendant_count: usize,
}

impl CircleNode {
    fn new(label: &str, weight: f64, parent: Option<NodeId>) -> Self {
        CircleNode {
            label: CompactString::new(label),
            weight,
            circle: Circle::ZERO,
            parent,
            children: Vec::new(),
            descendant_count: 0,
        }
    }
}

/// Arena of [`CircleNode`]s, the circular counterpart of the
/// rectangular weight tree.
pub struct CircleTree {
    pub nodes: Vec<CircleNode>,
    pub root: NodeId,
}

impl CircleTree {
    pub fn new(label: &str, weight: f64) -> Self {
        CircleTree {
            nodes: vec![CircleNode::new(label, weight, None)],
            root: NodeId(0),
        }
    }

    /// Build a circle tree from the same nested description the
    /// rectangular model ingests.
    pub fn from_source(source: &WeightSource) -> Self {
        let mut tree = CircleTree::new(source.label.as_str(), source.weight);
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
        tracing::debug!("Built circle tree: {} nodes", tree.len());
        tree
    }

    pub fn get(&self, id: NodeId) -> &CircleNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut CircleNode {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Create a new node under `parent`, keeping every ancestor's
    /// descendant count current.
    pub fn push_child(&mut self, parent: NodeId, label: &str, weight: f64) -> NodeId {
        debug_assert!(weight >= 0.0, "node weights must be non-negative");
        let new_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(CircleNode::new(label, weight, Some(parent)));
        self.nodes[parent.index()].children.push(new_id);

        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            self.nodes[ancestor.index()].descendant_count += 1;
            cursor = self.nodes[ancestor.index()].parent;
        }
        new_id
    }

    /// Resolve parent-relative centers into absolute circles, parents
    /// before children. The readout side for rendering and tests.
    pub fn absolute(&self) -> Vec<(NodeId, Circle)> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![(self.root, 0.0, 0.0)];
        while let Some((id, ox, oy)) = stack.pop() {
            let node = &self.nodes[id.index()];
            let x = ox + node.circle.x;
            let y = oy + node.circle.y;
            out.push((id, Circle::new(x, y, node.circle.r)));
            for &child in node.children.iter().rev() {
                stack.push((child, x, y));
            }
        }
        out
    }
}

/// Tunables for the circular packing walk.
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Smallest radius a leaf may receive, keeping zero-weight leaves
    /// visible and hit-testable.
    pub min_radius: f64,
    /// Clearance kept between sibling circles and around each pack.
    pub gap: f64,
    /// Overlap tolerance for candidate placement.
    pub tolerance: f64,
}

impl Default for PackConfig {
    fn default() -> Self {
        PackConfig {
            min_radius: 1.0,
            gap: 0.0,
            tolerance: TOLERANCE,
        }
    }
}

/// Verdict returned from a progress checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackControl {
    Continue,
    Cancel,
}

/// Outcome of a packing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackStatus {
    Complete,
    Cancelled,
}

/// Cooperative progress and cancellation capability.
///
/// Polled once per composite, after that node's sibling group has been
/// placed and committed, never in the middle of a placement step.
/// Returning [`PackControl::Cancel`] stops the walk; every subtree
/// already packed keeps its finished geometry.
pub trait PackObserver {
    fn checkpoint(&mut self, done: usize, total: usize) -> PackControl;
}

/// Observer that never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PackObserver for NoopObserver {
    fn checkpoint(&mut self, _done: usize, _total: usize) -> PackControl {
        PackControl::Continue
    }
}

impl<F: FnMut(usize, usize) -> PackControl> PackObserver for F {
    fn checkpoint(&mut self, done: usize, total: usize) -> PackControl {
        self(done, total)
    }
}

/// Lay out the whole tree bottom-up.
///
/// Every node receives a radius (leaves by the area law, composites from
/// their packed children) and every child a parent-relative center.
pub fn pack_layout(
    tree: &mut CircleTree,
    config: &PackConfig,
    observer: &mut dyn PackObserver,
) -> PackStatus {
    let total = tree.get(tree.root).descendant_count + 1;
    let mut done = 0;
    match pack_subtree(tree, tree.root, config, observer, &mut done, total) {
        PackControl::Continue => PackStatus::Complete,
        PackControl::Cancel => PackStatus::Cancelled,
    }
}

fn pack_subtree(
    tree: &mut CircleTree,
    id: NodeId,
    config: &PackConfig,
    observer: &mut dyn PackObserver,
    done: &mut usize,
    total: usize,
) -> PackControl {
    let children = tree.nodes[id.index()].children.clone();
    for &child in &children {
        if pack_subtree(tree, child, config, observer, done, total) == PackControl::Cancel {
            return PackControl::Cancel;
        }
    }

    pack_group(tree, id, config);
    *done += 1;
    if children.is_empty() {
        return PackControl::Continue;
    }
    observer.checkpoint(*done, total)
}

/// Recompute one node's geometry from its children's current radii.
///
/// Shifts only the direct children; anything deeper rides along since
/// centers are parent-relative. Callers re-laying a subtree after a
/// weight edit call this on the edited node, then
/// [`repack_ancestors`] for the levels above.
pub fn pack_group(tree: &mut CircleTree, id: NodeId, config: &PackConfig) {
    let children = tree.nodes[id.index()].children.clone();
    match children.len() {
        0 => {
            let node = &mut tree.nodes[id.index()];
            node.circle.r = leaf_radius(node.weight, config);
        }
        1 => {
            let only = children[0];
            let child_r = tree.nodes[only.index()].circle.r;
            let weight = tree.nodes[only.index()].weight;
            {
                let child = &mut tree.nodes[only.index()];
                child.circle.x = 0.0;
                child.circle.y = 0.0;
            }
            let node = &mut tree.nodes[id.index()];
            node.weight = weight;
            node.circle.r = (child_r + config.gap).max(weight_radius(weight));
        }
        _ => {
            // Half the gap inflates every radius, so tangent placement
            // leaves a full gap between true circles and a half-gap rim
            // inside the enclosure.
            let padded: Vec<f64> = children
                .iter()
                .map(|&c| tree.nodes[c.index()].circle.r + config.gap / 2.0)
                .collect();
            let centers = pack_siblings(&padded, config.tolerance);
            let packed: Vec<Circle> = padded
                .iter()
                .zip(&centers)
                .map(|(&r, &(x, y))| Circle::new(x, y, r))
                .collect();
            let enclosing = enclose(&packed).unwrap_or(Circle::ZERO);

            let mut weight = 0.0;
            for (&child, &(x, y)) in children.iter().zip(&centers) {
                let node = &mut tree.nodes[child.index()];
                node.circle.x = x - enclosing.x;
                node.circle.y = y - enclosing.y;
                weight += node.weight;
            }
            let node = &mut tree.nodes[id.index()];
            node.weight = weight;
            node.circle.r = enclosing.r.max(weight_radius(weight));
        }
    }
}

/// Re-run packing at every ancestor of `id`, nearest first.
///
/// There is no automatic propagation after an edit; this is the
/// explicit upward walk. Levels below `id` are never revisited.
pub fn repack_ancestors(tree: &mut CircleTree, id: NodeId, config: &PackConfig) {
    let mut cursor = tree.nodes[id.index()].parent;
    while let Some(ancestor) = cursor {
        pack_group(tree, ancestor, config);
        cursor = tree.nodes[ancestor.index()].parent;
    }
}

fn weight_radius(weight: f64) -> f64 {
    (weight.max(0.0) / std::f64::consts::PI).sqrt()
}

fn leaf_radius(weight: f64, config: &PackConfig) -> f64 {
    config.min_radius.max(weight_radius(weight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn weighted_group(label: &str, weights: &[f64]) -> WeightSource {
        WeightSource::group(
            label,
            weights
                .iter()
                .enumerate()
                .map(|(i, &w)| WeightSource::leaf(&format!("{label}-{i}"), w))
                .collect(),
        )
    }

    #[test]
    fn leaf_radius_follows_the_area_law_with_a_floor() {
        let config = PackConfig::default();
        assert_eq!(leaf_radius(PI, &config), 1.0);
        assert_eq!(leaf_radius(4.0 * PI, &config), 2.0);
        assert_eq!(leaf_radius(0.01, &config), 1.0);
        assert_eq!(leaf_radius(0.0, &config), 1.0);
    }

    #[test]
    fn siblings_do_not_overlap_and_stay_inside_the_parent() {
        let mut tree =
            CircleTree::from_source(&weighted_group("g", &[40.0, 10.0, 25.0, 5.0, 20.0]));
        let config = PackConfig::default();
        let status = pack_layout(&mut tree, &config, &mut NoopObserver);
        assert_eq!(status, PackStatus::Complete);

        let root = tree.get(tree.root).circle;
        let children: Vec<Circle> = tree
            .children(tree.root)
            .iter()
            .map(|&c| tree.get(c).circle)
            .collect();
        let hull = Circle::new(0.0, 0.0, root.r);
        for (i, a) in children.iter().enumerate() {
            assert!(hull.contains_with(a, 1e-6), "child {i} escapes the parent");
            for b in children.iter().skip(i + 1) {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn single_child_shares_its_parents_center() {
        let source = WeightSource::group("g", vec![WeightSource::leaf("only", PI)]);
        let mut tree = CircleTree::from_source(&source);
        pack_layout(&mut tree, &PackConfig::default(), &mut NoopObserver);

        let child = tree.children(tree.root)[0];
        assert_eq!(tree.get(child).circle.x, 0.0);
        assert_eq!(tree.get(child).circle.y, 0.0);
        assert!((tree.get(tree.root).circle.r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn gap_keeps_clearance_between_siblings() {
        let source = weighted_group("g", &[PI, PI]);
        let mut tree = CircleTree::from_source(&source);
        let config = PackConfig {
            gap: 1.0,
            ..PackConfig::default()
        };
        pack_layout(&mut tree, &config, &mut NoopObserver);

        let kids = tree.children(tree.root).to_vec();
        let a = tree.get(kids[0]).circle;
        let b = tree.get(kids[1]).circle;
        assert!((a.center_distance(&b) - 3.0).abs() < 1e-9, "1 + 1 + gap");
        assert!((tree.get(tree.root).circle.r - 3.0).abs() < 1e-9);
    }

    #[test]
    fn nested_groups_stay_inside_the_root_absolutely() {
        let source = WeightSource::group(
            "root",
            vec![
                weighted_group("a", &[30.0, 20.0, 10.0]),
                weighted_group("b", &[15.0, 5.0]),
                WeightSource::leaf("c", 25.0),
            ],
        );
        let mut tree = CircleTree::from_source(&source);
        pack_layout(&mut tree, &PackConfig::default(), &mut NoopObserver);

        let circles = tree.absolute();
        let (_, root) = circles[0];
        for &(id, circle) in &circles[1..] {
            assert!(
                root.contains_with(&circle, 1e-5),
                "{:?} escapes the root",
                tree.get(id).label
            );
        }
    }

    #[test]
    fn composite_weight_aggregates_bottom_up() {
        let source = WeightSource::group(
            "root",
            vec![weighted_group("a", &[1.0, 2.0]), WeightSource::leaf("b", 4.0)],
        );
        let mut tree = CircleTree::from_source(&source);
        pack_layout(&mut tree, &PackConfig::default(), &mut NoopObserver);

        assert_eq!(tree.get(tree.root).weight, 7.0);
        let a = tree.children(tree.root)[0];
        assert_eq!(tree.get(a).weight, 3.0);
    }

    #[test]
    fn descendant_count_tracks_subtree_sizes() {
        let source = WeightSource::group(
            "root",
            vec![weighted_group("a", &[1.0, 1.0]), WeightSource::leaf("b", 1.0)],
        );
        let tree = CircleTree::from_source(&source);

        assert_eq!(tree.get(tree.root).descendant_count, 4);
        let a = tree.children(tree.root)[0];
        assert_eq!(tree.get(a).descendant_count, 2);
    }

    #[test]
    fn cancellation_preserves_finished_subtrees() {
        let source = WeightSource::group(
            "root",
            vec![weighted_group("a", &[PI, PI]), weighted_group("b", &[PI, PI])],
        );
        let mut tree = CircleTree::from_source(&source);

        let mut observer = |_done: usize, _total: usize| PackControl::Cancel;
        let status = pack_layout(&mut tree, &PackConfig::default(), &mut observer);
        assert_eq!(status, PackStatus::Cancelled);

        let kids = tree.children(tree.root).to_vec();
        let a = tree.get(kids[0]);
        assert!(a.circle.r > 0.0, "finished group keeps its geometry");
        let a_kids = tree.children(kids[0]).to_vec();
        let c0 = tree.get(a_kids[0]).circle;
        let c1 = tree.get(a_kids[1]).circle;
        assert!(!c0.intersects(&c1));

        // The cancelled walk never reached the second group or the root.
        assert_eq!(tree.get(kids[1]).circle.r, 0.0);
        assert_eq!(tree.get(tree.root).circle.r, 0.0);
    }

    #[test]
    fn observer_reports_monotonic_progress() {
        let source = WeightSource::group(
            "root",
            vec![weighted_group("a", &[1.0, 1.0]), weighted_group("b", &[1.0, 1.0])],
        );
        let mut tree = CircleTree::from_source(&source);

        let mut seen: Vec<(usize, usize)> = Vec::new();
        let mut observer = |done: usize, total: usize| {
            seen.push((done, total));
            PackControl::Continue
        };
        let status = pack_layout(&mut tree, &PackConfig::default(), &mut observer);
        assert_eq!(status, PackStatus::Complete);

        assert_eq!(seen, vec![(3, 7), (6, 7), (7, 7)]);
    }

    #[test]
    fn repack_ancestors_updates_only_the_edited_chain() {
        let source = WeightSource::group(
            "root",
            vec![weighted_group("a", &[PI, PI]), weighted_group("b", &[PI, PI])],
        );
        let mut tree = CircleTree::from_source(&source);
        let config = PackConfig::default();
        pack_layout(&mut tree, &config, &mut NoopObserver);

        let kids = tree.children(tree.root).to_vec();
        let (a, b) = (kids[0], kids[1]);
        let b_circle_before = tree.get(b).circle;
        let l1 = tree.children(a)[0];

        tree.get_mut(l1).weight = 100.0 * PI;
        pack_group(&mut tree, l1, &config);
        assert!((tree.get(l1).circle.r - 10.0).abs() < 1e-9);
        repack_ancestors(&mut tree, l1, &config);

        assert!((tree.get(a).circle.r - 11.0).abs() < 1e-9);
        assert!((tree.get(tree.root).circle.r - 13.0).abs() < 1e-9);
        // The sibling subtree keeps its radius; only its relative
        // position may shift.
        assert_eq!(tree.get(b).circle.r, b_circle_before.r);
    }
}
