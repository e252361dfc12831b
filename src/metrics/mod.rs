//! Read-only quality metrics over a laid-out tree.

use std::f64::consts::PI;

use crate::error::LayoutError;
use crate::geom::Rect;
use crate::tree::arena::{NodeId, WeightTree, WeightedItem};

/// Heading changes below this angle (radians) do not count as turns;
/// absorbs rounding in rectangle centers.
pub const READABILITY_ANGLE_TOLERANCE: f64 = 0.1;

/// Arithmetic mean of the items' aspect ratios. Empty input is 0.
pub fn average_aspect_ratio(items: &[WeightedItem]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let sum: f64 = items.iter().map(|it| it.bounds.aspect_ratio()).sum();
    sum / items.len() as f64
}

/// Largest aspect ratio among the items. Empty input is 0.
pub fn worst_aspect_ratio(items: &[WeightedItem]) -> f64 {
    items
        .iter()
        .map(|it| it.bounds.aspect_ratio())
        .fold(0.0, f64::max)
}

/// How consistently a reader's eye can follow sibling order through the
/// layout, in `[0, 1]`.
///
/// For every lowest-level sibling group, walk the child rectangles in
/// order and count the direction changes between successive center-to-
/// center headings that exceed [`READABILITY_ANGLE_TOLERANCE`]. A group
/// scores `1 - turns / item_count`; groups aggregate weighted by their
/// item count. A tree with no groups reads perfectly.
pub fn readability(tree: &mut WeightTree, root: NodeId) -> f64 {
    let groups: Vec<NodeId> = tree.leaf_groups(root).to_vec();
    let mut weighted = 0.0;
    let mut total = 0.0;
    for group in groups {
        let items = tree.items(group);
        let count = items.len();
        if count == 0 {
            continue;
        }
        let turns = count_turns(items);
        weighted += (1.0 - turns as f64 / count as f64) * count as f64;
        total += count as f64;
    }
    if total <= 0.0 {
        1.0
    } else {
        weighted / total
    }
}

fn count_turns(items: &[WeightedItem]) -> usize {
    if items.len() < 3 {
        return 0;
    }
    let mut turns = 0;
    let mut previous: Option<f64> = None;
    for pair in items.windows(2) {
        let (x0, y0) = pair[0].bounds.center();
        let (x1, y1) = pair[1].bounds.center();
        let heading = (y1 - y0).atan2(x1 - x0);
        if let Some(last) = previous {
            let mut delta = heading - last;
            while delta > PI {
                delta -= 2.0 * PI;
            }
            while delta <= -PI {
                delta += 2.0 * PI;
            }
            if delta.abs() > READABILITY_ANGLE_TOLERANCE {
                turns += 1;
            }
        }
        previous = Some(heading);
    }
    turns
}

/// An ordered record of every rectangle in a subtree, for comparing two
/// layouts of a structurally identical tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    rects: Vec<Rect>,
}

impl LayoutSnapshot {
    /// Record the current rectangle of every node under `root`, parents
    /// before children in sibling order. Two captures of structurally
    /// identical trees pair up index by index.
    pub fn capture(tree: &WeightTree, root: NodeId) -> Self {
        let rects = tree
            .subtree_items(root)
            .iter()
            .map(|item| item.bounds)
            .collect();
        LayoutSnapshot { rects }
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Mean positional distance between two snapshots of the same tree.
///
/// Lower is more stable. Comparing snapshots of different lengths is a
/// structural error, not a zero.
pub fn stability(before: &LayoutSnapshot, after: &LayoutSnapshot) -> Result<f64, LayoutError> {
    if before.len() != after.len() {
        return Err(LayoutError::SnapshotMismatch {
            expected: before.len(),
            actual: after.len(),
        });
    }
    if before.is_empty() {
        return Ok(0.0);
    }
    let sum: f64 = before
        .rects
        .iter()
        .zip(&after.rects)
        .map(|(a, b)| a.distance(b))
        .sum();
    Ok(sum / before.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{SliceAndDice, SliceAxis, SliceDirection};
    use crate::tree::{build_tree, WeightSource};

    fn item_with_bounds(bounds: Rect) -> WeightedItem {
        WeightedItem {
            size: 1.0,
            order: 0,
            depth: 1,
            bounds,
        }
    }

    fn flat_tree(weights: &[f64]) -> crate::tree::arena::WeightTree {
        build_tree(&WeightSource::group(
            "root",
            weights
                .iter()
                .enumerate()
                .map(|(i, &w)| WeightSource::leaf(&format!("leaf-{i}"), w))
                .collect(),
        ))
    }

    #[test]
    fn average_aspect_of_nothing_is_zero() {
        assert_eq!(average_aspect_ratio(&[]), 0.0);
        assert_eq!(worst_aspect_ratio(&[]), 0.0);
    }

    #[test]
    fn aspect_metrics_over_known_rectangles() {
        let items = [
            item_with_bounds(Rect::new(0.0, 0.0, 20.0, 10.0)),
            item_with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)),
        ];
        assert!((average_aspect_ratio(&items) - 1.5).abs() < 1e-12);
        assert!((worst_aspect_ratio(&items) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn readability_is_one_for_a_collinear_row() {
        let mut tree = flat_tree(&[1.0, 2.0, 3.0, 4.0]);
        let strategy = SliceAndDice::new(SliceAxis::Horizontal, SliceDirection::Ascending);
        tree.layout(&strategy, tree.root, Rect::new(0.0, 0.0, 100.0, 50.0));

        let root = tree.root;
        assert_eq!(readability(&mut tree, root), 1.0);
    }

    #[test]
    fn readability_penalizes_alternating_layouts() {
        let mut tree = flat_tree(&[1.0, 1.0, 1.0, 1.0]);
        let children = tree.children(tree.root).to_vec();
        for (i, &child) in children.iter().enumerate() {
            let y = if i % 2 == 0 { 0.0 } else { 10.0 };
            tree.get_mut(child).item.bounds = Rect::new(i as f64 * 10.0, y, 2.0, 2.0);
        }

        let root = tree.root;
        let score = readability(&mut tree, root);
        assert!((score - 0.5).abs() < 1e-12, "two turns over four items");
    }

    #[test]
    fn long_alternating_runs_drive_readability_toward_zero() {
        let mut tree = flat_tree(&[1.0; 20]);
        let children = tree.children(tree.root).to_vec();
        for (i, &child) in children.iter().enumerate() {
            let y = if i % 2 == 0 { 0.0 } else { 10.0 };
            tree.get_mut(child).item.bounds = Rect::new(i as f64 * 10.0, y, 2.0, 2.0);
        }

        let root = tree.root;
        let score = readability(&mut tree, root);
        assert!((score - 0.1).abs() < 1e-12, "eighteen turns over twenty items");
    }

    #[test]
    fn readability_ignores_sub_tolerance_wobble() {
        let mut tree = flat_tree(&[1.0, 1.0, 1.0]);
        let children = tree.children(tree.root).to_vec();
        tree.get_mut(children[0]).item.bounds = Rect::new(0.0, 0.0, 2.0, 2.0);
        tree.get_mut(children[1]).item.bounds = Rect::new(10.0, 0.0, 2.0, 2.0);
        tree.get_mut(children[2]).item.bounds = Rect::new(20.0, 0.5, 2.0, 2.0);

        let root = tree.root;
        assert_eq!(readability(&mut tree, root), 1.0);
    }

    #[test]
    fn readability_of_a_bare_root_defaults_to_one() {
        let mut tree = build_tree(&WeightSource::leaf("only", 5.0));
        let root = tree.root;
        assert_eq!(readability(&mut tree, root), 1.0);
    }

    #[test]
    fn stability_requires_matching_lengths() {
        let before = LayoutSnapshot {
            rects: vec![Rect::ZERO; 3],
        };
        let after = LayoutSnapshot {
            rects: vec![Rect::ZERO; 2],
        };
        let err = stability(&before, &after).unwrap_err();
        assert_eq!(
            err,
            LayoutError::SnapshotMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn stability_is_zero_for_identical_layouts() {
        let mut tree = flat_tree(&[1.0, 2.0, 3.0]);
        let strategy = SliceAndDice::default();
        tree.layout(&strategy, tree.root, Rect::new(0.0, 0.0, 100.0, 100.0));

        let a = LayoutSnapshot::capture(&tree, tree.root);
        let b = LayoutSnapshot::capture(&tree, tree.root);
        assert_eq!(stability(&a, &b), Ok(0.0));
    }

    #[test]
    fn stability_averages_rect_distances() {
        let before = LayoutSnapshot {
            rects: vec![Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(5.0, 5.0, 1.0, 1.0)],
        };
        let after = LayoutSnapshot {
            rects: vec![Rect::new(3.0, 4.0, 10.0, 10.0), Rect::new(5.0, 5.0, 1.0, 1.0)],
        };
        assert_eq!(stability(&before, &after), Ok(2.5));
    }
}
