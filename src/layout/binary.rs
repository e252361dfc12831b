use crate::geom::Rect;
use crate::tree::arena::WeightedItem;

use super::{total_size, LayoutStrategy};

/// Recursive bisection treemap.
///
/// Splits the item range at its index midpoint, divides the bound by the
/// first half's weight fraction along the current orientation, and
/// recurses into both halves with the orientation flipped. Positions
/// barely move when a single weight changes slightly, which is the
/// point; the price is poor aspect ratios on skewed weight
/// distributions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryTreeLayout;

impl LayoutStrategy for BinaryTreeLayout {
    fn assign(&self, items: &mut [WeightedItem], bounds: Rect) {
        if items.is_empty() {
            return;
        }
        if total_size(items) <= 0.0 {
            tracing::debug!(
                "binary-tree layout over {} items with zero total weight, leaving bounds untouched",
                items.len()
            );
            return;
        }
        bisect(items, bounds, bounds.w >= bounds.h);
    }
}

fn bisect(items: &mut [WeightedItem], bounds: Rect, horizontal: bool) {
    match items.len() {
        0 => return,
        1 => {
            items[0].bounds = bounds;
            return;
        }
        _ => {}
    }

    // Index midpoint, not the weight-balance point. Odd ranges put the
    // extra item in the first half.
    let k = (items.len() + 1) / 2;
    let (first, second) = items.split_at_mut(k);

    let front = total_size(first);
    let sum = front + total_size(second);
    let a = if sum > 0.0 { front / sum } else { 0.5 };

    let (head, tail) = if horizontal {
        (
            Rect::new(bounds.x, bounds.y, bounds.w * a, bounds.h),
            Rect::new(
                bounds.x + bounds.w * a,
                bounds.y,
                bounds.w * (1.0 - a),
                bounds.h,
            ),
        )
    } else {
        (
            Rect::new(bounds.x, bounds.y, bounds.w, bounds.h * a),
            Rect::new(
                bounds.x,
                bounds.y + bounds.h * a,
                bounds.w,
                bounds.h * (1.0 - a),
            ),
        )
    };

    bisect(first, head, !horizontal);
    bisect(second, tail, !horizontal);
}
