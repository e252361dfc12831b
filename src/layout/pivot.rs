use crate::geom::Rect;
use crate::tree::arena::WeightedItem;

use super::slice::slice_best;
use super::{total_size, LayoutStrategy};

/// How the pivot item is chosen from a sibling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotPolicy {
    /// The item at the middle index. Favors stability.
    Middle,
    /// The heaviest item (first one on ties). Favors aspect ratio.
    Largest,
}

/// Ordered treemap, after Shneiderman and Wattenberg.
///
/// Partitions the bound into four regions around a pivot item: the items
/// before the pivot fill a leading strip, the pivot shares a middle
/// strip with the items up to a chosen split point (pivot cell first,
/// the rest behind it), and the remaining items fill the trailing strip.
/// The split point is the one that brings the pivot cell's aspect ratio
/// closest to square. Unlike the squarified strategy, sibling order is
/// never perturbed: earlier items always end up left of or above later
/// ones.
#[derive(Debug, Clone, Copy)]
pub struct OrderedPivotLayout {
    pub policy: PivotPolicy,
}

impl OrderedPivotLayout {
    pub fn new(policy: PivotPolicy) -> Self {
        OrderedPivotLayout { policy }
    }
}

impl Default for OrderedPivotLayout {
    fn default() -> Self {
        OrderedPivotLayout::new(PivotPolicy::Middle)
    }
}

impl LayoutStrategy for OrderedPivotLayout {
    fn assign(&self, items: &mut [WeightedItem], bounds: Rect) {
        if items.is_empty() {
            return;
        }
        if total_size(items) <= 0.0 {
            tracing::debug!(
                "pivot layout over {} items with zero total weight, leaving bounds untouched",
                items.len()
            );
            return;
        }
        pivot_layout(items, bounds, self.policy);
    }
}

fn pivot_layout(items: &mut [WeightedItem], bounds: Rect, policy: PivotPolicy) {
    let n = items.len();
    if n == 0 {
        return;
    }
    if n <= 2 {
        slice_best(items, bounds, true);
        return;
    }
    let total = total_size(items);
    if total <= 0.0 || bounds.w <= 0.0 || bounds.h <= 0.0 {
        slice_best(items, bounds, true);
        return;
    }

    let p = match policy {
        PivotPolicy::Middle => n / 2,
        PivotPolicy::Largest => {
            let mut p = 0;
            for (i, item) in items.iter().enumerate() {
                if item.size > items[p].size {
                    p = i;
                }
            }
            p
        }
    };

    let lead = total_size(&items[..p]);
    let pivot_size = items[p].size;
    let wide = bounds.w >= bounds.h;
    let (long, short) = if wide {
        (bounds.w, bounds.h)
    } else {
        (bounds.h, bounds.w)
    };

    // Scan every split point k. The run between pivot and k shares the
    // middle strip with the pivot cell; keep the k whose pivot cell is
    // closest to square.
    let mut best_k = p + 1;
    let mut best_aspect = f64::INFINITY;
    let mut l2_size = 0.0;
    let mut running = 0.0;
    for k in (p + 1)..=n {
        let column = pivot_size + running;
        let cell_long = long * column / total;
        let cell_short = if column > 0.0 {
            short * pivot_size / column
        } else {
            0.0
        };
        let aspect = cell_aspect(cell_long, cell_short);
        if aspect < best_aspect {
            best_aspect = aspect;
            best_k = k;
            l2_size = running;
        }
        if k < n {
            running += items[k].size;
        }
    }

    let lead_frac = lead / total;
    let column = pivot_size + l2_size;
    let column_frac = column / total;
    let pivot_frac = if column > 0.0 { pivot_size / column } else { 0.0 };

    let (r1, rp, r2, r3) = if wide {
        let w1 = bounds.w * lead_frac;
        let wp = bounds.w * column_frac;
        let hp = bounds.h * pivot_frac;
        (
            Rect::new(bounds.x, bounds.y, w1, bounds.h),
            Rect::new(bounds.x + w1, bounds.y, wp, hp),
            Rect::new(bounds.x + w1, bounds.y + hp, wp, bounds.h - hp),
            Rect::new(
                bounds.x + w1 + wp,
                bounds.y,
                bounds.w - w1 - wp,
                bounds.h,
            ),
        )
    } else {
        let h1 = bounds.h * lead_frac;
        let hp = bounds.h * column_frac;
        let wp = bounds.w * pivot_frac;
        (
            Rect::new(bounds.x, bounds.y, bounds.w, h1),
            Rect::new(bounds.x, bounds.y + h1, wp, hp),
            Rect::new(bounds.x + wp, bounds.y + h1, bounds.w - wp, hp),
            Rect::new(
                bounds.x,
                bounds.y + h1 + hp,
                bounds.w,
                bounds.h - h1 - hp,
            ),
        )
    };

    let (lead_items, rest) = items.split_at_mut(p);
    let (pivot_item, rest) = rest.split_at_mut(1);
    let (l2_items, l3_items) = rest.split_at_mut(best_k - p - 1);

    pivot_item[0].bounds = rp;
    pivot_layout(lead_items, r1, policy);
    pivot_layout(l2_items, r2, policy);
    pivot_layout(l3_items, r3, policy);
}

fn cell_aspect(a: f64, b: f64) -> f64 {
    if a <= 0.0 || b <= 0.0 {
        f64::INFINITY
    } else {
        (a / b).max(b / a)
    }
}
