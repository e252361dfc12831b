use crate::geom::Rect;
use crate::tree::arena::WeightedItem;

use super::slice::slice_best;
use super::{total_size, LayoutStrategy};

/// Squarified treemap, after Bruls, Huizing and van Wijk.
///
/// Items are considered in descending weight order and greedily grouped
/// into rows: the next item joins the current row as long as it does not
/// worsen the row's normalized aspect ratio, otherwise the row is closed
/// and laid out as a strip against the shorter side of the remaining
/// bound. Caller-visible order is untouched; the weight sort happens on
/// a scratch copy and results are written back through the sort
/// permutation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquarifiedLayout;

impl LayoutStrategy for SquarifiedLayout {
    fn assign(&self, items: &mut [WeightedItem], bounds: Rect) {
        if items.is_empty() {
            return;
        }
        if total_size(items) <= 0.0 {
            tracing::debug!(
                "squarified layout over {} items with zero total weight, leaving bounds untouched",
                items.len()
            );
            return;
        }

        // Stable descending weight sort on a permutation; caller order
        // must survive the call.
        let mut perm: Vec<usize> = (0..items.len()).collect();
        perm.sort_by(|&i, &j| items[j].size.total_cmp(&items[i].size));

        let mut scratch: Vec<WeightedItem> = perm.iter().map(|&i| items[i]).collect();
        layout_range(&mut scratch, bounds);

        for (pos, &slot) in perm.iter().enumerate() {
            items[slot].bounds = scratch[pos].bounds;
        }
    }
}

fn layout_range(items: &mut [WeightedItem], bounds: Rect) {
    let n = items.len();
    if n == 0 {
        return;
    }
    if n <= 2 || bounds.w <= 0.0 || bounds.h <= 0.0 {
        slice_best(items, bounds, true);
        return;
    }
    let total = total_size(items);
    if total <= 0.0 {
        slice_best(items, bounds, true);
        return;
    }

    // `a` is the row's first (largest) fraction and stays fixed while
    // the cumulative fraction `b` grows.
    let a = items[0].size / total;
    let mut b = a;
    let mut mid = 0usize;

    if bounds.w < bounds.h {
        while mid + 1 < n {
            let q = items[mid + 1].size / total;
            // Reject the next item as soon as it worsens the row's
            // normalized aspect.
            if norm_aspect(bounds.h, bounds.w, a, b + q) > norm_aspect(bounds.h, bounds.w, a, b) {
                break;
            }
            mid += 1;
            b += q;
        }
        let (row, rest) = items.split_at_mut(mid + 1);
        slice_best(row, Rect::new(bounds.x, bounds.y, bounds.w, bounds.h * b), true);
        layout_range(
            rest,
            Rect::new(
                bounds.x,
                bounds.y + bounds.h * b,
                bounds.w,
                bounds.h * (1.0 - b),
            ),
        );
    } else {
        while mid + 1 < n {
            let q = items[mid + 1].size / total;
            if norm_aspect(bounds.w, bounds.h, a, b + q) > norm_aspect(bounds.w, bounds.h, a, b) {
                break;
            }
            mid += 1;
            b += q;
        }
        let (row, rest) = items.split_at_mut(mid + 1);
        slice_best(row, Rect::new(bounds.x, bounds.y, bounds.w * b, bounds.h), true);
        layout_range(
            rest,
            Rect::new(
                bounds.x + bounds.w * b,
                bounds.y,
                bounds.w * (1.0 - b),
                bounds.h,
            ),
        );
    }
}

/// Worst aspect ratio of a row whose first item holds fraction `a` and
/// whose items sum to fraction `b`, folded to be >= 1.
fn norm_aspect(big: f64, small: f64, a: f64, b: f64) -> f64 {
    let x = (big * b * b) / (small * a);
    if x < 1.0 {
        1.0 / x
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(sizes: &[f64]) -> Vec<WeightedItem> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| WeightedItem {
                size,
                order: i as u32,
                depth: 1,
                bounds: Rect::ZERO,
            })
            .collect()
    }

    fn covered(items: &[WeightedItem]) -> f64 {
        items.iter().map(|it| it.bounds.area()).sum()
    }

    #[test]
    fn single_item_fills_viewport_without_axis_swap() {
        let mut items = items(&[1920.0 * 1080.0]);
        SquarifiedLayout.assign(&mut items, Rect::new(0.0, 0.0, 1920.0, 1080.0));

        let r = items[0].bounds;
        assert!((r.w - 1920.0).abs() < 1e-6);
        assert!((r.h - 1080.0).abs() < 1e-6);
    }

    #[test]
    fn layout_preserves_area_for_simple_case() {
        let mut items = items(&[400.0, 300.0, 200.0, 100.0]);
        let bounds = Rect::new(0.0, 0.0, 50.0, 20.0);
        SquarifiedLayout.assign(&mut items, bounds);
        assert!((covered(&items) - bounds.area()).abs() < 1e-6);
    }

    #[test]
    fn four_equal_items_in_a_square_make_quadrants() {
        let mut items = items(&[10.0, 10.0, 10.0, 10.0]);
        SquarifiedLayout.assign(&mut items, Rect::new(0.0, 0.0, 100.0, 100.0));

        assert_eq!(items[0].bounds, Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(items[1].bounds, Rect::new(0.0, 50.0, 50.0, 50.0));
        assert_eq!(items[2].bounds, Rect::new(50.0, 0.0, 50.0, 50.0));
        assert_eq!(items[3].bounds, Rect::new(50.0, 50.0, 50.0, 50.0));
    }

    #[test]
    fn caller_order_survives_weight_sorting() {
        let mut items = items(&[10.0, 80.0, 10.0]);
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        SquarifiedLayout.assign(&mut items, bounds);

        assert!((items[0].bounds.area() - 1000.0).abs() < 1e-6);
        assert!((items[1].bounds.area() - 8000.0).abs() < 1e-6);
        assert!((items[2].bounds.area() - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn aspect_stays_low_on_mixed_weights() {
        let mut items = items(&[50.0, 30.0, 20.0]);
        SquarifiedLayout.assign(&mut items, Rect::new(0.0, 0.0, 200.0, 100.0));

        let worst = items
            .iter()
            .map(|it| it.bounds.aspect_ratio())
            .fold(0.0, f64::max);
        assert!(worst <= 2.5 + 1e-9, "worst aspect was {worst}");
        assert!((covered(&items) - 20_000.0).abs() < 1e-6);
    }

    #[test]
    fn zero_size_item_among_positive_ones_degenerates() {
        let mut items = items(&[4.0, 0.0, 4.0]);
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        SquarifiedLayout.assign(&mut items, bounds);

        assert_eq!(items[1].bounds.area(), 0.0);
        assert!((covered(&items) - bounds.area()).abs() < 1e-6);
        for item in &items {
            assert!(item.bounds.area().is_finite());
        }
    }

    #[test]
    fn zero_total_leaves_bounds_untouched() {
        let mut items = items(&[0.0, 0.0, 0.0]);
        SquarifiedLayout.assign(&mut items, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(items.iter().all(|it| it.bounds == Rect::ZERO));
    }
}
