use crate::geom::Rect;
use crate::tree::arena::WeightedItem;

use super::{total_size, LayoutStrategy};

/// Which way the slicing cursor runs.
///
/// `Horizontal` places items left to right (full-height columns),
/// `Vertical` top to bottom (full-width rows). `Alternate` derives the
/// axis from the items' depth so successive tree levels flip
/// orientation; `Best` follows the bound's longer side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceAxis {
    Horizontal,
    Vertical,
    Alternate,
    Best,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceDirection {
    /// Lay items from the bound's origin forward.
    Ascending,
    /// Lay items from the far edge backward.
    Descending,
}

/// Proportional single-axis subdivision, the simplest treemap.
///
/// Siblings keep their order along the chosen axis, which makes the
/// result easy to read but prone to long slivers when weights are
/// skewed.
#[derive(Debug, Clone, Copy)]
pub struct SliceAndDice {
    pub axis: SliceAxis,
    pub direction: SliceDirection,
}

impl SliceAndDice {
    pub fn new(axis: SliceAxis, direction: SliceDirection) -> Self {
        SliceAndDice { axis, direction }
    }
}

impl Default for SliceAndDice {
    fn default() -> Self {
        SliceAndDice::new(SliceAxis::Alternate, SliceDirection::Ascending)
    }
}

impl LayoutStrategy for SliceAndDice {
    fn assign(&self, items: &mut [WeightedItem], bounds: Rect) {
        if items.is_empty() {
            return;
        }
        let total = total_size(items);
        if total <= 0.0 {
            tracing::debug!(
                "slice-and-dice over {} items with zero total weight, leaving bounds untouched",
                items.len()
            );
            return;
        }

        let horizontal = match self.axis {
            SliceAxis::Horizontal => true,
            SliceAxis::Vertical => false,
            // Items of one group share a depth; even levels slice
            // horizontally.
            SliceAxis::Alternate => items[0].depth % 2 == 0,
            SliceAxis::Best => bounds.w > bounds.h,
        };
        slice_items(
            items,
            bounds,
            horizontal,
            self.direction == SliceDirection::Ascending,
        );
    }
}

/// One proportional pass over `items` along a fixed axis.
///
/// A zero total assigns every item a zero-area rectangle anchored at the
/// strip's edge instead of dividing by zero; callers that want the
/// untouched-bounds contract check the total before calling.
pub(crate) fn slice_items(
    items: &mut [WeightedItem],
    bounds: Rect,
    horizontal: bool,
    ascending: bool,
) {
    let total = total_size(items);
    let mut a = 0.0;
    for item in items.iter_mut() {
        let b = if total > 0.0 { item.size / total } else { 0.0 };
        item.bounds = if horizontal {
            let x = if ascending {
                bounds.x + bounds.w * a
            } else {
                bounds.x + bounds.w * (1.0 - a - b)
            };
            Rect::new(x, bounds.y, bounds.w * b, bounds.h)
        } else {
            let y = if ascending {
                bounds.y + bounds.h * a
            } else {
                bounds.y + bounds.h * (1.0 - a - b)
            };
            Rect::new(bounds.x, y, bounds.w, bounds.h * b)
        };
        a += b;
    }
}

/// Slice along whichever axis runs with the bound's longer side; a
/// square bound slices vertically.
pub(crate) fn slice_best(items: &mut [WeightedItem], bounds: Rect, ascending: bool) {
    slice_items(items, bounds, bounds.w > bounds.h, ascending);
}
