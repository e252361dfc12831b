pub mod binary;
pub mod pivot;
pub mod slice;
pub mod squarify;

pub use binary::BinaryTreeLayout;
pub use pivot::{OrderedPivotLayout, PivotPolicy};
pub use slice::{SliceAndDice, SliceAxis, SliceDirection};
pub use squarify::SquarifiedLayout;

use crate::geom::Rect;
use crate::tree::arena::WeightedItem;

/// A rectangular subdivision strategy.
///
/// `assign` partitions `bounds` across `items` in place: afterwards the
/// assigned rectangles tile `bounds` with no gaps or overlaps, and each
/// item's area is `bounds.area() * item.size / total`. Implementations
/// never reorder the slice; `items[i]` keeps describing the same child
/// before and after the call.
///
/// Degenerate inputs are not errors: an empty slice is a no-op, a single
/// item receives the whole bound, a zero-size item gets a zero-area
/// rectangle in its sequence position, and a zero total weight leaves
/// every item's bounds untouched.
pub trait LayoutStrategy {
    fn assign(&self, items: &mut [WeightedItem], bounds: Rect);
}

pub(crate) fn total_size(items: &[WeightedItem]) -> f64 {
    items.iter().map(|item| item.size).sum()
}
