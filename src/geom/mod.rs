//! Axis-aligned rectangle and circle value types shared by every layout.

/// Central numeric tolerance for geometric predicates.
///
/// Circle intersection and containment absorb floating-point jitter up to
/// this amount so that tangent circles produced by the packer do not read
/// back as overlapping. Packing callers can override it via
/// [`PackConfig`](crate::pack::PackConfig).
pub const TOLERANCE: f64 = 1e-6;

/// An axis-aligned rectangle: origin at (`x`, `y`), extent (`w`, `h`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// The degenerate rectangle at the origin.
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 0.0,
        h: 0.0,
    };

    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Aspect ratio as `max(w/h, h/w)`: always >= 1 and symmetric in
    /// orientation. A degenerate rectangle (either side <= 0) reports 0
    /// so metric averages stay finite.
    pub fn aspect_ratio(&self) -> f64 {
        if self.w <= 0.0 || self.h <= 0.0 {
            return 0.0;
        }
        (self.w / self.h).max(self.h / self.w)
    }

    /// Euclidean distance over the `(x, y, w, h)` 4-tuple.
    ///
    /// A cheap "how much did this rectangle move or resize" signal used by
    /// the stability metric, not a true shape metric.
    pub fn distance(&self, other: &Rect) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dw = self.w - other.w;
        let dh = self.h - other.h;
        (dx * dx + dy * dy + dw * dw + dh * dh).sqrt()
    }

    /// Center point.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// A circle: center (`x`, `y`), radius `r`.
///
/// In the circular layout, centers are stored relative to the parent's
/// center; the radius is always absolute.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    /// The degenerate circle at the origin.
    pub const ZERO: Circle = Circle {
        x: 0.0,
        y: 0.0,
        r: 0.0,
    };

    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.r * self.r
    }

    pub(crate) fn center_distance(&self, other: &Circle) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether the two circles overlap by more than [`TOLERANCE`].
    /// Tangent circles do not intersect.
    pub fn intersects(&self, other: &Circle) -> bool {
        self.center_distance(other) < self.r + other.r - TOLERANCE
    }

    /// Whether `other` lies entirely inside this circle, allowing
    /// [`TOLERANCE`] of slack.
    pub fn contains(&self, other: &Circle) -> bool {
        self.contains_with(other, TOLERANCE)
    }

    /// Containment with an explicit tolerance `error`.
    pub fn contains_with(&self, other: &Circle, error: f64) -> bool {
        self.center_distance(other) + other.r <= self.r + error
    }

    /// Distance from this circle's edge to the other circle's center.
    ///
    /// Negative when the other center lies inside this circle. The packing
    /// frontier compares this against a candidate's radius to test
    /// placements.
    pub fn intersection_radius(&self, other: &Circle) -> f64 {
        self.center_distance(other) - self.r
    }
}
