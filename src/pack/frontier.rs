use crate::geom::Circle;

/// Place sibling circles of the given radii around the origin so that no
/// two overlap (within `tolerance`), returning their centers in input
/// order.
///
/// Greedy frontier packing: the first circle sits at the origin, the
/// second tangent to it, and every later circle tries the tangent
/// positions against each pair of already placed circles, keeping the
/// collision-free candidate closest to the origin. The result is compact
/// rather than optimal, which is all the enclosing step needs.
pub(crate) fn pack_siblings(radii: &[f64], tolerance: f64) -> Vec<(f64, f64)> {
    let mut placed: Vec<Circle> = Vec::with_capacity(radii.len());
    for (i, &r) in radii.iter().enumerate() {
        let (x, y) = match i {
            0 => (0.0, 0.0),
            1 => (radii[0] + r, 0.0),
            _ => best_position(&placed, r, tolerance),
        };
        placed.push(Circle::new(x, y, r));
    }
    placed.iter().map(|c| (c.x, c.y)).collect()
}

fn best_position(placed: &[Circle], r: f64, tolerance: f64) -> (f64, f64) {
    let mut best: Option<(f64, (f64, f64))> = None;
    for i in 0..placed.len() {
        for j in (i + 1)..placed.len() {
            for candidate in tangent_points(&placed[i], &placed[j], r) {
                if overlaps_any(placed, candidate, r, tolerance) {
                    continue;
                }
                let score = (candidate.0 * candidate.0 + candidate.1 * candidate.1).sqrt();
                if best.map_or(true, |(s, _)| score < s) {
                    best = Some((score, candidate));
                }
            }
        }
    }
    match best {
        Some((_, position)) => position,
        None => fallback_position(placed, r),
    }
}

/// Centers where a circle of radius `r` touches both `a` and `b` from
/// the outside: the intersection of the two circles grown by `r`. Zero,
/// one or two points.
fn tangent_points(a: &Circle, b: &Circle, r: f64) -> Vec<(f64, f64)> {
    let ra = a.r + r;
    let rb = b.r + r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d = (dx * dx + dy * dy).sqrt();
    if d <= 0.0 || d > ra + rb || d < (ra - rb).abs() {
        return Vec::new();
    }

    let along = (d * d + ra * ra - rb * rb) / (2.0 * d);
    let off_sq = ra * ra - along * along;
    let ux = dx / d;
    let uy = dy / d;
    let mx = a.x + along * ux;
    let my = a.y + along * uy;
    if off_sq <= 0.0 {
        return vec![(mx, my)];
    }

    let off = off_sq.sqrt();
    vec![(mx - off * uy, my + off * ux), (mx + off * uy, my - off * ux)]
}

fn overlaps_any(placed: &[Circle], candidate: (f64, f64), r: f64, tolerance: f64) -> bool {
    let trial = Circle::new(candidate.0, candidate.1, r);
    placed
        .iter()
        .any(|c| c.intersection_radius(&trial) < r - tolerance)
}

/// Position on the ray through the farthest-reaching placed circle, just
/// beyond the whole pack's reach. Clears every placed circle by
/// construction, so placement always makes progress even when no tangent
/// candidate survives the overlap filter.
fn fallback_position(placed: &[Circle], r: f64) -> (f64, f64) {
    let mut reach = f64::NEG_INFINITY;
    let mut anchor = Circle::ZERO;
    for &c in placed {
        let dist = (c.x * c.x + c.y * c.y).sqrt();
        if dist + c.r > reach {
            reach = dist + c.r;
            anchor = c;
        }
    }

    let dist = (anchor.x * anchor.x + anchor.y * anchor.y).sqrt();
    if dist <= 0.0 {
        return (reach + r, 0.0);
    }
    let scale = (reach + r) / dist;
    (anchor.x * scale, anchor.y * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::TOLERANCE;

    fn assert_disjoint(radii: &[f64], centers: &[(f64, f64)]) {
        for i in 0..radii.len() {
            for j in (i + 1)..radii.len() {
                let dx = centers[i].0 - centers[j].0;
                let dy = centers[i].1 - centers[j].1;
                let d = (dx * dx + dy * dy).sqrt();
                assert!(
                    d >= radii[i] + radii[j] - TOLERANCE,
                    "circles {i} and {j} overlap: d={d}, radii {} and {}",
                    radii[i],
                    radii[j]
                );
            }
        }
    }

    #[test]
    fn single_circle_sits_at_the_origin() {
        assert_eq!(pack_siblings(&[2.0], TOLERANCE), vec![(0.0, 0.0)]);
    }

    #[test]
    fn two_circles_touch_on_the_x_axis() {
        let centers = pack_siblings(&[1.0, 1.0], TOLERANCE);
        assert_eq!(centers, vec![(0.0, 0.0), (2.0, 0.0)]);
    }

    #[test]
    fn third_equal_circle_nestles_between_the_first_two() {
        let radii = [1.0, 1.0, 1.0];
        let centers = pack_siblings(&radii, TOLERANCE);

        let (x, y) = centers[2];
        assert!((x - 1.0).abs() < 1e-9);
        assert!((y.abs() - 3.0_f64.sqrt()).abs() < 1e-9);
        assert_disjoint(&radii, &centers);
    }

    #[test]
    fn mixed_radii_remain_disjoint() {
        let radii = [3.0, 1.0, 1.0, 2.0, 0.5, 1.5, 2.5, 1.0];
        let centers = pack_siblings(&radii, TOLERANCE);
        assert_disjoint(&radii, &centers);
    }

    #[test]
    fn many_equal_circles_remain_disjoint_and_compact() {
        let radii = vec![1.0; 24];
        let centers = pack_siblings(&radii, TOLERANCE);
        assert_disjoint(&radii, &centers);

        // A compact pack of 24 unit circles stays well inside the
        // radius a straight line of them would need.
        let spread = centers
            .iter()
            .map(|(x, y)| (x * x + y * y).sqrt())
            .fold(0.0, f64::max);
        assert!(spread < 12.0, "pack spread {spread} is not compact");
    }

    #[test]
    fn zero_radius_entries_do_not_break_placement() {
        let radii = [1.0, 0.0, 1.0];
        let centers = pack_siblings(&radii, TOLERANCE);
        for (x, y) in &centers {
            assert!(x.is_finite() && y.is_finite());
        }
        assert_disjoint(&radii, &centers);
    }
}
