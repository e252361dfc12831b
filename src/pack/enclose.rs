use crate::geom::Circle;

// Slack added to the enclosing test so circles produced by the packer,
// tangent up to rounding, still count as enclosed.
const BASIS_SLACK: f64 = 1e-9;

/// Minimal circle enclosing every input circle.
///
/// Moving-basis scan: walk the list and, whenever a circle falls outside
/// the current candidate, rebuild the candidate from an extended basis
/// of at most three circles and restart the walk. Deterministic for a
/// given input order. Empty input has no enclosing circle.
pub fn enclose(circles: &[Circle]) -> Option<Circle> {
    let mut basis: Vec<Circle> = Vec::new();
    let mut current: Option<Circle> = None;
    let mut i = 0;
    while i < circles.len() {
        let p = circles[i];
        match current {
            Some(e) if encloses_weak(&e, &p) => i += 1,
            _ => {
                basis = extend_basis(&basis, p);
                current = Some(enclose_basis(&basis));
                i = 0;
            }
        }
    }
    current
}

fn extend_basis(basis: &[Circle], p: Circle) -> Vec<Circle> {
    if encloses_weak_all(&p, basis) {
        return vec![p];
    }

    // Some basis circle together with p determines the new enclosure.
    for &a in basis {
        if encloses_not(&p, &a) && encloses_weak_all(&enclose_basis2(&a, &p), basis) {
            return vec![a, p];
        }
    }

    // Otherwise two of them do.
    for i in 0..basis.len() {
        for j in (i + 1)..basis.len() {
            let (a, b) = (basis[i], basis[j]);
            if encloses_not(&enclose_basis2(&a, &b), &p)
                && encloses_not(&enclose_basis2(&a, &p), &b)
                && encloses_not(&enclose_basis2(&b, &p), &a)
                && encloses_weak_all(&enclose_basis3(&a, &b, &p), basis)
            {
                return vec![a, b, p];
            }
        }
    }

    // A basis never exceeds three circles, so one of the cases above
    // must have matched.
    unreachable!("enclosing basis cannot be extended");
}

fn encloses_not(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

fn encloses_weak(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * BASIS_SLACK;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: &Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match basis {
        [a] => *a,
        [a, b] => enclose_basis2(a, b),
        [a, b, c] => enclose_basis3(a, b, c),
        _ => unreachable!("basis holds one to three circles"),
    }
}

fn enclose_basis2(a: &Circle, b: &Circle) -> Circle {
    let x21 = b.x - a.x;
    let y21 = b.y - a.y;
    let r21 = b.r - a.r;
    let l = (x21 * x21 + y21 * y21).sqrt();
    Circle::new(
        (a.x + b.x + x21 / l * r21) / 2.0,
        (a.y + b.y + y21 / l * r21) / 2.0,
        (l + a.r + b.r) / 2.0,
    )
}

fn enclose_basis3(a: &Circle, b: &Circle, c: &Circle) -> Circle {
    let a2 = a.x - b.x;
    let a3 = a.x - c.x;
    let b2 = a.y - b.y;
    let b3 = a.y - c.y;
    let c2 = b.r - a.r;
    let c3 = c.r - a.r;
    let d1 = a.x * a.x + a.y * a.y - a.r * a.r;
    let d2 = d1 - b.x * b.x - b.y * b.y + b.r * b.r;
    let d3 = d1 - c.x * c.x - c.y * c.y + c.r * c.r;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - a.x;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - a.y;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (a.r + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - a.r * a.r;
    let r = if qa.abs() > 1e-6 {
        -(qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        -qc / qb
    };
    Circle::new(a.x + xa + xb * r, a.y + ya + yb * r, r)
}
