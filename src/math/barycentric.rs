use super::{Point3, Vector3, TOLERANCE};

/// Barycentric weights of the orthogonal projection of `p` onto the plane of
/// triangle `(a, b, c)`.
///
/// The returned `(wa, wb, wc)` sum to one and `wa * a + wb * b + wc * c` is the
/// projected point. Solves the 2x2 normal equations built from dot products of
/// `p - a` against the edges `b - a` and `c - a`, so no explicit projection is
/// needed.
///
/// The triangle must have non-zero area; walk surfaces reject degenerate
/// triangles at construction.
#[must_use]
pub fn barycentric_weights(a: &Point3, b: &Point3, c: &Point3, p: &Point3) -> Vector3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d_bb = ab.dot(&ab);
    let d_bc = ab.dot(&ac);
    let d_cc = ac.dot(&ac);
    let d_pb = ap.dot(&ab);
    let d_pc = ap.dot(&ac);

    let denom = d_bb * d_cc - d_bc * d_bc;
    debug_assert!(denom.abs() > TOLERANCE * TOLERANCE, "degenerate triangle");

    let wb = (d_cc * d_pb - d_bc * d_pc) / denom;
    let wc = (d_bb * d_pc - d_bc * d_pb) / denom;
    Vector3::new(1.0 - wb - wc, wb, wc)
}

/// Closest point to `p` on the segment `a`-`b`.
///
/// Returns the point and its parameter along the segment, clamped to `[0, 1]`
/// (0 at `a`, 1 at `b`).
#[must_use]
pub fn closest_point_on_segment(a: &Point3, b: &Point3, p: &Point3) -> (Point3, f64) {
    let ab = b - a;
    let len2 = ab.dot(&ab);
    if len2 < TOLERANCE {
        return (*a, 0.0);
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (a + ab * t, t)
}
