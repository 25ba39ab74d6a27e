//! Direct Newtonian gravity, the `O(N²)` reference
//!
//! The tree in [`crate::simulation::octree`] is the production path; this
//! pairwise sum exists to validate it (the tree must converge to this as
//! θ → 0) and to anchor the benchmarks.

use crate::simulation::vectors::NVec3;

/// Accelerations on every body from every other body, by direct pairwise
/// summation with softening length `epsilon`.
///
/// `out[i]` is the net acceleration on `bodies[i]`. Each unordered pair is
/// visited once and applied to both sides with opposite signs, so the
/// summation conserves momentum to rounding.
pub fn direct_accelerations(bodies: &[(NVec3, f64)], g: f64, epsilon: f64) -> Vec<NVec3> {
    let n = bodies.len();
    let mut out = vec![NVec3::zeros(); n];
    let eps2 = epsilon * epsilon;

    for i in 0..n {
        let (xi, mi) = bodies[i];
        for j in (i + 1)..n {
            let (xj, mj) = bodies[j];

            let r = xj - xi;
            let d2 = r.dot(&r) + eps2;
            let inv_r = d2.sqrt().recip();
            let inv_r3 = inv_r * inv_r * inv_r;
            let coef = g * inv_r3;

            // Equal and opposite: i is pulled along +r, j along -r.
            out[i] += coef * mj * r;
            out[j] -= coef * mi * r;
        }
    }

    out
}
