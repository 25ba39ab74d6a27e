//! Vector helpers shared by the whole engine.
//!
//! Everything is built on `nalgebra`'s `Vector3<f64>`, aliased as `NVec3`.
//! nalgebra already covers the arithmetic (add, sub, scale, dot, cross,
//! norms), so this module only adds the operations the simulator needs on
//! top of it:
//!
//! - rotation of a point about an arbitrary axis through an arbitrary base
//!   point (Rodrigues' formula),
//! - projection / rejection of one vector onto another,
//! - a unit vector that is safe on zero input.

use nalgebra::Vector3;

pub type NVec3 = Vector3<f64>;

/// Unit vector in the direction of `v`, or the zero vector when `v` is zero.
///
/// The zero case is deliberate: callers like the orbital-velocity builder
/// feed radial vectors that can degenerate to zero, and a zero direction
/// (no motion) is the wanted outcome there, not an error.
pub fn unit(v: NVec3) -> NVec3 {
    let n = v.norm();
    if n == 0.0 {
        NVec3::zeros()
    } else {
        v / n
    }
}

/// Component of `a` parallel to `b`: `b · (a·b / |b|²)`.
///
/// Returns zero when `b` is the zero vector.
pub fn projection(a: NVec3, b: NVec3) -> NVec3 {
    let b2 = b.norm_squared();
    if b2 == 0.0 {
        NVec3::zeros()
    } else {
        b * (a.dot(&b) / b2)
    }
}

/// Component of `a` orthogonal to `b`: `a − projection(a, b)`.
pub fn rejection(a: NVec3, b: NVec3) -> NVec3 {
    a - projection(a, b)
}

/// Rotate `point` by `angle` radians about the line through `base` with
/// direction `axis`, using Rodrigues' rotation formula.
///
/// The axis does not need to be normalized. A zero axis leaves the point
/// unchanged (the rotation is undefined, identity is the safe reading).
pub fn rotate_about(point: NVec3, base: NVec3, axis: NVec3, angle: f64) -> NVec3 {
    let u = unit(axis);
    if u == NVec3::zeros() {
        return point;
    }

    // Work relative to the base point so the axis passes through the origin
    let p = point - base;

    let (sin, cos) = angle.sin_cos();

    // p' = p cosθ + (u × p) sinθ + u (u · p)(1 − cosθ)
    let rotated = p * cos + u.cross(&p) * sin + u * (u.dot(&p) * (1.0 - cos));

    rotated + base
}
