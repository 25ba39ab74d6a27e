//! The renderer seam.
//!
//! Windowing, projection math, and rasterization live outside the core;
//! the core only hands positions and radii across this trait. Any backend
//! that can project a world point to screen coordinates and fill a circle
//! can display the simulation.

use crate::simulation::vectors::NVec3;
use crate::simulation::world::BodySnapshot;

/// The two services the core consumes from a rendering backend.
pub trait Surface {
    /// Project a world-space point to screen coordinates.
    fn project(&self, world: NVec3) -> (f64, f64);

    /// Fill a circle at screen coordinates `center` with the given
    /// world-derived radius.
    fn fill_circle(&mut self, center: (f64, f64), radius: f64);
}

/// Draw one frame: trail points first (so bodies paint over their own
/// trails), then every body as a filled circle of its mass-derived radius.
pub fn draw_bodies(bodies: &[BodySnapshot], surface: &mut impl Surface) {
    for body in bodies {
        for &point in &body.trail {
            let center = surface.project(point);
            surface.fill_circle(center, 1.0);
        }
    }

    for body in bodies {
        let center = surface.project(body.position);
        surface.fill_circle(center, body.radius);
    }
}
