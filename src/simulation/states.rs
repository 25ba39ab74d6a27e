//! Core body state for the N-body simulation.
//!
//! A `Body` is a point mass with position, velocity, a pending
//! acceleration that the tree traversal fills in each tick, and an
//! optional bounded ring of recent positions for motion trails.
//!
//! The per-tick state advance lives here too ([`Body::update`]): a hard
//! speed clamp at the configured ceiling followed by a relativistic
//! velocity-composition step, so no acceleration can push a body past the
//! ceiling.

use std::collections::VecDeque;
use std::f64::consts::PI;

use crate::simulation::vectors::{self, NVec3};

/// How many recent positions the motion-trail ring keeps per body.
pub const TRAIL_CAPACITY: usize = 50;

/// A single point mass.
#[derive(Debug, Clone)]
pub struct Body {
    pub position: NVec3,
    pub velocity: NVec3,
    pub acceleration: NVec3, // pending, reset at the end of each update
    pub mass: f64,
    trail: VecDeque<NVec3>, // recent positions, newest at the back
}

impl Body {
    /// A body at rest at `position`.
    pub fn new(position: NVec3, mass: f64) -> Self {
        Self {
            position,
            velocity: NVec3::zeros(),
            acceleration: NVec3::zeros(),
            mass,
            trail: VecDeque::new(),
        }
    }

    /// A body with an initial velocity.
    pub fn with_velocity(position: NVec3, velocity: NVec3, mass: f64) -> Self {
        Self {
            position,
            velocity,
            acceleration: NVec3::zeros(),
            mass,
            trail: VecDeque::new(),
        }
    }

    /// Visual radius derived from mass: `10·(3m/4π)^(1/3) + 10`.
    ///
    /// The cube-root term treats mass as a volume at unit density; the
    /// scale and the additive floor keep small bodies visible on screen.
    pub fn radius(&self) -> f64 {
        10.0 * (3.0 * self.mass / (4.0 * PI)).cbrt() + 10.0
    }

    /// Recent positions, oldest first.
    pub fn trail(&self) -> impl Iterator<Item = &NVec3> {
        self.trail.iter()
    }

    /// Advance the body by one tick.
    ///
    /// In order:
    /// 1. record the current position into the trail ring (if enabled),
    /// 2. clamp the speed to the ceiling `c`,
    /// 3. fold the pending acceleration into the velocity — directly when
    ///    at rest, otherwise through relativistic velocity composition so
    ///    the result stays below `c`,
    /// 4. move by the new velocity (the tick is the time step),
    /// 5. reset the pending acceleration.
    pub fn update(&mut self, c: f64, trails: bool) {
        if trails {
            if self.trail.len() == TRAIL_CAPACITY {
                self.trail.pop_front();
            }
            self.trail.push_back(self.position);
        }

        let mut speed = self.velocity.norm();
        if speed > c {
            // Hard ceiling; the composition below keeps us under it from
            // here on, the clamp re-enforces it against rounding drift.
            self.velocity *= c / speed;
            speed = c;
        }

        if speed == 0.0 {
            self.velocity += self.acceleration;
        } else {
            // Split the acceleration along and across the velocity, scale
            // the orthogonal part by 1/γ, and divide by the composition
            // denominator 1 + v·a/c².
            let parallel = vectors::projection(self.acceleration, self.velocity);
            let orthogonal = self.acceleration - parallel;
            let alpha = (1.0 - (speed / c) * (speed / c)).sqrt();

            self.velocity = (self.velocity + parallel + alpha * orthogonal)
                / (1.0 + self.velocity.dot(&self.acceleration) / (c * c));
        }

        self.position += self.velocity;
        self.acceleration = NVec3::zeros();
    }

    /// Rotate the whole body state by `angle` about the line through
    /// `base` with direction `axis`.
    ///
    /// The position (and any trail points) rotate as points in space.
    /// Velocity and acceleration are directions from an origin, not
    /// points, so they are carried to the base point first, rotated
    /// there, and carried back — a pure rotation is linear, so this
    /// equals rotating the bare direction, but the translation pattern is
    /// the documented contract.
    pub fn rotate(&mut self, base: NVec3, axis: NVec3, angle: f64) {
        self.position = vectors::rotate_about(self.position, base, axis, angle);
        self.velocity = vectors::rotate_about(self.velocity + base, base, axis, angle) - base;
        self.acceleration =
            vectors::rotate_about(self.acceleration + base, base, axis, angle) - base;

        for p in self.trail.iter_mut() {
            *p = vectors::rotate_about(*p, base, axis, angle);
        }
    }
}
