//! Preset initial conditions
//!
//! Each preset fills the world's body slots with a physically plausible
//! starting configuration. Dispatch is a plain enum match; every variant
//! has its own generator function below.
//!
//! Conventions shared by the disk-like presets:
//! - y is "up"; disks spread in the x–z plane with a bounded y scatter.
//! - circular-orbit speed around a primary of mass `M` for an orbiter of
//!   mass `m` at distance `d` is `√(G·M² / ((M+m)·d))`, with direction
//!   `unit(r × ŷ)`. The formula reduces to the textbook `√(G·M/d)` only
//!   as `m → 0`; it is kept in this exact form everywhere so the presets
//!   stay mutually consistent.

use std::f64::consts::PI;

use rand::Rng;
use serde::Deserialize;

use crate::simulation::params::Settings;
use crate::simulation::random;
use crate::simulation::states::Body;
use crate::simulation::vectors::{self, NVec3};

/// The available presets.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemType {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "slow_particles")]
    SlowParticles,
    #[serde(rename = "fast_particles")]
    FastParticles,
    #[serde(rename = "massive_body")]
    MassiveBody,
    #[serde(rename = "orbital_system")]
    OrbitalSystem,
    #[serde(rename = "binary_system")]
    BinarySystem,
    #[serde(rename = "planetary_system")]
    PlanetarySystem,
    #[serde(rename = "distribution_test")]
    DistributionTest,
}

/// Mass of the central body in the single-primary presets.
const PRIMARY_MASS: f64 = 1e10;

/// Particle mass range shared by the cloud, disk, and belt fills.
const PARTICLE_MASS_LO: f64 = 3e4;
const PARTICLE_MASS_HI: f64 = 1e6 + 3e4;

/// Replace the contents of `slots` with the chosen preset.
///
/// Every slot is cleared first, so a generator atomically swaps the whole
/// system; the caller holds the body lock around this.
pub fn generate(
    kind: SystemType,
    slots: &mut [Option<Body>],
    rng: &mut impl Rng,
    settings: &Settings,
) {
    for slot in slots.iter_mut() {
        *slot = None;
    }

    let g = settings.gravity;
    match kind {
        SystemType::None => {}
        SystemType::SlowParticles => particle_cloud(slots, rng, 5.0),
        SystemType::FastParticles => particle_cloud(slots, rng, 5e3),
        SystemType::MassiveBody => massive_body(slots, rng, g),
        SystemType::OrbitalSystem => orbital_system(slots, rng, g),
        SystemType::BinarySystem => binary_system(slots, rng, g),
        SystemType::PlanetarySystem => planetary_system(slots, rng, g),
        SystemType::DistributionTest => distribution_test(slots),
    }
}

/// Circular-orbit speed around a primary of mass `primary` for an orbiter
/// of mass `orbiter` at distance `distance`: `√(G·M² / ((M+m)·d))`.
pub fn circular_speed(g: f64, primary: f64, orbiter: f64, distance: f64) -> f64 {
    (g * primary * primary / ((primary + orbiter) * distance)).sqrt()
}

/// Circular-orbit velocity for a body at `offset` from its primary:
/// speed from [`circular_speed`], direction `unit(offset × ŷ)`.
fn orbital_velocity(g: f64, primary: f64, orbiter: f64, offset: NVec3) -> NVec3 {
    let up = NVec3::new(0.0, 1.0, 0.0);
    let speed = circular_speed(g, primary, orbiter, offset.norm());
    vectors::unit(offset.cross(&up)) * speed
}

/// Random point in a disk around the origin: planar radius in `[0, d_max)`,
/// vertical scatter in `[-y_max, y_max)`.
fn disk_position(rng: &mut impl Rng, d_max: f64, y_max: f64) -> NVec3 {
    let d = random::uniform(rng, d_max);
    let theta = random::uniform(rng, 2.0 * PI);
    let y = random::uniform_between(rng, -y_max, y_max);
    NVec3::new(theta.cos() * d, y, theta.sin() * d)
}

/// Write `body` into the slot at `*idx` and advance; false once full.
fn place(slots: &mut [Option<Body>], idx: &mut usize, body: Body) -> bool {
    if *idx >= slots.len() {
        return false;
    }
    slots[*idx] = Some(body);
    *idx += 1;
    true
}

// ==================================================================================
// Presets
// ==================================================================================

/// SlowParticles / FastParticles: a thick cylindrical cloud of particles
/// with uniform random velocities of half-range `spread`.
fn particle_cloud(slots: &mut [Option<Body>], rng: &mut impl Rng, spread: f64) {
    for slot in slots.iter_mut() {
        let position = disk_position(rng, 1e6, 2e5);
        let mass = random::uniform_between(rng, PARTICLE_MASS_LO, PARTICLE_MASS_HI);
        let velocity = random::uniform_vector(rng, spread);
        *slot = Some(Body::with_velocity(position, velocity, mass));
    }
}

/// MassiveBody: a primary at the origin, a secondary orbiting it, and a
/// satellite disk around the secondary, the whole disk rigidly tilted by
/// π/10 about the (1,1,1) axis through the origin.
fn massive_body(slots: &mut [Option<Body>], rng: &mut impl Rng, g: f64) {
    let mut idx = 0;
    if !place(slots, &mut idx, Body::new(NVec3::zeros(), PRIMARY_MASS)) {
        return;
    }

    const SECONDARY_MASS: f64 = 1e8;
    let bearing = random::uniform(rng, 2.0 * PI);
    let d = random::uniform_between(rng, 2e5, 4e5);
    let secondary_pos = NVec3::new(bearing.cos() * d, 0.0, bearing.sin() * d);
    let secondary_vel = orbital_velocity(g, PRIMARY_MASS, SECONDARY_MASS, secondary_pos);
    if !place(
        slots,
        &mut idx,
        Body::with_velocity(secondary_pos, secondary_vel, SECONDARY_MASS),
    ) {
        return;
    }

    // Satellites orbit the secondary in a thin disk with small inclination.
    while idx < slots.len() {
        let offset = disk_position(rng, 1e5, 2e3);
        let mass = random::uniform_between(rng, PARTICLE_MASS_LO, PARTICLE_MASS_HI);
        let velocity = secondary_vel + orbital_velocity(g, SECONDARY_MASS, mass, offset);
        place(
            slots,
            &mut idx,
            Body::with_velocity(secondary_pos + offset, velocity, mass),
        );
    }

    // Rigid tilt of the finished system.
    let axis = NVec3::new(1.0, 1.0, 1.0);
    for body in slots.iter_mut().flatten() {
        body.rotate(NVec3::zeros(), axis, PI / 10.0);
    }
}

/// OrbitalSystem: a primary at the origin with circular orbiters in a
/// thick disk.
fn orbital_system(slots: &mut [Option<Body>], rng: &mut impl Rng, g: f64) {
    let mut idx = 0;
    if !place(slots, &mut idx, Body::new(NVec3::zeros(), PRIMARY_MASS)) {
        return;
    }

    while idx < slots.len() {
        let d = random::uniform_between(rng, 1e5, 1e6);
        let theta = random::uniform(rng, 2.0 * PI);
        let y = random::uniform_between(rng, -5e4, 5e4);
        let position = NVec3::new(theta.cos() * d, y, theta.sin() * d);
        let mass = random::uniform_between(rng, PARTICLE_MASS_LO, PARTICLE_MASS_HI);
        let velocity = orbital_velocity(g, PRIMARY_MASS, mass, position);
        place(slots, &mut idx, Body::with_velocity(position, velocity, mass));
    }
}

/// BinarySystem: two massive bodies at equal half-separations about the
/// origin on a random x–z line, each with the circular speed of the
/// two-body problem, surrounded by a disk that orbits the combined mass.
fn binary_system(slots: &mut [Option<Body>], rng: &mut impl Rng, g: f64) {
    let mut idx = 0;

    let bearing = random::uniform(rng, 2.0 * PI);
    let line = NVec3::new(bearing.cos(), 0.0, bearing.sin());
    let half = random::uniform_between(rng, 2e5, 5e5);
    let separation = 2.0 * half;

    let m1 = random::uniform_between(rng, 1e9, 1e10);
    let m2 = random::uniform_between(rng, 1e9, 1e10);

    let p1 = line * half;
    let p2 = -line * half;
    let v1 = vectors::unit(p1.cross(&NVec3::new(0.0, 1.0, 0.0)))
        * circular_speed(g, m2, m1, separation);
    let v2 = vectors::unit(p2.cross(&NVec3::new(0.0, 1.0, 0.0)))
        * circular_speed(g, m1, m2, separation);

    if !place(slots, &mut idx, Body::with_velocity(p1, v1, m1)) {
        return;
    }
    if !place(slots, &mut idx, Body::with_velocity(p2, v2, m2)) {
        return;
    }

    // Surrounding disk. Near the pair the plain circular speed for the
    // combined mass overshoots, so the pair separation is folded into the
    // orbital distance; far out this reduces to the uncorrected speed.
    let combined = m1 + m2;
    while idx < slots.len() {
        let d = random::uniform_between(rng, 3.0 * half, 3.0 * half + 1.5e6);
        let theta = random::uniform(rng, 2.0 * PI);
        let y = random::uniform_between(rng, -5e4, 5e4);
        let position = NVec3::new(theta.cos() * d, y, theta.sin() * d);
        let mass = random::uniform_between(rng, PARTICLE_MASS_LO, PARTICLE_MASS_HI);

        let effective = (d * d + separation * separation).sqrt();
        let speed = circular_speed(g, combined, mass, effective);
        let velocity = vectors::unit(position.cross(&NVec3::new(0.0, 1.0, 0.0))) * speed;

        place(slots, &mut idx, Body::with_velocity(position, velocity, mass));
    }
}

/// PlanetarySystem: a central star, 5–14 planets on circular orbits, a
/// ring of 100 particles around one of them, 0–3 moons around the others,
/// and an outer asteroid belt in any remaining slots.
fn planetary_system(slots: &mut [Option<Body>], rng: &mut impl Rng, g: f64) {
    let mut idx = 0;
    if !place(slots, &mut idx, Body::new(NVec3::zeros(), PRIMARY_MASS)) {
        return;
    }

    let planet_count = 5 + random::uniform_index(rng, 9); // 5..=14
    let ringed = random::uniform_index(rng, planet_count - 1);

    // (position, velocity, mass) per planet, kept for ring/moon placement
    let mut planets: Vec<(NVec3, NVec3, f64)> = Vec::with_capacity(planet_count);
    for _ in 0..planet_count {
        let d = random::uniform_between(rng, 2e5, 2e6);
        let theta = random::uniform(rng, 2.0 * PI);
        let y = random::uniform_between(rng, -1e4, 1e4);
        let position = NVec3::new(theta.cos() * d, y, theta.sin() * d);
        let mass = random::uniform_between(rng, 1e6, 5e7);
        let velocity = orbital_velocity(g, PRIMARY_MASS, mass, position);

        if !place(slots, &mut idx, Body::with_velocity(position, velocity, mass)) {
            return;
        }
        planets.push((position, velocity, mass));
    }

    // Ring: 100 light particles coplanar with the ringed planet.
    if let Some(&(pos, vel, mass)) = planets.get(ringed) {
        const RING_PARTICLE_MASS: f64 = 1e3;
        for _ in 0..100 {
            let r = random::uniform_between(rng, 1.5e4, 3e4);
            let phi = random::uniform(rng, 2.0 * PI);
            let offset = NVec3::new(phi.cos() * r, 0.0, phi.sin() * r);
            let velocity = vel + orbital_velocity(g, mass, RING_PARTICLE_MASS, offset);
            if !place(
                slots,
                &mut idx,
                Body::with_velocity(pos + offset, velocity, RING_PARTICLE_MASS),
            ) {
                return;
            }
        }
    }

    // Moons for the other planets.
    for (p, &(pos, vel, mass)) in planets.iter().enumerate() {
        if p == ringed {
            continue;
        }
        let moons = random::uniform_index(rng, 3); // 0..=3
        for _ in 0..moons {
            let d = random::uniform_between(rng, 1e4, 5e4);
            let phi = random::uniform(rng, 2.0 * PI);
            let offset = NVec3::new(phi.cos() * d, 0.0, phi.sin() * d);
            let moon_mass = random::uniform_between(rng, 1e4, 1e6);
            let velocity = vel + orbital_velocity(g, mass, moon_mass, offset);
            if !place(
                slots,
                &mut idx,
                Body::with_velocity(pos + offset, velocity, moon_mass),
            ) {
                return;
            }
        }
    }

    // Whatever is left becomes the outer belt.
    while idx < slots.len() {
        let d = random::uniform_between(rng, 2.2e6, 3e6);
        let theta = random::uniform(rng, 2.0 * PI);
        let y = random::uniform_between(rng, -2e4, 2e4);
        let position = NVec3::new(theta.cos() * d, y, theta.sin() * d);
        let mass = random::uniform_between(rng, PARTICLE_MASS_LO, PARTICLE_MASS_HI);
        let velocity = orbital_velocity(g, PRIMARY_MASS, mass, position);
        place(slots, &mut idx, Body::with_velocity(position, velocity, mass));
    }
}

/// DistributionTest: a centered cubic lattice of side `⌊N^(1/3)⌋` at
/// fixed spacing, every body at rest with the same mass. Useful for
/// eyeballing the tree's spatial decomposition.
fn distribution_test(slots: &mut [Option<Body>]) {
    const SPACING: f64 = 4e4;
    const LATTICE_MASS: f64 = 5e6;

    let n = slots.len();
    let mut side = (n as f64).cbrt() as usize + 1;
    while side * side * side > n {
        side -= 1;
    }
    if side == 0 {
        return;
    }

    let half = (side as f64 - 1.0) / 2.0;
    let mut idx = 0;
    for i in 0..side {
        for j in 0..side {
            for k in 0..side {
                let position = NVec3::new(
                    (i as f64 - half) * SPACING,
                    (j as f64 - half) * SPACING,
                    (k as f64 - half) * SPACING,
                );
                place(slots, &mut idx, Body::new(position, LATTICE_MASS));
            }
        }
    }
}
