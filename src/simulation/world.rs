//! The world: per-tick orchestrator and command surface.
//!
//! [`Simulation`] is the one handle the rest of the program holds. It owns
//! the body vector behind a single mutex (the body lock), the runtime
//! settings, the camera, and the frame/FPS counters. There are no process
//! globals; the UI layer keeps one handle and calls commands on it.
//!
//! One tick, when active:
//!
//! 1. take the body lock,
//! 2. update every live body (applying last tick's accelerations) while
//!    scanning the largest coordinate magnitude `H`,
//! 3. build a fresh octree centered at the origin with width `2.1·H`
//!    (the 0.1 slack keeps every body strictly inside despite drift),
//! 4. insert every live body,
//! 5. evaluate accelerations for all bodies in parallel and store each
//!    result in its body's pending-acceleration field,
//! 6. release the lock and run housekeeping (camera easing; the caller's
//!    run loop handles frame pacing and the FPS readout).
//!
//! The tree lives and dies inside the tick. Readers that want positions
//! (the draw thread) take a [`Simulation::snapshot`] under a brief lock
//! instead of reading unsynchronized.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::simulation::octree::Octree;
use crate::simulation::parallel;
use crate::simulation::params::{Settings, FPS_MAX, FPS_SMOOTHING, FRAME_INTERVAL_MS};
use crate::simulation::states::Body;
use crate::simulation::systems::{self, SystemType};
use crate::simulation::vectors::NVec3;

/// Root width is this multiple of the largest coordinate magnitude.
const ROOT_SLACK: f64 = 2.1;

/// Per-tick decay of the camera's zoom velocity.
const CAMERA_EASING: f64 = 0.94;

/// Camera distance after a reset.
const CAMERA_HOME_Z: f64 = 2e6;

/// Command rejection reasons. A rejected command leaves the world
/// untouched.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("capacity must be at least 1")]
    InvalidCapacity,
    #[error("{0} must be finite")]
    NonFinite(&'static str),
    #[error("mass must be positive")]
    NonPositiveMass,
    #[error("slot {slot} out of range for capacity {capacity}")]
    SlotOutOfRange { slot: usize, capacity: usize },
}

/// Camera state: a position on the z axis, a zoom velocity, and easing.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub z: f64,
    pub vz: f64,
}

impl Camera {
    fn home() -> Self {
        Self {
            z: CAMERA_HOME_Z,
            vz: 0.0,
        }
    }

    /// Multiplicative zoom step: the velocity scales the current distance,
    /// the distance never drops below 1, and the velocity eases out.
    fn advance(&mut self) {
        self.z += self.vz * self.z;
        self.z = self.z.max(1.0);
        self.vz *= CAMERA_EASING;
    }
}

/// Per-body state cloned out for the draw pass. Velocity rides along for
/// speed-based coloring in the HUD layer.
#[derive(Debug, Clone)]
pub struct BodySnapshot {
    pub position: NVec3,
    pub velocity: NVec3,
    pub radius: f64,
    pub trail: Vec<NVec3>,
}

/// The simulation world. Shareable across threads behind an `Arc`; every
/// method takes `&self`.
pub struct Simulation {
    bodies: Mutex<Vec<Option<Body>>>,
    settings: RwLock<Settings>,
    camera: Mutex<Camera>,
    fps: Mutex<f64>,
    active: AtomicBool,
    frames: AtomicU64,
    nonfinite_warned: AtomicBool,
}

impl Simulation {
    /// Build a paused, empty world with the given settings.
    pub fn new(settings: Settings) -> Result<Self, SimulationError> {
        if settings.capacity == 0 {
            return Err(SimulationError::InvalidCapacity);
        }
        if !settings.gravity.is_finite() {
            return Err(SimulationError::NonFinite("gravitational constant"));
        }
        if settings.speed_limit <= 0.0 {
            return Err(SimulationError::NonFinite("speed ceiling"));
        }

        let capacity = settings.capacity;
        Ok(Self {
            bodies: Mutex::new(vec![None; capacity]),
            settings: RwLock::new(settings),
            camera: Mutex::new(Camera::home()),
            fps: Mutex::new(0.0),
            active: AtomicBool::new(false),
            frames: AtomicU64::new(0),
            nonfinite_warned: AtomicBool::new(false),
        })
    }

    // ==============================================================================
    // Tick
    // ==============================================================================

    /// One simulation tick: physics (when active) plus camera housekeeping.
    /// Frame pacing and the FPS readout belong to [`Simulation::run`].
    pub fn step(&self) {
        let settings = self.settings.read().expect("settings lock poisoned").clone();

        if self.active.load(Ordering::Relaxed) {
            let mut bodies = self.bodies.lock().expect("body lock poisoned");

            // Update every body first, scanning the extent for the root.
            // A body whose position has gone non-finite is quarantined:
            // it must not touch the extent either, or one overflowed body
            // hands every other body an infinite-width root.
            let mut extent = 0.0f64;
            for body in bodies.iter_mut().flatten() {
                body.update(settings.speed_limit, settings.trails);
                if finite(body.position) {
                    extent = extent
                        .max(body.position.x.abs())
                        .max(body.position.y.abs())
                        .max(body.position.z.abs());
                }
            }

            // Fresh tree for this tick, over the same finite-only set the
            // extent was scanned from.
            let mut tree = Octree::new(NVec3::zeros(), ROOT_SLACK * extent);
            for body in bodies.iter().flatten() {
                if finite(body.position) {
                    tree.insert(body.position, body.mass);
                } else {
                    self.warn_non_finite();
                }
            }

            if tree.count() > 0 {
                let slots: &Vec<Option<Body>> = &bodies;
                let tree = &tree;
                let accels = parallel::map(0, slots.len(), settings.workers, |i| {
                    slots[i].as_ref().map(|b| {
                        tree.acceleration(
                            b.position,
                            settings.gravity,
                            settings.theta,
                            settings.epsilon,
                        )
                    })
                });

                match accels {
                    Ok(accels) => {
                        for (slot, accel) in bodies.iter_mut().zip(accels) {
                            let (Some(body), Some(a)) = (slot.as_mut(), accel) else {
                                continue;
                            };
                            if finite(a) {
                                body.acceleration = a;
                            } else {
                                // Quarantine: zero the acceleration, leave
                                // position and velocity untouched.
                                body.acceleration = NVec3::zeros();
                                self.warn_non_finite();
                            }
                        }
                    }
                    Err(e) => {
                        // Every body's acceleration is still at its
                        // pre-tick value (zero, reset by update), so no
                        // partial state is visible.
                        log::error!("acceleration phase failed: {e}");
                    }
                }

                self.frames.fetch_add(1, Ordering::Relaxed);
            }
        }

        self.camera.lock().expect("camera lock poisoned").advance();
    }

    /// Tick repeatedly at the 33 ms frame target until `running` clears,
    /// maintaining the smoothed FPS readout.
    pub fn run(&self, running: &AtomicBool) {
        let frame = Duration::from_millis(FRAME_INTERVAL_MS);
        let mut last = Instant::now();

        while running.load(Ordering::Relaxed) {
            self.step();

            let elapsed = last.elapsed();
            if elapsed < frame {
                thread::sleep(frame - elapsed);
            }

            let frame_ms = last.elapsed().as_secs_f64() * 1000.0;
            last = Instant::now();
            if frame_ms > 0.0 {
                let mut fps = self.fps.lock().expect("fps lock poisoned");
                *fps += (1000.0 / frame_ms - *fps) * FPS_SMOOTHING;
                *fps = (*fps).min(FPS_MAX);
            }
        }
    }

    // ==============================================================================
    // Commands
    // ==============================================================================

    /// Replace the world with a preset, using thread-local randomness.
    pub fn generate(&self, kind: SystemType) {
        self.generate_with(kind, &mut rand::thread_rng());
    }

    /// Replace the world with a preset drawn from the given source.
    /// Deterministic when the source is seeded.
    pub fn generate_with(&self, kind: SystemType, rng: &mut impl rand::Rng) {
        let settings = self.settings.read().expect("settings lock poisoned").clone();
        let mut bodies = self.bodies.lock().expect("body lock poisoned");
        systems::generate(kind, &mut bodies[..], rng, &settings);
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }

    pub fn toggle_active(&self) {
        self.active.fetch_xor(true, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Rigidly rotate every body about the line through `base` along
    /// `axis` by `angle` radians.
    pub fn rotate(&self, base: NVec3, axis: NVec3, angle: f64) -> Result<(), SimulationError> {
        ensure_finite_vec(base, "rotation base")?;
        ensure_finite_vec(axis, "rotation axis")?;
        if !angle.is_finite() {
            return Err(SimulationError::NonFinite("rotation angle"));
        }

        let mut bodies = self.bodies.lock().expect("body lock poisoned");
        for body in bodies.iter_mut().flatten() {
            body.rotate(base, axis, angle);
        }
        Ok(())
    }

    /// Change the body-vector capacity. Existing slots beyond the new
    /// capacity are dropped; new slots start empty.
    pub fn resize(&self, capacity: usize) -> Result<(), SimulationError> {
        if capacity == 0 {
            return Err(SimulationError::InvalidCapacity);
        }
        let mut bodies = self.bodies.lock().expect("body lock poisoned");
        bodies.resize_with(capacity, || None);
        self.settings.write().expect("settings lock poisoned").capacity = capacity;
        Ok(())
    }

    /// Put a body into a specific slot, replacing whatever was there.
    pub fn place_body(
        &self,
        slot: usize,
        position: NVec3,
        velocity: NVec3,
        mass: f64,
    ) -> Result<(), SimulationError> {
        ensure_finite_vec(position, "position")?;
        ensure_finite_vec(velocity, "velocity")?;
        if !mass.is_finite() {
            return Err(SimulationError::NonFinite("mass"));
        }
        if mass <= 0.0 {
            return Err(SimulationError::NonPositiveMass);
        }

        let mut bodies = self.bodies.lock().expect("body lock poisoned");
        let capacity = bodies.len();
        let Some(target) = bodies.get_mut(slot) else {
            return Err(SimulationError::SlotOutOfRange { slot, capacity });
        };
        *target = Some(Body::with_velocity(position, velocity, mass));
        Ok(())
    }

    pub fn set_gravity(&self, g: f64) -> Result<(), SimulationError> {
        if !g.is_finite() {
            return Err(SimulationError::NonFinite("gravitational constant"));
        }
        self.settings.write().expect("settings lock poisoned").gravity = g;
        Ok(())
    }

    pub fn set_speed_limit(&self, c: f64) -> Result<(), SimulationError> {
        if !(c > 0.0) {
            return Err(SimulationError::NonFinite("speed ceiling"));
        }
        self.settings.write().expect("settings lock poisoned").speed_limit = c;
        Ok(())
    }

    /// Nudge the camera's zoom velocity.
    pub fn move_camera(&self, delta: f64) {
        if delta.is_finite() {
            self.camera.lock().expect("camera lock poisoned").vz += delta;
        }
    }

    pub fn reset_camera(&self) {
        *self.camera.lock().expect("camera lock poisoned") = Camera::home();
    }

    // ==============================================================================
    // Observers
    // ==============================================================================

    pub fn body_count(&self) -> usize {
        self.bodies
            .lock()
            .expect("body lock poisoned")
            .iter()
            .flatten()
            .count()
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies
            .lock()
            .expect("body lock poisoned")
            .iter()
            .flatten()
            .map(|b| b.mass)
            .sum()
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    pub fn fps(&self) -> f64 {
        *self.fps.lock().expect("fps lock poisoned")
    }

    pub fn camera(&self) -> Camera {
        *self.camera.lock().expect("camera lock poisoned")
    }

    /// True once any body has been quarantined for a non-finite state.
    /// The matching log warning is emitted exactly once per run.
    pub fn anomaly_detected(&self) -> bool {
        self.nonfinite_warned.load(Ordering::Relaxed)
    }

    pub fn settings(&self) -> Settings {
        self.settings.read().expect("settings lock poisoned").clone()
    }

    /// Clone out what the draw pass needs, under a brief lock. Readers
    /// never see a half-generated world; writers never wait on a frame.
    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        self.bodies
            .lock()
            .expect("body lock poisoned")
            .iter()
            .flatten()
            .map(|b| BodySnapshot {
                position: b.position,
                velocity: b.velocity,
                radius: b.radius(),
                trail: b.trail().copied().collect(),
            })
            .collect()
    }

    fn warn_non_finite(&self) {
        if !self.nonfinite_warned.swap(true, Ordering::Relaxed) {
            log::warn!("non-finite body state detected; offending bodies quiesced for the tick");
        }
    }
}

fn finite(v: NVec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

fn ensure_finite_vec(v: NVec3, what: &'static str) -> Result<(), SimulationError> {
    if finite(v) {
        Ok(())
    } else {
        Err(SimulationError::NonFinite(what))
    }
}
