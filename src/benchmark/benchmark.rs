//! Timing harnesses for the two performance-critical paths: the tree
//! versus the direct sum, and the parallel driver versus a serial loop.
//!
//! Output is plain columns so a run can be pasted straight into a
//! spreadsheet. Positions are deterministic trigonometric scatter, no
//! randomness needed.

use std::time::Instant;

use crate::simulation::gravity;
use crate::simulation::octree::Octree;
use crate::simulation::parallel;
use crate::simulation::vectors::NVec3;

/// Deterministic body scatter of size `n`: spread positions, unit masses.
fn scatter(n: usize) -> Vec<(NVec3, f64)> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let position = NVec3::new(
                (i_f * 0.37).sin() * 5e5,
                (i_f * 0.13).cos() * 5e5,
                (i_f * 0.07).sin() * 5e5,
            );
            (position, 1e6)
        })
        .collect()
}

fn extent(bodies: &[(NVec3, f64)]) -> f64 {
    bodies.iter().fold(0.0f64, |h, (p, _)| {
        h.max(p.x.abs()).max(p.y.abs()).max(p.z.abs())
    })
}

/// Direct O(N²) sum versus tree build + query, across system sizes.
pub fn bench_acceleration() {
    let g = 67.0;
    let theta = 0.5;
    let epsilon = 700.0;

    println!("N,direct_ms,tree_ms");
    for n in [200, 400, 800, 1600, 3200, 6400] {
        let bodies = scatter(n);
        let width = 2.1 * extent(&bodies);

        // Warm up both paths once before timing.
        let _ = gravity::direct_accelerations(&bodies, g, epsilon);
        let tree = Octree::build(NVec3::zeros(), width, bodies.iter().copied());
        let _ = tree.acceleration(bodies[0].0, g, theta, epsilon);

        let t0 = Instant::now();
        let _ = gravity::direct_accelerations(&bodies, g, epsilon);
        let direct_ms = t0.elapsed().as_secs_f64() * 1000.0;

        // The tree cost is build plus one query per body, same as a tick.
        let t1 = Instant::now();
        let tree = Octree::build(NVec3::zeros(), width, bodies.iter().copied());
        for &(position, _) in &bodies {
            let _ = tree.acceleration(position, g, theta, epsilon);
        }
        let tree_ms = t1.elapsed().as_secs_f64() * 1000.0;

        println!("{n},{direct_ms:.6},{tree_ms:.6}");
    }
}

/// Serial loop versus the chunked parallel driver for the query phase.
pub fn bench_parallel() {
    let g = 67.0;
    let theta = 0.5;
    let epsilon = 700.0;
    let workers = parallel::default_workers();

    println!("N,serial_ms,parallel_ms (workers = {workers})");
    for n in [800, 1600, 3200, 6400, 12800] {
        let bodies = scatter(n);
        let width = 2.1 * extent(&bodies);
        let tree = Octree::build(NVec3::zeros(), width, bodies.iter().copied());

        let t0 = Instant::now();
        for &(position, _) in &bodies {
            let _ = tree.acceleration(position, g, theta, epsilon);
        }
        let serial_ms = t0.elapsed().as_secs_f64() * 1000.0;

        let t1 = Instant::now();
        let _ = parallel::map(0, n, workers, |i| {
            tree.acceleration(bodies[i].0, g, theta, epsilon)
        });
        let parallel_ms = t1.elapsed().as_secs_f64() * 1000.0;

        println!("{n},{serial_ms:.6},{parallel_ms:.6}");
    }
}
