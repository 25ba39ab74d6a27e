//! # Barnes–Hut Octree (3D)
//!
//! This module implements the **3D Barnes–Hut octree** at the heart of the
//! simulator. It replaces the naive `O(N²)` all-pairs gravity calculation
//! with an approximate `O(N log N)` method: a group of distant bodies is
//! treated as a single pseudo-body at their center of mass, so evaluating
//! one interaction stands in for many.
//!
//! ## Core concepts
//!
//! - Space is recursively subdivided into 8 octants; each octant is a node.
//! - Every node is a cube aligned to the world axes, described by its
//!   center and width.
//! - Each node aggregates the total mass, center of mass (COM), and body
//!   count of everything inserted beneath it. Aggregation happens *during*
//!   insertion, so the tree is query-ready the moment the last body is in.
//! - While a node has held only one body, that body is remembered in the
//!   node itself. The moment a second body arrives, the remembered one is
//!   pushed down into a child octant alongside the newcomer.
//! - Subdivision halts once a child cell would be narrower than
//!   [`MINIMUM_WIDTH`]; bodies landing there contribute to the aggregates
//!   only.
//!
//! The acceleration query walks the tree with the multipole acceptance
//! criterion `width/distance < θ` (evaluated in squared form to avoid
//! square roots) and a geometric leaf test that skips self-interaction
//! without ever comparing body identities.

use crate::simulation::vectors::NVec3;

/// Default multipole acceptance threshold (cell width / distance).
pub const DEFAULT_THETA: f64 = 0.5;

/// Default softening length in the force denominator.
pub const DEFAULT_EPSILON: f64 = 700.0;

/// Halt subdivision when a child cell would be narrower than this.
pub const MINIMUM_WIDTH: f64 = 1.0;

/// A single cubic cell of the octree.
///
/// Aggregates (`mass`, `com`, `count`) always cover every body inserted
/// into this cell or any cell below it. `occupant` remembers the single
/// body while `count <= 1`; it is taken and pushed into a child on the
/// 1 → 2 transition. Children are created lazily, one octant at a time.
struct Cell {
    center: NVec3,
    width: f64,
    mass: f64,
    com: NVec3,
    count: usize,
    occupant: Option<(NVec3, f64)>,   // (position, mass) while count <= 1
    children: [Option<usize>; 8],     // indices into Octree::cells
}

impl Cell {
    fn new(center: NVec3, width: f64) -> Self {
        Self {
            center,
            width,
            mass: 0.0,
            com: NVec3::zeros(),
            count: 0,
            occupant: None,
            children: [None; 8],
        }
    }
}

/// An arena-backed Barnes–Hut octree.
///
/// All cells live in one `Vec`, children refer to each other by index, and
/// the root is always index 0. One tree is built per tick and discarded;
/// nothing in it outlives the tick that built it.
pub struct Octree {
    cells: Vec<Cell>,
}

impl Octree {
    /// An empty tree whose root cube is centered at `center` with side
    /// length `width`.
    ///
    /// The caller is responsible for choosing a root that encloses every
    /// body it will insert (the world sizes the root from the body
    /// positions with slack before building; see the world tick).
    pub fn new(center: NVec3, width: f64) -> Self {
        Self {
            cells: vec![Cell::new(center, width)],
        }
    }

    /// Build a tree over `bodies`, inserting each `(position, mass)` pair.
    pub fn build(center: NVec3, width: f64, bodies: impl IntoIterator<Item = (NVec3, f64)>) -> Self {
        let mut tree = Self::new(center, width);
        for (position, mass) in bodies {
            tree.insert(position, mass);
        }
        tree
    }

    /// Number of bodies inserted into the tree.
    pub fn count(&self) -> usize {
        self.cells[0].count
    }

    /// Total mass of all inserted bodies.
    pub fn mass(&self) -> f64 {
        self.cells[0].mass
    }

    /// Mass-weighted center of mass of all inserted bodies.
    pub fn center_of_mass(&self) -> NVec3 {
        self.cells[0].com
    }

    /// Insert one body into the tree.
    ///
    /// Precondition: `position` lies inside the root cube. The world
    /// guarantees this by sizing the root over all live bodies first; the
    /// octant routing below never invents cells at wrong offsets, so an
    /// out-of-root insert merely lands in the nearest boundary octant.
    pub fn insert(&mut self, position: NVec3, mass: f64) {
        self.insert_at(0, position, mass);
    }

    fn insert_at(&mut self, idx: usize, position: NVec3, mass: f64) {
        // Fold the newcomer into this cell's aggregates first; every cell
        // on the path down accumulates it exactly once.
        let count = {
            let cell = &mut self.cells[idx];
            let total = cell.mass + mass;
            cell.com = (cell.com * cell.mass + position * mass) / total;
            cell.mass = total;
            cell.count += 1;
            cell.count
        };

        // First body: remember it here, no subdivision yet.
        if count == 1 {
            self.cells[idx].occupant = Some((position, mass));
            return;
        }

        // Second body: the remembered occupant descends too, through the
        // same routing as the newcomer.
        if count == 2 {
            if let Some((p, m)) = self.cells[idx].occupant.take() {
                self.descend(idx, p, m);
            }
        }

        self.descend(idx, position, mass);
    }

    /// Route a body into the appropriate child octant of cell `idx`,
    /// creating the child lazily, and recurse.
    ///
    /// When the child cell would be narrower than [`MINIMUM_WIDTH`] the
    /// body stays aggregated in this cell and descends no further.
    fn descend(&mut self, idx: usize, position: NVec3, mass: f64) {
        // Snapshot geometry by value so no borrow is live across the
        // recursive call.
        let center = self.cells[idx].center;
        let child_width = self.cells[idx].width / 2.0;

        if child_width < MINIMUM_WIDTH {
            return;
        }

        // Octant by sign per axis; a body exactly on a split plane goes to
        // the positive side (`>=`), both here and in the offset below, so
        // the routing and the child geometry always agree.
        let octant = octant_index(position, center);

        // Copy the slot out so the arena is free to grow in the miss arm.
        let existing = self.cells[idx].children[octant];
        let child = match existing {
            Some(c) => c,
            None => {
                let quarter = child_width / 2.0;
                let offset = NVec3::new(
                    if position.x >= center.x { quarter } else { -quarter },
                    if position.y >= center.y { quarter } else { -quarter },
                    if position.z >= center.z { quarter } else { -quarter },
                );
                let c = self.cells.len();
                self.cells.push(Cell::new(center + offset, child_width));
                self.cells[idx].children[octant] = Some(c);
                c
            }
        };

        self.insert_at(child, position, mass);
    }

    /// Net gravitational acceleration at `position` due to every body in
    /// the tree, under gravitational constant `g`, acceptance threshold
    /// `theta`, and softening length `epsilon`.
    ///
    /// The traversal decides per cell, in order:
    ///
    /// 1. **Leaf-miss rule** — a cell holding exactly one body whose cube
    ///    the target lies *outside* is a remote point mass: apply it. The
    ///    geometric test is what skips self-interaction: the one cell that
    ///    holds the target body itself always contains the target, so it
    ///    can never match.
    /// 2. **MAC** — `W² < θ²·D²` (the squared form of `W/|d| < θ`): the
    ///    cell is far enough to stand in for its contents, apply it.
    /// 3. Otherwise recurse into existing children; a childless cell
    ///    contributes nothing.
    ///
    /// Applying a cell adds `G·M·d / r³` with `r = √(D² + ε²)`; the
    /// softening keeps close encounters finite.
    pub fn acceleration(&self, position: NVec3, g: f64, theta: f64, epsilon: f64) -> NVec3 {
        let mut acc = NVec3::zeros();
        self.accumulate(0, position, g, theta * theta, epsilon * epsilon, &mut acc);
        acc
    }

    fn accumulate(
        &self,
        idx: usize,
        position: NVec3,
        g: f64,
        theta2: f64,
        eps2: f64,
        acc: &mut NVec3,
    ) {
        let cell = &self.cells[idx];
        if cell.count == 0 {
            return;
        }

        let d = cell.com - position;
        let dist2 = d.dot(&d);

        let single_remote = cell.count == 1 && outside(position, cell.center, cell.width);
        let far_enough = cell.width * cell.width < theta2 * dist2;

        if single_remote || far_enough {
            let r = (dist2 + eps2).sqrt();
            if r > 0.0 {
                let k = g * cell.mass / (r * r * r);
                *acc += d * k;
            }
            return;
        }

        for child in cell.children.iter().flatten() {
            self.accumulate(*child, position, g, theta2, eps2, acc);
        }
    }
}

/// Octant index of `position` relative to `center`, 3-bit encoded:
/// bit 0 = x, bit 1 = y, bit 2 = z; set when the coordinate is `>=` the
/// center's.
fn octant_index(position: NVec3, center: NVec3) -> usize {
    let mut idx = 0;
    if position.x >= center.x {
        idx |= 1;
    }
    if position.y >= center.y {
        idx |= 2;
    }
    if position.z >= center.z {
        idx |= 4;
    }
    idx
}

/// True when `position` lies outside the closed cube of side `width`
/// centered at `center` (strictly beyond the half-width on any axis).
fn outside(position: NVec3, center: NVec3, width: f64) -> bool {
    let half = width / 2.0;
    (position.x - center.x).abs() > half
        || (position.y - center.y).abs() > half
        || (position.z - center.z).abs() > half
}
