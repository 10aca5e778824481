//! Barnes-Hut octree over a cubic region.
//!
//! The tree replaces the naive `O(N²)` all-pairs force sum with an
//! approximate `O(N log N)` method: a distant group of particles is
//! treated as a single point mass at its center of mass, controlled by
//! the opening-angle threshold `theta`.
//!
//! Layout: all nodes live in one `Vec` owned by the tree, addressed by
//! index. The tree is built fresh every frame from the driver's bounding
//! [`Region`] and discarded whole at frame end, so node storage acts as
//! a per-frame arena with no individual lifetimes to track.
//!
//! Each node is a tagged variant:
//! - `Empty` — no particles below this octant,
//! - `Leaf` — particle indices stored directly (one, except where the
//!   depth cutoff groups coincident particles),
//! - `Internal` — eight child octants plus the aggregate mass and
//!   mass-weighted position sum of the whole subtree.

use thiserror::Error;

use crate::simulation::bounds::Region;
use crate::simulation::states::{NVec3, Particle};

/// Subdivision stops at this depth; particles that still share a cell
/// (numerically coincident positions) are grouped into one leaf instead
/// of recursing forever.
pub const MAX_DEPTH: usize = 32;

#[derive(Debug, Error)]
pub enum OctreeError {
    #[error(
        "particle {index} at ({x:.4}, {y:.4}, {z:.4}) lies outside the root region \
         (center ({cx:.4}, {cy:.4}, {cz:.4}), half-width {half:.4})"
    )]
    OutOfBounds {
        index: usize,
        x: f64,
        y: f64,
        z: f64,
        cx: f64,
        cy: f64,
        cz: f64,
        half: f64,
    },
}

impl OctreeError {
    fn out_of_bounds(index: usize, pos: &NVec3, region: &Region) -> Self {
        OctreeError::OutOfBounds {
            index,
            x: pos.x,
            y: pos.y,
            z: pos.z,
            cx: region.center.x,
            cy: region.center.y,
            cz: region.center.z,
            half: region.half,
        }
    }
}

enum NodeKind {
    Empty,
    Leaf {
        bodies: Vec<usize>, // indices into the particle slice
    },
    Internal {
        children: [usize; 8], // indices into Octree::nodes
        mass: f64,            // total mass of the subtree
        com_sum: NVec3,       // mass-weighted position sum; com = com_sum / mass
    },
}

struct Node {
    region: Region,
    kind: NodeKind,
}

/// A complete Barnes-Hut octree built over one frame's particle set.
pub struct Octree {
    nodes: Vec<Node>,
    root: usize,
    g: f64,
    eps2: f64,
    theta: f64,
}

impl Octree {
    /// Build a tree over `region` and insert every particle.
    ///
    /// Fails with [`OctreeError::OutOfBounds`] if any particle position
    /// is not covered by `region`; the caller decides whether that is
    /// fatal or grounds for regrowing the region and retrying.
    pub fn build(
        region: Region,
        particles: &[Particle],
        g: f64,
        eps2: f64,
        theta: f64,
    ) -> Result<Self, OctreeError> {
        let mut tree = Octree {
            nodes: vec![Node { region, kind: NodeKind::Empty }],
            root: 0,
            g,
            eps2,
            theta,
        };

        for i in 0..particles.len() {
            tree.add_particle(i, particles)?;
        }

        Ok(tree)
    }

    /// Insert one particle, subdividing leaves as needed.
    pub fn add_particle(&mut self, index: usize, particles: &[Particle]) -> Result<(), OctreeError> {
        let pos = particles[index].x;
        let root_region = self.nodes[self.root].region;
        if !root_region.contains(&pos) {
            return Err(OctreeError::out_of_bounds(index, &pos, &root_region));
        }
        self.insert(self.root, index, particles, 0);
        Ok(())
    }

    /// Total mass aggregated at the root.
    pub fn total_mass(&self, particles: &[Particle]) -> f64 {
        match self.nodes[self.root].kind {
            NodeKind::Empty => 0.0,
            NodeKind::Leaf { ref bodies } => bodies.iter().map(|&b| particles[b].m).sum(),
            NodeKind::Internal { mass, .. } => mass,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Point-location query: the particle indices stored in the leaf
    /// whose octant contains `pos`, or `None` if that cell is empty or
    /// `pos` is outside the root region.
    pub fn locate(&self, pos: &NVec3) -> Option<&[usize]> {
        if !self.nodes[self.root].region.contains(pos) {
            return None;
        }
        let mut idx = self.root;
        loop {
            match self.nodes[idx].kind {
                NodeKind::Empty => return None,
                NodeKind::Leaf { ref bodies } => return Some(bodies),
                NodeKind::Internal { ref children, .. } => {
                    idx = children[self.nodes[idx].region.octant_of(pos)];
                }
            }
        }
    }

    /// Net gravitational acceleration on particle `i` from the whole
    /// tree, with self-interaction excluded exactly and softening
    /// `eps2` applied to every pairwise and approximated term.
    pub fn accel_on(&self, i: usize, particles: &[Particle]) -> NVec3 {
        let pos = particles[i].x;
        let mut acc = NVec3::zeros();
        self.traverse(self.root, i, &pos, particles, &mut acc);
        acc
    }

    // helpers ==============================================================

    fn insert(&mut self, node_idx: usize, body_idx: usize, particles: &[Particle], depth: usize) {
        // Take the variant out by value so recursion never holds a
        // borrow into the node arena.
        let kind = std::mem::replace(&mut self.nodes[node_idx].kind, NodeKind::Empty);
        match kind {
            // Empty cell: becomes a leaf holding this particle.
            NodeKind::Empty => {
                self.nodes[node_idx].kind = NodeKind::Leaf { bodies: vec![body_idx] };
            }

            // Occupied leaf: subdivide and reinsert the residents plus
            // the newcomer, unless the depth cutoff is reached, in
            // which case coincident particles share the leaf.
            NodeKind::Leaf { mut bodies } => {
                if depth >= MAX_DEPTH {
                    bodies.push(body_idx);
                    self.nodes[node_idx].kind = NodeKind::Leaf { bodies };
                    return;
                }

                self.subdivide(node_idx);
                for resident in bodies {
                    self.insert(node_idx, resident, particles, depth);
                }
                self.insert(node_idx, body_idx, particles, depth);
            }

            // Internal node: fold the particle into the aggregates and
            // descend into the octant that contains it.
            NodeKind::Internal { children, mut mass, mut com_sum } => {
                let p = &particles[body_idx];
                mass += p.m;
                com_sum += p.x * p.m;

                let octant = self.nodes[node_idx].region.octant_of(&p.x);
                self.nodes[node_idx].kind = NodeKind::Internal { children, mass, com_sum };
                self.insert(children[octant], body_idx, particles, depth + 1);
            }
        }
    }

    /// Turn a node into an internal node with eight empty child
    /// octants. Aggregates start at zero; reinsertion fills them in.
    fn subdivide(&mut self, node_idx: usize) {
        let region = self.nodes[node_idx].region;
        let mut children = [0usize; 8];
        for (octant, child) in children.iter_mut().enumerate() {
            *child = self.nodes.len();
            self.nodes.push(Node {
                region: region.child(octant),
                kind: NodeKind::Empty,
            });
        }
        self.nodes[node_idx].kind = NodeKind::Internal {
            children,
            mass: 0.0,
            com_sum: NVec3::zeros(),
        };
    }

    fn traverse(&self, node_idx: usize, i: usize, pos: &NVec3, particles: &[Particle], acc: &mut NVec3) {
        let node = &self.nodes[node_idx];
        match node.kind {
            NodeKind::Empty => {}

            // Exact pairwise terms, skipping the particle itself.
            NodeKind::Leaf { ref bodies } => {
                for &b in bodies {
                    if b == i {
                        continue;
                    }
                    let p = &particles[b];
                    *acc += self.pair_accel(pos, &p.x, p.m);
                }
            }

            NodeKind::Internal { ref children, mass, com_sum } => {
                if mass == 0.0 {
                    return;
                }
                let com = com_sum / mass;
                let dist = (com - pos).norm();

                // Opening criterion: node edge length over distance to
                // its center of mass. Far enough away, the subtree is
                // one point mass at the COM; otherwise descend.
                if dist > 0.0 && node.region.size() / dist < self.theta {
                    *acc += self.pair_accel(pos, &com, mass);
                } else {
                    for &child in children {
                        self.traverse(child, i, pos, particles, acc);
                    }
                }
            }
        }
    }

    /// Softened inverse-square contribution of a point mass at `other`
    /// on a particle at `pos`.
    fn pair_accel(&self, pos: &NVec3, other: &NVec3, m: f64) -> NVec3 {
        let r = other - pos;
        let d2 = r.dot(&r) + self.eps2;
        let inv_r = d2.sqrt().recip();
        let inv_r3 = inv_r * inv_r * inv_r;
        self.g * m * inv_r3 * r
    }
}
