//! Bounding volume tracking for the octree root.
//!
//! [`BoundingBox`] is the per-frame accumulator: reset at the start of
//! the integration pass, then fed every updated particle position. Its
//! [`BoundingBox::to_region`] snapshot is the cubic [`Region`] that
//! seeds the next frame's octree. The snapshot is always a cube (the
//! shorter axes are padded) because the tree relies on clean 8-way
//! subdivision of its root.

use crate::simulation::states::NVec3;

/// Relative padding applied to the cube half-extent so that points on
/// the face of the tracked box land strictly inside the region.
const PAD: f64 = 1.0e-6;

/// An immutable cubic region of space: center plus half-width.
#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub center: NVec3,
    pub half: f64,
}

impl Region {
    pub fn new(center: NVec3, half: f64) -> Self {
        Self { center, half }
    }

    /// Edge length of the cube.
    pub fn size(&self) -> f64 {
        2.0 * self.half
    }

    pub fn contains(&self, p: &NVec3) -> bool {
        (p.x - self.center.x).abs() <= self.half
            && (p.y - self.center.y).abs() <= self.half
            && (p.z - self.center.z).abs() <= self.half
    }

    /// Octant index for a point, 3-bit encoded:
    /// bit 0 = x, bit 1 = y, bit 2 = z, set when the coordinate is `>=`
    /// the center on that axis. The `>=` tie-break is fixed: boundary
    /// coordinates always map to the positive half.
    pub fn octant_of(&self, p: &NVec3) -> usize {
        let mut idx = 0;
        if p.x >= self.center.x { idx |= 1; }
        if p.y >= self.center.y { idx |= 2; }
        if p.z >= self.center.z { idx |= 4; }
        idx
    }

    /// Sub-region for one of the eight child octants, using the same
    /// bit encoding as [`Region::octant_of`].
    pub fn child(&self, octant: usize) -> Region {
        let q = 0.5 * self.half;
        let offset = NVec3::new(
            if octant & 1 == 0 { -q } else { q },
            if octant & 2 == 0 { -q } else { q },
            if octant & 4 == 0 { -q } else { q },
        );
        Region { center: self.center + offset, half: q }
    }
}

/// Grow-only accumulator over observed particle positions.
#[derive(Debug, Clone)]
pub struct BoundingBox {
    min: NVec3,
    max: NVec3,
}

impl BoundingBox {
    pub fn new() -> Self {
        Self {
            min: NVec3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: NVec3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Clear the tracked extent back to empty.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Extend the tracked extent minimally to include `p`.
    pub fn update(&mut self, p: &NVec3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);

        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Snapshot the tracked extent as a cubic [`Region`].
    ///
    /// The cube is centered on the tracked box and its half-width is
    /// the largest per-axis half-extent, padded so every observed point
    /// is strictly interior. A degenerate extent (single point, or no
    /// updates at all) falls back to a unit half-width so the region is
    /// always usable as an octree root.
    pub fn to_region(&self) -> Region {
        if self.is_empty() {
            return Region::new(NVec3::zeros(), 1.0);
        }

        let center = (self.min + self.max) * 0.5;
        let half_extents = (self.max - self.min) * 0.5;
        let max_half = half_extents.x.max(half_extents.y).max(half_extents.z);

        let half = if max_half > 0.0 { max_half * (1.0 + PAD) } else { 1.0 };
        Region::new(center, half)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}
