use glam::Vec3;

use crate::constraints::distance::{ConstraintKind, DistanceConstraint};
use crate::error::{ClothError, ClothResult};
use crate::particle::ClothParticles;

/// Edge length of the cloth square in world units.
pub const SURFACE_SIZE: f32 = 1.0;

/// Square particle lattice, stored row-major (`row * size + column`).
///
/// The cloth lies flat at `y = 0`, centred on the origin, spanning
/// `[-0.5, 0.5]` in X (columns) and Z (rows).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClothGrid {
    size: usize,
}

impl ClothGrid {
    /// Lattice of `size` particles per side; needs at least 2.
    pub fn new(size: usize) -> ClothResult<Self> {
        if size < 2 {
            return Err(ClothError::InvalidConfig(format!(
                "grid_size must be at least 2, got {size}"
            )));
        }
        Ok(Self { size })
    }

    /// Particles per side.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.size * self.size
    }

    #[inline]
    pub fn index(&self, row: usize, column: usize) -> usize {
        row * self.size + column
    }

    /// Distance between neighbouring particles at rest.
    #[inline]
    pub fn spacing(&self) -> f32 {
        SURFACE_SIZE / (self.size - 1) as f32
    }

    pub fn rest_position(&self, row: usize, column: usize) -> Vec3 {
        let spacing = self.spacing();
        let half = SURFACE_SIZE * 0.5;
        Vec3::new(spacing * column as f32 - half, 0.0, spacing * row as f32 - half)
    }

    /// The particle nearest the middle of the cloth.
    pub fn anchor_index(&self) -> usize {
        self.index(self.size / 2, (self.size - 1) / 2)
    }

    /// `2N(N-1)` structural + `(N-1)^2` shear + `2N(N-2)` bend.
    pub fn constraint_count(&self) -> usize {
        let n = self.size;
        2 * n * (n - 1) + (n - 1) * (n - 1) + 2 * n * n.saturating_sub(2)
    }

    pub fn triangle_count(&self) -> usize {
        2 * (self.size - 1) * (self.size - 1)
    }

    pub fn index_count(&self) -> usize {
        3 * self.triangle_count()
    }

    /// Reset every particle to its rest position with zero velocity.
    pub fn layout(&self, particles: &mut ClothParticles) {
        for row in 0..self.size {
            for column in 0..self.size {
                particles.place(self.index(row, column), self.rest_position(row, column));
            }
        }
    }

    /// Rebuild the constraint list from rest positions.
    ///
    /// Order is fixed: horizontal, vertical, shear, then horizontal and
    /// vertical bend. The relaxation is sequential, so this order is part of
    /// the simulation's observable output.
    pub fn build_constraints(&self, positions: &[Vec3], constraints: &mut Vec<DistanceConstraint>) {
        let n = self.size;
        constraints.clear();

        let mut link = |a: usize, b: usize, kind: ConstraintKind| {
            constraints.push(DistanceConstraint::at_rest(positions, a as u32, b as u32, kind));
        };

        // structural: preserves size
        for row in 0..n {
            for column in 0..n - 1 {
                let i = self.index(row, column);
                link(i, i + 1, ConstraintKind::Horizontal);
            }
        }
        for row in 0..n - 1 {
            for column in 0..n {
                let i = self.index(row, column);
                link(i, i + n, ConstraintKind::Vertical);
            }
        }

        // shear: top-right to bottom-left, the diagonal each cell's triangles share
        for row in 0..n - 1 {
            for column in 1..n {
                let i = self.index(row, column);
                link(i, i + n - 1, ConstraintKind::Shear);
            }
        }

        // bend: two steps apart, preserves stiffness
        for row in 0..n {
            for column in 0..n.saturating_sub(2) {
                let i = self.index(row, column);
                link(i, i + 2, ConstraintKind::Bend);
            }
        }
        for row in 0..n.saturating_sub(2) {
            for column in 0..n {
                let i = self.index(row, column);
                link(i, i + 2 * n, ConstraintKind::Bend);
            }
        }
    }
}
