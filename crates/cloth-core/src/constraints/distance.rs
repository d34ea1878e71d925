use glam::Vec3;

/// Lengths at or below this are treated as coincident particles.
pub const DEGENERATE_EPSILON: f32 = 1e-10;

/// Topological category of a distance constraint.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConstraintKind {
    /// Adjacent columns, same row.
    Horizontal,
    /// Adjacent rows, same column.
    Vertical,
    /// One cell diagonal, along the triangulation's shared edge.
    Shear,
    /// Two apart in a row or column.
    Bend,
}

/// Infinitely stiff distance constraint between two particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceConstraint {
    /// Particle index A.
    pub a: u32,
    /// Particle index B.
    pub b: u32,
    /// Separation in the undeformed grid.
    pub rest_length: f32,
    pub kind: ConstraintKind,
}

impl DistanceConstraint {
    pub fn new(a: u32, b: u32, rest_length: f32, kind: ConstraintKind) -> Self {
        Self {
            a,
            b,
            rest_length,
            kind,
        }
    }

    /// Constraint whose rest length is the current distance between `a` and `b`.
    pub fn at_rest(positions: &[Vec3], a: u32, b: u32, kind: ConstraintKind) -> Self {
        let rest_length = positions[a as usize].distance(positions[b as usize]);
        Self::new(a, b, rest_length, kind)
    }
}

/// One Gauss-Seidel sweep over `constraints`, in order.
///
/// Each constraint moves both particles half-way toward the rest length,
/// in place, so later constraints see earlier corrections. Coincident or
/// non-finite pairs have no direction to correct along and are skipped.
///
/// Returns the number of skipped constraints.
pub fn solve_distance_constraints(
    constraints: &[DistanceConstraint],
    positions: &mut [Vec3],
) -> usize {
    let mut skipped = 0;

    for c in constraints {
        let a = c.a as usize;
        let b = c.b as usize;

        let delta = positions[b] - positions[a];
        let length = delta.length();
        // NaN lengths fail the comparison and are skipped too.
        if !(length > DEGENERATE_EPSILON) {
            skipped += 1;
            continue;
        }

        let difference = 0.5 * (length - c.rest_length) / length;
        positions[a] += delta * difference;
        positions[b] -= delta * difference;
    }

    skipped
}
