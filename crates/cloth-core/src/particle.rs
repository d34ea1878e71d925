use glam::Vec3;

/// SoA particle storage for the cloth lattice.
///
/// All three arrays are index-aligned and sized once; unit mass is implied.
pub struct ClothParticles {
    pub count: usize,
    /// Current positions.
    pub position: Vec<Vec3>,
    /// Positions one step back (Verlet history).
    pub previous: Vec<Vec3>,
    /// Force accumulator, overwritten every step.
    pub acceleration: Vec<Vec3>,
}

impl ClothParticles {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            position: vec![Vec3::ZERO; count],
            previous: vec![Vec3::ZERO; count],
            acceleration: vec![Vec3::ZERO; count],
        }
    }

    /// Place particle `i` at `p` with zero implicit velocity.
    pub fn place(&mut self, i: usize, p: Vec3) {
        self.position[i] = p;
        self.previous[i] = p;
        self.acceleration[i] = Vec3::ZERO;
    }

    /// Set every acceleration to `gravity`, discarding last step's value.
    pub fn accumulate_forces(&mut self, gravity: Vec3) {
        for acc in self.acceleration.iter_mut() {
            *acc = gravity;
        }
    }

    /// Position Verlet: `x' = x + (x - x_prev) + a * dt^2`.
    pub fn integrate(&mut self, dt: f32) {
        let dt_sq = dt * dt;
        for i in 0..self.count {
            let pos = self.position[i];
            let next = pos + (pos - self.previous[i]) + self.acceleration[i] * dt_sq;
            self.previous[i] = pos;
            self.position[i] = next;
        }
    }
}
