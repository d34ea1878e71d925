use glam::Vec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{validate_gravity, validate_iterations, validate_time_step, ClothConfig};
use crate::constraints::distance::{solve_distance_constraints, DistanceConstraint};
use crate::constraints::sphere::SphereCollider;
use crate::error::ClothResult;
use crate::grid::ClothGrid;
use crate::mesh::{self, ClothVertex};
use crate::particle::ClothParticles;

/// Verlet cloth over a static sphere.
///
/// Owns the particle lattice, its distance constraints and the collider.
/// Storage is sized once in [`ClothSimulator::new`]; `initialize` rewrites
/// it in place.
pub struct ClothSimulator {
    pub particles: ClothParticles,
    config: ClothConfig,
    grid: ClothGrid,
    constraints: Vec<DistanceConstraint>,
    sphere: SphereCollider,
    anchor_index: usize,
    anchor_rest: Vec3,
}

impl ClothSimulator {
    pub fn new(config: ClothConfig) -> ClothResult<Self> {
        if let Err(err) = config.validate() {
            tracing::warn!(%err, "rejected cloth config");
            return Err(err);
        }

        let grid = ClothGrid::new(config.grid_size)?;
        let mut sim = Self {
            particles: ClothParticles::new(grid.particle_count()),
            constraints: Vec::with_capacity(grid.constraint_count()),
            sphere: SphereCollider::from(config.sphere_config()),
            anchor_index: grid.anchor_index(),
            anchor_rest: Vec3::ZERO,
            grid,
            config,
        };
        sim.initialize();
        Ok(sim)
    }

    /// Reset to the flat rest configuration.
    pub fn initialize(&mut self) {
        self.grid.layout(&mut self.particles);
        self.grid
            .build_constraints(&self.particles.position, &mut self.constraints);

        self.anchor_index = self.grid.anchor_index();
        self.anchor_rest = self.particles.position[self.anchor_index];

        tracing::debug!(
            grid_size = self.grid.size(),
            particles = self.particles.count,
            constraints = self.constraints.len(),
            "cloth initialized"
        );
    }

    /// Advance by `dt`: forces, Verlet integration, then constraint relaxation.
    ///
    /// `dt = 0` re-solves constraints without moving time. A negative or
    /// non-finite `dt` is ignored and leaves the state untouched.
    pub fn step(&mut self, dt: f32) {
        if !(dt.is_finite() && dt >= 0.0) {
            tracing::warn!(dt, "ignored step with invalid dt");
            return;
        }
        self.particles.accumulate_forces(self.config.gravity);
        self.particles.integrate(dt);
        self.satisfy_constraints();
    }

    /// Advance by the stored time step.
    pub fn advance(&mut self) {
        self.step(self.config.time_step);
    }

    fn satisfy_constraints(&mut self) {
        let positions = &mut self.particles.position;

        for iteration in 0..self.config.iterations {
            let skipped = solve_distance_constraints(&self.constraints, positions);
            if skipped > 0 {
                tracing::trace!(iteration, skipped, "skipped degenerate constraints");
            }
            self.sphere.resolve(positions);
        }

        if self.config.pin_anchor {
            positions[self.anchor_index] = self.anchor_rest;
        }
    }

    pub fn fill_vertex_buffer(&self, out: &mut [ClothVertex]) -> ClothResult<()> {
        mesh::fill_vertex_buffer(&self.grid, &self.particles.position, out)
    }

    pub fn vertices(&self) -> Vec<ClothVertex> {
        let n = self.grid.size();
        (0..n * n)
            .map(|p| mesh::vertex(&self.grid, &self.particles.position, p / n, p % n))
            .collect()
    }

    pub fn fill_index_buffer(&self, out: &mut [u32]) -> ClothResult<()> {
        mesh::fill_index_buffer(&self.grid, out)
    }

    pub fn indices(&self) -> Vec<u32> {
        let cells = self.grid.size() - 1;
        (0..cells * cells)
            .flat_map(|cell| mesh::cell_indices(&self.grid, cell / cells, cell % cells))
            .collect()
    }

    pub fn set_time_step(&mut self, dt: f32) -> ClothResult<()> {
        validate_time_step(dt)?;
        self.config.time_step = dt;
        tracing::debug!(dt, "time step updated");
        Ok(())
    }

    pub fn time_step(&self) -> f32 {
        self.config.time_step
    }

    pub fn set_gravity(&mut self, gravity: Vec3) -> ClothResult<()> {
        validate_gravity(gravity)?;
        self.config.gravity = gravity;
        Ok(())
    }

    pub fn set_iterations(&mut self, iterations: u32) -> ClothResult<()> {
        validate_iterations(iterations)?;
        self.config.iterations = iterations;
        Ok(())
    }

    pub fn set_pin_anchor(&mut self, pin: bool) {
        self.config.pin_anchor = pin;
    }

    /// Current position of the centre particle (a camera look-at target).
    pub fn anchor_position(&self) -> Vec3 {
        self.particles.position[self.anchor_index]
    }

    pub fn anchor_index(&self) -> usize {
        self.anchor_index
    }

    pub fn anchor_rest_position(&self) -> Vec3 {
        self.anchor_rest
    }

    pub fn config(&self) -> &ClothConfig {
        &self.config
    }

    pub fn grid(&self) -> &ClothGrid {
        &self.grid
    }

    pub fn grid_size(&self) -> usize {
        self.grid.size()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.count
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.particles.position
    }

    pub fn previous_positions(&self) -> &[Vec3] {
        &self.particles.previous
    }

    pub fn accelerations(&self) -> &[Vec3] {
        &self.particles.acceleration
    }

    pub fn constraints(&self) -> &[DistanceConstraint] {
        &self.constraints
    }

    pub fn sphere(&self) -> &SphereCollider {
        &self.sphere
    }
}

/// Step independent simulators by `dt`.
///
/// Each simulator's relaxation stays sequential; only whole instances run
/// concurrently.
pub fn step_all(sims: &mut [ClothSimulator], dt: f32) {
    #[cfg(feature = "parallel")]
    {
        sims.par_iter_mut().for_each(|sim| sim.step(dt));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for sim in sims.iter_mut() {
            sim.step(dt);
        }
    }
}
