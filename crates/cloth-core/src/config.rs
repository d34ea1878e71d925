use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ClothError, ClothResult};
use crate::grid::ClothGrid;

/// Radius of the default collision sphere.
pub const DEFAULT_SPHERE_RADIUS: f32 = 0.3;

/// Static sphere the cloth drapes over.
///
/// The effective collision radius is `radius + margin`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereConfig {
    pub center: Vec3,
    pub radius: f32,
    pub margin: f32,
}

impl SphereConfig {
    /// Sphere sized for a grid of `grid_size` particles per side.
    ///
    /// The margin shrinks with the particle spacing and the centre sits just
    /// below the cloth plane, so the offset surface touches the origin.
    pub fn for_grid(grid_size: usize) -> Self {
        let radius = DEFAULT_SPHERE_RADIUS;
        let margin = DEFAULT_SPHERE_RADIUS / grid_size.max(1) as f32;
        Self {
            center: Vec3::new(0.0, -radius - margin, 0.0),
            radius,
            margin,
        }
    }
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self::for_grid(ClothConfig::DEFAULT_GRID_SIZE)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothConfig {
    /// Particles per side of the square lattice.
    pub grid_size: usize,
    /// Relaxation passes per step.
    pub iterations: u32,
    pub gravity: Vec3,
    /// Default step used by `ClothSimulator::advance`.
    pub time_step: f32,
    /// Collider override. When absent the sphere is sized for `grid_size`.
    pub sphere: Option<SphereConfig>,
    /// Re-pin the anchor particle to its rest position after every step.
    pub pin_anchor: bool,
}

impl ClothConfig {
    pub const DEFAULT_GRID_SIZE: usize = 64;

    /// Default config for a grid of `grid_size` per side.
    pub fn with_grid_size(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// The collider this config describes: the override if set, otherwise
    /// the default sphere with its margin scaled to the grid.
    pub fn sphere_config(&self) -> SphereConfig {
        self.sphere
            .unwrap_or_else(|| SphereConfig::for_grid(self.grid_size))
    }

    /// No gravity: a cloth started from rest stays there.
    pub fn weightless(grid_size: usize) -> Self {
        Self {
            gravity: Vec3::ZERO,
            ..Self::with_grid_size(grid_size)
        }
    }

    pub fn validate(&self) -> ClothResult<()> {
        ClothGrid::new(self.grid_size)?;
        // Indices are emitted as u32.
        if self.grid_size.checked_mul(self.grid_size).map_or(true, |n| n > u32::MAX as usize) {
            return Err(ClothError::InvalidConfig(format!(
                "grid_size {} overflows the u32 index range",
                self.grid_size
            )));
        }
        validate_time_step(self.time_step)?;
        validate_iterations(self.iterations)?;
        validate_gravity(self.gravity)?;
        let sphere = self.sphere_config();
        if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
            return Err(ClothError::InvalidConfig(format!(
                "sphere radius must be positive, got {}",
                sphere.radius
            )));
        }
        if !(sphere.margin.is_finite() && sphere.margin >= 0.0) {
            return Err(ClothError::InvalidConfig(format!(
                "sphere margin must be non-negative, got {}",
                sphere.margin
            )));
        }
        if !sphere.center.is_finite() {
            return Err(ClothError::InvalidConfig(format!(
                "sphere center must be finite, got {}",
                sphere.center
            )));
        }
        Ok(())
    }
}

impl Default for ClothConfig {
    fn default() -> Self {
        Self {
            grid_size: Self::DEFAULT_GRID_SIZE,
            iterations: 1,
            gravity: Vec3::new(0.0, -2.0, 0.0),
            time_step: 0.002,
            sphere: None,
            pin_anchor: false,
        }
    }
}

pub(crate) fn validate_time_step(dt: f32) -> ClothResult<()> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(ClothError::InvalidConfig(format!(
            "time_step must be positive and finite, got {dt}"
        )))
    }
}

pub(crate) fn validate_iterations(iterations: u32) -> ClothResult<()> {
    if iterations == 0 {
        return Err(ClothError::InvalidConfig(
            "iterations must be at least 1".into(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_gravity(gravity: Vec3) -> ClothResult<()> {
    if !gravity.is_finite() {
        return Err(ClothError::InvalidConfig(format!(
            "gravity must be finite, got {gravity}"
        )));
    }
    Ok(())
}
