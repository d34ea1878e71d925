use glam::Vec3;

use crate::config::SphereConfig;

/// Static sphere collider with a clearance margin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereCollider {
    pub center: Vec3,
    pub radius: f32,
    pub margin: f32,
}

impl SphereCollider {
    pub fn new(center: Vec3, radius: f32, margin: f32) -> Self {
        Self {
            center,
            radius,
            margin,
        }
    }

    /// Radius particles are kept outside of.
    #[inline]
    pub fn effective_radius(&self) -> f32 {
        self.radius + self.margin
    }

    /// Project every particle inside the offset surface radially onto it.
    ///
    /// Only current positions move; the Verlet history is left alone, so the
    /// push shows up as velocity on the next step. A particle exactly at the
    /// centre is pushed straight up. Non-finite positions are left alone.
    ///
    /// Returns the number of particles moved.
    pub fn resolve(&self, positions: &mut [Vec3]) -> usize {
        let min_length = self.effective_radius();
        let mut resolved = 0;

        for p in positions.iter_mut() {
            let offset = *p - self.center;
            let length = offset.length();
            // Also skips NaN lengths, which have no direction to push along.
            if !(length < min_length) {
                continue;
            }

            *p = if length > 0.0 {
                self.center + offset * (min_length / length)
            } else {
                self.center + Vec3::Y * min_length
            };
            resolved += 1;
        }

        resolved
    }
}

impl From<SphereConfig> for SphereCollider {
    fn from(config: SphereConfig) -> Self {
        Self::new(config.center, config.radius, config.margin)
    }
}
