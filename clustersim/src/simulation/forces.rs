//! Velocity and position responses of a particle to its influences
//!
//! - collision with another particle: impulse transfer plus a rate-limited
//!   positional pushback,
//! - gravity from a cluster: velocity set toward its centroid,
//! - steering toward an arbitrary point (pointer drag).
//!
//! Every cap here is applied per axis as `min(|delta|, cap) * sign(delta)`.
//! Capping each axis on its own changes the direction of travel.

use crate::simulation::body::Body;
use crate::simulation::params::Parameters;
use crate::simulation::states::{NVec2, Particle};

/// `min(|delta|, cap)` with the sign of `delta`
pub fn capped(delta: f64, cap: f64) -> f64 {
    if delta == 0.0 {
        return 0.0;
    }
    delta.abs().min(cap).copysign(delta)
}

fn capped_towards(from: NVec2, to: NVec2, cap: f64) -> NVec2 {
    let delta = to - from;
    NVec2::new(capped(delta.x, cap), capped(delta.y, cap))
}

impl Particle {
    /// Resolve a collision with `other` during a tick of `elapsed` seconds.
    ///
    /// The pushback rate `other.m / (m + other.m)` splits the impact: on each
    /// axis where this particle is heading toward `other`, `1 - rate` of the
    /// velocity is handed to `other` and the rest bounces back, minus the
    /// energy wasted on impact. Separately, the particle is pushed away from
    /// `other` by at most `other.radius / pushback_duration` per second, so
    /// deep overlaps are resolved over time instead of exploding.
    pub fn update_from_collision(&mut self, other: &mut Particle, elapsed: f64, params: &Parameters) {
        let pushback_rate = other.m / (self.m + other.m);
        let towards_other = other.x - self.x;
        let max_pushback = other.radius / params.pushback_duration * elapsed;

        for axis in 0..2 {
            let velocity = self.v[axis];
            let direction = towards_other[axis];

            let heading_to_other = (velocity > 0.0 && direction > 0.0) || (velocity < 0.0 && direction < 0.0);
            if heading_to_other {
                other.v[axis] += velocity * (1.0 - pushback_rate);
                self.v[axis] = -velocity * pushback_rate * (1.0 - params.energy_waste_rate);
            }

            self.x[axis] += capped(-direction, max_pushback);
        }
    }

    /// Replace the velocity with a pull toward `source`'s center, capped at
    /// `gravity_constant * elapsed` per axis
    pub fn apply_gravitational_influence<B>(&mut self, source: &B, elapsed: f64, params: &Parameters)
    where
        B: Body + ?Sized,
    {
        self.v = capped_towards(self.x, source.position(), params.gravity_constant * elapsed);
    }

    /// Replace the velocity with one heading to `target`, capped at
    /// `velocity_per_second` per axis
    pub fn set_velocity_towards(&mut self, target: NVec2, velocity_per_second: f64) {
        self.v = capped_towards(self.x, target, velocity_per_second);
    }
}

#[cfg(test)]
mod tests {
    use super::capped;

    #[test]
    fn capped_keeps_sign_and_clamps_magnitude() {
        assert_eq!(capped(5.0, 2.0), 2.0);
        assert_eq!(capped(-5.0, 2.0), -2.0);
        assert_eq!(capped(0.5, 2.0), 0.5);
        assert_eq!(capped(-0.5, 2.0), -0.5);
        assert_eq!(capped(0.0, 2.0), 0.0);
    }
}
