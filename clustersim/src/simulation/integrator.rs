//! Time integration of a single particle.
//!
//! Explicit Euler on position followed by a linear velocity decay, driven by
//! the wall-clock time elapsed since the previous tick.

use crate::simulation::states::Particle;

impl Particle {
    /// Advance the particle by `elapsed` seconds.
    ///
    /// A particle slower than `min_velocity` on both axes is at rest: nothing
    /// changes and `false` is returned. Otherwise:
    /// - x_n+1 = x_n + dt * v_n
    /// - v_n+1 = v_n * (1 - deceleration_rate * dt)
    pub fn integrate(&mut self, elapsed: f64, min_velocity: f64) -> bool {
        if self.v.x.abs() < min_velocity && self.v.y.abs() < min_velocity {
            return false;
        }

        self.x += self.v * elapsed;

        let velocity_decrease_rate = self.deceleration_rate * elapsed;
        self.v *= 1.0 - velocity_decrease_rate;

        true
    }
}
