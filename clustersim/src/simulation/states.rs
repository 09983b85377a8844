//! Core state types for the particle simulation.
//!
//! Defines the particle and the material table entry it refers to.
//! Positions and velocities are `NVec2` (nalgebra, f64). The physics rules
//! acting on a particle live in `integrator` (movement) and `forces`
//! (collision, gravity, steering).

use std::fmt;

use nalgebra::Vector2;

use crate::simulation::body::Body;
use crate::simulation::params::DEFAULT_DECELERATION_RATE;

pub type NVec2 = Vector2<f64>;

/// Index into the material table supplied by the scenario
pub type MaterialId = u32;

/// Stable identity of a particle for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u32);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The part of a material the physics cares about (colors stay with the renderer)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub id: MaterialId,
    pub mass: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub x: NVec2, // position
    pub v: NVec2, // velocity per second
    pub m: f64, // mass, taken from the material
    pub radius: f64,
    pub material_id: MaterialId,
    pub deceleration_rate: f64, // fraction of the velocity removed per second
}

impl Particle {
    /// A particle at rest, decelerating at the default rate
    pub fn new(id: ParticleId, x: NVec2, radius: f64, material: &Material) -> Self {
        Self {
            id,
            x,
            v: NVec2::zeros(),
            m: material.mass,
            radius,
            material_id: material.id,
            deceleration_rate: DEFAULT_DECELERATION_RATE,
        }
    }
}

impl Body for Particle {
    fn position(&self) -> NVec2 {
        self.x
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn body_id(&self) -> Option<ParticleId> {
        Some(self.id)
    }
}
