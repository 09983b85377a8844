//! Leaf of the cluster tree: one particle plus the back-link to its parent.
//!
//! `parent_cluster` is `None` exactly when the leaf is the tree root or is not
//! in the tree at all; the root tells those two apart.

use crate::simulation::body::Body;
use crate::simulation::cluster::ClusterId;
use crate::simulation::states::{NVec2, Particle, ParticleId};

#[derive(Debug, Clone)]
pub struct Node {
    pub particle: Particle,
    pub parent_cluster: Option<ClusterId>,
}

impl Node {
    pub fn new(particle: Particle) -> Self {
        Self {
            particle,
            parent_cluster: None,
        }
    }
}

impl Body for Node {
    fn position(&self) -> NVec2 {
        self.particle.x
    }

    fn radius(&self) -> f64 {
        self.particle.radius
    }

    fn body_id(&self) -> Option<ParticleId> {
        Some(self.particle.id)
    }
}
