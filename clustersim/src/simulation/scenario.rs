//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! (`Scenario`) containing:
//! - the canvas size and the uniform particle radius
//! - the material table (physics part plus renderer colors)
//! - numerical parameters (`Parameters`)
//! - the initial particles, randomly placed and typed from the seed
//!
//! The scenario is handed to `Engine::initialize` to build the tree, and is
//! inserted into Bevy as a `Resource` for the viewer.

use bevy::prelude::Resource;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::configuration::config::{MaterialConfig, ScenarioConfig};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Material, NVec2, Particle, ParticleId};

const DEFAULT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// A material as the whole application sees it: physics plus display color
#[derive(Debug, Clone, Copy)]
pub struct MaterialSpec {
    pub material: Material,
    pub color: [f32; 3],
}

#[derive(Resource, Debug, Clone)]
pub struct Scenario {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub materials: Vec<MaterialSpec>,
    pub parameters: Parameters,
    pub particles: Vec<Particle>,
}

/// Number of particles to create: none without materials, and never more
/// than there are particle ids
fn particle_amount(requested: usize, no_materials: bool) -> usize {
    if requested > 0 && no_materials {
        warn!(
            "{} particles requested but the material table is empty, starting an empty simulation",
            requested
        );
        return 0;
    }

    let max_ids = usize::try_from(u32::MAX).map_or(usize::MAX, |max| max.saturating_add(1));
    if requested > max_ids {
        warn!("{} particles requested, only {} ids exist; capping", requested, max_ids);
        return max_ids;
    }

    requested
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let defaults = Parameters::default();
        let parameters = Parameters {
            min_velocity: p_cfg.min_velocity.unwrap_or(defaults.min_velocity),
            deceleration_rate: p_cfg.deceleration_rate.unwrap_or(defaults.deceleration_rate),
            energy_waste_rate: p_cfg.energy_waste_rate.unwrap_or(defaults.energy_waste_rate),
            pushback_duration: p_cfg.pushback_duration.unwrap_or(defaults.pushback_duration),
            gravity: p_cfg.gravity.unwrap_or(defaults.gravity),
            gravity_constant: p_cfg.gravity_constant.unwrap_or(defaults.gravity_constant),
            gravity_influence_ratio: p_cfg
                .gravity_influence_ratio
                .unwrap_or(defaults.gravity_influence_ratio),
            gravity_reach: p_cfg.gravity_reach.unwrap_or(defaults.gravity_reach),
            mouse_velocity: p_cfg.mouse_velocity.unwrap_or(defaults.mouse_velocity),
            tick_interval_ms: p_cfg.tick_interval_ms.unwrap_or(defaults.tick_interval_ms),
            seed: p_cfg.seed.unwrap_or(defaults.seed),
        };

        // Materials: map `MaterialConfig` -> physics material + color
        let materials: Vec<MaterialSpec> = cfg
            .particles
            .materials
            .iter()
            .map(|mc: &MaterialConfig| MaterialSpec {
                material: Material {
                    id: mc.id,
                    mass: mc.mass,
                },
                color: mc.color.unwrap_or(DEFAULT_COLOR),
            })
            .collect();

        let width = cfg.canvas.width.max(0.0);
        let height = cfg.canvas.height.max(0.0);
        let radius = cfg.particles.radius;

        let amount = particle_amount(cfg.particles.amount, materials.is_empty());

        // Particles: uniform over the canvas centered on the origin
        let mut rng = StdRng::seed_from_u64(parameters.seed);
        let particles: Vec<Particle> = (0..=u32::MAX)
            .take(amount)
            .map(|i| {
                let x = NVec2::new(
                    rng.gen::<f64>() * width - width / 2.0,
                    rng.gen::<f64>() * height - height / 2.0,
                );
                let spec = &materials[rng.gen_range(0..materials.len())];
                let mut particle = Particle::new(ParticleId(i), x, radius, &spec.material);
                particle.deceleration_rate = parameters.deceleration_rate;
                particle
            })
            .collect();

        info!(
            "scenario: {} particles on a {}x{} canvas, {} materials, gravity {}",
            particles.len(),
            width,
            height,
            materials.len(),
            if parameters.gravity { "on" } else { "off" }
        );

        Self {
            width,
            height,
            radius,
            materials,
            parameters,
            particles,
        }
    }

    /// Renderer color of a material id, white when unknown
    pub fn color_of(&self, material_id: u32) -> [f32; 3] {
        self.materials
            .iter()
            .find(|spec| spec.material.id == material_id)
            .map(|spec| spec.color)
            .unwrap_or(DEFAULT_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::particle_amount;

    #[test]
    fn amount_is_zero_without_materials() {
        assert_eq!(particle_amount(5, true), 0);
        assert_eq!(particle_amount(0, true), 0);
        assert_eq!(particle_amount(5, false), 5);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn amount_is_capped_at_the_number_of_ids() {
        let ids = u32::MAX as usize + 1;
        assert_eq!(particle_amount(ids, false), ids);
        assert_eq!(particle_amount(ids + 7, false), ids);
        assert_eq!(particle_amount(usize::MAX, false), ids);
    }
}
