//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`CanvasConfig`]     – size of the area particles are spread over
//! - [`ParticlesConfig`]  – population size, radius and material table
//! - [`ParametersConfig`] – physics tunables, every one of them optional
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario matching these types:
//!
//! ```yaml
//! canvas:
//!   width: 800.0
//!   height: 600.0
//!
//! particles:
//!   amount: 2000
//!   radius: 3.0
//!   materials:
//!     - id: 0
//!       mass: 1.0
//!       color: [0.9, 0.3, 0.2]   # renderer only
//!     - id: 1
//!       mass: 4.0
//!
//! parameters:
//!   min_velocity: 0.01          # per-axis speed under which a particle rests
//!   deceleration_rate: 0.8      # fraction of velocity lost per second
//!   energy_waste_rate: 0.2      # fraction of bounce velocity lost on impact
//!   pushback_duration: 0.1      # seconds to push apart an overlap of one radius
//!   gravity: false
//!   gravity_constant: 20.0
//!   gravity_influence_ratio: 1.0
//!   gravity_reach: 0.0
//!   mouse_velocity: 200.0
//!   tick_interval_ms: 5
//!   seed: 42
//! ```
//!
//! The scenario builder maps this configuration into the runtime
//! [`Parameters`](crate::simulation::params::Parameters) and particle list,
//! filling missing parameters with their defaults.

use serde::Deserialize;

/// Area particles are placed in, centered on the origin
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
}

/// One entry of the material table
#[derive(Deserialize, Debug, Clone)]
pub struct MaterialConfig {
    pub id: u32,
    pub mass: f64,
    pub color: Option<[f32; 3]>, // rgb in 0..1, only used by the viewer
}

#[derive(Deserialize, Debug, Clone)]
pub struct ParticlesConfig {
    pub amount: usize, // fixed population size
    pub radius: f64, // same radius for every particle
    #[serde(default)]
    pub materials: Vec<MaterialConfig>,
}

/// Physics tunables; anything left out falls back to its default
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ParametersConfig {
    pub min_velocity: Option<f64>,
    pub deceleration_rate: Option<f64>,
    pub energy_waste_rate: Option<f64>,
    pub pushback_duration: Option<f64>,
    pub gravity: Option<bool>,
    pub gravity_constant: Option<f64>,
    pub gravity_influence_ratio: Option<f64>,
    pub gravity_reach: Option<f64>,
    pub mouse_velocity: Option<f64>,
    pub tick_interval_ms: Option<u64>,
    pub seed: Option<u64>,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub canvas: CanvasConfig,
    pub particles: ParticlesConfig,
    #[serde(default)]
    pub parameters: ParametersConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
