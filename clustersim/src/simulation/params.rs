//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds the runtime tunables:
//! - velocity cutoff and deceleration,
//! - collision inelasticity and pushback duration,
//! - gravity switch, strength, influence ratio and reach,
//! - pointer-driven velocity, tick cadence and random seed

/// Below this speed on both axes a particle is considered at rest
pub const MIN_VELOCITY_PER_SECOND: f64 = 0.01;
pub const DEFAULT_DECELERATION_RATE: f64 = 0.8;
pub const DEFAULT_ENERGY_WASTE_RATE: f64 = 0.2;
pub const DEFAULT_PUSHBACK_DURATION: f64 = 0.1;
pub const DEFAULT_GRAVITY_CONSTANT: f64 = 20.0;
pub const DEFAULT_GRAVITY_INFLUENCE_RATIO: f64 = 1.0;
pub const DEFAULT_MOUSE_VELOCITY: f64 = 200.0;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub min_velocity: f64, // per-axis speed under which a particle is at rest
    pub deceleration_rate: f64, // fraction of velocity removed per second
    pub energy_waste_rate: f64, // fraction of bounce velocity lost on impact
    pub pushback_duration: f64, // seconds to resolve an overlap of one radius
    pub gravity: bool, // clusters attract the bodies they overlap
    pub gravity_constant: f64, // max velocity per second gained toward a cluster
    pub gravity_influence_ratio: f64, // minimum mass / distance for a cluster to attract
    pub gravity_reach: f64, // extra radius used when looking for attracting clusters
    pub mouse_velocity: f64, // max velocity per second of a dragged particle
    pub tick_interval_ms: u64, // simulation cadence
    pub seed: u64, // placement seed
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            min_velocity: MIN_VELOCITY_PER_SECOND,
            deceleration_rate: DEFAULT_DECELERATION_RATE,
            energy_waste_rate: DEFAULT_ENERGY_WASTE_RATE,
            pushback_duration: DEFAULT_PUSHBACK_DURATION,
            gravity: false,
            gravity_constant: DEFAULT_GRAVITY_CONSTANT,
            gravity_influence_ratio: DEFAULT_GRAVITY_INFLUENCE_RATIO,
            gravity_reach: 0.0,
            mouse_velocity: DEFAULT_MOUSE_VELOCITY,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            seed: 42,
        }
    }
}
