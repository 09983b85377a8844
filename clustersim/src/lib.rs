pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Material, MaterialId, NVec2, Particle, ParticleId};
pub use simulation::body::{distance_between_centers, does_collide, Body, Circle};
pub use simulation::cluster::{compute_boundaries, Cluster, ClusterId, TreeRef};
pub use simulation::node::Node;
pub use simulation::root::{cost_of_adding, Influence, Root, TickStats};
pub use simulation::shared::{SharedBuffers, SharedRow};
pub use simulation::params::Parameters;
pub use simulation::error::SimError;
pub use simulation::engine::{run_headless, spawn_engine, Engine, EngineHandle, Request};
pub use simulation::scenario::{MaterialSpec, Scenario};

pub use configuration::config::{CanvasConfig, MaterialConfig, ParametersConfig, ParticlesConfig, ScenarioConfig};

pub use visualization::clustersim_vis2d::run_2d;

pub use benchmark::benchmark::{bench_insert, bench_query, bench_tick};
