pub mod states;
pub mod params;
pub mod error;
pub mod body;
pub mod cluster;
pub mod node;
pub mod root;
pub mod shared;
pub mod integrator;
pub mod forces;
pub mod engine;
pub mod scenario;
