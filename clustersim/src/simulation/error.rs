//! Error types for the cluster tree and the shared publication buffer.
//!
//! Every variant is a usage or invariant violation: the operation is aborted
//! before any state is mutated. "Not present" outcomes (detached nodes, empty
//! trees, unknown ids) are not errors and never show up here.

use thiserror::Error;

use crate::simulation::states::ParticleId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("cannot set a particle at slot {slot} because the max amount is {max_length}")]
    CapacityExceeded { slot: usize, max_length: usize },

    #[error("slot {0} was never added")]
    UnknownSlot(usize),

    #[error("slot {0} is already occupied")]
    SlotOccupied(usize),

    #[error("particle {0} is already registered")]
    DuplicateParticle(ParticleId),

    #[error("node at slot {0} is already part of the tree")]
    AlreadyInTree(usize),

    #[error("cluster tree is corrupted: {0}")]
    TreeCorrupted(String),

    #[error("simulation thread panicked")]
    EnginePanicked,
}

pub type Result<T> = std::result::Result<T, SimError>;
