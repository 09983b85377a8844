//! Column buffers shared between the simulation thread and the renderer.
//!
//! Three parallel, pre-allocated columns (position X, position Y, material
//! id) sized to the maximum particle count, plus a `current_length`
//! watermark. The simulation is the only writer and writes in place without
//! locking; every value is a single relaxed atomic store, so a reader may see
//! a row that is a tick behind or half-updated across columns, but never a
//! torn value. Readers only look at `[0, current_length)`.
//!
//! Positions are published as `f32`, which is what the renderer consumes.
//! Cloning a [`SharedBuffers`] shares the same memory.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::simulation::error::{Result, SimError};
use crate::simulation::states::{MaterialId, Particle};

#[derive(Debug)]
struct Columns {
    positions_x: Box<[AtomicU32]>, // f32 bit patterns
    positions_y: Box<[AtomicU32]>, // f32 bit patterns
    material_ids: Box<[AtomicU32]>,
    current_length: AtomicUsize,
}

/// One published row, as seen by a reader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedRow {
    pub x: f32,
    pub y: f32,
    pub material_id: MaterialId,
}

#[derive(Debug, Clone)]
pub struct SharedBuffers {
    columns: Arc<Columns>,
}

fn zeroed_column(length: usize) -> Box<[AtomicU32]> {
    (0..length).map(|_| AtomicU32::new(0)).collect()
}

impl SharedBuffers {
    pub fn new(max_length: usize) -> Self {
        Self {
            columns: Arc::new(Columns {
                positions_x: zeroed_column(max_length),
                positions_y: zeroed_column(max_length),
                material_ids: zeroed_column(max_length),
                current_length: AtomicUsize::new(0),
            }),
        }
    }

    pub fn max_length(&self) -> usize {
        self.columns.positions_x.len()
    }

    /// Number of leading rows that have been published at least once
    pub fn current_length(&self) -> usize {
        self.columns.current_length.load(Ordering::Acquire)
    }

    /// Publish `particle` at `slot`. The watermark only ever grows.
    pub fn set(&self, slot: usize, particle: &Particle) -> Result<()> {
        let max_length = self.max_length();
        if slot >= max_length {
            return Err(SimError::CapacityExceeded { slot, max_length });
        }

        let columns = &*self.columns;
        columns.positions_x[slot].store((particle.x.x as f32).to_bits(), Ordering::Relaxed);
        columns.positions_y[slot].store((particle.x.y as f32).to_bits(), Ordering::Relaxed);
        columns.material_ids[slot].store(particle.material_id, Ordering::Relaxed);
        columns.current_length.fetch_max(slot + 1, Ordering::Release);

        Ok(())
    }

    /// Row at `slot`, or `None` past the watermark
    pub fn row(&self, slot: usize) -> Option<SharedRow> {
        if slot >= self.current_length() {
            return None;
        }

        let columns = &*self.columns;
        Some(SharedRow {
            x: f32::from_bits(columns.positions_x[slot].load(Ordering::Relaxed)),
            y: f32::from_bits(columns.positions_y[slot].load(Ordering::Relaxed)),
            material_id: columns.material_ids[slot].load(Ordering::Relaxed),
        })
    }

    /// All rows under the watermark, read in place
    pub fn rows(&self) -> impl Iterator<Item = SharedRow> + '_ {
        (0..self.current_length()).filter_map(move |slot| self.row(slot))
    }
}
