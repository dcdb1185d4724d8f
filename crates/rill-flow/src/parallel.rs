//! Data-parallel flow pass: one unit of work per interior cell.
//!
//! Units of work run on a rayon pool with no ordering between them. The
//! rule is the same as the sequential pass; what differs is how writes to
//! shared neighbour cells are reconciled, selected by
//! [`AccumulationMode`]:
//!
//! - [`DoubleBuffer`]: reads from a frozen snapshot, writes into a second
//!   buffer. Phase one records every cell's [`Outflow`]; phase two has each
//!   output cell gather the fractions its upstream neighbours sent it, in
//!   fixed offset order. No cell is written by two units of work, so the
//!   result is bit-identical for any thread count or schedule.
//! - [`SharedWater`]: a single buffer of `f32` bits in `AtomicU32` cells,
//!   read and written with relaxed loads and stores. Increments are plain
//!   load-then-store, not atomic read-modify-write, so two units of work
//!   touching the same cell can lose or duplicate an update. Mass drifts by
//!   a bounded amount; depth never goes negative because every stored value
//!   is non-negative.
//!
//! The return of each `for_each`/`reduce` is the barrier between passes.

use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;
use rill_core::{AccumulationMode, Backend, GridError, GridSize, NEIGHBOUR_COUNT};

use crate::rule::{evaluate, Outflow, PassStats};
use crate::solver::FlowSolver;

/// Run one parallel pass on rayon's global pool with the default epsilon.
///
/// # Errors
///
/// Returns [`GridError`] before touching `water` if `size < 3` or either
/// buffer does not hold `size * size` cells.
pub fn parallel_flow_step(
    size: usize,
    height: &[f32],
    water: &mut [f32],
    mode: AccumulationMode,
) -> Result<(), GridError> {
    FlowSolver::for_backend(Backend::Parallel(mode))
        .run(size, height, water, 1)
        .map(|_| ())
}

/// Ping-pong buffers for the read/write-split mode.
#[derive(Debug, Default)]
pub(crate) struct DoubleBuffer {
    front: Vec<f32>,
    back: Vec<f32>,
    outflows: Vec<Option<Outflow>>,
}

impl DoubleBuffer {
    /// Take a copy of the caller's water as the first snapshot.
    pub(crate) fn load(&mut self, water: &[f32]) {
        self.front.clear();
        self.front.extend_from_slice(water);
        self.back.resize(water.len(), 0.0);
        self.outflows.resize(water.len(), None);
    }

    /// Copy the latest snapshot back into the caller's buffer.
    pub(crate) fn store(&self, water: &mut [f32]) {
        water.copy_from_slice(&self.front);
    }

    /// One Jacobi-style pass; the output becomes the next snapshot.
    pub(crate) fn pass(&mut self, grid: &GridSize, height: &[f32], epsilon: f32) -> PassStats {
        let offsets = grid.offsets();
        let cell_count = grid.cell_count();

        let front = &self.front;
        self.outflows
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, slot)| {
                *slot = if grid.is_interior(i) {
                    evaluate(i, height, |j| front[j], offsets, epsilon)
                } else {
                    None
                };
            });

        let outflows = &self.outflows;
        self.back.par_iter_mut().enumerate().for_each(|(i, dst)| {
            let mut value = match &outflows[i] {
                Some(own) => own.remaining,
                None => front[i],
            };
            for slot in 0..NEIGHBOUR_COUNT {
                if let Some(src) = offsets.source_of(i, slot, cell_count) {
                    if let Some(upstream) = &outflows[src] {
                        if upstream.sends_to(slot) {
                            value += upstream.fraction;
                        }
                    }
                }
            }
            *dst = value;
        });

        std::mem::swap(&mut self.front, &mut self.back);

        self.outflows
            .par_iter()
            .flatten()
            .map(PassStats::from)
            .reduce(PassStats::default, PassStats::merge)
    }
}

/// Shared buffer for the direct-accumulation mode.
#[derive(Debug, Default)]
pub(crate) struct SharedWater {
    cells: Vec<AtomicU32>,
}

impl SharedWater {
    pub(crate) fn load(&mut self, water: &[f32]) {
        self.cells.clear();
        self.cells
            .extend(water.iter().map(|w| AtomicU32::new(w.to_bits())));
    }

    pub(crate) fn store(&self, water: &mut [f32]) {
        for (dst, cell) in water.iter_mut().zip(&self.cells) {
            *dst = f32::from_bits(cell.load(Ordering::Relaxed));
        }
    }

    #[inline]
    fn get(&self, i: usize) -> f32 {
        f32::from_bits(self.cells[i].load(Ordering::Relaxed))
    }

    #[inline]
    fn set(&self, i: usize, value: f32) {
        self.cells[i].store(value.to_bits(), Ordering::Relaxed);
    }

    /// One racy pass. Deterministic only when no two sources share a
    /// downstream cell or read each other.
    pub(crate) fn pass(&self, grid: &GridSize, height: &[f32], epsilon: f32) -> PassStats {
        let offsets = grid.offsets();
        (0..grid.interior_count())
            .into_par_iter()
            .map(|k| {
                let ptr = grid.interior_index(k);
                let Some(outflow) = evaluate(ptr, height, |j| self.get(j), offsets, epsilon)
                else {
                    return PassStats::default();
                };
                self.set(ptr, outflow.remaining);
                for slot in 0..NEIGHBOUR_COUNT {
                    if outflow.sends_to(slot) {
                        let j = offsets.neighbour(ptr, slot);
                        // Unsynchronised increment: a concurrent store to
                        // `j` between these two calls is overwritten.
                        self.set(j, self.get(j) + outflow.fraction);
                    }
                }
                PassStats::from(&outflow)
            })
            .reduce(PassStats::default, PassStats::merge)
    }
}
