//! The local redistribution rule shared by every backend.
//!
//! A wet cell compares its total height (ground + water) against its eight
//! neighbours. The strictly lower ones form the downstream set; the cell
//! sheds at most the water it holds and at most the gap to the downstream
//! average, split evenly across the set.

use rill_core::{NeighbourOffsets, NEIGHBOUR_COUNT};

/// Result of evaluating the rule for one source cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Outflow {
    /// Water left in the source after shedding, already epsilon-snapped.
    pub remaining: f32,
    /// Amount added to every downstream neighbour.
    pub fraction: f32,
    /// Bit `s` is set when the neighbour in offset slot `s` is downstream.
    pub downstream: u8,
    /// Whether the residual fell below epsilon and was collapsed to zero.
    pub snapped: bool,
}

impl Outflow {
    /// Size of the downstream set.
    pub fn count(&self) -> u32 {
        self.downstream.count_ones()
    }

    /// Whether the neighbour in `slot` receives water.
    #[inline]
    pub fn sends_to(&self, slot: usize) -> bool {
        self.downstream & (1 << slot) != 0
    }
}

/// Per-pass counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Cells that shed water.
    pub sources: usize,
    /// Sources whose residual was snapped to zero.
    pub snapped: usize,
}

impl PassStats {
    /// Count one evaluated outflow.
    pub fn record(&mut self, outflow: &Outflow) {
        self.sources += 1;
        self.snapped += usize::from(outflow.snapped);
    }

    /// Sum two sets of counters.
    pub fn merge(self, other: Self) -> Self {
        Self {
            sources: self.sources + other.sources,
            snapped: self.snapped + other.snapped,
        }
    }
}

impl From<&Outflow> for PassStats {
    fn from(outflow: &Outflow) -> Self {
        let mut stats = Self::default();
        stats.record(outflow);
        stats
    }
}

/// Evaluate the rule for the interior cell `ptr`.
///
/// `water` reads the depth of any cell; the sequential backend passes the
/// live buffer, the double-buffered backend a frozen snapshot, the direct
/// backend the shared atomic buffer. Returns `None` when the cell is dry,
/// has no strictly lower neighbour, or rounding leaves nothing to shed.
///
/// `ptr` must be an interior cell of the grid `offsets` was built for.
#[inline]
pub fn evaluate<W>(
    ptr: usize,
    height: &[f32],
    water: W,
    offsets: &NeighbourOffsets,
    epsilon: f32,
) -> Option<Outflow>
where
    W: Fn(usize) -> f32,
{
    let current_water = water(ptr);
    if current_water == 0.0 {
        return None;
    }
    let current_height = current_water + height[ptr];

    let mut downstream = 0u8;
    let mut count = 0u32;
    let mut height_sum = 0.0f32;
    for slot in 0..NEIGHBOUR_COUNT {
        let j = offsets.neighbour(ptr, slot);
        let other_height = water(j) + height[j];
        if other_height < current_height {
            height_sum += other_height;
            downstream |= 1 << slot;
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }

    let n = count as f32;
    let avg_height = height_sum / n;
    let h = current_height - avg_height;
    let excess = if current_water < h { current_water } else { h };
    // The average of strictly lower totals can round up to the current
    // total; shedding a non-positive amount would drain the neighbours.
    if excess <= 0.0 {
        return None;
    }

    let fraction = excess / n;
    let remaining = current_water - fraction * n;
    let snapped = remaining < epsilon;
    Some(Outflow {
        remaining: if snapped { 0.0 } else { remaining },
        fraction,
        downstream,
        snapped,
    })
}
