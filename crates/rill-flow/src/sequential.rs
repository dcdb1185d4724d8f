//! Sequential, in-place, row-major flow pass.
//!
//! Cells are visited `y = 1..size-1`, `x = 1..size-1`, reading and writing
//! the caller's buffer directly. A neighbour visited earlier in the pass
//! (above or left) already reflects this pass's updates; one not yet
//! visited (below or right) still holds its pre-pass depth. Water can
//! therefore fall several cells in one pass along the scan direction, but
//! only one cell against it. This ordering is part of the result and must
//! not be parallelised away.

use rill_core::{GridError, GridSize, DEFAULT_EPSILON, NEIGHBOUR_COUNT};

use crate::rule::{evaluate, PassStats};

/// Run one sequential pass with the default epsilon.
///
/// # Errors
///
/// Returns [`GridError`] before touching `water` if `size < 3` or either
/// buffer does not hold `size * size` cells.
pub fn flow_step(size: usize, height: &[f32], water: &mut [f32]) -> Result<(), GridError> {
    let grid = GridSize::new(size)?;
    grid.check_fields(height, water)?;
    sequential_pass(&grid, height, water, DEFAULT_EPSILON);
    Ok(())
}

/// Run `iterations` sequential passes with the default epsilon.
///
/// Each pass consumes the previous pass's output. `iterations == 0` only
/// validates the inputs.
pub fn flow_repeat(
    size: usize,
    height: &[f32],
    water: &mut [f32],
    iterations: usize,
) -> Result<(), GridError> {
    let grid = GridSize::new(size)?;
    grid.check_fields(height, water)?;
    for _ in 0..iterations {
        sequential_pass(&grid, height, water, DEFAULT_EPSILON);
    }
    Ok(())
}

/// One in-place pass over an already validated grid.
pub(crate) fn sequential_pass(
    grid: &GridSize,
    height: &[f32],
    water: &mut [f32],
    epsilon: f32,
) -> PassStats {
    let offsets = grid.offsets();
    let mut stats = PassStats::default();
    for ptr in grid.interior() {
        let Some(outflow) = evaluate(ptr, height, |j| water[j], offsets, epsilon) else {
            continue;
        };
        stats.record(&outflow);
        water[ptr] = outflow.remaining;
        for slot in (0..NEIGHBOUR_COUNT).rev() {
            if outflow.sends_to(slot) {
                water[offsets.neighbour(ptr, slot)] += outflow.fraction;
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_test_utils::{assert_non_negative, total_water, Fixture};

    #[test]
    fn three_by_three_centre_spreads_to_ring() {
        let mut f = Fixture::flat_blob(3, 1.0);
        flow_step(3, &f.height, &mut f.water).unwrap();
        assert_eq!(f.water[4], 0.0);
        for (i, &w) in f.water.iter().enumerate() {
            if i != 4 {
                assert_eq!(w, 0.125, "cell {i}");
            }
        }
    }

    #[test]
    fn five_by_five_cells_before_centre_keep_their_share() {
        let mut f = Fixture::flat_blob(5, 1.0);
        flow_step(5, &f.height, &mut f.water).unwrap();
        // Visited before the centre and not downstream of anything later.
        for i in [6, 7, 8, 11] {
            assert_eq!(f.water[i], 0.125, "cell {i}");
        }
        let total = total_water(&f.water);
        assert!(total <= 1.0 + 1e-6, "mass created: {total}");
        assert!(total >= 1.0 - 9.0 * DEFAULT_EPSILON as f64, "mass lost: {total}");
        assert_non_negative(&f.water);
    }

    #[test]
    fn walled_in_cell_is_unchanged() {
        let mut f = Fixture::flat_blob(3, 1.0);
        for (i, h) in f.height.iter_mut().enumerate() {
            if i != 4 {
                *h = 1.0;
            }
        }
        let before = f.water.clone();
        flow_step(3, &f.height, &mut f.water).unwrap();
        assert_eq!(f.water, before);
    }

    #[test]
    fn dry_field_is_a_no_op() {
        let mut f = Fixture::random(12, 7);
        f.water.iter_mut().for_each(|w| *w = 0.0);
        flow_repeat(12, &f.height, &mut f.water, 5).unwrap();
        assert!(f.water.iter().all(|&w| w == 0.0));
    }

    #[test]
    fn water_falls_many_cells_along_the_scan() {
        let mut f = Fixture::channel(6, true);
        let start = f.grid().index(1, 2);
        f.water[start] = 1.0;
        flow_step(6, &f.height, &mut f.water).unwrap();
        // Carried through x = 2, 3, 4 and out onto the border in one pass.
        let exit = f.grid().index(5, 2);
        assert_eq!(f.water[exit], 1.0);
        assert_eq!(total_water(&f.water), 1.0);
    }

    #[test]
    fn water_moves_one_cell_against_the_scan() {
        let mut f = Fixture::channel(6, false);
        let start = f.grid().index(4, 2);
        f.water[start] = 1.0;
        flow_step(6, &f.height, &mut f.water).unwrap();
        assert_eq!(f.water[start], 0.0);
        assert_eq!(f.water[f.grid().index(3, 2)], 1.0);
    }

    #[test]
    fn identical_inputs_give_identical_bits() {
        let base = Fixture::random(24, 99);
        let mut a = base.water.clone();
        let mut b = base.water.clone();
        flow_repeat(24, &base.height, &mut a, 10).unwrap();
        flow_repeat(24, &base.height, &mut b, 10).unwrap();
        let bits = |v: &[f32]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn rejects_bad_inputs_before_mutating() {
        let height = vec![0.0f32; 9];
        let mut water = vec![1.0f32; 8];
        assert!(matches!(
            flow_step(3, &height, &mut water),
            Err(GridError::LengthMismatch { field: "water", .. })
        ));
        assert!(water.iter().all(|&w| w == 1.0));

        let mut small = vec![1.0f32; 4];
        assert_eq!(
            flow_step(2, &[0.0; 4], &mut small),
            Err(GridError::SizeTooSmall { size: 2 })
        );
    }

    #[test]
    fn border_is_never_a_source() {
        let mut f = Fixture::flat(5);
        let corner = f.grid().index(0, 0);
        let edge = f.grid().index(2, 0);
        f.water[corner] = 3.0;
        f.water[edge] = 2.0;
        let before = f.water.clone();
        flow_repeat(5, &f.height, &mut f.water, 3).unwrap();
        assert_eq!(f.water, before);
    }
}
