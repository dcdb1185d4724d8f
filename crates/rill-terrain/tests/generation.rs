//! Generated terrain stays inside the height range for any grid, seed, and
//! displacement amplitude, and smoothing never widens that range.

use proptest::prelude::*;
use rill_terrain::{Terrain, MAX_HEIGHT};

fn bounds(values: &[f32]) -> (f32, f32) {
    values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn heights_stay_within_range(
        size in 3usize..48,
        seed in any::<u64>(),
        range in 0.0f32..200.0,
    ) {
        let t = Terrain::generated(size, seed, range).unwrap();
        let (lo, hi) = bounds(t.height());
        prop_assert!(lo >= 0.0, "min {lo}");
        prop_assert!(hi <= MAX_HEIGHT, "max {hi}");
        prop_assert!(t.height().iter().all(|h| h.is_finite()));
    }

    #[test]
    fn same_seed_regenerates_identically(
        size in 3usize..32,
        seed in any::<u64>(),
    ) {
        let mut t = Terrain::generated(size, seed, 40.0).unwrap();
        let first = t.height().to_vec();
        t.generate_heights(seed, 40.0);
        prop_assert_eq!(t.height(), &first[..]);
    }

    #[test]
    fn smoothing_keeps_heights_within_range(
        size in 3usize..32,
        seed in any::<u64>(),
    ) {
        let mut t = Terrain::generated(size, seed, 60.0).unwrap();
        let (lo, hi) = bounds(t.height());
        t.smooth();
        let (slo, shi) = bounds(t.height());
        // Means of eight values may round a hair past their extremes.
        prop_assert!(slo >= lo - 1e-3, "{slo} < {lo}");
        prop_assert!(shi <= hi + 1e-3, "{shi} > {hi}");
    }
}
