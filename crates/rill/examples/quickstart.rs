//! Rain on generated terrain, then let it drain on every backend.
//!
//! Run with `cargo run -p rill --example quickstart`.

use std::time::Instant;

use rill::prelude::*;

const SIZE: usize = 256;
const PASSES: usize = 100;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut base = Terrain::generated(SIZE, 0xC0FFEE, 80.0)?;
    base.smooth();
    base.init_water(1.0, 10.0);
    println!(
        "{SIZE}x{SIZE} terrain, initial water {:.1}",
        base.total_water()
    );

    for backend in [
        Backend::Sequential,
        Backend::Parallel(AccumulationMode::DoubleBuffered),
        Backend::Parallel(AccumulationMode::DirectAccumulate),
    ] {
        let mut terrain = base.clone();
        let mut solver = FlowSolver::new(FlowConfig::with_backend(backend))?;
        let start = Instant::now();
        let summary = terrain.flow(&mut solver, PASSES)?;
        println!(
            "{backend:?}: {} passes in {:?}, water {:.1}, hash {:016x}",
            summary.passes,
            start.elapsed(),
            terrain.total_water(),
            terrain_hash(&terrain)
        );
    }
    Ok(())
}
