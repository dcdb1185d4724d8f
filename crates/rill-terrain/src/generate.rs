//! Seeded midpoint-displacement (diamond-square) height generation.
//!
//! Sampling wraps toroidally, so any side length works, not only
//! `2^n + 1`. Each octave halves the displacement range. The finished
//! field is rescaled to `[0, MAX_HEIGHT]`.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Upper bound of generated heights; intermediate values are clamped to
/// `[0, MAX_HEIGHT]` and the result is rescaled to span it.
pub const MAX_HEIGHT: f32 = 255.0;

/// Number of displacement octaves applied.
pub const OCTAVES: usize = 3;

/// Side-length view over a row-major buffer with wrap-around addressing.
struct Torus<'a> {
    size: i64,
    cells: &'a mut [f32],
}

impl Torus<'_> {
    #[inline]
    fn index(&self, x: i64, y: i64) -> usize {
        (y.rem_euclid(self.size) * self.size + x.rem_euclid(self.size)) as usize
    }

    #[inline]
    fn get(&self, x: i64, y: i64) -> f32 {
        self.cells[self.index(x, y)]
    }

    #[inline]
    fn set(&mut self, x: i64, y: i64, value: f32) {
        let i = self.index(x, y);
        self.cells[i] = value;
    }
}

/// Uniform displacement in `[-range, range)`.
struct Displacement {
    rng: ChaCha8Rng,
    range: f32,
}

impl Displacement {
    #[inline]
    fn sample(&mut self) -> f32 {
        -self.range + 2.0 * self.range * self.rng.gen::<f32>()
    }

    /// Displaced average of four samples, clamped to the height range.
    #[inline]
    fn average(&mut self, a: f32, b: f32, c: f32, d: f32) -> f32 {
        let offset = self.sample();
        (offset + (a + b + c + d) / 4.0).clamp(0.0, MAX_HEIGHT)
    }
}

/// Overwrite `height` (a `size * size` row-major buffer) with fresh terrain.
pub(crate) fn diamond_square(size: usize, height: &mut [f32], seed: u64, range: f32) {
    debug_assert_eq!(height.len(), size * size);
    height.fill(0.0);

    let mut noise = Displacement {
        rng: ChaCha8Rng::seed_from_u64(seed),
        range,
    };
    let mut torus = Torus {
        size: size as i64,
        cells: height,
    };
    let last = size as i64 - 1;
    for (x, y) in [(0, 0), (last, 0), (0, last), (last, last)] {
        let corner = MAX_HEIGHT * noise.rng.gen::<f32>();
        torus.set(x, y, corner);
    }

    let mut octave_range = range;
    for _ in 0..OCTAVES {
        noise.range = octave_range;
        displace(&mut torus, &mut noise);
        octave_range /= 2.0;
    }

    normalise(torus.cells, seed);
}

fn displace(torus: &mut Torus<'_>, noise: &mut Displacement) {
    let size = torus.size;
    let mut step = size;
    while step >= 2 {
        // Odd steps address the last row/column of the square; even steps
        // wrap onto the next square's first one.
        let span = if step & 1 != 0 { step - 1 } else { step };
        let half = step / 2;

        // Diamond: centre of each square from its four corners.
        for y in (0..size).step_by(step as usize) {
            for x in (0..size).step_by(step as usize) {
                let tl = torus.get(x, y);
                let tr = torus.get(x + span, y);
                let bl = torus.get(x, y + span);
                let br = torus.get(x + span, y + span);
                let centre = noise.average(tl, tr, bl, br);
                torus.set(x + half, y + half, centre);
            }
        }

        // Square: edge midpoints from two corners, the centre, and the
        // centre of the adjacent square.
        for y in (0..size).step_by(step as usize) {
            for x in (0..size).step_by(step as usize) {
                let top = torus.get(x + half, y - half);
                let bottom = torus.get(x + half, y + step + half);
                let left = torus.get(x - half, y + half);
                let right = torus.get(x + step + half, y + half);

                let tl = torus.get(x, y);
                let tr = torus.get(x + span, y);
                let bl = torus.get(x, y + span);
                let br = torus.get(x + span, y + span);

                let (cx, cy) = (x + half, y + half);
                let centre = torus.get(cx, cy);

                let v = noise.average(tl, tr, top, centre);
                torus.set(cx, y, v);
                let v = noise.average(bl, br, bottom, centre);
                torus.set(cx, y + span, v);
                let v = noise.average(tl, bl, left, centre);
                torus.set(x, cy, v);
                let v = noise.average(tr, br, right, centre);
                torus.set(x + span, cy, v);
            }
        }

        step >>= 1;
    }
}

/// Rescale to span `[0, MAX_HEIGHT]`. A perfectly flat field becomes all
/// zeros.
fn normalise(cells: &mut [f32], seed: u64) {
    let (min, max) = cells
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    debug!("generated heights: seed={seed} raw range [{min}, {max}]");
    let span = max - min;
    if span.is_nan() || span <= 0.0 {
        cells.fill(0.0);
        return;
    }
    let scale = MAX_HEIGHT / span;
    for v in cells.iter_mut() {
        *v = ((*v - min) * scale).min(MAX_HEIGHT);
    }
}
