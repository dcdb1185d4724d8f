//! Binary encode/decode for terrain snapshots.
//!
//! All integers are big-endian `i32`. Arrays are prefixed with their
//! element count. Decoding never trusts a length prefix for allocation
//! beyond what the input actually delivers.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;
use rill_core::GridSize;
use rill_terrain::Terrain;

use crate::error::SnapshotError;

/// Upper bound on the capacity reserved up front for one field.
const MAX_PREALLOC: usize = 1 << 20;

// ── Primitives ──────────────────────────────────────────────────

/// Write a big-endian i32.
pub fn write_i32_be(w: &mut dyn Write, v: i32) -> Result<(), SnapshotError> {
    w.write_all(&v.to_be_bytes())?;
    Ok(())
}

/// Write the bits of an f32, big-endian.
pub fn write_f32_be(w: &mut dyn Write, v: f32) -> Result<(), SnapshotError> {
    w.write_all(&v.to_bits().to_be_bytes())?;
    Ok(())
}

/// Read a big-endian i32.
pub fn read_i32_be(r: &mut dyn Read) -> Result<i32, SnapshotError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

/// Read a big-endian f32 from its bits.
pub fn read_f32_be(r: &mut dyn Read) -> Result<f32, SnapshotError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_bits(u32::from_be_bytes(buf)))
}

/// Write a length-prefixed float array.
pub fn write_field(w: &mut dyn Write, values: &[f32]) -> Result<(), SnapshotError> {
    let len = i32::try_from(values.len()).map_err(|_| SnapshotError::InvalidSize {
        size: values.len() as i64,
    })?;
    write_i32_be(w, len)?;
    for &v in values {
        write_f32_be(w, v)?;
    }
    Ok(())
}

/// Read a length-prefixed float array whose length must be `expected`.
pub fn read_field(
    r: &mut dyn Read,
    field: &'static str,
    expected: usize,
) -> Result<Vec<f32>, SnapshotError> {
    let len = read_i32_be(r)?;
    if usize::try_from(len).ok() != Some(expected) {
        return Err(SnapshotError::LengthMismatch {
            field,
            expected,
            actual: len,
        });
    }
    let mut values = Vec::with_capacity(expected.min(MAX_PREALLOC));
    for _ in 0..expected {
        values.push(read_f32_be(r)?);
    }
    Ok(values)
}

// ── Terrain ─────────────────────────────────────────────────────

/// Serialise `terrain` to `w`.
///
/// # Errors
///
/// Returns [`SnapshotError::InvalidSize`] if the grid is too large for
/// the format's `i32` lengths, or [`SnapshotError::Io`] on write failure.
pub fn encode(w: &mut dyn Write, terrain: &Terrain) -> Result<(), SnapshotError> {
    let size = terrain.size();
    let encoded_size = i32::try_from(size).map_err(|_| SnapshotError::InvalidSize {
        size: size as i64,
    })?;
    write_i32_be(w, encoded_size)?;
    write_field(w, terrain.height())?;
    write_field(w, terrain.water())?;
    Ok(())
}

/// Deserialise a terrain from `r`.
///
/// # Errors
///
/// - [`SnapshotError::InvalidSize`] for a negative or too-small size.
/// - [`SnapshotError::LengthMismatch`] when a length prefix is not
///   `size * size`.
/// - [`SnapshotError::Io`] on truncated input.
pub fn decode(r: &mut dyn Read) -> Result<Terrain, SnapshotError> {
    let raw_size = read_i32_be(r)?;
    let size = usize::try_from(raw_size)
        .ok()
        .filter(|&s| s >= GridSize::MIN)
        .ok_or(SnapshotError::InvalidSize {
            size: raw_size as i64,
        })?;
    let grid = GridSize::new(size).map_err(rill_terrain::TerrainError::from)?;
    let height = read_field(r, "height", grid.cell_count())?;
    let water = read_field(r, "water", grid.cell_count())?;
    Ok(Terrain::from_parts(size, height, water)?)
}

/// Write `terrain` to a file at `path`, replacing any existing file.
pub fn save(path: impl AsRef<Path>, terrain: &Terrain) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    let mut w = BufWriter::new(File::create(path)?);
    encode(&mut w, terrain)?;
    w.flush()?;
    debug!(
        "saved {}x{} terrain to {}",
        terrain.size(),
        terrain.size(),
        path.display()
    );
    Ok(())
}

/// Read a terrain from the file at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Terrain, SnapshotError> {
    let path = path.as_ref();
    let mut r = BufReader::new(File::open(path)?);
    let terrain = decode(&mut r)?;
    debug!(
        "loaded {}x{} terrain from {}",
        terrain.size(),
        terrain.size(),
        path.display()
    );
    Ok(terrain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i32_is_big_endian() {
        let mut buf = Vec::new();
        write_i32_be(&mut buf, 0x0102_0304).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(read_i32_be(&mut &buf[..]).unwrap(), 0x0102_0304);
    }

    #[test]
    fn f32_is_written_as_bits() {
        let mut buf = Vec::new();
        write_f32_be(&mut buf, 1.0).unwrap();
        assert_eq!(buf, [0x3f, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn field_rejects_wrong_prefix() {
        let mut buf = Vec::new();
        write_field(&mut buf, &[1.0, 2.0]).unwrap();
        let err = read_field(&mut &buf[..], "water", 3).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::LengthMismatch {
                field: "water",
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn huge_prefix_on_short_input_fails_without_allocating_it() {
        let mut buf = Vec::new();
        write_i32_be(&mut buf, i32::MAX).unwrap();
        write_f32_be(&mut buf, 1.0).unwrap();
        let err = read_field(&mut &buf[..], "height", i32::MAX as usize).unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
    }
}
