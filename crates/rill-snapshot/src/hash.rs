//! FNV-1a hashing of terrain state.
//!
//! Not cryptographic. Two runs that should be bit-identical can compare a
//! `u64` instead of whole buffers.

use rill_terrain::Terrain;

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_u32(mut hash: u64, v: u32) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = (hash ^ b as u64).wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Hash the bits of every value in one field.
pub fn field_hash(values: &[f32]) -> u64 {
    values
        .iter()
        .fold(FNV_OFFSET, |hash, v| fnv1a_u32(hash, v.to_bits()))
}

/// Hash the side length, then height, then water. Swapping the two
/// fields changes the digest.
pub fn terrain_hash(terrain: &Terrain) -> u64 {
    let mut hash = fnv1a_u32(FNV_OFFSET, terrain.size() as u32);
    for (tag, field) in [terrain.height(), terrain.water()].into_iter().enumerate() {
        hash = fnv1a_u32(hash, tag as u32);
        hash = field.iter().fold(hash, |h, v| fnv1a_u32(h, v.to_bits()));
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_hash_is_offset_basis() {
        assert_eq!(field_hash(&[]), FNV_OFFSET);
    }

    #[test]
    fn field_hash_sees_every_bit() {
        assert_ne!(field_hash(&[0.0]), field_hash(&[-0.0]));
        assert_ne!(field_hash(&[1.0, 2.0]), field_hash(&[2.0, 1.0]));
    }

    #[test]
    fn swapping_fields_changes_terrain_hash() {
        let a = Terrain::from_parts(3, vec![1.0; 9], vec![0.0; 9]).unwrap();
        let b = Terrain::from_parts(3, vec![0.0; 9], vec![1.0; 9]).unwrap();
        assert_ne!(terrain_hash(&a), terrain_hash(&b));
        assert_eq!(terrain_hash(&a), terrain_hash(&a.clone()));
    }
}
