//! FNV-1 over the four little-endian bytes of a `u32`.

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1: multiply, then xor, one byte at a time from the low byte up.
#[inline]
pub fn hash_fnv1(key: u32) -> u32 {
    key.to_le_bytes().iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        hash.wrapping_mul(FNV_PRIME) ^ u32::from(byte)
    })
}
