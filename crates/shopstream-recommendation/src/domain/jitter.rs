//! Seeded tie-break jitter.
//!
//! FNV-1a is used because it is trivially portable: the same product id and
//! seed give the same jitter on every platform and in every language.

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a hash.
#[must_use]
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Jitter in `[0, 0.01)` for `product_id` under `seed`.
#[must_use]
pub fn jitter(product_id: i32, seed: &str) -> f64 {
    let hash = fnv1a64(format!("{product_id}{seed}").as_bytes());
    let bucket = u32::try_from(hash % 1_000).unwrap_or(0);
    f64::from(bucket) / 100_000.0
}
