use byteorder::{ByteOrder, LittleEndian};

/// Seed used when fingerprinting cores above level 1.
pub const LABEL_SEED: u32 = 42;

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// 32-bit MurmurHash3 (x86 variant) of `data`.
///
/// Blocks are always read as little-endian words, so the result does not
/// depend on the platform.
///
/// # Examples
/// ```
/// use lcptools::hash::murmur_hash32;
///
/// assert_eq!(murmur_hash32(b"", 0), 0);
/// assert_eq!(murmur_hash32(b"hello", 0), 0x248b_fa47);
/// ```
#[must_use]
pub fn murmur_hash32(data: &[u8], seed: u32) -> u32 {
    let mut h1 = seed;

    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        h1 ^= mix_k1(LittleEndian::read_u32(block));
        h1 = h1.rotate_left(13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k1 = 0u32;
        for (index, &byte) in tail.iter().enumerate() {
            k1 ^= (byte as u32) << (8 * index);
        }
        h1 ^= mix_k1(k1);
    }

    h1 ^= data.len() as u32;
    fmix32(h1)
}

/// Fingerprint of a tuple of 32-bit words, as used for core labels.
#[must_use]
pub fn hash_words<const N: usize>(words: [u32; N], seed: u32) -> u32 {
    let mut data = [0u8; 64];
    let len = 4 * N;
    assert!(len <= data.len(), "Too many words to hash");

    LittleEndian::write_u32_into(&words, &mut data[..len]);
    murmur_hash32(&data[..len], seed)
}

#[inline]
fn mix_k1(mut k1: u32) -> u32 {
    k1 = k1.wrapping_mul(C1);
    k1 = k1.rotate_left(15);
    k1.wrapping_mul(C2)
}

#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}
