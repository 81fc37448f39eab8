use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::fasta::FastaRecord;

const NUCLEOTIDES: &[u8; 4] = b"ACGT";

pub const SHORT_TEST_SEQUENCE: &str =
    "GGGACCTGGTGACCCCAGCCCACGACAGCCAAGCGCCAGCTGAGCTCAGGTGTGAGGAGATCACAGTCCT";

pub const SHORT_TEST_FASTA_STR: &str = ">SEQ_1 short test sequence
GGGACCTGGTGACCCCAGCCCACGACAGCCAAGCGCCAGCTGAGCTCAGG
TGTGAGGAGATCACAGTCCT
>SEQ_2
acgtacgtTTGACC
";

lazy_static! {
    pub static ref SHORT_TEST_FASTA_RECORDS: [FastaRecord; 2] = [
        FastaRecord::new("SEQ_1 short test sequence", SHORT_TEST_SEQUENCE),
        FastaRecord::new("SEQ_2", "acgtacgtTTGACC"),
    ];
    pub static ref SEQUENCE_1M: Vec<u8> = random_sequence(1_000_000, 1337);
}

/// Returns a uniformly random nucleotide sequence of length `len`.
///
/// Every 64-bit output of the generator yields 32 symbols, two bits each,
/// starting from the lowest bits.
#[must_use]
pub fn random_sequence(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut sequence = Vec::with_capacity(len);

    while sequence.len() < len {
        let mut bits: u64 = rng.gen();
        let count = (len - sequence.len()).min(32);
        for _ in 0..count {
            sequence.push(NUCLEOTIDES[(bits & 3) as usize]);
            bits >>= 2;
        }
    }

    sequence
}
