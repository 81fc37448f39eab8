//! Nucleotide alphabet used by the level-1 parse.
//!
//! Both tables map a byte to its 2-bit code; bytes outside of the alphabet
//! map to [`INVALID_CODE`], which can never be mistaken for a valid code.

use std::ops::Range;

use crate::error::{LcpError, LcpResult};

/// Table value of a byte that is not part of the alphabet.
pub const INVALID_CODE: u8 = 0xFF;

/// Forward strand codes: `A=0, C=1, G=2, T=3` (case insensitive).
pub const BYTE_TO_CODE: [u8; 256] = {
    let mut codes = [INVALID_CODE; 256];

    codes[b'A' as usize] = 0;
    codes[b'C' as usize] = 1;
    codes[b'G' as usize] = 2;
    codes[b'T' as usize] = 3;
    codes[b'a' as usize] = 0;
    codes[b'c' as usize] = 1;
    codes[b'g' as usize] = 2;
    codes[b't' as usize] = 3;

    codes
};

/// Reverse complement codes: the code of the paired base, i.e. `A=3, C=2,
/// G=1, T=0`.
pub const BYTE_TO_RC_CODE: [u8; 256] = {
    let mut codes = [INVALID_CODE; 256];

    let mut byte = 0;
    while byte < 256 {
        if BYTE_TO_CODE[byte] != INVALID_CODE {
            codes[byte] = 3 - BYTE_TO_CODE[byte];
        }
        byte += 1;
    }

    codes
};

/// Strand the sequence is read from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Strand {
    /// The sequence as given.
    #[default]
    Forward,
    /// The reverse complement of the sequence: read right to left, every base
    /// replaced by its pair.
    ReverseComplement,
}

impl Strand {
    #[must_use]
    pub fn from_reverse_complement(reverse_complement: bool) -> Self {
        if reverse_complement {
            Strand::ReverseComplement
        } else {
            Strand::Forward
        }
    }

    /// Encodes symbols `range` of the strand, where positions are counted in
    /// reading order of the strand (so for the reverse complement, position
    /// 0 is the last byte of `sequence`).
    ///
    /// Errors report offsets in the coordinates of `sequence`.
    pub fn encode_range(&self, sequence: &[u8], range: Range<usize>) -> LcpResult<Vec<u8>> {
        debug_assert!(range.end <= sequence.len());

        match self {
            Strand::Forward => sequence[range.clone()]
                .iter()
                .enumerate()
                .map(|(index, &byte)| encode(byte, (range.start + index) as u64))
                .collect(),
            Strand::ReverseComplement => {
                let len = sequence.len();
                range
                    .map(|position| {
                        let offset = len - 1 - position;
                        rc_encode(sequence[offset], offset as u64)
                    })
                    .collect()
            }
        }
    }

    /// Encodes the whole strand.
    pub fn encode_all(&self, sequence: &[u8]) -> LcpResult<Vec<u8>> {
        self.encode_range(sequence, 0..sequence.len())
    }
}

/// Returns the forward strand code of `byte`, found at `offset`.
///
/// # Examples
/// ```
/// use lcptools::alphabet::encode;
///
/// assert_eq!(encode(b'G', 0).unwrap(), 2);
/// assert!(encode(b'N', 0).is_err());
/// ```
#[inline]
pub fn encode(byte: u8, offset: u64) -> LcpResult<u8> {
    lookup(&BYTE_TO_CODE, byte, offset)
}

/// Returns the reverse complement code of `byte`, found at `offset`.
///
/// # Examples
/// ```
/// use lcptools::alphabet::rc_encode;
///
/// assert_eq!(rc_encode(b'G', 0).unwrap(), 1);
/// ```
#[inline]
pub fn rc_encode(byte: u8, offset: u64) -> LcpResult<u8> {
    lookup(&BYTE_TO_RC_CODE, byte, offset)
}

#[inline]
fn lookup(table: &[u8; 256], byte: u8, offset: u64) -> LcpResult<u8> {
    match table[byte as usize] {
        INVALID_CODE => Err(LcpError::invalid_symbol(byte, offset)),
        code => Ok(code),
    }
}
