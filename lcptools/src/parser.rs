//! Core identification.
//!
//! The parser works on 2-bit symbols: alphabet codes at level 1 and
//! [`Core::symbol`] of the previous level's cores above it. A core is a
//! window `x[p..q+2]` such that
//!
//! * `x[p] != x[p+1]`,
//! * `x[p+1..=q]` is a maximal plateau of equal symbols,
//! * `x[q+1]` differs from the plateau symbol,
//! * the plateau is at least two symbols long, or its single symbol is a
//!   strict local minimum or maximum.
//!
//! Whether a window is a core depends only on the symbols inside of it, and
//! no proper part of a core is a core itself. The scan emits a core and
//! continues right after it, or moves one symbol forward.

use std::ops::Range;

use log::trace;

use crate::alphabet::Strand;
use crate::core::Core;
use crate::error::LcpResult;

/// Smallest number of symbols a core can span.
pub const MIN_CORE_LEN: usize = 3;

/// Outcome of scanning a run of symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    /// Core windows, in increasing order.
    pub spans: Vec<Range<usize>>,
    /// Position where the scan stopped: either a plateau reaching the end of
    /// the input, or fewer than [`MIN_CORE_LEN`] symbols left. All decisions
    /// left of the frontier are independent of what follows the input.
    pub frontier: usize,
}

/// Scans `symbols` left to right and returns the core windows.
///
/// # Examples
/// ```
/// use lcptools::parser::scan;
///
/// // 2 0 1 is a local minimum, 3 3 a plateau
/// let scan = scan(&[2, 0, 1, 2, 3, 3, 1]);
/// assert_eq!(scan.spans, [0..3, 3..7]);
/// assert_eq!(scan.frontier, 7);
/// ```
#[must_use]
pub fn scan(symbols: &[u8]) -> Scan {
    let len = symbols.len();
    let mut spans = Vec::with_capacity(len / MIN_CORE_LEN);
    let mut pos = 0;

    while pos + MIN_CORE_LEN <= len {
        let left = symbols[pos];
        let middle = symbols[pos + 1];
        if left == middle {
            pos += 1;
            continue;
        }

        let plateau_end = match symbols[pos + 2..].iter().position(|&x| x != middle) {
            Some(index) => pos + 2 + index,
            // the right boundary of the plateau is not known
            None => break,
        };
        let right = symbols[plateau_end];
        let plateau_len = plateau_end - (pos + 1);

        if plateau_len >= 2 || (left > middle) == (right > middle) {
            spans.push(pos..plateau_end + 1);
            pos = plateau_end + 1;
        } else {
            pos += 1;
        }
    }

    Scan {
        spans,
        frontier: pos,
    }
}

/// Identifies level-1 cores in encoded `codes`, whose first symbol is at
/// position `offset`.
#[must_use]
pub fn cores_from_codes(codes: &[u8], offset: u64) -> Vec<Core> {
    scan(codes)
        .spans
        .into_iter()
        .map(|span| Core::from_codes(&codes[span.clone()], offset + span.start as u64))
        .collect()
}

/// Identifies the cores one level above `cores`.
#[must_use]
pub fn cores_from_cores(cores: &[Core]) -> Vec<Core> {
    let symbols: Vec<u8> = cores.iter().map(Core::symbol).collect();

    scan(&symbols)
        .spans
        .into_iter()
        .map(|span| Core::from_cores(&cores[span]))
        .collect()
}

/// Identifies level-1 cores of `sequence` read from `strand`.
///
/// Cores are returned in original sequence coordinates, ordered by position.
/// For the reverse complement, labels are computed from the reverse
/// complement symbols.
pub fn parse_sequence(sequence: &[u8], strand: Strand) -> LcpResult<Vec<Core>> {
    let codes = strand.encode_all(sequence)?;
    let cores = cores_from_codes(&codes, 0);
    trace!(
        "Found {} cores in {} symbols ({:?})",
        cores.len(),
        sequence.len(),
        strand
    );

    Ok(to_sequence_coordinates(cores, sequence.len() as u64, strand))
}

/// Converts cores found on `strand` (positions in strand reading order) to
/// coordinates of the original sequence of length `len`.
pub(crate) fn to_sequence_coordinates(cores: Vec<Core>, len: u64, strand: Strand) -> Vec<Core> {
    match strand {
        Strand::Forward => cores,
        Strand::ReverseComplement => cores
            .into_iter()
            .rev()
            .map(|core| core.mirrored(len))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::_internal_test_data::{random_sequence, SHORT_TEST_SEQUENCE};
    use crate::alphabet::Strand;
    use crate::core::{pack_label, Core};
    use crate::error::LcpError;
    use crate::parser::{cores_from_codes, cores_from_cores, parse_sequence, scan, Scan};

    fn assert_identical(actual: &[Core], expected: &[Core]) {
        assert_eq!(actual.len(), expected.len(), "{:?} != {:?}", actual, expected);
        for (a, e) in actual.iter().zip(expected) {
            assert!(a.identical(e), "{:?} != {:?}", a, e);
        }
    }

    #[test]
    fn test_scan_empty_and_short() {
        assert_eq!(scan(&[]), Scan::default());
        assert!(scan(&[1]).spans.is_empty());
        assert!(scan(&[2, 0]).spans.is_empty());
        assert_eq!(scan(&[2, 0, 1]).spans, [0..3]);
    }

    #[test]
    fn test_scan_local_minimum_and_maximum() {
        assert_eq!(scan(&[3, 1, 2]).spans, [0..3]);
        assert_eq!(scan(&[0, 2, 1]).spans, [0..3]);
        // monotone windows are not cores
        assert!(scan(&[0, 1, 2, 3]).spans.is_empty());
        assert!(scan(&[3, 2, 1, 0]).spans.is_empty());
    }

    #[test]
    fn test_scan_plateaus() {
        // increasing run over a plateau is a core
        assert_eq!(scan(&[0, 1, 1, 2]).spans, [0..4]);
        assert_eq!(scan(&[0, 2, 2, 2, 2, 3]).spans, [0..6]);
        // a plateau reaching the end has no right boundary
        let result = scan(&[0, 2, 2, 2]);
        assert!(result.spans.is_empty());
        assert_eq!(result.frontier, 0);
        // leading plateau has no left boundary
        assert_eq!(scan(&[1, 1, 1, 0, 2]).spans, [2..5]);
    }

    #[test]
    fn test_scan_skips_past_core() {
        // 2 0 2 0 2: the second minimum shares a symbol with the first core
        assert_eq!(scan(&[2, 0, 2, 0, 2]).spans, [0..3]);
        assert_eq!(scan(&[2, 0, 2, 3, 0, 2]).spans, [0..3, 3..6]);
    }

    #[test]
    fn test_scan_frontier() {
        assert_eq!(scan(&[2, 0, 1, 3, 3]).frontier, 3);
        assert_eq!(scan(&[2, 0, 1, 3]).frontier, 3);
        assert_eq!(scan(&[0, 1, 2, 3]).frontier, 2);
    }

    #[test]
    fn test_cores_non_overlapping_and_increasing() {
        let codes = Strand::Forward.encode_all(&random_sequence(10_000, 7)).unwrap();
        let cores = cores_from_codes(&codes, 0);

        assert!(!cores.is_empty());
        for core in &cores {
            assert!(core.len() >= 3);
        }
        for (left, right) in cores.iter().tuple_windows() {
            assert!(left.end() <= right.start());
        }
    }

    #[test]
    fn test_short_sequence_cores() {
        let cores = parse_sequence(SHORT_TEST_SEQUENCE.as_bytes(), Strand::Forward).unwrap();

        assert_eq!(cores.len(), 19);
        assert!(cores[0].identical(&Core::new(97, 2, 5)));
        assert!(cores[3].identical(&Core::new(260, 11, 17)));
        assert!(cores[18].identical(&Core::new(109, 65, 68)));
    }

    #[test]
    fn test_label_packing_is_context_free() {
        let cores_1 = parse_sequence(b"GACTT", Strand::Forward).unwrap();
        let cores_2 = parse_sequence(b"TTTTGACTT", Strand::Forward).unwrap();

        let expected = pack_label(3, 2, 0, 1);
        assert!(cores_1[0].identical(&Core::new(expected, 0, 3)));
        assert!(cores_2
            .iter()
            .any(|core| core.identical(&Core::new(expected, 4, 7))));
    }

    #[test]
    fn test_self_containment() {
        let sequence = random_sequence(5_000, 11);
        let cores = parse_sequence(&sequence, Strand::Forward).unwrap();

        for core in cores.iter().step_by(37) {
            let range = core.start() as usize..core.end() as usize;
            let sub_cores = parse_sequence(&sequence[range], Strand::Forward).unwrap();

            assert_identical(&sub_cores, &[Core::new(core.label(), 0, core.len())]);
        }
    }

    #[test]
    fn test_boundary_sensitivity() {
        let sequence = random_sequence(5_000, 13);
        let cores = parse_sequence(&sequence, Strand::Forward).unwrap();

        for core in cores.iter().step_by(29) {
            let (start, end) = (core.start() as usize, core.end() as usize);

            let shrunk_left = parse_sequence(&sequence[start + 1..end], Strand::Forward).unwrap();
            let shrunk_right = parse_sequence(&sequence[start..end - 1], Strand::Forward).unwrap();

            assert!(shrunk_left.is_empty());
            assert!(shrunk_right.is_empty());
        }
    }

    #[test]
    fn test_invalid_symbol() {
        let result = parse_sequence(b"ACGTNACGT", Strand::Forward);
        assert!(matches!(
            result,
            Err(LcpError::InvalidSymbol { byte: b'N', offset: 4 })
        ));
    }

    #[test]
    fn test_reverse_complement_coordinates() {
        let sequence = random_sequence(2_000, 17);
        let cores = parse_sequence(&sequence, Strand::ReverseComplement).unwrap();

        assert!(!cores.is_empty());
        for (left, right) in cores.iter().tuple_windows() {
            assert!(left.end() <= right.start());
        }

        // a core of the reverse strand is found again in the reverse
        // complement of its own range
        let complement: Vec<u8> = sequence
            .iter()
            .rev()
            .map(|&byte| match byte {
                b'A' => b'T',
                b'C' => b'G',
                b'G' => b'C',
                _ => b'A',
            })
            .collect();
        let forward_cores = parse_sequence(&complement, Strand::Forward).unwrap();
        let len = sequence.len() as u64;

        assert_eq!(cores.len(), forward_cores.len());
        for (core, forward_core) in cores.iter().zip(forward_cores.iter().rev()) {
            assert!(core.identical(&forward_core.mirrored(len)));
        }
    }

    #[test]
    fn test_cores_from_cores() {
        let cores = [
            Core::new(0b10, 0, 3),
            Core::new(0b00, 3, 6),
            Core::new(0b01, 6, 9),
            Core::new(0b11, 9, 12),
        ];

        let upper = cores_from_cores(&cores);

        assert_eq!(upper.len(), 1);
        assert!(upper[0].identical(&Core::from_cores(&cores[0..3])));
        assert_eq!(upper[0].range(), 0..9);
    }
}
