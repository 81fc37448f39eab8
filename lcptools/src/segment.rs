//! Parsing of long sequences in overlapping segments.
//!
//! Each segment is scanned on its own. The scanner state is only its
//! position, so once two scans visit the same position they produce the same
//! cores from there on. Merging looks for the first position in the overlap
//! visited by both the already merged scan and the next segment's scan, and
//! switches over there. The merged result is identical to scanning the whole
//! sequence at once, as long as both scans meet inside of the overlap.
//!
//! A scan stops early when the rest of its segment is a single plateau. If it
//! stops before the next segment starts, the next segment is scanned again
//! from that position instead.

use std::ops::Range;

use log::{debug, trace};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

use crate::alphabet::Strand;
use crate::core::Core;
use crate::error::{LcpError, LcpResult};
use crate::parser::{scan, to_sequence_coordinates, MIN_CORE_LEN};

/// Default length of a single segment.
pub const DEFAULT_SEQUENCE_SPLIT_LENGTH: usize = 1_000_000;
/// Default number of symbols each segment shares with the previous one.
pub const DEFAULT_OVERLAP_MARGIN_LENGTH: usize = 10_000;

/// How a sequence is cut into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentLayout {
    sequence_split_length: usize,
    overlap_margin_length: usize,
}

impl SegmentLayout {
    /// Creates a new layout.
    ///
    /// The overlap margin is not an enforced correctness bound: it has to be
    /// longer than any core crossing a segment boundary, otherwise the merge
    /// fails with [`LcpError::SegmentMerge`].
    pub fn new(sequence_split_length: usize, overlap_margin_length: usize) -> LcpResult<Self> {
        if sequence_split_length == 0 {
            return Err(LcpError::InvalidParams(
                "sequence split length must be positive",
            ));
        }
        if overlap_margin_length < MIN_CORE_LEN {
            return Err(LcpError::InvalidParams(
                "overlap margin must be at least as long as the shortest core",
            ));
        }
        if overlap_margin_length >= sequence_split_length {
            return Err(LcpError::InvalidParams(
                "overlap margin must be shorter than the sequence split length",
            ));
        }

        Ok(Self {
            sequence_split_length,
            overlap_margin_length,
        })
    }

    #[must_use]
    pub fn sequence_split_length(&self) -> usize {
        self.sequence_split_length
    }

    #[must_use]
    pub fn overlap_margin_length(&self) -> usize {
        self.overlap_margin_length
    }

    /// Returns the symbol ranges of all segments of a sequence of length
    /// `len`. Segment `i` is `[i * split - margin, (i + 1) * split)`, clamped
    /// to the sequence.
    ///
    /// # Examples
    /// ```
    /// use lcptools::segment::SegmentLayout;
    ///
    /// let layout = SegmentLayout::new(100, 10).unwrap();
    /// assert_eq!(layout.chunk_ranges(250), [0..100, 90..200, 190..250]);
    /// ```
    #[must_use]
    pub fn chunk_ranges(&self, len: usize) -> Vec<Range<usize>> {
        (0..len)
            .step_by(self.sequence_split_length)
            .map(|chunk_start| {
                let start = chunk_start.saturating_sub(self.overlap_margin_length);
                let end = (chunk_start + self.sequence_split_length).min(len);
                start..end
            })
            .collect()
    }
}

impl Default for SegmentLayout {
    fn default() -> Self {
        Self {
            sequence_split_length: DEFAULT_SEQUENCE_SPLIT_LENGTH,
            overlap_margin_length: DEFAULT_OVERLAP_MARGIN_LENGTH,
        }
    }
}

/// Cores of a single segment, in strand coordinates.
#[derive(Debug, Clone)]
struct ChunkScan {
    start: u64,
    end: u64,
    cores: Vec<Core>,
    frontier: u64,
}

impl ChunkScan {
    fn new(sequence: &[u8], strand: Strand, range: Range<usize>) -> LcpResult<Self> {
        let codes = strand.encode_range(sequence, range.clone())?;
        let scan = scan(&codes);
        let start = range.start as u64;

        let cores = scan
            .spans
            .into_iter()
            .map(|span| Core::from_codes(&codes[span.clone()], start + span.start as u64))
            .collect();

        Ok(Self {
            start,
            end: range.end as u64,
            cores,
            frontier: start + scan.frontier as u64,
        })
    }
}

/// Left fold of segment scans into a single core sequence.
#[derive(Debug)]
struct SegmentMerger {
    cores: Vec<Core>,
    frontier: u64,
}

impl SegmentMerger {
    #[must_use]
    fn new(first: ChunkScan) -> Self {
        Self {
            cores: first.cores,
            frontier: first.frontier,
        }
    }

    /// Returns `true` if the merged scan stopped in a plateau before `next`
    /// starts, so that no position can be shared with `next`.
    #[must_use]
    fn stopped_before(&self, next: &ChunkScan) -> bool {
        self.frontier < next.start
    }

    fn merge(&mut self, chunk_index: usize, next: ChunkScan) -> LcpResult<()> {
        let switch_position = self
            .first_common_position(&next)
            .ok_or_else(|| LcpError::segment_merge(chunk_index, next.start))?;
        trace!(
            "Merging segment {} at position {} (frontier {} -> {})",
            chunk_index,
            switch_position,
            self.frontier,
            next.frontier
        );

        let kept = self
            .cores
            .partition_point(|core| core.start() < switch_position);
        self.cores.truncate(kept);

        let skipped = next
            .cores
            .partition_point(|core| core.start() < switch_position);
        self.cores.extend_from_slice(&next.cores[skipped..]);
        self.frontier = next.frontier;

        Ok(())
    }

    /// Returns the first position both scans stood at, if any.
    fn first_common_position(&self, next: &ChunkScan) -> Option<u64> {
        let limit = self.frontier.min(next.frontier);
        let mut position = next.start;

        while position <= limit {
            let covering_end = [
                covering_core(&self.cores, position),
                covering_core(&next.cores, position),
            ]
            .into_iter()
            .flatten()
            .map(Core::end)
            .max();

            match covering_end {
                None => return Some(position),
                Some(end) => position = end,
            }
        }

        None
    }

    #[must_use]
    fn finish(self) -> Vec<Core> {
        self.cores
    }
}

/// Returns the core that has `position` strictly inside of it (i.e. the scan
/// jumped over `position`).
fn covering_core(cores: &[Core], position: u64) -> Option<&Core> {
    let index = cores.partition_point(|core| core.start() < position);
    index
        .checked_sub(1)
        .map(|index| &cores[index])
        .filter(|core| core.end() > position)
}

/// Identifies level-1 cores of `sequence` read from `strand`, scanning
/// segments of `layout` on `thread_num` worker threads (0 means the current
/// thread).
///
/// The result is identical to [`crate::parser::parse_sequence`].
pub fn parse_segmented(
    sequence: &[u8],
    strand: Strand,
    layout: SegmentLayout,
    thread_num: usize,
) -> LcpResult<Vec<Core>> {
    let ranges = layout.chunk_ranges(sequence.len());
    debug!(
        "Parsing {} symbols in {} segments ({:?}, {} threads)",
        sequence.len(),
        ranges.len(),
        layout,
        thread_num
    );

    let scans = scan_chunks(sequence, strand, &ranges, thread_num)?;

    let mut scans = scans.into_iter();
    let mut merger = match scans.next() {
        Some(first) => SegmentMerger::new(first),
        None => return Ok(Vec::new()),
    };
    for (index, scan) in scans.enumerate() {
        let scan = if merger.stopped_before(&scan) {
            let range = merger.frontier as usize..scan.end as usize;
            trace!(
                "Segment {} starts inside of a plateau, scanning {:?} again",
                index + 1,
                range
            );
            ChunkScan::new(sequence, strand, range)?
        } else {
            scan
        };

        merger.merge(index + 1, scan)?;
    }

    let cores = merger.finish();
    Ok(to_sequence_coordinates(
        cores,
        sequence.len() as u64,
        strand,
    ))
}

fn scan_chunks(
    sequence: &[u8],
    strand: Strand,
    ranges: &[Range<usize>],
    thread_num: usize,
) -> LcpResult<Vec<ChunkScan>> {
    if thread_num == 0 {
        return ranges
            .iter()
            .map(|range| ChunkScan::new(sequence, strand, range.clone()))
            .collect();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_num)
        .thread_name(|index| format!("lcp-segment-{}", index))
        .build()
        .map_err(|e| LcpError::ThreadPool(e.to_string()))?;

    pool.install(|| {
        ranges
            .par_iter()
            .map(|range| ChunkScan::new(sequence, strand, range.clone()))
            .collect()
    })
}
