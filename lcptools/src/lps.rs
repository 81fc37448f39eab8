use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::io::{Cursor, ErrorKind, Read, Write};
use std::mem;

use binrw::{BinRead, BinWrite};
use itertools::Itertools;
use log::debug;

use crate::alphabet::Strand;
use crate::core::{Core, Label};
use crate::error::{LcpError, LcpResult};
use crate::lcpt::data::{CoreRecord, LpsHeader, CORE_RECORD_SIZE, LPS_HEADER_SIZE};
use crate::lcpt::no_seek::NoSeek;
use crate::parser::{cores_from_cores, parse_sequence};
use crate::segment::{
    parse_segmented, SegmentLayout, DEFAULT_OVERLAP_MARGIN_LENGTH, DEFAULT_SEQUENCE_SPLIT_LENGTH,
};

/// Upper bound of cores preallocated when reading, so that a corrupt count
/// does not allocate the whole memory up front.
const MAX_PREALLOCATED_CORES: u64 = 1 << 20;

/// A builder for [`LpsParams`].
#[derive(Debug, Clone)]
pub struct LpsParamsBuilder {
    level: u32,
    reverse_complement: bool,
    sequence_split_length: usize,
    overlap_margin_length: usize,
    thread_num: usize,
}

impl LpsParamsBuilder {
    /// Returns a new instance of `LpsParamsBuilder`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: 1,
            reverse_complement: false,
            sequence_split_length: DEFAULT_SEQUENCE_SPLIT_LENGTH,
            overlap_margin_length: DEFAULT_OVERLAP_MARGIN_LENGTH,
            thread_num: 0,
        }
    }

    /// Sets the level the parse is deepened to.
    pub fn level(&mut self, level: u32) -> &mut Self {
        let mut new = self;
        new.level = level;
        new
    }

    /// Parses the reverse complement of the sequence instead.
    pub fn reverse_complement(&mut self, reverse_complement: bool) -> &mut Self {
        let mut new = self;
        new.reverse_complement = reverse_complement;
        new
    }

    /// Sets the length of the segments long sequences are cut into.
    pub fn sequence_split_length(&mut self, sequence_split_length: usize) -> &mut Self {
        let mut new = self;
        new.sequence_split_length = sequence_split_length;
        new
    }

    /// Sets the number of symbols each segment shares with the previous one.
    pub fn overlap_margin_length(&mut self, overlap_margin_length: usize) -> &mut Self {
        let mut new = self;
        new.overlap_margin_length = overlap_margin_length;
        new
    }

    /// Sets the number of threads segments are parsed on. `0` means the
    /// current thread.
    pub fn thread_num(&mut self, thread_num: usize) -> &mut Self {
        let mut new = self;
        new.thread_num = thread_num;
        new
    }

    /// Builds and returns [`LpsParams`].
    #[must_use]
    pub fn build(&self) -> LpsParams {
        LpsParams {
            level: self.level,
            reverse_complement: self.reverse_complement,
            sequence_split_length: self.sequence_split_length,
            overlap_margin_length: self.overlap_margin_length,
            thread_num: self.thread_num,
        }
    }
}

impl Default for LpsParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parsing parameters.
#[derive(Debug, Clone)]
pub struct LpsParams {
    level: u32,
    reverse_complement: bool,
    sequence_split_length: usize,
    overlap_margin_length: usize,
    thread_num: usize,
}

impl LpsParams {
    /// Returns new builder for `LpsParams`.
    #[must_use]
    pub fn builder() -> LpsParamsBuilder {
        LpsParamsBuilder::new()
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn strand(&self) -> Strand {
        Strand::from_reverse_complement(self.reverse_complement)
    }

    #[must_use]
    pub fn thread_num(&self) -> usize {
        self.thread_num
    }

    /// Returns the segment layout, or an error if the split length and
    /// overlap margin do not form a valid one.
    pub fn segment_layout(&self) -> LcpResult<SegmentLayout> {
        SegmentLayout::new(self.sequence_split_length, self.overlap_margin_length)
    }
}

impl Default for LpsParams {
    fn default() -> Self {
        LpsParamsBuilder::default().build()
    }
}

/// Locally consistent parse of a sequence: the cores of a single level.
///
/// # Equality
/// Two parses are equal when their levels are equal and their cores are
/// [identical](Core::identical), pairwise. The strand is not compared, since
/// it is not part of the serialized form.
#[derive(Debug, Clone)]
pub struct Lps {
    level: u32,
    strand: Strand,
    cores: Vec<Core>,
}

impl Lps {
    /// Parses the forward strand of `sequence` at level 1.
    ///
    /// # Examples
    /// ```
    /// use lcptools::lps::Lps;
    ///
    /// let lps = Lps::new(b"GACTT").unwrap();
    /// assert_eq!(lps.level(), 1);
    /// assert_eq!(lps.len(), 1);
    /// assert_eq!(lps.cores()[0].range(), 0..3);
    /// ```
    pub fn new(sequence: &[u8]) -> LcpResult<Self> {
        Self::with_strand(sequence, Strand::Forward)
    }

    /// Parses `strand` of `sequence` at level 1.
    pub fn with_strand(sequence: &[u8], strand: Strand) -> LcpResult<Self> {
        let cores = parse_sequence(sequence, strand)?;

        Ok(Self {
            level: 1,
            strand,
            cores,
        })
    }

    /// Parses `sequence` with given parameters: sequences longer than the
    /// split length are parsed in segments, then the result is deepened to
    /// the requested level (or as far as possible).
    pub fn with_params(sequence: &[u8], params: &LpsParams) -> LcpResult<Self> {
        if params.level == 0 {
            return Err(LcpError::InvalidParams("level must be at least 1"));
        }
        let layout = params.segment_layout()?;
        let strand = params.strand();

        let cores = if sequence.len() <= layout.sequence_split_length() {
            parse_sequence(sequence, strand)?
        } else {
            parse_segmented(sequence, strand, layout, params.thread_num)?
        };

        let mut lps = Self {
            level: 1,
            strand,
            cores,
        };
        if !lps.deepen_to(params.level) {
            debug!(
                "Could not deepen to level {}, stopped at level {} with {} cores",
                params.level,
                lps.level,
                lps.len()
            );
        }

        Ok(lps)
    }

    /// Creates a parse out of already identified cores.
    pub fn from_cores(level: u32, strand: Strand, cores: Vec<Core>) -> LcpResult<Self> {
        if level == 0 {
            return Err(LcpError::InvalidLevel(level));
        }
        for (index, core) in cores.iter().enumerate() {
            check_core_range(index as u64, core)?;
        }

        Ok(Self {
            level,
            strand,
            cores,
        })
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn strand(&self) -> Strand {
        self.strand
    }

    #[must_use]
    pub fn cores(&self) -> &[Core] {
        &self.cores
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cores.is_empty()
    }

    /// Labels of the cores, in order.
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.cores.iter().map(Core::label)
    }

    /// Number of cores per label.
    #[must_use]
    pub fn core_counts(&self) -> HashMap<Label, u64> {
        let mut counts = HashMap::new();
        self.update_core_counts(&mut counts);
        counts
    }

    /// Adds the cores of this parse to `counts`, so that counts can be
    /// accumulated over multiple parses.
    pub fn update_core_counts(&self, counts: &mut HashMap<Label, u64>) {
        for label in self.labels() {
            *counts.entry(label).or_insert(0) += 1;
        }
    }

    /// Approximate number of bytes occupied by this parse.
    #[must_use]
    pub fn memsize(&self) -> usize {
        mem::size_of::<Self>() + self.cores.capacity() * mem::size_of::<Core>()
    }

    /// Parses the current cores once more, one level up.
    ///
    /// Returns `false` and leaves the parse unchanged if no core was found.
    ///
    /// # Examples
    /// ```
    /// use lcptools::lps::Lps;
    ///
    /// let mut lps = Lps::new(b"ACGTTGCAAGCTAGGATCCATGCA").unwrap();
    /// while lps.deepen() {}
    /// assert!(lps.level() >= 1);
    /// ```
    pub fn deepen(&mut self) -> bool {
        let cores = cores_from_cores(&self.cores);
        if cores.is_empty() {
            return false;
        }

        debug!(
            "Deepened from level {} to {}: {} -> {} cores",
            self.level,
            self.level + 1,
            self.cores.len(),
            cores.len()
        );
        self.cores = cores;
        self.level += 1;
        true
    }

    /// Deepens until `target_level` is reached.
    ///
    /// Returns `true` only if the parse is at `target_level` afterwards. A
    /// target below the current level is never reached.
    pub fn deepen_to(&mut self, target_level: u32) -> bool {
        if target_level < self.level {
            return false;
        }

        while self.level < target_level {
            if !self.deepen() {
                return false;
            }
        }

        true
    }

    /// Writes the parse in its binary form: level, core count and cores,
    /// little-endian.
    pub fn write<W: Write>(&self, writer: W) -> LcpResult<()> {
        let mut writer = NoSeek::new(writer);

        let header = LpsHeader {
            level: self.level,
            core_count: self.cores.len() as u64,
        };
        header.write_to(&mut writer)?;
        for core in &self.cores {
            CoreRecord::from(core).write_to(&mut writer)?;
        }

        Ok(())
    }

    /// Reads a parse written with [`Lps::write`].
    ///
    /// # Errors
    /// [`LcpError::InvalidLevel`] if the level is 0,
    /// [`LcpError::CorruptData`] if the stream ends before the header or all
    /// declared cores were read, and [`LcpError::InvalidCore`] for a core
    /// with `end <= start`.
    pub fn read<R: Read>(mut reader: R) -> LcpResult<Self> {
        let mut buffer = [0; LPS_HEADER_SIZE];
        reader
            .read_exact(&mut buffer)
            .map_err(corrupt_on_eof(0, 0))?;
        let header = LpsHeader::read(&mut Cursor::new(&buffer))?;
        if header.level == 0 {
            return Err(LcpError::InvalidLevel(header.level));
        }

        let mut cores = Vec::with_capacity(header.core_count.min(MAX_PREALLOCATED_CORES) as usize);
        let mut buffer = [0; CORE_RECORD_SIZE];
        for index in 0..header.core_count {
            reader
                .read_exact(&mut buffer)
                .map_err(corrupt_on_eof(header.core_count, index))?;
            let core = Core::from(CoreRecord::read(&mut Cursor::new(&buffer))?);
            check_core_range(index, &core)?;
            cores.push(core);
        }

        Ok(Self {
            level: header.level,
            strand: Strand::Forward,
            cores,
        })
    }
}

fn corrupt_on_eof(declared: u64, actual: u64) -> impl FnOnce(std::io::Error) -> LcpError {
    move |e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            LcpError::corrupt_data(declared, actual)
        } else {
            LcpError::from(e)
        }
    }
}

fn check_core_range(index: u64, core: &Core) -> LcpResult<()> {
    if core.end() <= core.start() {
        return Err(LcpError::invalid_core(index, core.start(), core.end()));
    }

    Ok(())
}

impl PartialEq for Lps {
    fn eq(&self, other: &Self) -> bool {
        self.level == other.level
            && self.cores.len() == other.cores.len()
            && self
                .cores
                .iter()
                .zip(&other.cores)
                .all(|(core, other_core)| core.identical(other_core))
    }
}

impl Eq for Lps {}

impl Display for Lps {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Level: {}\n{}", self.level, self.labels().join(" "))
    }
}
