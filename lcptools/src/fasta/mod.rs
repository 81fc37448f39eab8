//! Reading nucleotide sequences from FASTA files.

pub mod reader;

pub(crate) const FASTA_HEADER_PREFIX: u8 = b'>';
pub(crate) const FASTA_COMMENT_PREFIX: u8 = b';';

/// A single FASTA record: a header line and the sequence lines that follow
/// it, concatenated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FastaRecord {
    identifier: String,
    sequence: Vec<u8>,
}

impl FastaRecord {
    /// Creates a new record.
    ///
    /// # Examples
    /// ```
    /// use lcptools::fasta::FastaRecord;
    ///
    /// let record = FastaRecord::new("chr1", "ACGT");
    /// assert_eq!(record.identifier(), "chr1");
    /// assert_eq!(record.sequence(), b"ACGT");
    /// ```
    #[must_use]
    pub fn new<S: Into<String>, T: Into<Vec<u8>>>(identifier: S, sequence: T) -> Self {
        Self {
            identifier: identifier.into(),
            sequence: sequence.into(),
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    #[must_use]
    pub fn into_sequence(self) -> Vec<u8> {
        self.sequence
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
