use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Error occurring while parsing, deepening, or (de)serializing a parse.
#[derive(Debug, Default)]
pub enum LcpError {
    #[default]
    InvalidState,
    /// I/O error occurred on the underlying stream.
    IoError(std::io::Error),
    /// The binary layout could not be read or written.
    SerializeError(binrw::Error),
    /// A byte outside of the nucleotide alphabet.
    InvalidSymbol { byte: u8, offset: u64 },
    /// The stream ended before all declared cores were read.
    CorruptData { declared: u64, actual: u64 },
    /// A serialized core with an empty or reversed range.
    InvalidCore { index: u64, start: u64, end: u64 },
    /// A `.lcpt` container ended without its terminator.
    MissingTerminator { records: u64 },
    /// A serialized parse declared an impossible level.
    InvalidLevel(u32),
    /// Two adjacent segments share no common scan position.
    SegmentMerge { chunk: usize, chunk_start: u64 },
    /// Parsing parameters that cannot produce a valid result.
    InvalidParams(&'static str),
    /// The worker pool could not be created.
    ThreadPool(String),
}

impl LcpError {
    #[must_use]
    pub fn invalid_symbol(byte: u8, offset: u64) -> Self {
        Self::InvalidSymbol { byte, offset }
    }

    #[must_use]
    pub fn corrupt_data(declared: u64, actual: u64) -> Self {
        Self::CorruptData { declared, actual }
    }

    #[must_use]
    pub fn invalid_core(index: u64, start: u64, end: u64) -> Self {
        Self::InvalidCore { index, start, end }
    }

    #[must_use]
    pub fn segment_merge(chunk: usize, chunk_start: u64) -> Self {
        Self::SegmentMerge { chunk, chunk_start }
    }
}

impl From<std::io::Error> for LcpError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl From<binrw::Error> for LcpError {
    fn from(e: binrw::Error) -> Self {
        Self::SerializeError(e)
    }
}

impl Display for LcpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LcpError::InvalidState => write!(f, "Invalid parser state"),
            LcpError::IoError(e) => write!(f, "IO error: {}", e),
            LcpError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            LcpError::InvalidSymbol { byte, offset } => {
                if byte.is_ascii_graphic() {
                    write!(f, "Invalid symbol `{}` at offset {}", *byte as char, offset)
                } else {
                    write!(f, "Invalid symbol 0x{:02X} at offset {}", byte, offset)
                }
            }
            LcpError::CorruptData { declared, actual } => write!(
                f,
                "Corrupt data (declared cores: {}, available cores: {})",
                declared, actual
            ),
            LcpError::InvalidCore { index, start, end } => write!(
                f,
                "Invalid core {}: range {}..{} is empty",
                index, start, end
            ),
            LcpError::MissingTerminator { records } => write!(
                f,
                "Container ended after {} records without a terminator",
                records
            ),
            LcpError::InvalidLevel(level) => write!(f, "Invalid parse level: {}", level),
            LcpError::SegmentMerge { chunk, chunk_start } => write!(
                f,
                "Could not merge segment {} starting at {}; overlap margin is too small",
                chunk, chunk_start
            ),
            LcpError::InvalidParams(message) => write!(f, "Invalid parameters: {}", message),
            LcpError::ThreadPool(message) => write!(f, "Thread pool error: {}", message),
        }
    }
}

impl Error for LcpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LcpError::IoError(e) => Some(e),
            LcpError::SerializeError(e) => Some(e),
            _ => None,
        }
    }
}

/// The result of a parsing or serialization operation.
pub type LcpResult<T> = Result<T, LcpError>;
