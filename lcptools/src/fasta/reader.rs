use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io::BufRead;

use crate::fasta::{FastaRecord, FASTA_COMMENT_PREFIX, FASTA_HEADER_PREFIX};
use crate::progress::ByteNum;

/// Error occurring during parsing a FASTA file.
#[derive(Debug)]
pub enum FastaReaderError {
    /// I/O error occurred when reading the FASTA file.
    IoError(std::io::Error),
    /// Sequence data found before the first header line.
    InvalidFormat,
}

impl From<std::io::Error> for FastaReaderError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl Display for FastaReaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FastaReaderError::IoError(e) => write!(f, "IO error: {}", e),
            FastaReaderError::InvalidFormat => write!(f, "Invalid format"),
        }
    }
}

impl Error for FastaReaderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FastaReaderError::IoError(e) => Some(e),
            FastaReaderError::InvalidFormat => None,
        }
    }
}

/// The result of a FASTA reading operation.
pub type FastaResult<T> = Result<T, FastaReaderError>;

/// FASTA format reader.
///
/// Sequence lines of a record are concatenated with line endings (`\n` or
/// `\r\n`) removed. Empty lines and `;` comment lines are skipped. Sequence
/// bytes are not validated here; that happens when the sequence is parsed.
#[derive(Debug)]
pub struct FastaReader<R> {
    reader: R,
    buffer: Vec<u8>,
    next_header: Option<String>,
    bytes_read: ByteNum,
}

impl<R: BufRead> FastaReader<R> {
    /// Creates new `FastaReader` instance.
    ///
    /// # Examples
    /// ```
    /// use lcptools::fasta::reader::FastaReader;
    ///
    /// let mut reader = FastaReader::new(">seq\nACGT\nAC\n".as_bytes());
    /// let record = reader.read_record().unwrap().unwrap();
    /// assert_eq!(record.identifier(), "seq");
    /// assert_eq!(record.sequence(), b"ACGTAC");
    /// assert!(reader.read_record().unwrap().is_none());
    /// ```
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
            next_header: None,
            bytes_read: ByteNum::ZERO,
        }
    }

    /// Total number of bytes consumed from the underlying reader.
    #[must_use]
    pub fn bytes_read(&self) -> ByteNum {
        self.bytes_read
    }

    /// Reads the next record, or returns `None` at the end of the file.
    pub fn read_record(&mut self) -> FastaResult<Option<FastaRecord>> {
        let identifier = match self.next_header.take() {
            Some(identifier) => identifier,
            None => match self.parse_first_header()? {
                Some(identifier) => identifier,
                None => return Ok(None),
            },
        };

        let mut sequence = Vec::new();
        while self.read_line()? {
            let line = self.buffer.as_slice();
            if line.first() == Some(&FASTA_HEADER_PREFIX) {
                self.next_header = Some(Self::parse_header(line));
                break;
            }
            if line.first() == Some(&FASTA_COMMENT_PREFIX) {
                continue;
            }

            sequence.extend_from_slice(line);
        }

        Ok(Some(FastaRecord::new(identifier, sequence)))
    }

    fn parse_first_header(&mut self) -> FastaResult<Option<String>> {
        while self.read_line()? {
            let line = self.buffer.as_slice();
            if line.is_empty() || line.first() == Some(&FASTA_COMMENT_PREFIX) {
                continue;
            }
            if line.first() != Some(&FASTA_HEADER_PREFIX) {
                return Err(FastaReaderError::InvalidFormat);
            }

            return Ok(Some(Self::parse_header(line)));
        }

        Ok(None)
    }

    fn parse_header(line: &[u8]) -> String {
        String::from_utf8_lossy(&line[1..]).trim().to_owned()
    }

    /// Reads a line into the buffer, without the line ending. Returns `false`
    /// at the end of the file.
    fn read_line(&mut self) -> FastaResult<bool> {
        self.buffer.clear();
        let bytes_read = self.reader.read_until(b'\n', &mut self.buffer)?;
        if bytes_read == 0 {
            return Ok(false);
        }
        self.bytes_read += ByteNum::new(bytes_read);

        while matches!(self.buffer.last(), Some(b'\n' | b'\r')) {
            self.buffer.pop();
        }

        Ok(true)
    }
}

impl<R: BufRead> IntoIterator for FastaReader<R> {
    type Item = FastaResult<FastaRecord>;
    type IntoIter = FastaReaderIterator<R>;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            reader: self,
            no_errors: true,
        }
    }
}

/// Iterator implementation for [`FastaReader`] which iterates over all
/// records in a file.
#[derive(Debug)]
pub struct FastaReaderIterator<R> {
    reader: FastaReader<R>,
    no_errors: bool,
}

impl<R: BufRead> Iterator for FastaReaderIterator<R> {
    type Item = FastaResult<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.no_errors {
            return None;
        }

        match self.reader.read_record() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.no_errors = false;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::io::ErrorKind::NotFound;

    use crate::_internal_test_data::{SHORT_TEST_FASTA_RECORDS, SHORT_TEST_FASTA_STR};
    use crate::fasta::reader::{FastaReader, FastaReaderError};
    use crate::fasta::FastaRecord;
    use crate::progress::ByteNum;

    #[test]
    fn should_return_no_records() {
        let mut reader = FastaReader::new("".as_bytes());
        assert!(reader.read_record().unwrap().is_none());

        let reader = FastaReader::new("\n\n; comment\n".as_bytes());
        assert_eq!(reader.into_iter().count(), 0);
    }

    #[test]
    fn should_read_multiline_records() {
        let reader = FastaReader::new(SHORT_TEST_FASTA_STR.as_bytes());
        let records: Result<Vec<_>, _> = reader.into_iter().collect();

        assert_eq!(records.unwrap(), *SHORT_TEST_FASTA_RECORDS);
    }

    #[test]
    fn should_strip_carriage_returns() {
        let reader = FastaReader::new(">a\r\nAC\r\nGT\r\n>b\r\n\r\nTT".as_bytes());
        let records: Result<Vec<_>, _> = reader.into_iter().collect();

        assert_eq!(
            records.unwrap(),
            [FastaRecord::new("a", "ACGT"), FastaRecord::new("b", "TT")]
        );
    }

    #[test]
    fn should_read_empty_sequence() {
        let reader = FastaReader::new(">empty\n>full\nA\n".as_bytes());
        let records: Vec<_> = reader.into_iter().map(Result::unwrap).collect();

        assert_eq!(records.len(), 2);
        assert!(records[0].is_empty());
        assert_eq!(records[1].sequence(), b"A");
    }

    #[test]
    fn should_return_invalid_format_error() {
        let reader = FastaReader::new("ACGT\n>seq\nACGT\n".as_bytes());
        let mut iter = reader.into_iter();

        assert!(matches!(
            iter.next(),
            Some(Err(FastaReaderError::InvalidFormat))
        ));
        assert!(iter.next().is_none());
    }

    #[test]
    fn should_count_bytes_read() {
        let mut reader = FastaReader::new(">s\nACGT\n".as_bytes());
        reader.read_record().unwrap();

        assert_eq!(reader.bytes_read(), ByteNum::new(8));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(FastaReaderError::InvalidFormat.to_string(), "Invalid format");

        let error = FastaReaderError::from(std::io::Error::from(NotFound));
        assert_eq!(error.to_string(), "IO error: entity not found");
        assert!(error.source().is_some());
    }
}
