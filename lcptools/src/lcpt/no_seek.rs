use std::io::{Error, ErrorKind, Seek, SeekFrom, Write};

/// Adapter giving a plain [`Write`] object the [`Seek`] implementation
/// `binrw` asks for.
///
/// The writer keeps track of the number of bytes written. Seeks that would
/// not move the position succeed (this is all serialization does); any
/// other seek fails.
#[derive(Debug)]
pub struct NoSeek<W> {
    inner: W,
    position: u64,
}

impl<W> NoSeek<W> {
    /// Wraps `inner`.
    ///
    /// # Examples
    /// ```
    /// use std::io::{Seek, SeekFrom, Write};
    ///
    /// use lcptools::lcpt::no_seek::NoSeek;
    ///
    /// let mut writer = NoSeek::new(Vec::new());
    /// writer.write_all(b"ACGT").unwrap();
    ///
    /// assert_eq!(writer.seek(SeekFrom::Current(0)).unwrap(), 4);
    /// assert!(writer.seek(SeekFrom::Start(0)).is_err());
    /// ```
    pub fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn seek_error() -> Error {
        Error::new(ErrorKind::Other, "Non-noop seek on a NoSeek object")
    }
}

impl<W> Seek for NoSeek<W> {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        match pos {
            SeekFrom::Start(position) if position == self.position => Ok(self.position),
            SeekFrom::Current(0) => Ok(self.position),
            _ => Err(Self::seek_error()),
        }
    }
}

impl<W: Write> Write for NoSeek<W> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.position += size as u64;
        Ok(size)
    }

    #[inline]
    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Seek, SeekFrom, Write};

    use crate::lcpt::no_seek::NoSeek;

    #[test]
    fn test_position() {
        let mut writer = NoSeek::new(Vec::new());
        assert_eq!(writer.position(), 0);

        writer.write_all(&[1, 2, 3]).unwrap();
        assert_eq!(writer.position(), 3);
        assert_eq!(writer.seek(SeekFrom::Start(3)).unwrap(), 3);
        assert!(writer.seek(SeekFrom::Current(1)).is_err());
        assert!(writer.seek(SeekFrom::End(0)).is_err());

        assert_eq!(writer.into_inner(), [1, 2, 3]);
    }
}
