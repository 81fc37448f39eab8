use std::io::{Cursor, ErrorKind, Read};
use std::time::Instant;

use binrw::BinRead;
use log::{info, trace};

use crate::error::{LcpError, LcpResult};
use crate::lcpt::data::LcptItemTag;
use crate::lps::Lps;

/// Reader of `.lcpt` files, iterating over the stored parses.
///
/// Iteration stops after the terminator, or after the first error.
#[derive(Debug)]
pub struct LcptReader<R> {
    reader: R,
    records_read: u64,
    cores_read: u64,
    start_time: Instant,
    finished: bool,
}

impl<R: Read> LcptReader<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            records_read: 0,
            cores_read: 0,
            start_time: Instant::now(),
            finished: false,
        }
    }

    /// Reads the next parse, or returns `None` after the terminator.
    pub fn read_lps(&mut self) -> LcpResult<Option<Lps>> {
        let mut tag = [0; 1];
        self.reader.read_exact(&mut tag).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                LcpError::MissingTerminator {
                    records: self.records_read,
                }
            } else {
                LcpError::from(e)
            }
        })?;

        match LcptItemTag::read(&mut Cursor::new(&tag))? {
            LcptItemTag::End => {
                info!(
                    "Read {} records ({} cores) in {:.2}s",
                    self.records_read,
                    self.cores_read,
                    self.start_time.elapsed().as_secs_f32()
                );
                Ok(None)
            }
            LcptItemTag::Lps => {
                let lps = Lps::read(&mut self.reader)?;
                trace!(
                    "Read record {} (level {}, {} cores)",
                    self.records_read,
                    lps.level(),
                    lps.len()
                );

                self.records_read += 1;
                self.cores_read += lps.len() as u64;
                Ok(Some(lps))
            }
        }
    }
}

impl<R: Read> Iterator for LcptReader<R> {
    type Item = LcpResult<Lps>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.read_lps();
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result.transpose()
    }
}
