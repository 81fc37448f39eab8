use std::io::Write;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use binrw::BinWrite;
use log::{debug, error, info, trace};

use crate::error::{LcpError, LcpResult};
use crate::lcpt::common::{format_bytes, format_stats, RecordLock};
use crate::lcpt::data::LcptItemTag;
use crate::lcpt::no_seek::NoSeek;
use crate::lcpt::thread_pool::ThreadPool;
use crate::lps::{Lps, LpsParams};
use crate::progress::{ByteNum, DummyProgressNotifier, ProgressNotifier};

#[derive(Debug, Clone)]
pub struct LcptWriterParams {
    lps_params: LpsParams,
    progress_notifier: Arc<dyn ProgressNotifier>,
    thread_num: usize,
}

impl LcptWriterParams {
    #[must_use]
    pub fn builder() -> LcptWriterParamsBuilder {
        LcptWriterParamsBuilder::new()
    }
}

impl Default for LcptWriterParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone)]
pub struct LcptWriterParamsBuilder {
    lps_params: LpsParams,
    progress_notifier: Arc<dyn ProgressNotifier>,
    thread_num: usize,
}

impl LcptWriterParamsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lps_params: LpsParams::default(),
            progress_notifier: Arc::new(DummyProgressNotifier),
            thread_num: 0,
        }
    }

    /// Sets the parameters every record is parsed with.
    pub fn lps_params(&mut self, lps_params: LpsParams) -> &mut Self {
        let mut new = self;
        new.lps_params = lps_params;
        new
    }

    pub fn progress_notifier(&mut self, progress_notifier: Arc<dyn ProgressNotifier>) -> &mut Self {
        let mut new = self;
        new.progress_notifier = progress_notifier;
        new
    }

    /// Sets the number of records parsed at the same time. `0` means all
    /// records are parsed on the calling thread.
    pub fn thread_num(&mut self, thread_num: usize) -> &mut Self {
        let mut new = self;
        new.thread_num = thread_num;
        new
    }

    #[must_use]
    pub fn build(&self) -> LcptWriterParams {
        LcptWriterParams {
            lps_params: self.lps_params.clone(),
            progress_notifier: self.progress_notifier.clone(),
            thread_num: self.thread_num,
        }
    }
}

impl Default for LcptWriterParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct LcptWriterOptions {
    lps_params: LpsParams,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl From<LcptWriterParams> for LcptWriterOptions {
    fn from(params: LcptWriterParams) -> Self {
        Self {
            lps_params: params.lps_params,
            progress_notifier: params.progress_notifier,
        }
    }
}

#[derive(Debug)]
struct LcptOutState<W> {
    writer: Mutex<NoSeek<W>>,
    record_lock: RecordLock,
}

impl<W: Write> LcptOutState<W> {
    #[must_use]
    fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(NoSeek::new(writer)),
            record_lock: RecordLock::new(),
        }
    }

    fn writer(&self) -> MutexGuard<'_, NoSeek<W>> {
        self.writer.lock().expect("Could not acquire writer lock")
    }

    fn record_lock(&self) -> &RecordLock {
        &self.record_lock
    }
}

/// Writer of `.lcpt` files.
///
/// Every sequence added is parsed (and deepened) with the configured
/// [`LpsParams`], possibly on a background thread; records are written in
/// the order the sequences were added.
///
/// # Examples
/// ```
/// use lcptools::lcpt::reader::LcptReader;
/// use lcptools::lcpt::writer::LcptWriter;
///
/// let mut writer = LcptWriter::new(Vec::new());
/// writer.add_sequence(b"GACTTGACTT".to_vec()).unwrap();
/// let data = writer.finish().unwrap();
///
/// let parses: Vec<_> = LcptReader::new(data.as_slice())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(parses.len(), 1);
/// ```
#[derive(Debug)]
pub struct LcptWriter<W> {
    state: Arc<LcptOutState<W>>,
    options: Arc<LcptWriterOptions>,
    thread_pool: ThreadPool<LcpError>,
    current_record: u32,
    stats: Arc<WriteStats>,
}

impl<W: Write + Send + 'static> LcptWriter<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_params(writer, LcptWriterParams::default())
    }

    #[must_use]
    pub fn with_params(writer: W, params: LcptWriterParams) -> Self {
        let thread_pool = ThreadPool::new(params.thread_num, "lcpt-writer");
        debug!(
            "Writing .lcpt with {:?} ({})",
            params.lps_params,
            if thread_pool.is_foreground() {
                "foreground".to_owned()
            } else {
                format!("{} threads", params.thread_num)
            }
        );

        Self {
            state: Arc::new(LcptOutState::new(writer)),
            options: Arc::new(params.into()),
            thread_pool,
            current_record: 0,
            stats: Arc::new(WriteStats::new()),
        }
    }

    /// Submits a sequence to be parsed and written.
    ///
    /// Errors of records submitted earlier may be reported here.
    pub fn add_sequence(&mut self, sequence: Vec<u8>) -> LcpResult<()> {
        self.thread_pool.get_status()?;

        let state = self.state.clone();
        let options = self.options.clone();
        let stats = self.stats.clone();
        let record_index = self.current_record;
        self.current_record += 1;
        self.thread_pool.execute(move || {
            let data = Self::encode_record(&sequence, &options.lps_params);

            let _guard = state.record_lock().lock(record_index);
            let (data, core_num) = data?;
            state.writer().write_all(&data)?;
            trace!(
                "Wrote record {} ({} symbols, {} cores)",
                record_index,
                sequence.len(),
                core_num
            );

            let bytes = ByteNum::new(sequence.len());
            stats.add_record(bytes, core_num, data.len());
            options.progress_notifier.processed_bytes(bytes);
            options.progress_notifier.record_written();
            Ok(())
        })?;

        Ok(())
    }

    fn encode_record(sequence: &[u8], lps_params: &LpsParams) -> LcpResult<(Vec<u8>, usize)> {
        let lps = Lps::with_params(sequence, lps_params)?;

        let mut data = Vec::new();
        LcptItemTag::Lps.write_to(&mut NoSeek::new(&mut data))?;
        lps.write(&mut data)?;

        Ok((data, lps.len()))
    }

    /// Waits for all records to be written, then writes the terminator.
    /// Returns the underlying writer.
    pub fn finish(self) -> LcpResult<W> {
        self.thread_pool.join()?;

        {
            let mut writer = self.state.writer();
            LcptItemTag::End.write_to(&mut *writer)?;
            writer.flush()?;
        }
        self.stats.print_stats();

        let state = self.state.clone();
        drop(self);
        let state = Arc::try_unwrap(state).map_err(|_| LcpError::InvalidState)?;
        let writer = state
            .writer
            .into_inner()
            .map_err(|_| LcpError::InvalidState)?;

        Ok(writer.into_inner())
    }
}

impl<W> Drop for LcptWriter<W> {
    fn drop(&mut self) {
        if let Err(e) = self.thread_pool.join() {
            error!("Unfinished .lcpt record could not be written: {}", e);
        }
    }
}

#[derive(Debug)]
struct WriteStats {
    start_time: Instant,

    in_bytes: AtomicUsize,
    records: AtomicU64,
    cores: AtomicUsize,
    out_bytes: AtomicUsize,
}

impl WriteStats {
    #[must_use]
    fn new() -> Self {
        Self {
            start_time: Instant::now(),

            in_bytes: AtomicUsize::new(0),
            records: AtomicU64::new(0),
            cores: AtomicUsize::new(0),
            out_bytes: AtomicUsize::new(0),
        }
    }

    fn add_record(&self, in_bytes: ByteNum, cores: usize, out_bytes: usize) {
        self.in_bytes.fetch_add(in_bytes.get(), Ordering::Relaxed);
        self.records.fetch_add(1, Ordering::Relaxed);
        self.cores.fetch_add(cores, Ordering::Relaxed);
        self.out_bytes.fetch_add(out_bytes, Ordering::Relaxed);
    }

    fn print_stats(&self) {
        let in_bytes = ByteNum::new(self.in_bytes.load(Ordering::SeqCst));
        let records = self.records.load(Ordering::SeqCst);
        let cores = self.cores.load(Ordering::SeqCst);
        let out_bytes = ByteNum::new(self.out_bytes.load(Ordering::SeqCst));

        info!("Parsed {}", format_stats(self.start_time, in_bytes));
        info!(
            "{} records, {} cores, output size: {}",
            records,
            cores,
            format_bytes(out_bytes)
        );
    }
}
