use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use lcptools::progress::{ByteNum, ProgressNotifier};

#[derive(Debug, Default)]
struct LcpProgressBarState {
    total_bytes: u64,
    initialized: bool,
}

/// Progress bar shown on the standard error while sequences are processed.
///
/// Shows a byte progress bar when the input size is known, and a spinner
/// otherwise.
#[derive(Debug, Clone)]
pub(crate) struct LcpProgressBar {
    bar: ProgressBar,
    state: Arc<Mutex<LcpProgressBarState>>,
    records: Arc<AtomicU64>,
}

impl LcpProgressBar {
    pub fn new() -> LcpProgressBar {
        let init_bar = ProgressBar::hidden();
        init_bar.set_style(ProgressStyle::default_spinner());
        init_bar.enable_steady_tick(Duration::from_millis(50));
        init_bar.set_message("Initializing...");

        Self {
            bar: init_bar,
            state: Arc::new(Mutex::new(LcpProgressBarState::default())),
            records: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn show(&self) {
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear()
    }

    #[inline]
    fn init(&self) {
        let mut state = self.state.lock().unwrap();
        if state.initialized {
            return;
        }

        self.bar.set_position(0);
        if state.total_bytes == 0 {
            self.bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner} {bytes} ({bytes_per_sec}) {msg}")
                    .expect("Invalid progress bar template"),
            );
        } else {
            self.bar.set_length(state.total_bytes);
            self.bar.set_style(
                ProgressStyle::default_bar()
                    .template("{wide_bar} {bytes}/{total_bytes} {msg} [ETA {eta}]")
                    .expect("Invalid progress bar template"),
            );
        }
        state.initialized = true;
    }

    pub fn set_total_bytes(&self, total_bytes: u64) {
        let mut state = self.state.lock().unwrap();

        state.initialized = false;
        state.total_bytes = total_bytes;
    }

    pub fn println<I: AsRef<str>>(&self, msg: I) {
        self.bar.println(msg);
    }
}

impl ProgressNotifier for LcpProgressBar {
    fn processed_bytes(&self, bytes: ByteNum) {
        self.init();
        self.bar.inc(bytes.get() as u64);
    }

    fn record_written(&self) {
        let records = self.records.fetch_add(1, Ordering::Relaxed) + 1;
        self.bar.set_message(format!("{} sequences", records));
    }
}
