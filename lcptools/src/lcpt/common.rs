use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Instant;

use number_prefix::NumberPrefix;

use crate::progress::ByteNum;

/// Lets workers take turns in the order records were submitted.
#[derive(Debug)]
pub(super) struct RecordLock {
    current_record: Mutex<u32>,
    current_record_cvar: Condvar,
}

impl RecordLock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_record: Mutex::new(0),
            current_record_cvar: Condvar::new(),
        }
    }

    /// Blocks until all records before `record_index` released the lock.
    pub fn lock(&self, record_index: u32) -> RecordLockGuard<'_> {
        RecordLockGuard::new(&self.current_record, &self.current_record_cvar, record_index)
    }
}

#[derive(Debug)]
#[must_use]
pub(super) struct RecordLockGuard<'a> {
    current_record: MutexGuard<'a, u32>,
    current_record_cvar: &'a Condvar,
}

impl<'a> RecordLockGuard<'a> {
    fn new(current_record: &'a Mutex<u32>, cvar: &'a Condvar, record_index: u32) -> Self {
        let mut current_record = current_record
            .lock()
            .expect("Could not acquire record lock");
        while *current_record != record_index {
            current_record = cvar
                .wait(current_record)
                .expect("Could not acquire record lock");
        }

        Self {
            current_record,
            current_record_cvar: cvar,
        }
    }
}

impl<'a> Drop for RecordLockGuard<'a> {
    fn drop(&mut self) {
        *self.current_record += 1;
        self.current_record_cvar.notify_all();
    }
}

#[must_use]
pub(crate) fn format_stats(start_time: Instant, bytes_processed: ByteNum) -> String {
    let elapsed = start_time.elapsed();

    let size_human = format_bytes(bytes_processed);

    let rate = bytes_processed.get() as f32 / elapsed.as_secs_f32();
    let rate_human = match NumberPrefix::decimal(rate) {
        NumberPrefix::Standalone(bytes) => {
            format!("{:.0} B/s", bytes)
        }
        NumberPrefix::Prefixed(prefix, n) => {
            format!("{:.3} {}B/s", n, prefix)
        }
    };

    format!(
        "{} in {:.2}s ({})",
        size_human,
        elapsed.as_secs_f32(),
        rate_human,
    )
}

#[must_use]
pub(crate) fn format_bytes(bytes: ByteNum) -> String {
    match NumberPrefix::decimal(bytes.get() as f32) {
        NumberPrefix::Standalone(bytes) => {
            format!("{} bytes", bytes)
        }
        NumberPrefix::Prefixed(prefix, n) => {
            format!("{:.2} {}B", n, prefix)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread;

    use crate::lcpt::common::{format_bytes, RecordLock};
    use crate::progress::ByteNum;

    #[test]
    fn test_record_lock_order() {
        let lock = Arc::new(RecordLock::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..8u32)
            .rev()
            .map(|index| {
                let lock = lock.clone();
                let order = order.clone();
                thread::spawn(move || {
                    let _guard = lock.lock(index);
                    order.lock().unwrap().push(index);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*order.lock().unwrap(), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(ByteNum::new(12)), "12 bytes");
        assert_eq!(format_bytes(ByteNum::new(1_500_000)), "1.50 MB");
    }
}
