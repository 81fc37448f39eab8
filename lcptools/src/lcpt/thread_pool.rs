use std::error::Error;
use std::mem;
use std::sync::{Arc, Mutex};

/// Slot for the first error reported by a job.
#[derive(Debug)]
struct ErrorReceiver<E> {
    error: Arc<Mutex<Option<E>>>,
}

impl<E> Clone for ErrorReceiver<E> {
    fn clone(&self) -> Self {
        Self {
            error: self.error.clone(),
        }
    }
}

impl<E: Default> ErrorReceiver<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn handle_result<T>(&self, result: Result<T, E>) {
        if let Err(error) = result {
            self.set_error(error);
        }
    }

    fn set_error(&self, error: E) {
        let mut guard = self.error.lock().expect("Could not acquire error lock");
        if guard.is_none() {
            *guard = Some(error);
        }
    }

    pub fn status(&self) -> Result<(), E> {
        let mut guard = self.error.lock().expect("Could not acquire error lock");

        if let Some(error) = &mut *guard {
            let error = mem::take(error);
            return Err(error);
        }

        Ok(())
    }
}

pub type ThreadPoolJobResult<E> = Result<(), E>;

/// Pool of worker threads running fallible jobs. With no threads, jobs run
/// on the calling thread as soon as they are submitted.
#[derive(Debug)]
pub(in crate::lcpt) struct ThreadPool<E> {
    inner: Option<threadpool::ThreadPool>,
    error_receiver: ErrorReceiver<E>,
}

impl<E: Error + Default + Send + 'static> ThreadPool<E> {
    #[must_use]
    pub fn new(thread_num: usize, thread_name: &str) -> Self {
        let inner = if thread_num > 0 {
            let pool = threadpool::Builder::new()
                .num_threads(thread_num)
                .thread_name(thread_name.to_owned())
                .build();
            Some(pool)
        } else {
            None
        };

        Self {
            inner,
            error_receiver: ErrorReceiver::new(),
        }
    }

    #[must_use]
    pub fn is_foreground(&self) -> bool {
        self.inner.is_none()
    }

    /// Runs `job`, returning the error of any job that failed so far.
    pub fn execute<F>(&self, job: F) -> ThreadPoolJobResult<E>
    where
        F: FnOnce() -> ThreadPoolJobResult<E> + Send + 'static,
    {
        self.error_receiver.status()?;

        if let Some(pool) = &self.inner {
            let error_receiver = self.error_receiver.clone();
            pool.execute(move || {
                error_receiver.handle_result(job());
            });
        } else {
            self.error_receiver.handle_result(job());
            self.error_receiver.status()?;
        }

        Ok(())
    }

    /// Returns the error of any job that failed so far. On error, waits for
    /// the remaining jobs to finish.
    pub fn get_status(&self) -> Result<(), E> {
        let result = self.error_receiver.status();
        if let Err(error) = result {
            self.inner_join();
            return Err(error);
        }

        Ok(())
    }

    pub fn join(&self) -> Result<(), E> {
        self.inner_join();
        self.error_receiver.status()?;

        Ok(())
    }

    fn inner_join(&self) {
        if let Some(pool) = &self.inner {
            pool.join();
        }
    }
}

impl<E> Drop for ThreadPool<E> {
    fn drop(&mut self) {
        if let Some(pool) = &self.inner {
            if pool.active_count() != 0 || pool.queued_count() != 0 {
                panic!("Cannot drop ThreadPool when any jobs are active");
            }
        }
    }
}
