//! Background preview compilation.
//!
//! The editor submits every change to a [`PreviewWorker`], which compiles on
//! its own thread. Requests that pile up while a compile is running are
//! coalesced to the newest one, and every result carries the generation of
//! the request it answers. The consumer only accepts results newer than the
//! last one it accepted, so an older compile never replaces a newer preview.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::error::Result;
use crate::{CompileOptions, CompileOutput, Compiler};

struct PreviewRequest {
    generation: u64,
    text: String,
    theme: String,
}

/// A compiled preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewUpdate {
    /// Generation returned by the [`PreviewWorker::submit`] call this answers
    pub generation: u64,

    /// Compile result
    pub output: CompileOutput,
}

/// Handle to a background compile thread.
///
/// Dropping the handle stops the thread and waits for it to exit.
pub struct PreviewWorker {
    requests: Option<Sender<PreviewRequest>>,
    results: Receiver<PreviewUpdate>,
    handle: Option<JoinHandle<()>>,
    submitted: u64,
    accepted: u64,
}

impl PreviewWorker {
    /// Start a worker thread compiling with `options`.
    pub fn spawn(options: CompileOptions) -> Result<Self> {
        let (request_tx, request_rx) = crossbeam_channel::unbounded();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        let compiler = Compiler::with_options(options);

        let handle = thread::Builder::new()
            .name("mdslides-preview".to_string())
            .spawn(move || run(compiler, request_rx, result_tx))?;

        Ok(Self {
            requests: Some(request_tx),
            results: result_rx,
            handle: Some(handle),
            submitted: 0,
            accepted: 0,
        })
    }

    /// Queue a compile and return its generation.
    pub fn submit(&mut self, text: impl Into<String>, theme: impl Into<String>) -> u64 {
        self.submitted += 1;
        let request = PreviewRequest {
            generation: self.submitted,
            text: text.into(),
            theme: theme.into(),
        };
        let sent = self
            .requests
            .as_ref()
            .is_some_and(|tx| tx.send(request).is_ok());
        if !sent {
            log::warn!("Preview worker is gone; request {} dropped", self.submitted);
        }
        self.submitted
    }

    /// Generation of the most recent submission.
    pub fn latest_generation(&self) -> u64 {
        self.submitted
    }

    /// Generation of the most recent accepted result (0 before any).
    pub fn accepted_generation(&self) -> u64 {
        self.accepted
    }

    /// Take the newest finished result without blocking.
    ///
    /// Returns `None` when nothing newer than the last accepted result is
    /// ready.
    pub fn try_latest(&mut self) -> Option<PreviewUpdate> {
        let mut newest = None;
        while let Ok(update) = self.results.try_recv() {
            if let Some(update) = self.accept(update) {
                newest = Some(update);
            }
        }
        newest
    }

    /// Wait up to `timeout` for the result of the latest submission.
    ///
    /// Returns the newest result accepted during the wait, which may be an
    /// intermediate generation if the latest one is not ready in time.
    pub fn wait_latest(&mut self, timeout: Duration) -> Option<PreviewUpdate> {
        let deadline = Instant::now() + timeout;
        let mut newest = self.try_latest();

        while self.accepted < self.submitted {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.results.recv_timeout(remaining) {
                Ok(update) => {
                    if let Some(update) = self.accept(update) {
                        newest = Some(update);
                    }
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    log::warn!("Preview worker disconnected");
                    break;
                }
            }
        }
        newest
    }

    fn accept(&mut self, update: PreviewUpdate) -> Option<PreviewUpdate> {
        if update.generation <= self.accepted {
            log::trace!("Dropping stale preview {}", update.generation);
            return None;
        }
        self.accepted = update.generation;
        Some(update)
    }
}

impl Drop for PreviewWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Preview worker panicked");
            }
        }
    }
}

fn run(mut compiler: Compiler, requests: Receiver<PreviewRequest>, results: Sender<PreviewUpdate>) {
    while let Ok(mut request) = requests.recv() {
        let mut skipped = 0;
        while let Ok(newer) = requests.try_recv() {
            request = newer;
            skipped += 1;
        }
        if skipped > 0 {
            log::trace!("Coalesced {} preview requests", skipped);
        }

        let output = compiler.compile(&request.text, &request.theme);
        let update = PreviewUpdate {
            generation: request.generation,
            output,
        };
        if results.send(update).is_err() {
            break;
        }
    }
    log::debug!("Preview worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_secs(10);

    #[test]
    fn test_single_submission() {
        let mut worker = PreviewWorker::spawn(CompileOptions::default()).unwrap();
        let generation = worker.submit("# A\n---\n# B", "dark");

        let update = worker.wait_latest(WAIT).unwrap();
        assert_eq!(update.generation, generation);
        assert_eq!(update.output.slide_count, 2);
        assert!(update.output.html.contains("theme-dark"));
    }

    #[test]
    fn test_last_write_wins() {
        let mut worker = PreviewWorker::spawn(CompileOptions::default()).unwrap();
        for i in 0..20 {
            worker.submit(format!("slide {}", i), "default");
        }

        let update = worker.wait_latest(WAIT).unwrap();
        assert_eq!(update.generation, 20);
        assert!(update.output.html.contains("slide 19"));
        assert_eq!(worker.accepted_generation(), worker.latest_generation());
        assert!(worker.try_latest().is_none());
    }

    #[test]
    fn test_stale_results_rejected() {
        let mut worker = PreviewWorker::spawn(CompileOptions::default()).unwrap();
        worker.submit("a", "default");
        worker.wait_latest(WAIT).unwrap();

        let stale = PreviewUpdate {
            generation: 1,
            output: crate::compile("old", "default"),
        };
        assert!(worker.accept(stale).is_none());
    }

    #[test]
    fn test_nothing_submitted() {
        let mut worker = PreviewWorker::spawn(CompileOptions::default()).unwrap();
        assert!(worker.try_latest().is_none());
        assert!(worker.wait_latest(Duration::from_millis(10)).is_none());
    }
}
