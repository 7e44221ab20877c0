//! Where language collections come from, and how a load reaches the UI.
//!
//! A load runs on its own thread and reports through a channel that the
//! egui update loop polls, so the UI keeps drawing its loading state.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use thiserror::Error;

use super::model::Language;
use super::{loader, synthetic};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("failed to read {}: {cause:#}", .path.display())]
    File { path: PathBuf, cause: anyhow::Error },

    #[error("duplicate language id `{0}`")]
    DuplicateId(String),

    #[error("data source failed: {0}")]
    SourceFailed(String),
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Produces the full language collection. Called once per load.
pub trait LanguageSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<Language>, LoadError>;

    /// Short label for the status line.
    fn describe(&self) -> String;
}

/// In-memory generated collection behind a simulated fetch delay.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    pub count: usize,
    pub seed: u64,
    pub latency: Duration,
}

impl LanguageSource for SyntheticSource {
    fn fetch(&self) -> Result<Vec<Language>, LoadError> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        Ok(synthetic::generate_languages(self.count, self.seed))
    }

    fn describe(&self) -> String {
        format!("synthetic sample ({} languages)", self.count)
    }
}

/// A JSON, CSV or Parquet file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LanguageSource for FileSource {
    fn fetch(&self) -> Result<Vec<Language>, LoadError> {
        loader::load_file(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ---------------------------------------------------------------------------
// LoadChannel – one in-flight load, polled from the UI thread
// ---------------------------------------------------------------------------

type LoadMessage = (u64, Result<Vec<Language>, LoadError>);

/// Runs loads off the UI thread and hands back the latest result.
///
/// Every load gets a generation number. Results from older generations, or
/// arriving after [`LoadChannel::cancel`], are dropped on the floor.
pub struct LoadChannel {
    sender: Sender<LoadMessage>,
    receiver: Receiver<LoadMessage>,
    generation: u64,
    in_flight: bool,
}

impl Default for LoadChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            generation: 0,
            in_flight: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Start a load unless one is already running. Returns whether it started.
    ///
    /// When the worker finishes it asks `ctx` for a repaint so the result is
    /// picked up without waiting for input.
    pub fn start(&mut self, source: Arc<dyn LanguageSource>, ctx: Option<egui::Context>) -> bool {
        if self.in_flight {
            log::debug!("Load already in flight, ignoring request");
            return false;
        }
        self.generation += 1;
        self.in_flight = true;

        let generation = self.generation;
        let sender = self.sender.clone();
        log::info!("Loading languages from {}", source.describe());

        let spawned = std::thread::Builder::new()
            .name(format!("language-load-{generation}"))
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| source.fetch()))
                    .unwrap_or_else(|payload| {
                        let message = panic_message(payload.as_ref());
                        log::error!("Load worker panicked: {message}");
                        Err(LoadError::SourceFailed(message))
                    });
                // The receiver is gone once the app shuts down.
                let _ = sender.send((generation, result));
                if let Some(ctx) = ctx {
                    ctx.request_repaint();
                }
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn load worker: {e}");
            let _ = self
                .sender
                .send((generation, Err(LoadError::SourceFailed(e.to_string()))));
        }
        true
    }

    /// Forget the in-flight load; its result will be discarded.
    pub fn cancel(&mut self) {
        if self.in_flight {
            log::debug!("Discarding load generation {}", self.generation);
        }
        self.generation += 1;
        self.in_flight = false;
    }

    /// Non-blocking check for a finished load of the current generation.
    pub fn poll(&mut self) -> Option<Result<Vec<Language>, LoadError>> {
        while let Ok((generation, result)) = self.receiver.try_recv() {
            if self.in_flight && generation == self.generation {
                self.in_flight = false;
                return Some(result);
            }
            log::debug!("Dropping stale load result (generation {generation})");
        }
        None
    }

    /// Blocking variant of [`LoadChannel::poll`], bounded by `timeout`.
    pub fn wait(&mut self, timeout: Duration) -> Option<Result<Vec<Language>, LoadError>> {
        let deadline = std::time::Instant::now() + timeout;
        while self.in_flight {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                return None;
            }
            match self.receiver.recv_timeout(remaining) {
                Ok((generation, result)) if generation == self.generation => {
                    self.in_flight = false;
                    return Some(result);
                }
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
        None
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "load worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Failing;

    impl LanguageSource for Failing {
        fn fetch(&self) -> Result<Vec<Language>, LoadError> {
            Err(LoadError::SourceFailed("offline".into()))
        }
        fn describe(&self) -> String {
            "failing".into()
        }
    }

    struct Panicking;

    impl LanguageSource for Panicking {
        fn fetch(&self) -> Result<Vec<Language>, LoadError> {
            panic!("source exploded");
        }
        fn describe(&self) -> String {
            "panicking".into()
        }
    }

    struct Counting(AtomicUsize);

    impl LanguageSource for Counting {
        fn fetch(&self) -> Result<Vec<Language>, LoadError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(synthetic::generate_languages(5, 1))
        }
        fn describe(&self) -> String {
            "counting".into()
        }
    }

    fn quick_synthetic() -> Arc<dyn LanguageSource> {
        Arc::new(SyntheticSource {
            count: 80,
            seed: 7,
            latency: Duration::from_millis(5),
        })
    }

    #[test]
    fn load_resolves_once() {
        let mut channel = LoadChannel::new();
        assert!(channel.start(quick_synthetic(), None));
        assert!(channel.is_loading());
        let languages = channel.wait(Duration::from_secs(5)).unwrap().unwrap();
        assert_eq!(languages.len(), 80);
        assert!(!channel.is_loading());
        assert!(channel.poll().is_none());
    }

    #[test]
    fn second_start_is_ignored_while_loading() {
        let mut channel = LoadChannel::new();
        assert!(channel.start(quick_synthetic(), None));
        assert!(!channel.start(quick_synthetic(), None));
        assert!(channel.wait(Duration::from_secs(5)).is_some());
    }

    #[test]
    fn failure_surfaces_and_retry_is_safe() {
        let mut channel = LoadChannel::new();
        channel.start(Arc::new(Failing), None);
        let err = channel.wait(Duration::from_secs(5)).unwrap().unwrap_err();
        assert!(err.to_string().contains("offline"));

        let counting = Arc::new(Counting(AtomicUsize::new(0)));
        channel.start(counting.clone(), None);
        let first = channel.wait(Duration::from_secs(5)).unwrap().unwrap();
        channel.start(counting.clone(), None);
        let second = channel.wait(Duration::from_secs(5)).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(counting.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panicking_source_fails_and_allows_retry() {
        let mut channel = LoadChannel::new();
        assert!(channel.start(Arc::new(Panicking), None));
        let err = channel.wait(Duration::from_secs(5)).unwrap().unwrap_err();
        assert!(matches!(err, LoadError::SourceFailed(ref m) if m.contains("source exploded")));
        assert!(!channel.is_loading());

        assert!(channel.start(quick_synthetic(), None));
        assert_eq!(channel.wait(Duration::from_secs(5)).unwrap().unwrap().len(), 80);
    }

    #[test]
    fn cancelled_result_is_discarded() {
        let mut channel = LoadChannel::new();
        channel.start(quick_synthetic(), None);
        channel.cancel();
        std::thread::sleep(Duration::from_millis(100));
        assert!(channel.poll().is_none());
        assert!(!channel.is_loading());
    }
}
