//! Error sink injected into the walker.
//!
//! The walker never propagates listing failures; it hands them to an
//! [`ErrorSink`] and carries on.  [`TracingSink`] forwards to `tracing`,
//! [`SkipRecorder`] additionally keeps a list of the skipped directories.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Receiver for non-fatal traversal errors.
pub trait ErrorSink: Send + Sync {
    /// Report an error-level event with a message and its underlying cause.
    fn error(&self, message: &str, cause: &(dyn Error + 'static));

    /// A directory's listing failed and its subtree was skipped.
    fn skipped(&self, dir: &Path, cause: &(dyn Error + 'static)) {
        self.error(&format!("cannot walk {}", dir.display()), reason(cause));
    }
}

/// What went wrong, without the path.  The walker's own error wraps the
/// path around an underlying I/O error; the path is reported separately.
fn reason<'a>(cause: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
    cause.source().unwrap_or(cause)
}

/// Default sink: emit through the global `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn error(&self, message: &str, cause: &(dyn Error + 'static)) {
        tracing::error!(error = %cause, "{message}");
    }

    fn skipped(&self, dir: &Path, cause: &(dyn Error + 'static)) {
        tracing::error!(path = %dir.display(), error = %reason(cause), "directory skipped");
    }
}

/// A directory left out of the totals because it could not be listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDir {
    pub path: PathBuf,
    pub reason: String,
}

/// Records skipped directories, then forwards everything to `inner`.
pub struct SkipRecorder {
    inner: Arc<dyn ErrorSink>,
    skipped: Mutex<Vec<SkippedDir>>,
}

impl SkipRecorder {
    pub fn new(inner: Arc<dyn ErrorSink>) -> Self {
        Self {
            inner,
            skipped: Mutex::new(Vec::new()),
        }
    }

    /// Take the recorded entries, sorted by path.
    pub fn take(&self) -> Vec<SkippedDir> {
        let mut out = std::mem::take(&mut *self.skipped.lock().unwrap_or_else(|e| e.into_inner()));
        out.sort_by(|a, b| a.path.cmp(&b.path));
        out
    }
}

impl ErrorSink for SkipRecorder {
    fn error(&self, message: &str, cause: &(dyn Error + 'static)) {
        self.inner.error(message, cause);
    }

    fn skipped(&self, dir: &Path, cause: &(dyn Error + 'static)) {
        self.skipped
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SkippedDir {
                path: dir.to_path_buf(),
                reason: reason(cause).to_string(),
            });
        self.inner.skipped(dir, cause);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Sink that keeps every message for assertions.
    #[derive(Default)]
    pub struct CaptureSink {
        pub messages: Mutex<Vec<String>>,
    }

    impl CaptureSink {
        pub fn count(&self) -> usize {
            self.messages.lock().unwrap().len()
        }
    }

    impl ErrorSink for CaptureSink {
        fn error(&self, message: &str, cause: &(dyn Error + 'static)) {
            self.messages.lock().unwrap().push(format!("{message}: {cause}"));
        }
    }
}
