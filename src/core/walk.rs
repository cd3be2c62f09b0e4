//! Directory traverser: one tokio task per directory.
//!
//! Each task lists a single directory level, streams the sizes of its
//! non-directory children and spawns a sibling task for every subdirectory.
//! Fan-out is unbounded; the [`TraversalCounter`] is the only thing that
//! knows when the whole tree is done.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use super::counter::{Ticket, TraversalCounter};
use super::fs::{list_dir, read_entries, ListFn};
use super::sink::ErrorSink;
use super::size::SizeEvent;
use crate::error::WalkError;

/// Shared context available to every traversal task.
pub struct WalkCtx {
    pub counter: Arc<TraversalCounter>,
    pub sink: Arc<dyn ErrorSink>,
    list: ListFn,
    /// Directories whose traversal task ran, readable or not.
    dirs_walked: AtomicU64,
}

impl WalkCtx {
    pub fn new(sink: Arc<dyn ErrorSink>) -> Arc<Self> {
        Self::with_lister(sink, list_dir)
    }

    /// Like [`WalkCtx::new`], listing directories with `list`.
    pub fn with_lister(sink: Arc<dyn ErrorSink>, list: ListFn) -> Arc<Self> {
        Arc::new(Self {
            counter: TraversalCounter::new(),
            sink,
            list,
            dirs_walked: AtomicU64::new(0),
        })
    }

    pub fn dirs_walked(&self) -> u64 {
        self.dirs_walked.load(Ordering::Relaxed)
    }
}

/// Register a traversal of `dir` with the counter, then spawn it.
pub fn spawn_traversal(dir: PathBuf, tx: mpsc::Sender<SizeEvent>, ctx: &Arc<WalkCtx>) {
    let ticket = ctx.counter.register();
    let ctx = Arc::clone(ctx);
    tokio::spawn(walk_dir(dir, tx, ticket, ctx));
}

async fn walk_dir(
    dir: PathBuf,
    tx: mpsc::Sender<SizeEvent>,
    ticket: Ticket,
    ctx: Arc<WalkCtx>,
) {
    ctx.dirs_walked.fetch_add(1, Ordering::Relaxed);

    let entries = match read_entries(&dir, ctx.list).await {
        Ok(entries) => entries,
        Err(source) => {
            let err = WalkError::ReadDir {
                path: dir.clone(),
                source,
            };
            ctx.sink.skipped(&dir, &err);
            Vec::new()
        }
    };

    tracing::trace!(dir = %dir.display(), entries = entries.len(), "walking");

    for entry in entries {
        if entry.is_dir {
            spawn_traversal(dir.join(&entry.name), tx.clone(), &ctx);
        } else if tx.send(entry.size).await.is_err() {
            // Aggregator is gone; nothing left to report to.
            break;
        }
    }

    // The sender must be released before the ticket: once the counter hits
    // zero the closer drops the last sender and expects the stream to close.
    drop(tx);
    drop(ticket);
}
