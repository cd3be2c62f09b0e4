//! Walk orchestration: root dispatch, stream closing and result hand-off.
//!
//! Pipeline: traversal tasks -> bounded size stream -> aggregator.  A closer
//! task owns the dispatcher's sender and drops it once the traversal counter
//! is idle, which is the aggregator's only termination signal.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::WalkConfig;
use crate::core::sink::{ErrorSink, SkipRecorder, SkippedDir};
use crate::core::size::{aggregate, AggregateResult, SizeEvent};
use crate::core::walk::{spawn_traversal, WalkCtx};

/// Everything a walk produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    pub result: AggregateResult,
    /// Directories left out because they could not be listed, sorted by path.
    pub skipped: Vec<SkippedDir>,
    /// Traversal tasks run, one per directory visited.
    pub dirs_walked: u64,
}

/// Roots to walk; `"."` when none are given.
pub fn resolve_roots<I, P>(roots: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut out: Vec<PathBuf> = roots.into_iter().map(Into::into).collect();
    if out.is_empty() {
        out.push(PathBuf::from("."));
    }
    out
}

/// Walk every root concurrently and return the totals plus skipped dirs.
///
/// Never fails: unreadable directories are reported to `sink` and counted
/// as empty.
pub async fn walk_dirs<I, P>(roots: I, config: &WalkConfig, sink: Arc<dyn ErrorSink>) -> WalkReport
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let roots = resolve_roots(roots);
    let recorder = Arc::new(SkipRecorder::new(sink));
    let ctx = WalkCtx::new(recorder.clone());
    let capacity = WalkConfig::clamp_capacity(config.channel_capacity);
    let (tx, rx) = mpsc::channel::<SizeEvent>(capacity);

    tracing::debug!(roots = roots.len(), capacity, "starting walk");

    for root in roots {
        spawn_traversal(root, tx.clone(), &ctx);
    }

    let closer = {
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            ctx.counter.wait_idle().await;
            drop(tx);
        })
    };

    let aggregator = tokio::spawn(aggregate(rx));

    let result = match aggregator.await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            tracing::error!(error = %e, "aggregator cancelled");
            AggregateResult::default()
        }
    };
    // Already finished: the stream only closes after the closer ran.
    let _ = closer.await;

    let report = WalkReport {
        result,
        skipped: recorder.take(),
        dirs_walked: ctx.dirs_walked(),
    };
    tracing::debug!(
        files = report.result.file_count,
        bytes = report.result.total_bytes,
        dirs = report.dirs_walked,
        skipped = report.skipped.len(),
        "walk finished"
    );
    report
}

/// Walk every root and format `"<count> files <MB> MB\n"`.
pub async fn summarize<I, P>(roots: I, config: &WalkConfig, sink: Arc<dyn ErrorSink>) -> String
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    walk_dirs(roots, config, sink).await.result.to_string()
}
