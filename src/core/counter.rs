//! Outstanding-traversal counter used as the stream-closing barrier.
//!
//! Every traversal task holds exactly one [`Ticket`].  A ticket is issued by
//! [`TraversalCounter::register`] *before* the task is spawned and gives its
//! slot back when dropped, so the count can only reach zero once no task is
//! running and none is about to be spawned.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct TraversalCounter {
    outstanding: AtomicUsize,
    zero: Notify,
}

impl TraversalCounter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reserve a slot for a task that is about to be spawned.
    pub fn register(self: &Arc<Self>) -> Ticket {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        Ticket {
            counter: Arc::clone(self),
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Wait until every issued ticket has been dropped.
    ///
    /// Returns immediately when nothing is outstanding.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.zero.notified();
            tokio::pin!(notified);
            // Register interest before checking so a release racing with
            // the load cannot be missed.
            notified.as_mut().enable();
            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn release(&self) {
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.zero.notify_waiters();
        }
    }
}

/// Proof that one traversal task is outstanding.  Dropping it decrements
/// the counter exactly once.
#[derive(Debug)]
pub struct Ticket {
    counter: Arc<TraversalCounter>,
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.counter.release();
    }
}
