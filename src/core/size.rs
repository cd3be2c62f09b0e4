//! Size aggregation: the single consumer at the end of the walk pipeline.

use std::fmt;

use tokio::sync::mpsc;

/// One discovered file's apparent size in bytes.
pub type SizeEvent = u64;

/// Final totals of a walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateResult {
    pub file_count: u64,
    pub total_bytes: u64,
}

impl AggregateResult {
    fn record(&mut self, size: SizeEvent) {
        self.file_count += 1;
        self.total_bytes = self.total_bytes.saturating_add(size);
    }

    /// Total size in decimal megabytes (1 MB = 1,000,000 bytes).
    pub fn megabytes(&self) -> f64 {
        self.total_bytes as f64 / 1e6
    }
}

/// `"<count> files <MB with two decimals> MB\n"`.
impl fmt::Display for AggregateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} files {:.2} MB", self.file_count, self.megabytes())
    }
}

/// Drain `rx` until every sender is gone, then return the totals.
///
/// `recv` yields buffered events before reporting closure, so nothing sent
/// before the last sender dropped is lost.
pub async fn aggregate(mut rx: mpsc::Receiver<SizeEvent>) -> AggregateResult {
    let mut result = AggregateResult::default();
    while let Some(size) = rx.recv().await {
        result.record(size);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_decimal_megabytes() {
        let r = AggregateResult {
            file_count: 3,
            total_bytes: 2_345_678,
        };
        assert_eq!(r.to_string(), "3 files 2.35 MB\n");
        assert_eq!(AggregateResult::default().to_string(), "0 files 0.00 MB\n");
    }

    #[test]
    fn small_totals_round_to_zero() {
        let r = AggregateResult {
            file_count: 2,
            total_bytes: 30,
        };
        assert_eq!(r.to_string(), "2 files 0.00 MB\n");
    }

    #[tokio::test]
    async fn drains_buffer_after_close() {
        let (tx, rx) = mpsc::channel(16);
        for size in [10, 20, 30] {
            tx.send(size).await.unwrap();
        }
        drop(tx);

        let r = aggregate(rx).await;
        assert_eq!(r.file_count, 3);
        assert_eq!(r.total_bytes, 60);
    }

    #[tokio::test]
    async fn concurrent_producers_are_all_counted() {
        let (tx, rx) = mpsc::channel(1);
        let consumer = tokio::spawn(aggregate(rx));

        let mut producers = Vec::new();
        for _ in 0..8 {
            let tx = tx.clone();
            producers.push(tokio::spawn(async move {
                for _ in 0..50 {
                    tx.send(2).await.unwrap();
                }
            }));
        }
        drop(tx);
        for p in producers {
            p.await.unwrap();
        }

        let r = consumer.await.unwrap();
        assert_eq!(r.file_count, 400);
        assert_eq!(r.total_bytes, 800);
    }

    #[test]
    fn byte_total_saturates() {
        let mut r = AggregateResult::default();
        r.record(u64::MAX);
        r.record(1);
        assert_eq!(r.total_bytes, u64::MAX);
        assert_eq!(r.file_count, 2);
    }
}
