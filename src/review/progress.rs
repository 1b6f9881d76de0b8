//! Session progress counters
//!
//! Updated by the review loop, read from anywhere. The only cross-thread
//! reader is the optional `SIGUSR1` reporter, which just loads the atomics.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct SessionProgress {
    reviewed: AtomicUsize,
    total: AtomicUsize,
}

impl SessionProgress {
    pub fn new(total: usize) -> Self {
        Self {
            reviewed: AtomicUsize::new(0),
            total: AtomicUsize::new(total),
        }
    }

    pub fn reviewed(&self) -> usize {
        self.reviewed.load(Ordering::Acquire)
    }

    /// Initial due count plus every requeue so far
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Acquire)
    }

    pub fn remaining(&self) -> usize {
        self.total().saturating_sub(self.reviewed())
    }

    pub(crate) fn record_review(&self) {
        self.reviewed.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn record_requeue(&self) {
        self.total.fetch_add(1, Ordering::AcqRel);
    }

    /// One-line summary for the progress report
    pub fn report(&self) -> String {
        format!(
            "{} cards remaining ({} reviewed)",
            self.remaining(),
            self.reviewed()
        )
    }
}

/// Print the progress report to stderr whenever the process gets `SIGUSR1`.
///
/// The listener thread lives until the process exits.
#[cfg(unix)]
pub fn report_on_signal(progress: Arc<SessionProgress>) -> io::Result<()> {
    use signal_hook::consts::signal::SIGUSR1;
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGUSR1])?;
    std::thread::Builder::new()
        .name("oboeru-progress".to_owned())
        .spawn(move || {
            for _ in signals.forever() {
                eprintln!("{}", progress.report());
            }
        })?;

    Ok(())
}

#[cfg(not(unix))]
pub fn report_on_signal(_progress: Arc<SessionProgress>) -> io::Result<()> {
    log::warn!("progress signal is not supported on this platform");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let progress = SessionProgress::new(3);
        progress.record_review();
        progress.record_requeue();
        progress.record_review();

        assert_eq!(progress.reviewed(), 2);
        assert_eq!(progress.total(), 4);
        assert_eq!(progress.remaining(), 2);
        assert_eq!(progress.report(), "2 cards remaining (2 reviewed)");
    }

    #[test]
    fn test_read_from_other_thread() {
        let progress = Arc::new(SessionProgress::new(100));
        let reader = Arc::clone(&progress);

        let handle = std::thread::spawn(move || {
            let mut last = 0;
            for _ in 0..1000 {
                let seen = reader.reviewed();
                assert!(seen >= last);
                last = seen;
            }
        });
        for _ in 0..100 {
            progress.record_review();
        }
        handle.join().unwrap();

        assert_eq!(progress.remaining(), 0);
    }
}
