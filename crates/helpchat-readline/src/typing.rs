//! "… typing" line shown while the widget waits on the backend.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use colored::Colorize;
use tokio::task::JoinHandle;

const POLL_INTERVAL: Duration = Duration::from_millis(150);
const LABEL: &str = "… typing";

/// Polls the widget's loading flag and mirrors it on the current line.
///
/// The line is cleared when the flag drops or the indicator is dropped.
pub struct TypingIndicator {
    task: JoinHandle<()>,
    shown: Arc<AtomicBool>,
}

impl TypingIndicator {
    pub fn watch(loading: Arc<AtomicBool>) -> Self {
        let shown = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn({
            let shown = shown.clone();
            async move {
                loop {
                    let busy = loading.load(Ordering::SeqCst);
                    if busy && !shown.swap(true, Ordering::SeqCst) {
                        print!("{}", LABEL.bright_black());
                        let _ = std::io::stdout().flush();
                    } else if !busy && shown.swap(false, Ordering::SeqCst) {
                        clear_line();
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        });
        Self { task, shown }
    }

    pub fn is_shown(&self) -> bool {
        self.shown.load(Ordering::SeqCst)
    }
}

impl Drop for TypingIndicator {
    fn drop(&mut self) {
        self.task.abort();
        if self.shown.swap(false, Ordering::SeqCst) {
            clear_line();
        }
    }
}

fn clear_line() {
    print!("\r{}\r", " ".repeat(LABEL.chars().count()));
    let _ = std::io::stdout().flush();
}

/// Awaits `request` with the indicator running.
pub async fn while_waiting<F: Future>(loading: Arc<AtomicBool>, request: F) -> F::Output {
    let _indicator = TypingIndicator::watch(loading);
    request.await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_indicator_follows_flag() {
        let loading = Arc::new(AtomicBool::new(false));
        let indicator = TypingIndicator::watch(loading.clone());

        tokio::time::sleep(POLL_INTERVAL * 2).await;
        assert!(!indicator.is_shown());

        loading.store(true, Ordering::SeqCst);
        tokio::time::sleep(POLL_INTERVAL * 2).await;
        assert!(indicator.is_shown());

        loading.store(false, Ordering::SeqCst);
        tokio::time::sleep(POLL_INTERVAL * 2).await;
        assert!(!indicator.is_shown());
    }

    #[tokio::test]
    async fn test_while_waiting_returns_request_output() {
        let loading = Arc::new(AtomicBool::new(true));
        let value = while_waiting(loading, async { 7 }).await;
        assert_eq!(value, 7);
    }
}
