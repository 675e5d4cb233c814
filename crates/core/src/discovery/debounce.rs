//! Debounce timer.
//!
//! Raw values are pushed in; a value comes out only after the input has
//! been quiet for the whole delay. Every push restarts the wait, and only
//! the latest value is ever emitted.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// Handle to a running debounce task.
///
/// Dropping the handle cancels the pending timer.
#[derive(Debug)]
pub struct Debouncer {
    input: watch::Sender<String>,
    task: JoinHandle<()>,
}

impl Debouncer {
    /// Start a debouncer whose output starts at `initial`.
    ///
    /// The output only changes when a settled value differs from the last
    /// one emitted.
    pub fn spawn(delay: Duration, initial: String) -> (Self, watch::Receiver<String>) {
        let (input, input_rx) = watch::channel(initial.clone());
        let (output, output_rx) = watch::channel(initial);

        let task = tokio::spawn(run(input_rx, output, delay));

        (Self { input, task }, output_rx)
    }

    /// Feed a new raw value, restarting the quiet period.
    pub fn push(&self, value: impl Into<String>) {
        self.input.send_replace(value.into());
    }

    /// Stop the timer; nothing pending will be emitted.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(mut input: watch::Receiver<String>, output: watch::Sender<String>, delay: Duration) {
    loop {
        if input.changed().await.is_err() {
            return;
        }

        loop {
            tokio::select! {
                changed = input.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = tokio::time::sleep(delay) => break,
            }
        }

        let settled = input.borrow_and_update().clone();
        trace!("Debounced value settled: '{}'", settled);
        output.send_if_modified(|current| {
            if *current == settled {
                false
            } else {
                *current = settled;
                true
            }
        });
    }
}
