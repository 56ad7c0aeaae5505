//! Background refresh timing
//!
//! Owns the repeating timer that prompts the main loop to re-fetch current
//! conditions for every favorite location. The timer task holds a shutdown
//! channel so the background work never outlives the UI that spawned it.

use std::time::Duration;
use tokio::sync::mpsc;

/// Messages sent from the refresh timer to the main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMessage {
    /// Current conditions for every favorite are due for a re-fetch
    ///
    /// A tick that lands inside a warm cache window resolves without any
    /// transport call; the timer is deliberately independent of cache expiry.
    CurrentSweepDue,
}

/// Configuration for the refresh timer
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Interval between current-conditions sweeps
    pub current_interval: Duration,
    /// Whether the timer runs at all
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            current_interval: Duration::from_secs(60),
            enabled: true,
        }
    }
}

/// Handle owning the background timer task
///
/// Dropping the handle closes the message channel, which also stops the
/// task the next time it ticks; `shutdown` stops it promptly.
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    /// Signals the timer task to stop
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Spawns the timer task and returns a handle receiving its ticks
    pub fn spawn(config: RefreshConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(8);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled {
            let sweep_interval = config.current_interval;

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(sweep_interval);
                // The first tick completes immediately; skip it so the first
                // sweep lands one full interval after startup.
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            if msg_tx.send(RefreshMessage::CurrentSweepDue).await.is_err() {
                                break;
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }
                }
            });
        }

        Self {
            receiver: msg_rx,
            shutdown_tx,
        }
    }

    /// Stops the timer task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Checks for a pending refresh message without blocking
pub fn try_recv(handle: &mut RefreshHandle) -> Option<RefreshMessage> {
    handle.receiver.try_recv().ok()
}
