//! Trigger sources — streams of "recompute now" notifications.
//!
//! An update loop does not care where its fires come from. A periodic
//! timer is the common case; deployments driven by an external event
//! source (a message-bus consumer, say) feed a plain channel instead.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// One "recompute now" notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trigger {
    /// Compute-time budget hint for this fire. Passed through to the
    /// metric computation; the update loop does not enforce it.
    pub budget: Option<Duration>,
}

/// A consumable stream of [`Trigger`] fires, one per recomputation.
pub struct TriggerSource {
    rx: mpsc::Receiver<Trigger>,
}

impl TriggerSource {
    /// A periodic trigger: one fire per `interval`, each carrying a
    /// compute budget of half the interval.
    ///
    /// The first fire happens one full interval after construction.
    /// Ticks that would pile up behind a slow computation are skipped.
    pub fn interval(interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel(1);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a tokio interval completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let fire = Trigger {
                    budget: Some(interval / 2),
                };
                if tx.send(fire).await.is_err() {
                    // The consuming update loop is gone.
                    break;
                }
            }
        });

        Self { rx }
    }

    /// Wrap an external event channel as a trigger source.
    pub fn from_channel(rx: mpsc::Receiver<Trigger>) -> Self {
        Self { rx }
    }

    /// Wait for the next fire. `None` means the source is exhausted.
    pub async fn recv(&mut self) -> Option<Trigger> {
        self.rx.recv().await
    }
}
