//! Periodic reconciliation driver around [`Reconciler::reconcile_once`].

use log::{info, warn};
use mintsig_core::application::Reconciler;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Running reconciliation loop. Aborts on drop; [`shutdown`] stops it
/// cooperatively and waits for the pass in flight to finish.
///
/// [`shutdown`]: ReconciliationTask::shutdown
pub struct ReconciliationTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ReconciliationTask {
    /// Spawns the polling loop. The first pass runs immediately, then every
    /// `poll_secs`; a pass that overruns the interval skips the missed ticks.
    pub fn spawn(reconciler: Arc<Reconciler>, poll_secs: u64) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(poll_secs.max(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!("reconciliation loop started poll_secs={poll_secs}");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        reconciler.reconcile_once().await;
                    }
                    result = shutdown_rx.changed() => {
                        if result.is_err() || *shutdown_rx.borrow() {
                            info!("reconciliation loop stopping");
                            break;
                        }
                    }
                }
            }
        });
        Self { shutdown, handle }
    }

    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = (&mut self.handle).await {
            if !err.is_cancelled() {
                warn!("reconciliation task join failed err={err}");
            }
        }
    }
}

impl Drop for ReconciliationTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
