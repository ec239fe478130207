//! Background removal of expired session rows.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{Duration, interval};
use tracing::{error, info};

use super::manager::SessionManager;

/// Periodically deletes expired session rows.
///
/// Expiry itself never depends on the sweeper — verification checks
/// the expiry on every request — so sweeping only bounds table growth.
#[derive(Clone)]
pub struct SessionSweeper {
    manager: Arc<SessionManager>,
    period: Duration,
}

impl SessionSweeper {
    /// Creates a sweeper that runs every `period`.
    pub fn new(manager: Arc<SessionManager>, period: Duration) -> Self {
        Self { manager, period }
    }

    /// Runs a single sweep pass.
    pub async fn sweep_once(&self) -> Result<u64, sitehub_core::AppError> {
        self.manager.sweep_expired().await
    }

    /// Runs the sweep loop until the shutdown signal fires.
    ///
    /// A failed pass is logged and retried on the next tick; the loop
    /// never exits on error.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.period);
        info!(period_secs = self.period.as_secs(), "Session sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.sweep_once().await {
                        error!(error = %err, "Session sweep failed");
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Session sweeper stopping");
                        break;
                    }
                }
            }
        }
    }
}
