use std::sync::Arc;
use std::time::Duration;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tracing::{debug, info, warn};

use banstore_application::ports::incoming::ban::BanUseCase;

/// Periodically lifts expired bans until the shutdown channel flips to `true` or closes.
pub struct ExpirySweeper {
    ban_use_case: Arc<dyn BanUseCase>,
    period: Duration,
}

impl ExpirySweeper {
    pub fn new(ban_use_case: Arc<dyn BanUseCase>, period: Duration) -> Self {
        Self {
            ban_use_case,
            period,
        }
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(period_secs = self.period.as_secs(), "Expiry sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => self.sweep_once().await,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Expiry sweeper stopped");
    }

    async fn sweep_once(&self) {
        match self.ban_use_case.sweep_expired().await {
            Ok(lifted) if lifted.is_empty() => debug!("No expired bans"),
            Ok(lifted) => debug!(count = lifted.len(), "Sweep lifted expired bans"),
            Err(e) => warn!(error = %e, "Expiry sweep failed"),
        }
    }
}
