use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::utils::clock::Clock;

use super::{payload_storage::PayloadStorage, store::PlannerStore};

/// Default period between two day-boundary checks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(30);

/// Periodically runs the day-boundary check of a [PlannerStore]. A tick never waits for
/// midnight itself, so the interval bounds how late a new day is noticed.
pub struct RolloverTicker {
    shutdown: CancellationToken,
    interval: Duration,
    clock: Arc<dyn Clock>,
}

impl RolloverTicker {
    pub fn new(shutdown: CancellationToken, interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            shutdown,
            interval,
            clock,
        }
    }

    /// Ticker bound to the store's lifetime, it stops once the store is torn down.
    pub fn for_store<S: PayloadStorage>(store: &PlannerStore<S>, interval: Duration) -> Self {
        Self::new(store.shutdown_token(), interval, store.clock())
    }

    /// Executes the ticker loop. The first tick happens immediately. `on_tick` is called after
    /// every check, whether or not the day changed.
    pub async fn run<S: PayloadStorage>(
        self,
        store: &mut PlannerStore<S>,
        mut on_tick: impl FnMut(&PlannerStore<S>),
    ) -> Result<()> {
        let mut tick_point = self.clock.instant();
        loop {
            tick_point += self.interval;

            match store.refresh() {
                Ok(true) => info!("Rolled over to {}", store.today()),
                Ok(false) => debug!("Still {}", store.today()),
                Err(e) => error!("Failed to persist rollover {e:?}"),
            }
            on_tick(&*store);

            tokio::select! {
                // Cancelation stops the loop, the caller still owns the store and tears it down.
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.clock.sleep_until(tick_point) => ()
            }
        }
    }
}
