//! Expiry Sweeper Task
//!
//! Background task that periodically removes cache entries idle past their TTL.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that sweeps expired entries every `period`.
///
/// The first sweep runs one full `period` after the call. The task exits at
/// the next tick boundary once `shutdown` holds `true` or its sender is gone.
///
/// # Example
/// ```ignore
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let handle = spawn_sweeper(store.clone(), Duration::from_secs(30), shutdown_rx);
/// // Later, during shutdown:
/// shutdown_tx.send(true)?;
/// handle.await?;
/// ```
pub fn spawn_sweeper<V>(
    store: Arc<Mutex<CacheStore<V>>>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    V: Send + 'static,
{
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweeper with interval of {} seconds",
            period.as_secs_f64()
        );

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    // Re-check the flag at the top of the loop
                    continue;
                }
            }

            let removed = {
                let mut store = store.lock().await;
                store.remove_expired()
            };

            if removed > 0 {
                info!("Expiry sweep: removed {} idle entries", removed);
            } else {
                debug!("Expiry sweep: no idle entries found");
            }
        }

        info!("Expiry sweeper stopped");
    })
}
