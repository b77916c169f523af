use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::Dashboard;

/// Drives the two periodic poll cycles.
///
/// - fast cycle: market prices, every `market_poll_secs`
/// - slow cycle: selected model's data, every `model_poll_secs`, skipped
///   while nothing is selected
///
/// A tick is skipped while the previous fetch of the same cycle is still
/// in flight. Fetches run as their own tasks, so a slow backend never
/// delays the timers. Stopping prevents future ticks only; requests already
/// sent are left to finish.
pub struct PollScheduler {
    dashboard: Arc<Dashboard>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl PollScheduler {
    pub fn new(dashboard: Arc<Dashboard>) -> Self {
        Self {
            dashboard,
            handles: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.lock_handles().is_empty()
    }

    fn lock_handles(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.handles.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start both cycles; their first ticks fire immediately. No-op if running.
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut handles = self.lock_handles();
        if !handles.is_empty() {
            return;
        }
        let config = self.dashboard.config();
        info!(
            market_secs = config.market_poll_secs,
            model_secs = config.model_poll_secs,
            "poll scheduler started"
        );

        let fast = self.dashboard.clone();
        handles.push(spawn_cycle(
            "market",
            config.market_poll_interval(),
            |_| true,
            fast,
            |d| async move {
                let _ = d.load_market_prices().await;
            },
        ));

        let slow = self.dashboard.clone();
        handles.push(spawn_cycle(
            "model",
            config.model_poll_interval(),
            |d| d.selected_model().is_some(),
            slow,
            |d| async move {
                let _ = d.load_model_data().await;
            },
        ));
    }

    /// Cancel both cycles. Idempotent; safe if never started.
    pub fn stop(&self) {
        let handles: Vec<_> = self.lock_handles().drain(..).collect();
        if handles.is_empty() {
            return;
        }
        for handle in handles {
            handle.abort();
        }
        info!("poll scheduler stopped");
    }

    /// On-demand reload of everything, independent of the periodic cycles.
    pub async fn refresh_all(&self) {
        self.dashboard.refresh_all().await;
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Clears the in-flight flag when the fetch task ends, however it ends.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn spawn_cycle<G, F, Fut>(
    name: &'static str,
    period: Duration,
    guard: G,
    dashboard: Arc<Dashboard>,
    fetch: F,
) -> JoinHandle<()>
where
    G: Fn(&Dashboard) -> bool + Send + 'static,
    F: Fn(Arc<Dashboard>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let in_flight = Arc::new(AtomicBool::new(false));
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if !guard(&dashboard) {
                continue;
            }
            if in_flight.swap(true, Ordering::AcqRel) {
                debug!(cycle = name, "previous fetch still in flight; skipping tick");
                continue;
            }
            let flag = InFlight(in_flight.clone());
            let task = fetch(dashboard.clone());
            tokio::spawn(async move {
                let _flag = flag;
                task.await;
            });
        }
    })
}
