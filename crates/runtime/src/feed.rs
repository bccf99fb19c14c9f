use std::time::{Duration, Instant};

use core_sim::Simulator;
use time::OffsetDateTime;
use tokio::{
    task::JoinHandle,
    time::{interval_at, MissedTickBehavior},
};
use tracing::{debug, info, info_span, Instrument};

use crate::{events::FeedKind, metrics::FeedMetrics, store::SliceWriter};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Owns a running feed task. Dropping the handle stops the feed.
#[derive(Debug)]
pub struct FeedHandle {
    feed: FeedKind,
    task: JoinHandle<()>,
}

impl FeedHandle {
    pub fn feed(&self) -> FeedKind {
        self.feed
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns a task that ticks `sim` every `period` and replaces its slice.
///
/// The first tick fires one period after spawning; the store already holds
/// the simulator's initial snapshot. Missed ticks are skipped, never queued.
pub fn spawn_feed<S>(
    sim: S,
    writer: SliceWriter<S::Snapshot>,
    period: Duration,
    metrics: FeedMetrics,
) -> FeedHandle
where
    S: Simulator + Send + 'static,
    S::Snapshot: Send + Sync + 'static,
{
    let feed = writer.feed();
    let span = info_span!("feed", feed = feed.as_str());
    let task = tokio::spawn(run_feed(sim, writer, period.max(MIN_PERIOD), metrics).instrument(span));

    FeedHandle { feed, task }
}

async fn run_feed<S>(
    mut sim: S,
    mut writer: SliceWriter<S::Snapshot>,
    period: Duration,
    metrics: FeedMetrics,
) where
    S: Simulator,
{
    let feed = writer.feed();
    let mut ticker = interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(period_ms = period.as_millis() as u64, "feed started");

    loop {
        ticker.tick().await;

        let started = Instant::now();
        let snapshot = sim.tick(OffsetDateTime::now_utc());
        let tick = writer.replace(snapshot);
        metrics.record(feed, started.elapsed());

        debug!(tick, "slice replaced");
    }
}

#[cfg(test)]
mod tests {
    use core_sim::{SimConfig, SimulatorSet};
    use time::OffsetDateTime;

    use super::*;
    use crate::{events::FeedTick, store::DashboardStore};

    fn fixtures() -> (DashboardStore, crate::store::DashboardWriters, SimulatorSet) {
        let sims = SimulatorSet::new(&SimConfig::default(), Some(3), OffsetDateTime::UNIX_EPOCH);
        let (store, writers) = DashboardStore::new(&sims);
        (store, writers, sims)
    }

    #[tokio::test(start_paused = true)]
    async fn feed_replaces_slice_once_per_period() {
        let (store, writers, sims) = fixtures();
        let metrics = FeedMetrics::new();
        let mut ticks = store.subscribe_ticks();

        let _handle = spawn_feed(
            sims.market,
            writers.market,
            Duration::from_millis(1_500),
            metrics.clone(),
        );

        tokio::time::sleep(Duration::from_millis(4_600)).await;

        let mut seen = Vec::new();
        while let Ok(tick) = ticks.try_recv() {
            seen.push(tick);
        }
        assert_eq!(
            seen,
            vec![
                FeedTick::new(FeedKind::Market, 1),
                FeedTick::new(FeedKind::Market, 2),
                FeedTick::new(FeedKind::Market, 3),
            ]
        );
        assert_eq!(metrics.ticks(FeedKind::Market), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_feed() {
        let (store, writers, sims) = fixtures();
        let metrics = FeedMetrics::new();

        let handle = spawn_feed(
            sims.ticker,
            writers.ticker,
            Duration::from_millis(100),
            metrics.clone(),
        );
        tokio::time::sleep(Duration::from_millis(250)).await;
        drop(handle);
        let frozen = store.ticker();

        tokio::time::sleep(Duration::from_millis(1_000)).await;

        assert_eq!(metrics.ticks(FeedKind::Ticker), 2);
        assert_eq!(*store.ticker(), *frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn independent_feeds_tick_at_their_own_rates() {
        let (store, writers, sims) = fixtures();
        let metrics = FeedMetrics::new();

        let _orders = spawn_feed(
            sims.orders,
            writers.orders,
            FeedKind::Orders.period(),
            metrics.clone(),
        );
        let _portfolio = spawn_feed(
            sims.portfolio,
            writers.portfolio,
            FeedKind::Portfolio.period(),
            metrics.clone(),
        );

        tokio::time::sleep(Duration::from_millis(2_100)).await;

        assert_eq!(metrics.ticks(FeedKind::Orders), 10);
        assert_eq!(metrics.ticks(FeedKind::Portfolio), 2);
        assert_eq!(store.orders().tick, 10);
    }
}
