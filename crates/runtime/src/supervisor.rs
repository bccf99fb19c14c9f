use std::{collections::BTreeMap, time::Duration};

use core_sim::{Simulator, SimulatorSet};
use tracing::info;

use crate::{
    events::FeedKind,
    feed::{spawn_feed, FeedHandle},
    metrics::FeedMetrics,
    store::{DashboardWriters, SliceWriter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedLifecycle {
    Starting,
    Running,
    Stopped,
}

#[derive(Debug)]
struct SupervisedFeed {
    state: FeedLifecycle,
    handle: Option<FeedHandle>,
}

/// Owns every feed task. Dropping the supervisor stops all feeds.
#[derive(Debug, Default)]
pub struct FeedSupervisor {
    feeds: BTreeMap<FeedKind, SupervisedFeed>,
    metrics: FeedMetrics,
}

impl FeedSupervisor {
    pub fn new(metrics: FeedMetrics) -> Self {
        Self {
            feeds: BTreeMap::new(),
            metrics,
        }
    }

    /// Spawns one feed per slice, each at its documented period.
    pub fn start_all(sims: SimulatorSet, writers: DashboardWriters, metrics: FeedMetrics) -> Self {
        let mut supervisor = Self::new(metrics);
        let SimulatorSet {
            portfolio,
            market,
            orders,
            positions,
            holdings,
            ticker,
            exchanges,
        } = sims;

        supervisor.spawn(portfolio, writers.portfolio, FeedKind::Portfolio.period());
        supervisor.spawn(market, writers.market, FeedKind::Market.period());
        supervisor.spawn(orders, writers.orders, FeedKind::Orders.period());
        supervisor.spawn(positions, writers.positions, FeedKind::Positions.period());
        supervisor.spawn(holdings, writers.holdings, FeedKind::Holdings.period());
        supervisor.spawn(ticker, writers.ticker, FeedKind::Ticker.period());
        supervisor.spawn(exchanges, writers.exchanges, FeedKind::Exchanges.period());

        info!(feeds = supervisor.running_feeds().len(), "all feeds running");
        supervisor
    }

    pub fn register(&mut self, feed: FeedKind) {
        self.feeds.insert(
            feed,
            SupervisedFeed {
                state: FeedLifecycle::Starting,
                handle: None,
            },
        );
    }

    pub fn mark_running(&mut self, feed: FeedKind) {
        if let Some(entry) = self.feeds.get_mut(&feed) {
            entry.state = FeedLifecycle::Running;
        }
    }

    pub fn spawn<S>(&mut self, sim: S, writer: SliceWriter<S::Snapshot>, period: Duration)
    where
        S: Simulator + Send + 'static,
        S::Snapshot: Send + Sync + 'static,
    {
        let feed = writer.feed();
        self.register(feed);
        let handle = spawn_feed(sim, writer, period, self.metrics.clone());
        if let Some(entry) = self.feeds.get_mut(&feed) {
            entry.handle = Some(handle);
        }
        self.mark_running(feed);
    }

    pub fn lifecycle(&self, feed: FeedKind) -> Option<FeedLifecycle> {
        self.feeds.get(&feed).map(|entry| entry.state)
    }

    /// Stops one feed. Returns `false` for a feed that was never registered.
    pub fn stop(&mut self, feed: FeedKind) -> bool {
        match self.feeds.get_mut(&feed) {
            Some(entry) => {
                if let Some(handle) = entry.handle.take() {
                    handle.stop();
                }
                entry.state = FeedLifecycle::Stopped;
                true
            }
            None => false,
        }
    }

    pub fn running_feeds(&self) -> Vec<FeedKind> {
        self.feeds
            .iter()
            .filter(|(_, entry)| entry.state == FeedLifecycle::Running)
            .map(|(feed, _)| *feed)
            .collect()
    }

    pub fn metrics(&self) -> &FeedMetrics {
        &self.metrics
    }

    pub fn shutdown(&mut self) {
        let feeds: Vec<FeedKind> = self.feeds.keys().copied().collect();
        for feed in feeds {
            self.stop(feed);
        }
        info!("all feeds stopped");
    }
}

#[cfg(test)]
mod tests {
    use core_sim::{SimConfig, SimulatorSet};
    use time::OffsetDateTime;

    use super::{FeedLifecycle, FeedSupervisor};
    use crate::{events::FeedKind, metrics::FeedMetrics, store::DashboardStore};

    fn start() -> (DashboardStore, FeedSupervisor) {
        let sims = SimulatorSet::new(&SimConfig::default(), Some(5), OffsetDateTime::UNIX_EPOCH);
        let (store, writers) = DashboardStore::new(&sims);
        let supervisor = FeedSupervisor::start_all(sims, writers, FeedMetrics::new());
        (store, supervisor)
    }

    #[test]
    fn stop_returns_false_for_unknown_feed() {
        let mut supervisor = FeedSupervisor::new(FeedMetrics::new());

        assert!(!supervisor.stop(FeedKind::Orders));
    }

    #[test]
    fn registered_feed_starts_in_starting_state() {
        let mut supervisor = FeedSupervisor::new(FeedMetrics::new());
        supervisor.register(FeedKind::Ticker);

        assert_eq!(
            supervisor.lifecycle(FeedKind::Ticker),
            Some(FeedLifecycle::Starting)
        );
        supervisor.mark_running(FeedKind::Ticker);
        assert_eq!(
            supervisor.lifecycle(FeedKind::Ticker),
            Some(FeedLifecycle::Running)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn start_all_runs_every_feed() {
        let (_store, supervisor) = start();

        assert_eq!(supervisor.running_feeds(), FeedKind::ALL.to_vec());

        tokio::time::sleep(std::time::Duration::from_millis(3_050)).await;

        for feed in FeedKind::ALL {
            assert!(supervisor.metrics().ticks(feed) >= 1, "{feed:?} never ticked");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_freezes_every_slice() {
        let (store, mut supervisor) = start();
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;

        supervisor.shutdown();
        let orders = store.orders();
        tokio::time::sleep(std::time::Duration::from_millis(2_000)).await;

        assert!(supervisor.running_feeds().is_empty());
        assert_eq!(
            supervisor.lifecycle(FeedKind::Orders),
            Some(FeedLifecycle::Stopped)
        );
        assert_eq!(store.orders().tick, orders.tick);
    }
}
