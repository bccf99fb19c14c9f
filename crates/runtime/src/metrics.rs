use std::{
    collections::{BTreeMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use serde::Serialize;

use crate::events::FeedKind;

const LATENCY_WINDOW: usize = 1_024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatencyPercentiles {
    pub count: usize,
    pub p50_micros: u64,
    pub p90_micros: u64,
    pub p95_micros: u64,
    pub p99_micros: u64,
    pub max_micros: u64,
}

/// Tick durations over a sliding window of the most recent samples.
#[derive(Debug, Default, Clone)]
pub struct TickLatencyMetrics {
    latencies_micros: VecDeque<u64>,
}

impl TickLatencyMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_latency_micros(&mut self, latency_micros: u64) {
        if self.latencies_micros.len() == LATENCY_WINDOW {
            self.latencies_micros.pop_front();
        }
        self.latencies_micros.push_back(latency_micros);
    }

    pub fn percentiles(&self) -> Option<LatencyPercentiles> {
        if self.latencies_micros.is_empty() {
            return None;
        }

        let mut sorted: Vec<u64> = self.latencies_micros.iter().copied().collect();
        sorted.sort_unstable();
        let count = sorted.len();

        Some(LatencyPercentiles {
            count,
            p50_micros: percentile_nearest_rank(&sorted, 50),
            p90_micros: percentile_nearest_rank(&sorted, 90),
            p95_micros: percentile_nearest_rank(&sorted, 95),
            p99_micros: percentile_nearest_rank(&sorted, 99),
            max_micros: sorted[count - 1],
        })
    }
}

fn percentile_nearest_rank(sorted: &[u64], percentile: usize) -> u64 {
    let count = sorted.len();
    let rank = (percentile * count).div_ceil(100);
    sorted[rank.saturating_sub(1)]
}

#[derive(Debug, Default)]
struct FeedStats {
    ticks: u64,
    latency: TickLatencyMetrics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedHealth {
    pub feed: FeedKind,
    pub period_ms: u64,
    pub ticks: u64,
    pub tick_latency: Option<LatencyPercentiles>,
}

/// Shared per-feed counters, written by feed tasks and read by the health view.
#[derive(Debug, Clone, Default)]
pub struct FeedMetrics {
    inner: Arc<Mutex<BTreeMap<FeedKind, FeedStats>>>,
}

impl FeedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<FeedKind, FeedStats>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, feed: FeedKind, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        let mut stats = self.lock();
        let entry = stats.entry(feed).or_default();
        entry.ticks += 1;
        entry.latency.record_latency_micros(micros);
    }

    pub fn ticks(&self, feed: FeedKind) -> u64 {
        self.lock().get(&feed).map_or(0, |stats| stats.ticks)
    }

    /// One row per known feed, including feeds that have not ticked yet.
    pub fn report(&self) -> Vec<FeedHealth> {
        let stats = self.lock();
        FeedKind::ALL
            .into_iter()
            .map(|feed| {
                let entry = stats.get(&feed);
                FeedHealth {
                    feed,
                    period_ms: u64::try_from(feed.period().as_millis()).unwrap_or(u64::MAX),
                    ticks: entry.map_or(0, |stats| stats.ticks),
                    tick_latency: entry.and_then(|stats| stats.latency.percentiles()),
                }
            })
            .collect()
    }
}
