use std::sync::Arc;

use core_sim::{
    charts::ChartLibrary,
    exchange::ExchangeBoard,
    holdings::HoldingsSnapshot,
    market::MarketSnapshot,
    orders::OrderFlow,
    portfolio::Portfolio,
    positions::SimulatedPosition,
    ticker::TickerEntry,
    venue::{exchange_directory, ExchangeInfo},
    Simulator, SimulatorSet,
};
use tokio::sync::{broadcast, watch};

use crate::events::{FeedKind, FeedTick};

const TICK_CHANNEL_CAPACITY: usize = 256;

/// The only handle that can replace a slice. Deliberately not `Clone`.
#[derive(Debug)]
pub struct SliceWriter<T> {
    feed: FeedKind,
    tick: u64,
    tx: watch::Sender<Arc<T>>,
    ticks: broadcast::Sender<FeedTick>,
}

impl<T> SliceWriter<T> {
    pub fn feed(&self) -> FeedKind {
        self.feed
    }

    /// Swaps in a whole new snapshot and announces it. Returns the tick number.
    pub fn replace(&mut self, snapshot: T) -> u64 {
        self.tick += 1;
        self.tx.send_replace(Arc::new(snapshot));
        // Nobody listening is fine; the snapshot is still readable.
        let _ = self.ticks.send(FeedTick::new(self.feed, self.tick));
        self.tick
    }
}

#[derive(Debug)]
pub struct SliceReader<T> {
    rx: watch::Receiver<Arc<T>>,
}

impl<T> Clone for SliceReader<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T> SliceReader<T> {
    pub fn latest(&self) -> Arc<T> {
        Arc::clone(&self.rx.borrow())
    }

    /// Waits for the next replacement. `false` once the writer is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

fn slice<T>(
    feed: FeedKind,
    initial: T,
    ticks: &broadcast::Sender<FeedTick>,
) -> (SliceWriter<T>, SliceReader<T>) {
    let (tx, rx) = watch::channel(Arc::new(initial));
    (
        SliceWriter {
            feed,
            tick: 0,
            tx,
            ticks: ticks.clone(),
        },
        SliceReader { rx },
    )
}

/// Write side of the store, split so each writer can move into its own feed.
#[derive(Debug)]
pub struct DashboardWriters {
    pub portfolio: SliceWriter<Portfolio>,
    pub market: SliceWriter<MarketSnapshot>,
    pub orders: SliceWriter<OrderFlow>,
    pub positions: SliceWriter<Vec<SimulatedPosition>>,
    pub holdings: SliceWriter<HoldingsSnapshot>,
    pub ticker: SliceWriter<Vec<TickerEntry>>,
    pub exchanges: SliceWriter<ExchangeBoard>,
}

/// Read side of the dashboard state, shared by every view.
#[derive(Debug, Clone)]
pub struct DashboardStore {
    portfolio: SliceReader<Portfolio>,
    market: SliceReader<MarketSnapshot>,
    orders: SliceReader<OrderFlow>,
    positions: SliceReader<Vec<SimulatedPosition>>,
    holdings: SliceReader<HoldingsSnapshot>,
    ticker: SliceReader<Vec<TickerEntry>>,
    exchanges: SliceReader<ExchangeBoard>,
    exchange_directory: Arc<Vec<ExchangeInfo>>,
    charts: Arc<ChartLibrary>,
    ticks: broadcast::Sender<FeedTick>,
}

impl DashboardStore {
    /// Seeds every slice with the simulators' current snapshots.
    pub fn new(sims: &SimulatorSet) -> (Self, DashboardWriters) {
        let (ticks, _) = broadcast::channel(TICK_CHANNEL_CAPACITY);

        let (portfolio_w, portfolio) =
            slice(FeedKind::Portfolio, sims.portfolio.snapshot().clone(), &ticks);
        let (market_w, market) = slice(FeedKind::Market, *sims.market.snapshot(), &ticks);
        let (orders_w, orders) = slice(FeedKind::Orders, sims.orders.snapshot().clone(), &ticks);
        let (positions_w, positions) =
            slice(FeedKind::Positions, sims.positions.snapshot().clone(), &ticks);
        let (holdings_w, holdings) =
            slice(FeedKind::Holdings, sims.holdings.snapshot().clone(), &ticks);
        let (ticker_w, ticker) = slice(FeedKind::Ticker, sims.ticker.snapshot().clone(), &ticks);
        let (exchanges_w, exchanges) =
            slice(FeedKind::Exchanges, *sims.exchanges.snapshot(), &ticks);

        let store = Self {
            portfolio,
            market,
            orders,
            positions,
            holdings,
            ticker,
            exchanges,
            exchange_directory: Arc::new(exchange_directory()),
            charts: Arc::new(ChartLibrary::default()),
            ticks,
        };
        let writers = DashboardWriters {
            portfolio: portfolio_w,
            market: market_w,
            orders: orders_w,
            positions: positions_w,
            holdings: holdings_w,
            ticker: ticker_w,
            exchanges: exchanges_w,
        };

        (store, writers)
    }

    pub fn subscribe_ticks(&self) -> broadcast::Receiver<FeedTick> {
        self.ticks.subscribe()
    }

    pub fn portfolio(&self) -> Arc<Portfolio> {
        self.portfolio.latest()
    }

    pub fn market(&self) -> Arc<MarketSnapshot> {
        self.market.latest()
    }

    pub fn orders(&self) -> Arc<OrderFlow> {
        self.orders.latest()
    }

    pub fn positions(&self) -> Arc<Vec<SimulatedPosition>> {
        self.positions.latest()
    }

    pub fn holdings(&self) -> Arc<HoldingsSnapshot> {
        self.holdings.latest()
    }

    pub fn ticker(&self) -> Arc<Vec<TickerEntry>> {
        self.ticker.latest()
    }

    pub fn exchanges(&self) -> Arc<ExchangeBoard> {
        self.exchanges.latest()
    }

    pub fn portfolio_reader(&self) -> SliceReader<Portfolio> {
        self.portfolio.clone()
    }

    pub fn exchange_directory(&self) -> &[ExchangeInfo] {
        &self.exchange_directory
    }

    pub fn charts(&self) -> &ChartLibrary {
        &self.charts
    }
}
