use std::sync::Arc;

use runtime::{
    DashboardStore, FeedHealth, FeedKind, FeedMetrics, FeedTick, SessionFlags, ThemeStore, ThemeView,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;
use ui::views::{
    dashboard_view, exchange_overview_view, header_view, market_ticker_view, order_flow_view,
    portfolio_summary_view, positions_table_view, DashboardInputs, DashboardSelection,
    DashboardView, ExchangeOverviewView, HeaderView, MarketTickerView, OrderFlowView,
    PortfolioSummaryView, PositionsTableView, SelectionError,
};

/// Local selection as sent by a viewer, either as query string or websocket text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionQuery {
    pub timeframe: Option<String>,
    pub period: Option<String>,
    pub tab: Option<String>,
    pub exchange: Option<String>,
}

impl SelectionQuery {
    pub fn selection(&self) -> Result<DashboardSelection, SelectionError> {
        DashboardSelection::parse(
            self.timeframe.as_deref(),
            self.period.as_deref(),
            self.tab.as_deref(),
            self.exchange.as_deref(),
        )
    }
}

/// The one panel a feed tick re-renders.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "panel", content = "view", rename_all = "snake_case")]
pub enum SliceUpdate {
    Header(HeaderView),
    Summary(PortfolioSummaryView),
    Exchanges(ExchangeOverviewView),
    Positions(PositionsTableView),
    Ticker(MarketTickerView),
    Orders(OrderFlowView),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DashboardEvent {
    Connected {
        dashboard: Box<DashboardView>,
    },
    Slice {
        feed: FeedKind,
        tick: u64,
        update: SliceUpdate,
    },
    Error {
        error: String,
    },
}

/// Shared handler state: store readers, theme, session flags and feed metrics.
#[derive(Debug, Clone)]
pub struct AppState {
    store: DashboardStore,
    theme: Arc<ThemeStore>,
    sessions: Arc<SessionFlags>,
    metrics: FeedMetrics,
}

impl AppState {
    pub fn new(
        store: DashboardStore,
        theme: Arc<ThemeStore>,
        sessions: Arc<SessionFlags>,
        metrics: FeedMetrics,
    ) -> Self {
        Self {
            store,
            theme,
            sessions,
            metrics,
        }
    }

    pub fn store(&self) -> &DashboardStore {
        &self.store
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn sessions(&self) -> &SessionFlags {
        &self.sessions
    }

    /// Toggles on the blocking pool so the preference write never holds up
    /// an async worker.
    pub async fn toggle_theme(&self) -> ThemeView {
        let theme = Arc::clone(&self.theme);
        match tokio::task::spawn_blocking(move || theme.toggle_theme()).await {
            Ok(view) => view,
            Err(err) => {
                warn!(error = %err, "theme toggle task failed");
                self.theme.get_theme()
            }
        }
    }

    pub fn feed_health(&self) -> Vec<FeedHealth> {
        self.metrics.report()
    }

    pub fn render_dashboard(&self, selection: DashboardSelection) -> DashboardView {
        let store = &self.store;
        let portfolio = store.portfolio();
        let market = store.market();
        let orders = store.orders();
        let positions = store.positions();
        let holdings = store.holdings();
        let ticker = store.ticker();
        let exchanges = store.exchanges();
        let inputs = DashboardInputs {
            portfolio: &portfolio,
            market: &market,
            orders: &orders,
            positions: &positions,
            holdings: &holdings,
            ticker: &ticker,
            exchanges: &exchanges,
            directory: store.exchange_directory(),
            charts: store.charts(),
        };

        dashboard_view(
            &inputs,
            selection,
            self.theme.get_theme().is_dark,
            OffsetDateTime::now_utc(),
        )
    }

    pub fn render_slice(&self, feed: FeedKind, selection: DashboardSelection) -> SliceUpdate {
        let store = &self.store;
        match feed {
            FeedKind::Portfolio => SliceUpdate::Header(header_view(
                &store.portfolio(),
                self.theme.get_theme().is_dark,
                OffsetDateTime::now_utc(),
            )),
            FeedKind::Market | FeedKind::Exchanges => {
                SliceUpdate::Exchanges(exchange_overview_view(
                    &store.market(),
                    &store.exchanges(),
                    store.exchange_directory(),
                    selection.tab,
                ))
            }
            FeedKind::Orders => SliceUpdate::Orders(order_flow_view(&store.orders())),
            FeedKind::Positions => SliceUpdate::Positions(positions_table_view(
                &store.positions(),
                selection.exchange,
            )),
            FeedKind::Holdings => SliceUpdate::Summary(portfolio_summary_view(
                &store.holdings(),
                selection.timeframe,
            )),
            FeedKind::Ticker => SliceUpdate::Ticker(market_ticker_view(&store.ticker())),
        }
    }

    pub fn slice_event(&self, tick: FeedTick, selection: DashboardSelection) -> DashboardEvent {
        DashboardEvent::Slice {
            feed: tick.feed,
            tick: tick.tick,
            update: self.render_slice(tick.feed, selection),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_test() -> (Self, runtime::DashboardWriters) {
        use core_sim::{SimConfig, SimulatorSet};
        use runtime::MemoryPreferences;

        let sims = SimulatorSet::new(&SimConfig::default(), Some(11), OffsetDateTime::now_utc());
        let (store, writers) = DashboardStore::new(&sims);
        let state = Self::new(
            store,
            Arc::new(ThemeStore::open(MemoryPreferences::new())),
            Arc::new(SessionFlags::new()),
            FeedMetrics::new(),
        );
        (state, writers)
    }
}
