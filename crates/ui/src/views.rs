use std::{fmt, str::FromStr};

use core_sim::{
    charts::{ChartKind, ChartLibrary, ChartPeriod, ChartSeries, UnknownPeriod},
    exchange::{ExchangeBoard, ExchangeStatus},
    holdings::{Holding, HoldingsSnapshot, PortfolioMetrics},
    market::MarketSnapshot,
    orders::{OrderFlow, OrderStatus, SimulatedOrder},
    portfolio::Portfolio,
    positions::SimulatedPosition,
    ticker::TickerEntry,
    venue::{ExchangeInfo, Venue},
};
use serde::{Serialize, Serializer};
use thiserror::Error;
use time::OffsetDateTime;

use crate::format::{
    change_class, format_currency, format_date, format_grouped, format_number, format_percentage,
    format_shares, format_signed_currency, format_time, NAIRA,
};

pub const BRAND: &str = "Quant Analytics";
pub const TAGLINE: &str = "Real-time Portfolio Dashboard";
pub const CHART_ERROR_MESSAGE: &str = "Chart error, please refresh";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown timeframe `{0}`, expected one of 1D, 1W, 1M, 3M, 1Y, ALL")]
    Timeframe(String),
    #[error(transparent)]
    Period(#[from] UnknownPeriod),
    #[error("unknown exchange tab `{0}`, expected NGX or Quidax")]
    Tab(String),
    #[error("unknown exchange filter `{0}`, expected All, NSE or Quidax")]
    Exchange(String),
    #[error("unknown chart `{0}`, expected portfolio or roi")]
    Chart(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    All,
}

impl Timeframe {
    pub const ALL: [Timeframe; 6] = [
        Timeframe::OneDay,
        Timeframe::OneWeek,
        Timeframe::OneMonth,
        Timeframe::ThreeMonths,
        Timeframe::OneYear,
        Timeframe::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1D",
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::OneYear => "1Y",
            Self::All => "ALL",
        }
    }
}

impl FromStr for Timeframe {
    type Err = SelectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|timeframe| timeframe.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| SelectionError::Timeframe(value.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ExchangeTab {
    #[default]
    #[serde(rename = "NGX")]
    Ngx,
    Quidax,
}

impl ExchangeTab {
    pub const ALL: [ExchangeTab; 2] = [ExchangeTab::Ngx, ExchangeTab::Quidax];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ngx => "NGX",
            Self::Quidax => "Quidax",
        }
    }

    pub fn venue(self) -> Venue {
        match self {
            Self::Ngx => Venue::Nse,
            Self::Quidax => Venue::Quidax,
        }
    }
}

impl FromStr for ExchangeTab {
    type Err = SelectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| SelectionError::Tab(value.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PositionsFilter {
    #[default]
    All,
    Venue(Venue),
}

impl PositionsFilter {
    pub const ALL: [PositionsFilter; 3] = [
        PositionsFilter::All,
        PositionsFilter::Venue(Venue::Nse),
        PositionsFilter::Venue(Venue::Quidax),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Venue(venue) => venue.as_str(),
        }
    }

    pub fn matches(self, venue: Venue) -> bool {
        match self {
            Self::All => true,
            Self::Venue(selected) => selected == venue,
        }
    }
}

impl fmt::Display for PositionsFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PositionsFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for PositionsFilter {
    type Err = SelectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| SelectionError::Exchange(value.to_owned()))
    }
}

pub fn parse_chart_kind(value: &str) -> Result<ChartKind, SelectionError> {
    [ChartKind::Portfolio, ChartKind::Roi]
        .into_iter()
        .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| SelectionError::Chart(value.to_owned()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSelection {
    pub timeframe: Timeframe,
    pub period: ChartPeriod,
    pub tab: ExchangeTab,
    pub exchange: PositionsFilter,
}

impl DashboardSelection {
    /// Missing values keep their defaults; unknown ones are rejected.
    pub fn parse(
        timeframe: Option<&str>,
        period: Option<&str>,
        tab: Option<&str>,
        exchange: Option<&str>,
    ) -> Result<Self, SelectionError> {
        let defaults = Self::default();
        Ok(Self {
            timeframe: timeframe.map_or(Ok(defaults.timeframe), str::parse::<Timeframe>)?,
            period: period.map_or(Ok(defaults.period), str::parse::<ChartPeriod>)?,
            tab: tab.map_or(Ok(defaults.tab), str::parse::<ExchangeTab>)?,
            exchange: exchange.map_or(Ok(defaults.exchange), str::parse::<PositionsFilter>)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderView {
    pub brand: &'static str,
    pub tagline: &'static str,
    pub portfolio_value: String,
    pub daily_change: String,
    pub daily_change_percent: String,
    pub change_class: &'static str,
    pub is_dark: bool,
    pub theme: &'static str,
    pub toggle_title: &'static str,
    pub last_updated: String,
    pub as_of_date: String,
}

pub fn header_view(portfolio: &Portfolio, is_dark: bool, now: OffsetDateTime) -> HeaderView {
    HeaderView {
        brand: BRAND,
        tagline: TAGLINE,
        portfolio_value: format_currency(portfolio.total_value, 0),
        daily_change: format_signed_currency(portfolio.daily_change, 0),
        daily_change_percent: format_percentage(portfolio.daily_change_percent, 2),
        change_class: change_class(portfolio.daily_change),
        is_dark,
        theme: if is_dark { "dark" } else { "light" },
        toggle_title: if is_dark {
            "Switch to Light Mode"
        } else {
            "Switch to Dark Mode"
        },
        last_updated: format_time(now),
        as_of_date: format_date(now),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingRow {
    pub symbol: &'static str,
    pub name: &'static str,
    pub exchange: &'static str,
    pub sector: &'static str,
    pub quantity: String,
    pub avg_price: String,
    pub current_price: String,
    pub value: String,
    pub pnl: String,
    pub pnl_percent: String,
    pub pnl_class: &'static str,
    pub volume: String,
    pub volatility: String,
    pub risk_level: &'static str,
}

pub fn risk_level(volatility: f64) -> &'static str {
    if volatility < 0.15 {
        "low"
    } else if volatility < 0.25 {
        "medium"
    } else {
        "high"
    }
}

impl From<&Holding> for HoldingRow {
    fn from(holding: &Holding) -> Self {
        Self {
            symbol: holding.symbol,
            name: holding.name,
            exchange: holding.exchange.as_str(),
            sector: holding.sector,
            quantity: format_shares(holding.quantity),
            avg_price: format_currency(holding.avg_price, 2),
            current_price: format_currency(holding.current_price, 2),
            value: format_currency(holding.value, 0),
            pnl: format_signed_currency(holding.pnl, 0),
            pnl_percent: format_percentage(holding.pnl_percent, 2),
            pnl_class: change_class(holding.pnl),
            volume: format_number(holding.volume),
            volatility: format!("{:.1}%", holding.volatility * 100.0),
            risk_level: risk_level(holding.volatility),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsView {
    pub total_value: String,
    pub total_pnl: String,
    pub total_pnl_percent: String,
    pub pnl_class: &'static str,
    pub volatility: String,
    pub sharpe_ratio: String,
    pub max_drawdown: String,
    pub beta: String,
    pub alpha: String,
}

impl From<&PortfolioMetrics> for MetricsView {
    fn from(metrics: &PortfolioMetrics) -> Self {
        Self {
            total_value: format_currency(metrics.total_value, 0),
            total_pnl: format_signed_currency(metrics.total_pnl, 0),
            total_pnl_percent: format_percentage(metrics.total_pnl_percent, 2),
            pnl_class: change_class(metrics.total_pnl),
            volatility: format!("{:.2}%", metrics.volatility * 100.0),
            sharpe_ratio: format!("{:.2}", metrics.sharpe_ratio),
            max_drawdown: format_percentage(-metrics.max_drawdown * 100.0, 2),
            beta: format!("{:.2}", metrics.beta),
            alpha: format_percentage(metrics.alpha * 100.0, 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummaryView {
    pub timeframe: Timeframe,
    pub timeframes: Vec<&'static str>,
    pub metrics: MetricsView,
    pub holdings: Vec<HoldingRow>,
    pub last_update: Option<String>,
}

pub fn portfolio_summary_view(
    snapshot: &HoldingsSnapshot,
    timeframe: Timeframe,
) -> PortfolioSummaryView {
    PortfolioSummaryView {
        timeframe,
        timeframes: Timeframe::ALL.iter().map(|t| t.as_str()).collect(),
        metrics: MetricsView::from(&snapshot.metrics),
        holdings: snapshot.holdings.iter().map(HoldingRow::from).collect(),
        last_update: snapshot
            .holdings
            .iter()
            .map(|holding| holding.last_update)
            .max()
            .map(format_time),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("no {kind} series for period {period}")]
    MissingSeries {
        kind: &'static str,
        period: ChartPeriod,
    },
    #[error("{kind} series for period {period} has no points")]
    Empty {
        kind: &'static str,
        period: ChartPeriod,
    },
    #[error("{kind} point `{label}` is not a finite number")]
    NonFinite {
        kind: &'static str,
        label: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPointView {
    pub label: &'static str,
    pub value: f64,
    pub display: String,
    pub change_class: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub kind: ChartKind,
    pub period: ChartPeriod,
    pub periods: Vec<&'static str>,
    pub label: &'static str,
    pub points: Vec<ChartPointView>,
    pub min: f64,
    pub max: f64,
    pub min_display: String,
    pub max_display: String,
    pub latest_display: String,
}

fn chart_value_display(kind: ChartKind, value: f64) -> String {
    match kind {
        ChartKind::Portfolio => format_currency(value, 0),
        ChartKind::Roi => format_percentage(value, 1),
    }
}

pub fn series_view(series: &ChartSeries) -> Result<ChartView, ChartError> {
    let kind = series.kind;
    if let Some(point) = series.points.iter().find(|point| !point.value.is_finite()) {
        return Err(ChartError::NonFinite {
            kind: kind.as_str(),
            label: point.label,
        });
    }
    let (Some(latest), Some((min, max))) = (series.points.last(), series.bounds()) else {
        return Err(ChartError::Empty {
            kind: kind.as_str(),
            period: series.period,
        });
    };

    Ok(ChartView {
        kind,
        period: series.period,
        periods: ChartPeriod::ALL_PERIODS.iter().map(|p| p.as_str()).collect(),
        label: series.label,
        points: series
            .points
            .iter()
            .map(|point| ChartPointView {
                label: point.label,
                value: point.value,
                display: chart_value_display(kind, point.value),
                change_class: change_class(point.value),
            })
            .collect(),
        min,
        max,
        min_display: chart_value_display(kind, min),
        max_display: chart_value_display(kind, max),
        latest_display: chart_value_display(kind, latest.value),
    })
}

pub fn chart_view(
    library: &ChartLibrary,
    kind: ChartKind,
    period: ChartPeriod,
) -> Result<ChartView, ChartError> {
    let series = library.get(kind, period).ok_or(ChartError::MissingSeries {
        kind: kind.as_str(),
        period,
    })?;
    series_view(series)
}

/// A chart slot on the page: either the chart or the terminal error text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChartPanel {
    Ready(ChartView),
    Failed { message: &'static str },
}

impl From<Result<ChartView, ChartError>> for ChartPanel {
    fn from(result: Result<ChartView, ChartError>) -> Self {
        match result {
            Ok(view) => Self::Ready(view),
            Err(_) => Self::Failed {
                message: CHART_ERROR_MESSAGE,
            },
        }
    }
}

// Shown whenever a market field is zero or not a number.
const NGX_MARKET_CAP_FALLBACK: f64 = 28_500_000_000_000.0;
const NGX_VOLUME_FALLBACK: f64 = 1_250_000_000.0;
const NGX_GAINERS_FALLBACK: u32 = 45;
const NGX_LOSERS_FALLBACK: u32 = 23;
const NGX_INDEX_FALLBACK: f64 = 51_234.56;
const QUIDAX_MARKET_CAP_FALLBACK: f64 = 1_250_000_000_000.0;
const QUIDAX_VOLUME_FALLBACK: f64 = 850_000_000.0;
const QUIDAX_BTC_FALLBACK: f64 = 45_000_000.0;
const QUIDAX_ACTIVE_PAIRS: u32 = 15;

fn or_fallback(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value != 0.0 {
        value
    } else {
        fallback
    }
}

fn count_or_fallback(value: u32, fallback: u32) -> u32 {
    if value == 0 {
        fallback
    } else {
        value
    }
}

fn naira_abbreviated(value: f64) -> String {
    format!("{NAIRA}{}", format_number(value))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatTile {
    pub title: &'static str,
    pub value: String,
    pub caption: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeTabView {
    pub name: &'static str,
    pub venue: Venue,
    pub is_active: bool,
    pub status: &'static str,
    pub latency: String,
    pub last_update: String,
    pub session_volume: String,
    pub preview_label: &'static str,
    pub preview_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeOverviewView {
    pub active_tab: ExchangeTab,
    pub venue_name: &'static str,
    pub venue_change: String,
    pub venue_change_class: &'static str,
    pub tabs: Vec<ExchangeTabView>,
    pub stats: Vec<StatTile>,
}

fn venue_stats(market: &MarketSnapshot, tab: ExchangeTab) -> Vec<StatTile> {
    match tab {
        ExchangeTab::Ngx => {
            let equities = &market.equities;
            let active = count_or_fallback(equities.gainers, NGX_GAINERS_FALLBACK)
                + count_or_fallback(equities.losers, NGX_LOSERS_FALLBACK);
            vec![
                StatTile {
                    title: "Market Cap",
                    value: naira_abbreviated(or_fallback(
                        equities.market_cap,
                        NGX_MARKET_CAP_FALLBACK,
                    )),
                    caption: "Total Value",
                },
                StatTile {
                    title: "Volume",
                    value: naira_abbreviated(or_fallback(equities.volume, NGX_VOLUME_FALLBACK)),
                    caption: "24h Trading",
                },
                StatTile {
                    title: "Active Stocks",
                    value: active.to_string(),
                    caption: "Trading Today",
                },
                StatTile {
                    title: "All-Share Index",
                    value: format_grouped(or_fallback(equities.all_share_index, NGX_INDEX_FALLBACK), 2),
                    caption: "NGX ASI",
                },
            ]
        }
        ExchangeTab::Quidax => {
            let crypto = &market.crypto;
            vec![
                StatTile {
                    title: "Market Cap",
                    value: naira_abbreviated(or_fallback(
                        crypto.market_cap,
                        QUIDAX_MARKET_CAP_FALLBACK,
                    )),
                    caption: "Total Value",
                },
                StatTile {
                    title: "Volume",
                    value: naira_abbreviated(or_fallback(crypto.volume, QUIDAX_VOLUME_FALLBACK)),
                    caption: "24h Trading",
                },
                StatTile {
                    title: "Active Pairs",
                    value: QUIDAX_ACTIVE_PAIRS.to_string(),
                    caption: "Trading Pairs",
                },
                StatTile {
                    title: "BTC Price",
                    value: naira_abbreviated(or_fallback(crypto.btc_price, QUIDAX_BTC_FALLBACK)),
                    caption: "BTC/NGN",
                },
            ]
        }
    }
}

fn tab_view(
    market: &MarketSnapshot,
    status: &ExchangeStatus,
    tab: ExchangeTab,
    active: ExchangeTab,
) -> ExchangeTabView {
    let (preview_label, preview_value) = match tab {
        ExchangeTab::Ngx => (
            "Market Cap",
            or_fallback(market.equities.market_cap, NGX_MARKET_CAP_FALLBACK),
        ),
        ExchangeTab::Quidax => (
            "BTC Price",
            or_fallback(market.crypto.btc_price, QUIDAX_BTC_FALLBACK),
        ),
    };

    ExchangeTabView {
        name: tab.as_str(),
        venue: tab.venue(),
        is_active: tab == active,
        status: status.status.as_str(),
        latency: format!("{}ms", status.latency_ms),
        last_update: format_time(status.last_update),
        // Lossy above 2^53, far beyond any simulated session.
        session_volume: naira_abbreviated(status.volume as f64),
        preview_label,
        preview_value: naira_abbreviated(preview_value),
    }
}

pub fn exchange_overview_view(
    market: &MarketSnapshot,
    board: &ExchangeBoard,
    directory: &[ExchangeInfo],
    tab: ExchangeTab,
) -> ExchangeOverviewView {
    let venue = tab.venue();
    let info = directory.iter().find(|info| info.venue == venue);

    ExchangeOverviewView {
        active_tab: tab,
        venue_name: info.map_or(venue.display_name(), |info| info.name),
        venue_change: format_percentage(info.map_or(0.0, |info| info.change), 2),
        venue_change_class: change_class(info.map_or(0.0, |info| info.change)),
        tabs: ExchangeTab::ALL
            .into_iter()
            .map(|candidate| tab_view(market, board.get(candidate.venue()), candidate, tab))
            .collect(),
        stats: venue_stats(market, tab),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOption {
    pub name: &'static str,
    pub count: usize,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRow {
    pub id: u32,
    pub symbol: &'static str,
    pub name: &'static str,
    pub exchange: &'static str,
    pub sector: &'static str,
    pub order_type: &'static str,
    pub shares: String,
    pub price: String,
    pub value: String,
    pub change: String,
    pub change_percent: String,
    pub change_class: &'static str,
    /// Share of the filtered total, in percent.
    pub allocation: String,
    pub volume: String,
    pub price_history: Vec<f64>,
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionsTableView {
    pub filter: PositionsFilter,
    pub filters: Vec<FilterOption>,
    pub total_positions: usize,
    pub total_value: String,
    pub rows: Vec<PositionRow>,
    pub last_update: Option<String>,
}

pub fn positions_table_view(
    positions: &[SimulatedPosition],
    filter: PositionsFilter,
) -> PositionsTableView {
    let selected: Vec<&SimulatedPosition> = positions
        .iter()
        .filter(|position| filter.matches(position.exchange))
        .collect();
    let total_value: f64 = selected.iter().map(|position| position.value).sum();

    let rows = selected
        .iter()
        .map(|position| {
            let allocation = if total_value > 0.0 {
                position.value / total_value * 100.0
            } else {
                0.0
            };
            PositionRow {
                id: position.id,
                symbol: position.symbol,
                name: position.name,
                exchange: position.exchange.as_str(),
                sector: position.sector,
                order_type: position.order_type.as_str(),
                shares: format_shares(position.shares),
                price: format_currency(position.price, 2),
                value: format_currency(position.value, 0),
                change: format_signed_currency(position.change, 2),
                change_percent: format_percentage(position.change_percent, 2),
                change_class: change_class(position.change),
                allocation: format!("{allocation:.1}%"),
                volume: format_number(position.volume),
                price_history: position.price_history.clone(),
                is_new: position.is_new,
            }
        })
        .collect();

    PositionsTableView {
        filter,
        filters: PositionsFilter::ALL
            .into_iter()
            .map(|option| FilterOption {
                name: option.as_str(),
                count: positions
                    .iter()
                    .filter(|position| option.matches(position.exchange))
                    .count(),
                selected: option == filter,
            })
            .collect(),
        total_positions: selected.len(),
        total_value: format_currency(total_value, 0),
        rows,
        last_update: positions
            .iter()
            .map(|position| position.last_update)
            .max()
            .map(format_time),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerRow {
    pub symbol: &'static str,
    pub price: String,
    pub change: String,
    pub change_class: &'static str,
    pub volume: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketTickerView {
    pub rows: Vec<TickerRow>,
}

pub fn market_ticker_view(entries: &[TickerEntry]) -> MarketTickerView {
    MarketTickerView {
        rows: entries
            .iter()
            .map(|entry| TickerRow {
                symbol: entry.symbol,
                price: format_currency(entry.price, 2),
                change: format_percentage(entry.change, 2),
                change_class: change_class(entry.change),
                volume: format_number(entry.volume),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRow {
    pub id: u64,
    pub symbol: &'static str,
    pub side: &'static str,
    pub exchange: &'static str,
    pub order_type: &'static str,
    pub amount: String,
    pub filled_amount: String,
    pub fill_percent: f64,
    pub fill_display: String,
    pub status: &'static str,
    pub latency: String,
    pub entry_time: String,
    pub fill_time: Option<String>,
}

impl From<&SimulatedOrder> for OrderRow {
    fn from(order: &SimulatedOrder) -> Self {
        let fill_percent = order.fraction() * 100.0;
        Self {
            id: order.id,
            symbol: order.symbol,
            side: order.side.as_str(),
            exchange: order.exchange.as_str(),
            order_type: order.order_type.as_str(),
            amount: format_currency(order.amount, 0),
            filled_amount: format_currency(order.filled_amount, 0),
            fill_percent,
            fill_display: format!("{fill_percent:.0}%"),
            status: order.status.as_str(),
            latency: format!("{}ms", order.latency_ms),
            entry_time: format_time(order.entry_time),
            fill_time: order.fill_time.map(format_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderFlowView {
    pub total: usize,
    pub pending: usize,
    pub partial: usize,
    pub filled: usize,
    /// Newest first.
    pub rows: Vec<OrderRow>,
}

pub fn order_flow_view(flow: &OrderFlow) -> OrderFlowView {
    let mut rows: Vec<OrderRow> = flow.orders.iter().map(OrderRow::from).collect();
    rows.sort_by(|a, b| b.id.cmp(&a.id));

    OrderFlowView {
        total: flow.orders.len(),
        pending: flow.count(OrderStatus::Pending),
        partial: flow.count(OrderStatus::Partial),
        filled: flow.count(OrderStatus::Filled),
        rows,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MobileNoticeView {
    pub visible: bool,
    pub is_mobile: bool,
    pub dismissed: bool,
    pub title: &'static str,
    pub message: &'static str,
    pub detail: &'static str,
}

pub fn mobile_notice_view(is_mobile: bool, dismissed: bool) -> MobileNoticeView {
    MobileNoticeView {
        visible: is_mobile && !dismissed,
        is_mobile,
        dismissed,
        title: "PC Required",
        message: "Please view this platform on your PC or laptop computer",
        detail: "This trading dashboard requires a desktop environment for optimal performance",
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DashboardInputs<'a> {
    pub portfolio: &'a Portfolio,
    pub market: &'a MarketSnapshot,
    pub orders: &'a OrderFlow,
    pub positions: &'a [SimulatedPosition],
    pub holdings: &'a HoldingsSnapshot,
    pub ticker: &'a [TickerEntry],
    pub exchanges: &'a ExchangeBoard,
    pub directory: &'a [ExchangeInfo],
    pub charts: &'a ChartLibrary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: DashboardSelection,
    pub header: HeaderView,
    pub summary: PortfolioSummaryView,
    pub portfolio_chart: ChartPanel,
    pub roi_chart: ChartPanel,
    pub exchanges: ExchangeOverviewView,
    pub positions: PositionsTableView,
    pub ticker: MarketTickerView,
    pub orders: OrderFlowView,
}

pub fn dashboard_view(
    inputs: &DashboardInputs<'_>,
    selection: DashboardSelection,
    is_dark: bool,
    now: OffsetDateTime,
) -> DashboardView {
    DashboardView {
        selection,
        header: header_view(inputs.portfolio, is_dark, now),
        summary: portfolio_summary_view(inputs.holdings, selection.timeframe),
        portfolio_chart: chart_view(inputs.charts, ChartKind::Portfolio, selection.period).into(),
        roi_chart: chart_view(inputs.charts, ChartKind::Roi, selection.period).into(),
        exchanges: exchange_overview_view(
            inputs.market,
            inputs.exchanges,
            inputs.directory,
            selection.tab,
        ),
        positions: positions_table_view(inputs.positions, selection.exchange),
        ticker: market_ticker_view(inputs.ticker),
        orders: order_flow_view(inputs.orders),
    }
}

#[cfg(test)]
mod tests {
    use core_sim::{
        charts::ChartPoint,
        config::{OrderFlowConfig, PortfolioConfig},
        generators::seeded_rng,
        holdings::HoldingsSim,
        orders::OrderFlowSim,
        positions::seed_positions,
        ticker::seed_ticker,
        venue::exchange_directory,
        Simulator,
    };
    use time::macros::datetime;

    use super::*;

    const NOW: OffsetDateTime = datetime!(2026-10-18 14:30:05 UTC);

    #[test]
    fn selection_defaults_and_parsing() {
        let selection = DashboardSelection::parse(None, None, None, None).unwrap();
        assert_eq!(selection, DashboardSelection::default());
        assert_eq!(selection.period, ChartPeriod::OneYear);
        assert_eq!(selection.tab, ExchangeTab::Ngx);

        let picked =
            DashboardSelection::parse(Some("1w"), Some("6m"), Some("quidax"), Some("NSE")).unwrap();
        assert_eq!(picked.timeframe, Timeframe::OneWeek);
        assert_eq!(picked.period, ChartPeriod::SixMonths);
        assert_eq!(picked.tab, ExchangeTab::Quidax);
        assert_eq!(picked.exchange, PositionsFilter::Venue(Venue::Nse));
    }

    #[test]
    fn unknown_selection_values_are_rejected() {
        assert!(matches!(
            DashboardSelection::parse(None, Some("5Y"), None, None),
            Err(SelectionError::Period(_))
        ));
        assert_eq!(
            "LSE".parse::<PositionsFilter>(),
            Err(SelectionError::Exchange("LSE".to_owned()))
        );
        assert!(parse_chart_kind("candles").is_err());
        assert_eq!(parse_chart_kind("ROI").unwrap(), ChartKind::Roi);
    }

    #[test]
    fn selection_serializes_as_display_strings() {
        let json = serde_json::to_value(DashboardSelection::default()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"timeframe": "1D", "period": "1Y", "tab": "NGX", "exchange": "All"})
        );
    }

    #[test]
    fn header_formats_portfolio_and_theme() {
        let portfolio = Portfolio::seeded(&PortfolioConfig::default());

        let view = header_view(&portfolio, false, NOW);

        assert_eq!(view.portfolio_value, "₦2,546,720");
        assert_eq!(view.daily_change, "+₦45,230");
        assert_eq!(view.daily_change_percent, "+1.78%");
        assert_eq!(view.change_class, "positive");
        assert_eq!(view.theme, "light");
        assert_eq!(view.toggle_title, "Switch to Dark Mode");
        assert_eq!(view.last_updated, "14:30:05");
        assert_eq!(view.as_of_date, "Oct 18, 2026");
    }

    #[test]
    fn chart_view_reports_bounds_and_labels() {
        let library = ChartLibrary::default();

        let view = chart_view(&library, ChartKind::Roi, ChartPeriod::ThreeYears).unwrap();

        assert_eq!(view.points.len(), 3);
        assert_eq!(view.min, -8.2);
        assert_eq!(view.max, 24.7);
        assert_eq!(view.max_display, "+24.7%");
        assert_eq!(view.points[1].change_class, "negative");
        assert_eq!(view.periods, vec!["6M", "1Y", "3Y", "ALL"]);
    }

    #[test]
    fn broken_series_becomes_chart_error_panel() {
        let mut series = ChartLibrary::default()
            .get(ChartKind::Portfolio, ChartPeriod::OneYear)
            .unwrap()
            .clone();
        series.points.push(ChartPoint {
            label: "Bad",
            value: f64::NAN,
        });

        let result = series_view(&series);
        assert!(matches!(result, Err(ChartError::NonFinite { label: "Bad", .. })));

        let panel = ChartPanel::from(result);
        let json = serde_json::to_value(&panel).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["message"], CHART_ERROR_MESSAGE);
    }

    #[test]
    fn empty_series_is_an_error() {
        let mut series = ChartLibrary::default()
            .get(ChartKind::Roi, ChartPeriod::All)
            .unwrap()
            .clone();
        series.points.clear();

        assert!(matches!(series_view(&series), Err(ChartError::Empty { .. })));
    }

    #[test]
    fn exchange_overview_falls_back_when_market_fields_are_missing() {
        let mut market = MarketSnapshot::default();
        market.equities.market_cap = 0.0;
        market.equities.gainers = 0;
        market.equities.all_share_index = f64::NAN;
        let board = ExchangeBoard::initial(NOW);

        let view = exchange_overview_view(&market, &board, &exchange_directory(), ExchangeTab::Ngx);

        assert_eq!(view.venue_name, "Nigeria Stock Exchange");
        assert_eq!(view.stats[0].value, "₦28.50T");
        assert_eq!(
            view.stats[2].value,
            (NGX_GAINERS_FALLBACK + market.equities.losers).to_string()
        );
        assert_eq!(view.stats[3].value, "51,234.56");
        assert!(view.tabs[0].is_active);
        assert!(!view.tabs[1].is_active);
        assert_eq!(view.tabs[1].preview_label, "BTC Price");
    }

    #[test]
    fn quidax_tab_shows_crypto_figures() {
        let market = MarketSnapshot::default();
        let board = ExchangeBoard::initial(NOW);

        let view = exchange_overview_view(&market, &board, &exchange_directory(), ExchangeTab::Quidax);

        assert_eq!(view.active_tab, ExchangeTab::Quidax);
        assert_eq!(view.venue_change, "-1.23%");
        assert_eq!(view.stats[2].value, "15");
        assert_eq!(view.stats[3].title, "BTC Price");
    }

    #[test]
    fn positions_filter_limits_rows_and_totals() {
        let positions = seed_positions(NOW);
        let quidax_count = positions
            .iter()
            .filter(|position| position.exchange == Venue::Quidax)
            .count();

        let all = positions_table_view(&positions, PositionsFilter::All);
        let quidax = positions_table_view(&positions, PositionsFilter::Venue(Venue::Quidax));

        assert_eq!(all.total_positions, positions.len());
        assert_eq!(quidax.total_positions, quidax_count);
        assert!(quidax.rows.iter().all(|row| row.exchange == "Quidax"));
        assert_eq!(quidax.filters[2].count, quidax_count);
        assert!(quidax.filters[2].selected);
        assert!(!quidax.filters[0].selected);
    }

    #[test]
    fn position_allocations_sum_to_one_hundred_percent() {
        let positions = seed_positions(NOW);

        let view = positions_table_view(&positions, PositionsFilter::All);
        let total: f64 = view
            .rows
            .iter()
            .map(|row| row.allocation.trim_end_matches('%').parse::<f64>().unwrap())
            .sum();

        assert!((total - 100.0).abs() < 0.5, "allocations sum to {total}");
    }

    #[test]
    fn ticker_rows_are_formatted() {
        let view = market_ticker_view(&seed_ticker());

        assert_eq!(view.rows[0].symbol, "MTN");
        assert_eq!(view.rows[0].price, "₦165.50");
        assert_eq!(view.rows[0].change, "+2.45%");
        assert_eq!(view.rows[0].volume, "1.20M");
        assert_eq!(view.rows[1].change_class, "negative");
    }

    #[test]
    fn order_flow_counts_match_rows() {
        let mut sim = OrderFlowSim::new(OrderFlowConfig::default(), seeded_rng(3), NOW);
        for _ in 0..25 {
            sim.tick(NOW);
        }

        let view = order_flow_view(sim.snapshot());

        assert_eq!(view.total, view.rows.len());
        assert_eq!(view.pending + view.partial + view.filled, view.total);
        assert!(view.rows.windows(2).all(|pair| pair[0].id > pair[1].id));
        assert!(view
            .rows
            .iter()
            .all(|row| (0.0..=100.0).contains(&row.fill_percent)));
    }

    #[test]
    fn mobile_notice_visibility() {
        assert!(mobile_notice_view(true, false).visible);
        assert!(!mobile_notice_view(true, true).visible);
        assert!(!mobile_notice_view(false, false).visible);
    }

    #[test]
    fn dashboard_view_renders_every_panel() {
        let portfolio = Portfolio::seeded(&PortfolioConfig::default());
        let market = MarketSnapshot::default();
        let orders = OrderFlowSim::new(OrderFlowConfig::default(), seeded_rng(1), NOW);
        let positions = seed_positions(NOW);
        let holdings = HoldingsSim::new(100_000.0, 10_000.0, seeded_rng(2), NOW);
        let ticker = seed_ticker();
        let board = ExchangeBoard::initial(NOW);
        let directory = exchange_directory();
        let charts = ChartLibrary::default();
        let inputs = DashboardInputs {
            portfolio: &portfolio,
            market: &market,
            orders: orders.snapshot(),
            positions: &positions,
            holdings: holdings.snapshot(),
            ticker: &ticker,
            exchanges: &board,
            directory: &directory,
            charts: &charts,
        };

        let view = dashboard_view(&inputs, DashboardSelection::default(), true, NOW);

        assert!(matches!(view.portfolio_chart, ChartPanel::Ready(_)));
        assert!(matches!(view.roi_chart, ChartPanel::Ready(_)));
        assert_eq!(view.summary.holdings.len(), holdings.snapshot().holdings.len());
        assert_eq!(view.ticker.rows.len(), 10);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["header"]["theme"], "dark");
        assert_eq!(json["portfolio_chart"]["state"], "ready");
        assert_eq!(json["portfolio_chart"]["period"], "1Y");
    }

    #[test]
    fn holding_row_carries_volatility_badge() {
        let holding = Holding {
            id: 1,
            symbol: "DANGCEM",
            name: "Dangote Cement",
            exchange: Venue::Nse,
            sector: "Industrials",
            quantity: 100.0,
            avg_price: 250.0,
            current_price: 275.0,
            pnl: 2_500.0,
            pnl_percent: 10.0,
            value: 27_500.0,
            volume: 1_500_000.0,
            volatility: 0.183,
            last_update: NOW,
        };

        let row = HoldingRow::from(&holding);

        assert_eq!(row.volatility, "18.3%");
        assert_eq!(row.risk_level, "medium");
        assert_eq!(risk_level(0.1), "low");
        assert_eq!(risk_level(0.15), "medium");
        assert_eq!(risk_level(0.25), "high");
    }
}
