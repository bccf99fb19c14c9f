use std::time::Duration;

use core_sim::config::{
    interval, EXCHANGE_STATUS_INTERVAL_MS, HOLDINGS_INTERVAL_MS, MARKET_INTERVAL_MS,
    ORDERS_INTERVAL_MS, PORTFOLIO_INTERVAL_MS, POSITIONS_INTERVAL_MS, TICKER_INTERVAL_MS,
};
use serde::Serialize;

/// One independently ticking slice of dashboard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Portfolio,
    Market,
    Orders,
    Positions,
    Holdings,
    Ticker,
    Exchanges,
}

impl FeedKind {
    pub const ALL: [FeedKind; 7] = [
        FeedKind::Portfolio,
        FeedKind::Market,
        FeedKind::Orders,
        FeedKind::Positions,
        FeedKind::Holdings,
        FeedKind::Ticker,
        FeedKind::Exchanges,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portfolio => "portfolio",
            Self::Market => "market",
            Self::Orders => "orders",
            Self::Positions => "positions",
            Self::Holdings => "holdings",
            Self::Ticker => "ticker",
            Self::Exchanges => "exchanges",
        }
    }

    pub fn period(self) -> Duration {
        interval(match self {
            Self::Portfolio => PORTFOLIO_INTERVAL_MS,
            Self::Market => MARKET_INTERVAL_MS,
            Self::Orders => ORDERS_INTERVAL_MS,
            Self::Positions => POSITIONS_INTERVAL_MS,
            Self::Holdings => HOLDINGS_INTERVAL_MS,
            Self::Ticker => TICKER_INTERVAL_MS,
            Self::Exchanges => EXCHANGE_STATUS_INTERVAL_MS,
        })
    }
}

/// Published after a feed has replaced its slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedTick {
    pub feed: FeedKind,
    pub tick: u64,
}

impl FeedTick {
    pub fn new(feed: FeedKind, tick: u64) -> Self {
        Self { feed, tick }
    }
}
