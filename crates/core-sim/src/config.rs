use std::time::Duration;

/// Smallest price any generator may produce.
pub const PRICE_FLOOR: f64 = 0.01;

pub const ORDERS_INTERVAL_MS: u64 = 200;
pub const PORTFOLIO_INTERVAL_MS: u64 = 1_000;
pub const MARKET_INTERVAL_MS: u64 = 1_500;
pub const HOLDINGS_INTERVAL_MS: u64 = 2_000;
pub const EXCHANGE_STATUS_INTERVAL_MS: u64 = 2_000;
pub const POSITIONS_INTERVAL_MS: u64 = 3_000;
pub const TICKER_INTERVAL_MS: u64 = 3_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueBand {
    pub min: f64,
    pub max: f64,
}

impl ValueBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Whether the portfolio feed keeps showing a profit.
///
/// `AlwaysProfitable` clamps the total value into `band` and floors the daily
/// change percentage at `daily_change_floor_pct`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfitBias {
    AlwaysProfitable {
        band: ValueBand,
        daily_change_floor_pct: f64,
    },
    Unbiased,
}

impl ProfitBias {
    pub fn always_profitable() -> Self {
        Self::AlwaysProfitable {
            band: ValueBand::new(2_400_000.0, 2_580_000.0),
            daily_change_floor_pct: 0.0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::AlwaysProfitable { .. })
    }
}

impl Default for ProfitBias {
    fn default() -> Self {
        Self::always_profitable()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioConfig {
    pub initial_total_value: f64,
    pub initial_daily_change: f64,
    pub total_value_step: f64,
    pub daily_change_step: f64,
    pub position_volatility: f64,
    pub bias: ProfitBias,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            initial_total_value: 2_546_720.0,
            initial_daily_change: 45_230.0,
            total_value_step: 100_000.0,
            daily_change_step: 50_000.0,
            position_volatility: 0.01,
            bias: ProfitBias::default(),
        }
    }
}

/// Step scales of the unclamped market random walk, one per field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketConfig {
    pub index_step: f64,
    pub equities_market_cap_step: f64,
    pub equities_volume_step: f64,
    pub breadth_step: f64,
    pub btc_step: f64,
    pub eth_step: f64,
    pub crypto_volume_step: f64,
    pub crypto_market_cap_step: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            index_step: 100.0,
            equities_market_cap_step: 100_000_000_000.0,
            equities_volume_step: 10_000_000.0,
            breadth_step: 4.0,
            btc_step: 100_000.0,
            eth_step: 10_000.0,
            crypto_volume_step: 10_000_000.0,
            crypto_market_cap_step: 10_000_000_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderFlowConfig {
    pub min_population: usize,
    pub max_population: usize,
    pub initial_population: usize,
    /// Fill increment per tick as a fraction of the order amount.
    pub min_fill_step: f64,
    pub max_fill_step: f64,
    /// Chance that a pending order starts filling on a given tick.
    pub fill_start_probability: f64,
    pub filled_eviction_probability: f64,
    pub stale_after_ticks: u64,
    /// Most orders injected on a single tick while below `max_population`.
    pub max_injections_per_tick: usize,
    pub injection_probability: f64,
}

impl Default for OrderFlowConfig {
    fn default() -> Self {
        Self {
            min_population: 20,
            max_population: 85,
            initial_population: 40,
            min_fill_step: 0.05,
            max_fill_step: 0.35,
            fill_start_probability: 0.6,
            filled_eviction_probability: 0.3,
            stale_after_ticks: 150,
            max_injections_per_tick: 3,
            injection_probability: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub portfolio: PortfolioConfig,
    pub market: MarketConfig,
    pub orders: OrderFlowConfig,
    /// Scale applied to each position's volatility on the positions feed.
    pub position_step_scale: f64,
    pub ticker_price_step: f64,
    pub ticker_change_step: f64,
    pub holdings_volume_step: f64,
    pub holdings_volume_floor: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            portfolio: PortfolioConfig::default(),
            market: MarketConfig::default(),
            orders: OrderFlowConfig::default(),
            position_step_scale: 0.1,
            ticker_price_step: 2.0,
            ticker_change_step: 0.5,
            holdings_volume_step: 100_000.0,
            holdings_volume_floor: 10_000.0,
        }
    }
}

impl SimConfig {
    pub fn with_profit_bias(mut self, bias: ProfitBias) -> Self {
        self.portfolio.bias = bias;
        self
    }
}

pub fn interval(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
