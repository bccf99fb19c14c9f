use rand::rngs::StdRng;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    config::{PortfolioConfig, ProfitBias, PRICE_FLOOR},
    generators::{perturb_price, random_walk},
    Simulator,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioPosition {
    pub symbol: String,
    pub quantity: f64,
    pub avg_price: f64,
    pub current_price: f64,
    pub change_percent: f64,
}

impl PortfolioPosition {
    fn new(symbol: &str, quantity: f64, avg_price: f64, current_price: f64) -> Self {
        Self {
            symbol: symbol.to_owned(),
            quantity,
            avg_price,
            current_price,
            change_percent: change_percent(avg_price, current_price),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    pub total_value: f64,
    pub daily_change: f64,
    /// Percent units: `daily_change / total_value * 100`.
    pub daily_change_percent: f64,
    pub positions: Vec<PortfolioPosition>,
}

impl Portfolio {
    pub fn new(total_value: f64, daily_change: f64, positions: Vec<PortfolioPosition>) -> Self {
        Self {
            total_value,
            daily_change,
            daily_change_percent: daily_change_percent(daily_change, total_value),
            positions,
        }
    }

    pub fn seeded(config: &PortfolioConfig) -> Self {
        Self::new(
            config.initial_total_value,
            config.initial_daily_change,
            vec![
                PortfolioPosition::new("MTN", 1_000.0, 150.0, 165.0),
                PortfolioPosition::new("DANGOTE", 500.0, 200.0, 195.0),
                PortfolioPosition::new("ZENITH", 800.0, 25.0, 28.0),
            ],
        )
    }
}

pub fn daily_change_percent(daily_change: f64, total_value: f64) -> f64 {
    if total_value == 0.0 {
        return 0.0;
    }
    daily_change / total_value * 100.0
}

fn change_percent(avg_price: f64, current_price: f64) -> f64 {
    if avg_price == 0.0 {
        return 0.0;
    }
    (current_price - avg_price) / avg_price * 100.0
}

/// Applies the profit bias to a freshly walked `(total_value, daily_change)`.
pub fn apply_profit_bias(bias: &ProfitBias, total_value: f64, daily_change: f64) -> (f64, f64) {
    match bias {
        ProfitBias::AlwaysProfitable {
            band,
            daily_change_floor_pct,
        } => {
            let total_value = band.clamp(total_value);
            let floor = daily_change_floor_pct / 100.0 * total_value;
            (total_value, daily_change.max(floor))
        }
        ProfitBias::Unbiased => (total_value.max(PRICE_FLOOR), daily_change),
    }
}

pub fn next_portfolio(rng: &mut StdRng, config: &PortfolioConfig, previous: &Portfolio) -> Portfolio {
    let total_value = random_walk(rng, previous.total_value, config.total_value_step);
    let daily_change = random_walk(rng, previous.daily_change, config.daily_change_step);
    let (total_value, daily_change) = apply_profit_bias(&config.bias, total_value, daily_change);

    let positions = previous
        .positions
        .iter()
        .map(|position| {
            let current_price =
                perturb_price(rng, position.current_price, config.position_volatility);
            PortfolioPosition {
                current_price,
                change_percent: change_percent(position.avg_price, current_price),
                ..position.clone()
            }
        })
        .collect();

    Portfolio::new(total_value, daily_change, positions)
}

#[derive(Debug, Clone)]
pub struct PortfolioSim {
    rng: StdRng,
    config: PortfolioConfig,
    current: Portfolio,
}

impl PortfolioSim {
    pub fn new(config: PortfolioConfig, rng: StdRng) -> Self {
        Self {
            rng,
            current: Portfolio::seeded(&config),
            config,
        }
    }
}

impl Simulator for PortfolioSim {
    type Snapshot = Portfolio;

    fn snapshot(&self) -> &Portfolio {
        &self.current
    }

    fn tick(&mut self, _now: OffsetDateTime) -> Portfolio {
        self.current = next_portfolio(&mut self.rng, &self.config, &self.current);
        self.current.clone()
    }
}
