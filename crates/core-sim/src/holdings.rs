use rand::{rngs::StdRng, Rng};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    generators::{floored_walk, perturb_price, uniform},
    venue::Venue,
    Simulator,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub id: u32,
    pub symbol: &'static str,
    pub name: &'static str,
    pub exchange: Venue,
    pub sector: &'static str,
    pub quantity: f64,
    pub avg_price: f64,
    pub current_price: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
    pub value: f64,
    pub volume: f64,
    pub volatility: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub last_update: OffsetDateTime,
}

impl Holding {
    fn reprice(&mut self, current_price: f64) {
        self.current_price = current_price;
        self.pnl = (current_price - self.avg_price) * self.quantity;
        self.pnl_percent = (current_price - self.avg_price) / self.avg_price * 100.0;
        self.value = current_price * self.quantity;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PortfolioMetrics {
    pub total_value: f64,
    pub total_pnl: f64,
    pub total_pnl_percent: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub beta: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingsSnapshot {
    pub holdings: Vec<Holding>,
    pub metrics: PortfolioMetrics,
}

const HOLDING_SYMBOLS: [(&str, &str, Venue, &str); 10] = [
    ("MTN", "MTN Nigeria", Venue::Nse, "Telecommunications"),
    ("DANGOTE", "Dangote Cement", Venue::Nse, "Industrial Goods"),
    ("ZENITH", "Zenith Bank", Venue::Nse, "Financial Services"),
    ("GTCO", "GTCO Plc", Venue::Nse, "Financial Services"),
    ("ACCESS", "Access Bank", Venue::Nse, "Financial Services"),
    ("BTC", "Bitcoin", Venue::Quidax, "Cryptocurrency"),
    ("ETH", "Ethereum", Venue::Quidax, "Cryptocurrency"),
    ("BNB", "Binance Coin", Venue::Quidax, "Cryptocurrency"),
    ("SOL", "Solana", Venue::Quidax, "Cryptocurrency"),
    ("ADA", "Cardano", Venue::Quidax, "Cryptocurrency"),
];

fn synthesize_holdings(rng: &mut StdRng, now: OffsetDateTime) -> Vec<Holding> {
    HOLDING_SYMBOLS
        .iter()
        .zip(1..)
        .map(|(&(symbol, name, exchange, sector), id)| {
            let base_price = if exchange.is_crypto() {
                uniform(rng, 10_000.0, 60_000.0)
            } else {
                uniform(rng, 50.0, 550.0)
            };
            let quantity = f64::from(rng.gen_range(100..1_100_u32));
            let avg_price = base_price * uniform(rng, 0.9, 1.1);
            let current_price = avg_price * uniform(rng, 0.8, 1.2);

            let mut holding = Holding {
                id,
                symbol,
                name,
                exchange,
                sector,
                quantity,
                avg_price,
                current_price,
                pnl: 0.0,
                pnl_percent: 0.0,
                value: 0.0,
                volume: f64::from(rng.gen_range(100_000..1_100_000_u32)),
                volatility: uniform(rng, 0.1, 0.4),
                last_update: now,
            };
            holding.reprice(current_price);
            holding
        })
        .collect()
}

/// Aggregates holdings and samples the synthetic risk figures.
pub fn portfolio_metrics(rng: &mut StdRng, holdings: &[Holding]) -> PortfolioMetrics {
    let total_value: f64 = holdings.iter().map(|holding| holding.value).sum();
    let total_pnl: f64 = holdings.iter().map(|holding| holding.pnl).sum();
    let cost_basis = total_value - total_pnl;
    let total_pnl_percent = if total_value > 0.0 && cost_basis > 0.0 {
        total_pnl / cost_basis * 100.0
    } else {
        0.0
    };

    PortfolioMetrics {
        total_value,
        total_pnl,
        total_pnl_percent,
        volatility: uniform(rng, 0.1, 0.3),
        sharpe_ratio: uniform(rng, 0.5, 2.5),
        max_drawdown: uniform(rng, 0.05, 0.2),
        beta: uniform(rng, 0.5, 2.0),
        alpha: uniform(rng, -0.05, 0.05),
    }
}

#[derive(Debug, Clone)]
pub struct HoldingsSim {
    rng: StdRng,
    volume_step: f64,
    volume_floor: f64,
    current: HoldingsSnapshot,
}

impl HoldingsSim {
    pub fn new(volume_step: f64, volume_floor: f64, mut rng: StdRng, now: OffsetDateTime) -> Self {
        let holdings = synthesize_holdings(&mut rng, now);
        let metrics = portfolio_metrics(&mut rng, &holdings);

        Self {
            rng,
            volume_step,
            volume_floor,
            current: HoldingsSnapshot { holdings, metrics },
        }
    }
}

impl Simulator for HoldingsSim {
    type Snapshot = HoldingsSnapshot;

    fn snapshot(&self) -> &HoldingsSnapshot {
        &self.current
    }

    fn tick(&mut self, now: OffsetDateTime) -> HoldingsSnapshot {
        let holdings: Vec<Holding> = self
            .current
            .holdings
            .iter()
            .map(|holding| {
                let mut next = holding.clone();
                next.reprice(perturb_price(
                    &mut self.rng,
                    holding.current_price,
                    holding.volatility,
                ));
                next.volume =
                    floored_walk(&mut self.rng, holding.volume, self.volume_step, self.volume_floor);
                next.last_update = now;
                next
            })
            .collect();
        let metrics = portfolio_metrics(&mut self.rng, &holdings);

        self.current = HoldingsSnapshot { holdings, metrics };
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::PRICE_FLOOR, generators::seeded_rng};

    fn sim(seed: u64) -> HoldingsSim {
        HoldingsSim::new(100_000.0, 10_000.0, seeded_rng(seed), OffsetDateTime::UNIX_EPOCH)
    }

    #[test]
    fn metrics_are_computed_from_the_new_holdings() {
        let mut sim = sim(1);

        for _ in 0..50 {
            let snapshot = sim.tick(OffsetDateTime::UNIX_EPOCH);
            let total: f64 = snapshot.holdings.iter().map(|h| h.value).sum();
            assert!((snapshot.metrics.total_value - total).abs() < 1e-6);
        }
    }

    #[test]
    fn prices_and_volumes_respect_floors() {
        let mut sim = sim(2);

        for _ in 0..500 {
            let snapshot = sim.tick(OffsetDateTime::UNIX_EPOCH);
            for holding in &snapshot.holdings {
                assert!(holding.current_price >= PRICE_FLOOR);
                assert!(holding.volume >= 10_000.0);
                assert!(holding.value >= 0.0);
            }
        }
    }

    #[test]
    fn synthetic_risk_figures_stay_in_range() {
        let mut sim = sim(3);

        for _ in 0..100 {
            let metrics = sim.tick(OffsetDateTime::UNIX_EPOCH).metrics;
            assert!((0.5..2.5).contains(&metrics.sharpe_ratio));
            assert!((-0.05..0.05).contains(&metrics.alpha));
        }
    }

    #[test]
    fn crypto_holdings_start_at_crypto_prices() {
        let sim = sim(4);

        for holding in &sim.snapshot().holdings {
            let base_ceiling = if holding.exchange.is_crypto() {
                60_000.0
            } else {
                550.0
            };
            let ceiling = base_ceiling * 1.1 * 1.2;
            assert!(holding.current_price <= ceiling);
        }
    }
}
