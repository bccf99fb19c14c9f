use rand::rngs::StdRng;
use time::OffsetDateTime;

use crate::{
    config::SimConfig,
    exchange::ExchangeStatusSim,
    generators::{entropy_rng, seeded_rng},
    holdings::HoldingsSim,
    market::MarketSim,
    orders::OrderFlowSim,
    portfolio::PortfolioSim,
    positions::PositionsSim,
    ticker::TickerSim,
};

/// One freshly seeded simulator per feed.
#[derive(Debug, Clone)]
pub struct SimulatorSet {
    pub portfolio: PortfolioSim,
    pub market: MarketSim,
    pub orders: OrderFlowSim,
    pub positions: PositionsSim,
    pub holdings: HoldingsSim,
    pub ticker: TickerSim,
    pub exchanges: ExchangeStatusSim,
}

impl SimulatorSet {
    /// With `seed` set every feed gets its own deterministic stream derived
    /// from it; otherwise each feed draws from OS entropy.
    pub fn new(config: &SimConfig, seed: Option<u64>, now: OffsetDateTime) -> Self {
        let mut stream = 0_u64;
        let mut rng = || -> StdRng {
            stream += 1;
            match seed {
                Some(seed) => seeded_rng(seed.wrapping_mul(31).wrapping_add(stream)),
                None => entropy_rng(),
            }
        };

        Self {
            portfolio: PortfolioSim::new(config.portfolio, rng()),
            market: MarketSim::new(config.market, rng()),
            orders: OrderFlowSim::new(config.orders, rng(), now),
            positions: PositionsSim::new(config.position_step_scale, rng(), now),
            holdings: HoldingsSim::new(
                config.holdings_volume_step,
                config.holdings_volume_floor,
                rng(),
                now,
            ),
            ticker: TickerSim::new(config.ticker_price_step, config.ticker_change_step, rng()),
            exchanges: ExchangeStatusSim::new(rng(), now),
        }
    }
}
