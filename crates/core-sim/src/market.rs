use rand::rngs::StdRng;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    config::{MarketConfig, PRICE_FLOOR},
    generators::{floored_walk, random_walk},
    Simulator,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquitiesVenue {
    pub all_share_index: f64,
    pub market_cap: f64,
    pub volume: f64,
    pub gainers: u32,
    pub losers: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CryptoVenue {
    pub btc_price: f64,
    pub eth_price: f64,
    pub volume: f64,
    pub market_cap: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub equities: EquitiesVenue,
    pub crypto: CryptoVenue,
}

impl Default for MarketSnapshot {
    fn default() -> Self {
        Self {
            equities: EquitiesVenue {
                all_share_index: 51_234.56,
                market_cap: 28_500_000_000_000.0,
                volume: 1_250_000_000.0,
                gainers: 45,
                losers: 23,
            },
            crypto: CryptoVenue {
                btc_price: 45_000_000.0,
                eth_price: 3_200_000.0,
                volume: 850_000_000.0,
                market_cap: 1_250_000_000_000.0,
            },
        }
    }
}

fn walk(rng: &mut StdRng, value: f64, scale: f64) -> f64 {
    floored_walk(rng, value, scale, PRICE_FLOOR)
}

fn walk_count(rng: &mut StdRng, value: u32, scale: f64) -> u32 {
    random_walk(rng, f64::from(value), scale).round().max(0.0) as u32
}

/// Walks every venue field independently. There is no band; values only stop
/// at the positive price floor.
pub fn next_market(rng: &mut StdRng, config: &MarketConfig, previous: &MarketSnapshot) -> MarketSnapshot {
    let equities = &previous.equities;
    let crypto = &previous.crypto;

    MarketSnapshot {
        equities: EquitiesVenue {
            all_share_index: walk(rng, equities.all_share_index, config.index_step),
            market_cap: walk(rng, equities.market_cap, config.equities_market_cap_step),
            volume: walk(rng, equities.volume, config.equities_volume_step),
            gainers: walk_count(rng, equities.gainers, config.breadth_step),
            losers: walk_count(rng, equities.losers, config.breadth_step),
        },
        crypto: CryptoVenue {
            btc_price: walk(rng, crypto.btc_price, config.btc_step),
            eth_price: walk(rng, crypto.eth_price, config.eth_step),
            volume: walk(rng, crypto.volume, config.crypto_volume_step),
            market_cap: walk(rng, crypto.market_cap, config.crypto_market_cap_step),
        },
    }
}

#[derive(Debug, Clone)]
pub struct MarketSim {
    rng: StdRng,
    config: MarketConfig,
    current: MarketSnapshot,
}

impl MarketSim {
    pub fn new(config: MarketConfig, rng: StdRng) -> Self {
        Self {
            rng,
            config,
            current: MarketSnapshot::default(),
        }
    }
}

impl Simulator for MarketSim {
    type Snapshot = MarketSnapshot;

    fn snapshot(&self) -> &MarketSnapshot {
        &self.current
    }

    fn tick(&mut self, _now: OffsetDateTime) -> MarketSnapshot {
        self.current = next_market(&mut self.rng, &self.config, &self.current);
        self.current
    }
}
