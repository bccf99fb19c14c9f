use rand::rngs::StdRng;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    config::PRICE_FLOOR,
    generators::{floored_walk, random_walk},
    Simulator,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerEntry {
    pub symbol: &'static str,
    pub price: f64,
    /// Percent change on the day.
    pub change: f64,
    pub volume: f64,
}

const TICKER_SEEDS: [(&str, f64, f64, f64); 10] = [
    ("MTN", 165.50, 2.45, 1_200_000.0),
    ("DANGOTE", 195.00, -1.23, 850_000.0),
    ("ZENITH", 28.75, 3.67, 2_100_000.0),
    ("GTCO", 42.30, 1.89, 1_800_000.0),
    ("ACCESS", 18.90, -0.52, 3_200_000.0),
    ("UBA", 15.45, 2.78, 2_700_000.0),
    ("FBNH", 22.80, -1.45, 1_500_000.0),
    ("WAPCO", 35.60, 0.89, 950_000.0),
    ("BUACEMENT", 125.00, 4.23, 680_000.0),
    ("SEPLAT", 1_850.00, -2.15, 120_000.0),
];

pub fn seed_ticker() -> Vec<TickerEntry> {
    TICKER_SEEDS
        .iter()
        .map(|&(symbol, price, change, volume)| TickerEntry {
            symbol,
            price,
            change,
            volume,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct TickerSim {
    rng: StdRng,
    price_step: f64,
    change_step: f64,
    current: Vec<TickerEntry>,
}

impl TickerSim {
    pub fn new(price_step: f64, change_step: f64, rng: StdRng) -> Self {
        Self {
            rng,
            price_step,
            change_step,
            current: seed_ticker(),
        }
    }
}

impl Simulator for TickerSim {
    type Snapshot = Vec<TickerEntry>;

    fn snapshot(&self) -> &Vec<TickerEntry> {
        &self.current
    }

    fn tick(&mut self, _now: OffsetDateTime) -> Vec<TickerEntry> {
        let rng = &mut self.rng;
        let (price_step, change_step) = (self.price_step, self.change_step);
        self.current = self
            .current
            .iter()
            .map(|entry| TickerEntry {
                price: floored_walk(rng, entry.price, price_step, PRICE_FLOOR),
                change: random_walk(rng, entry.change, change_step),
                ..entry.clone()
            })
            .collect();
        self.current.clone()
    }
}
