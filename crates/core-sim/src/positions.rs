use rand::rngs::StdRng;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    generators::{chance, perturb_price},
    orders::OrderType,
    venue::Venue,
    Simulator,
};

pub const PRICE_HISTORY_LEN: usize = 5;
const NEW_BADGE_PROBABILITY: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedPosition {
    pub id: u32,
    pub symbol: &'static str,
    pub name: &'static str,
    pub shares: f64,
    pub exchange: Venue,
    pub order_type: OrderType,
    pub sector: &'static str,
    pub price: f64,
    pub value: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: f64,
    pub volatility: f64,
    pub price_history: Vec<f64>,
    pub is_new: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub last_update: OffsetDateTime,
}

struct PositionSeed {
    symbol: &'static str,
    name: &'static str,
    shares: f64,
    exchange: Venue,
    order_type: OrderType,
    sector: &'static str,
    price: f64,
    change: f64,
    change_percent: f64,
    volume: f64,
    volatility: f64,
}

const POSITION_SEEDS: [PositionSeed; 6] = [
    PositionSeed {
        symbol: "MTN",
        name: "MTN Nigeria",
        shares: 1_500.0,
        exchange: Venue::Nse,
        order_type: OrderType::Market,
        sector: "Telecommunications",
        price: 245.50,
        change: 2.50,
        change_percent: 1.03,
        volume: 2_500_000.0,
        volatility: 0.18,
    },
    PositionSeed {
        symbol: "DANGCEM",
        name: "Dangote Cement",
        shares: 800.0,
        exchange: Venue::Nse,
        order_type: OrderType::Limit,
        sector: "Industrial Goods",
        price: 285.75,
        change: -1.25,
        change_percent: -0.44,
        volume: 1_800_000.0,
        volatility: 0.22,
    },
    PositionSeed {
        symbol: "ZENITH",
        name: "Zenith Bank",
        shares: 2_000.0,
        exchange: Venue::Nse,
        order_type: OrderType::Market,
        sector: "Financial Services",
        price: 32.80,
        change: 0.30,
        change_percent: 0.92,
        volume: 3_200_000.0,
        volatility: 0.25,
    },
    PositionSeed {
        symbol: "BTC",
        name: "Bitcoin",
        shares: 0.85,
        exchange: Venue::Quidax,
        order_type: OrderType::Limit,
        sector: "Cryptocurrency",
        price: 45_000_000.0,
        change: 1_250_000.0,
        change_percent: 2.86,
        volume: 8_500_000_000.0,
        volatility: 0.45,
    },
    PositionSeed {
        symbol: "ETH",
        name: "Ethereum",
        shares: 12.5,
        exchange: Venue::Quidax,
        order_type: OrderType::Market,
        sector: "Cryptocurrency",
        price: 2_800_000.0,
        change: -75_000.0,
        change_percent: -2.61,
        volume: 4_200_000_000.0,
        volatility: 0.38,
    },
    PositionSeed {
        symbol: "GUARANTY",
        name: "Guaranty Trust Bank",
        shares: 1_200.0,
        exchange: Venue::Nse,
        order_type: OrderType::Limit,
        sector: "Financial Services",
        price: 28.45,
        change: 0.55,
        change_percent: 1.97,
        volume: 1_500_000.0,
        volatility: 0.20,
    },
];

pub fn seed_positions(now: OffsetDateTime) -> Vec<SimulatedPosition> {
    POSITION_SEEDS
        .iter()
        .zip(1..)
        .map(|(seed, id)| SimulatedPosition {
            id,
            symbol: seed.symbol,
            name: seed.name,
            shares: seed.shares,
            exchange: seed.exchange,
            order_type: seed.order_type,
            sector: seed.sector,
            price: seed.price,
            value: seed.price * seed.shares,
            change: seed.change,
            change_percent: seed.change_percent,
            volume: seed.volume,
            volatility: seed.volatility,
            price_history: vec![seed.price],
            is_new: false,
            last_update: now,
        })
        .collect()
}

fn next_position(
    rng: &mut StdRng,
    position: &SimulatedPosition,
    step_scale: f64,
    now: OffsetDateTime,
) -> SimulatedPosition {
    let price = perturb_price(rng, position.price, position.volatility * step_scale);
    let change = price - position.price;

    let skip = position
        .price_history
        .len()
        .saturating_sub(PRICE_HISTORY_LEN - 1);
    let mut price_history = position.price_history[skip..].to_vec();
    price_history.push(price);

    SimulatedPosition {
        price,
        value: price * position.shares,
        change,
        change_percent: change / position.price * 100.0,
        price_history,
        is_new: chance(rng, NEW_BADGE_PROBABILITY),
        last_update: now,
        ..position.clone()
    }
}

#[derive(Debug, Clone)]
pub struct PositionsSim {
    rng: StdRng,
    step_scale: f64,
    current: Vec<SimulatedPosition>,
}

impl PositionsSim {
    pub fn new(step_scale: f64, rng: StdRng, now: OffsetDateTime) -> Self {
        Self {
            rng,
            step_scale,
            current: seed_positions(now),
        }
    }
}

impl Simulator for PositionsSim {
    type Snapshot = Vec<SimulatedPosition>;

    fn snapshot(&self) -> &Vec<SimulatedPosition> {
        &self.current
    }

    fn tick(&mut self, now: OffsetDateTime) -> Vec<SimulatedPosition> {
        let rng = &mut self.rng;
        let step_scale = self.step_scale;
        self.current = self
            .current
            .iter()
            .map(|position| next_position(rng, position, step_scale, now))
            .collect();
        self.current.clone()
    }
}
