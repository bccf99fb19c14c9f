use rand::{rngs::StdRng, Rng};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    config::OrderFlowConfig,
    exchange::latency_profile,
    generators::{chance, pick, uniform},
    venue::Venue,
    Simulator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Partial,
    Filled,
}

impl OrderStatus {
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction >= 1.0 {
            Self::Filled
        } else if fraction > 0.0 {
            Self::Partial
        } else {
            Self::Pending
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Filled => "filled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderType {
    Market,
    Limit,
    Stop,
}

impl OrderType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Market => "Market",
            Self::Limit => "Limit",
            Self::Stop => "Stop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedOrder {
    pub id: u64,
    pub symbol: &'static str,
    pub side: OrderSide,
    pub amount: f64,
    pub filled_amount: f64,
    pub status: OrderStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub entry_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub fill_time: Option<OffsetDateTime>,
    pub latency_ms: u64,
    pub order_type: OrderType,
    pub exchange: Venue,
    #[serde(skip)]
    pub entry_tick: u64,
}

impl SimulatedOrder {
    pub fn fraction(&self) -> f64 {
        if self.amount <= 0.0 {
            return 1.0;
        }
        (self.filled_amount / self.amount).clamp(0.0, 1.0)
    }

    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }

    pub fn age_ticks(&self, tick: u64) -> u64 {
        tick.saturating_sub(self.entry_tick)
    }

    /// Adds `increment` to the filled amount and re-derives the status.
    pub fn apply_fill(&mut self, increment: f64, now: OffsetDateTime) {
        if self.is_filled() || increment <= 0.0 {
            return;
        }

        self.filled_amount = (self.filled_amount + increment).min(self.amount);
        self.status = OrderStatus::from_fraction(self.fraction());
        if self.is_filled() {
            self.fill_time = Some(now);
        }
    }
}

const ORDER_SYMBOLS: [(&str, Venue); 10] = [
    ("MTN", Venue::Nse),
    ("DANGCEM", Venue::Nse),
    ("ZENITH", Venue::Nse),
    ("GTCO", Venue::Nse),
    ("ACCESS", Venue::Nse),
    ("BTC", Venue::Quidax),
    ("ETH", Venue::Quidax),
    ("BNB", Venue::Quidax),
    ("SOL", Venue::Quidax),
    ("ADA", Venue::Quidax),
];

const ORDER_TYPES: [OrderType; 3] = [OrderType::Market, OrderType::Limit, OrderType::Stop];

const MIN_ORDER_AMOUNT: f64 = 10_000.0;
const MAX_ORDER_AMOUNT: f64 = 500_000.0;
const MAX_PREFILL_FRACTION: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderFlow {
    pub tick: u64,
    pub orders: Vec<SimulatedOrder>,
}

impl OrderFlow {
    pub fn count(&self, status: OrderStatus) -> usize {
        self.orders.iter().filter(|order| order.status == status).count()
    }
}

#[derive(Debug, Clone)]
pub struct OrderFlowSim {
    rng: StdRng,
    config: OrderFlowConfig,
    next_id: u64,
    current: OrderFlow,
}

impl OrderFlowSim {
    pub fn new(config: OrderFlowConfig, mut rng: StdRng, now: OffsetDateTime) -> Self {
        let population = config
            .initial_population
            .clamp(config.min_population, config.max_population);
        let mut next_id = 0;
        let orders = (0..population)
            .map(|_| {
                next_id += 1;
                synthesize_order(&mut rng, next_id, 0, now)
            })
            .collect();

        Self {
            rng,
            config,
            next_id,
            current: OrderFlow { tick: 0, orders },
        }
    }

    fn new_order(&mut self, tick: u64, now: OffsetDateTime) -> SimulatedOrder {
        self.next_id += 1;
        synthesize_order(&mut self.rng, self.next_id, tick, now)
    }

    fn advance(&mut self, order: &SimulatedOrder, now: OffsetDateTime) -> SimulatedOrder {
        let mut next = order.clone();
        if next.is_filled() {
            return next;
        }

        next.latency_ms = latency_profile(next.exchange).sample(&mut self.rng);
        let starts = next.status != OrderStatus::Pending
            || chance(&mut self.rng, self.config.fill_start_probability);
        if starts {
            let step = uniform(
                &mut self.rng,
                self.config.min_fill_step,
                self.config.max_fill_step,
            );
            next.apply_fill(next.amount * step, now);
        }
        next
    }

    fn evict(&mut self, orders: &mut Vec<SimulatedOrder>, tick: u64) {
        let stale_after = self.config.stale_after_ticks;
        let eviction_probability = self.config.filled_eviction_probability;
        let rng = &mut self.rng;
        orders.retain(|order| {
            if order.age_ticks(tick) > stale_after {
                return false;
            }
            !(order.is_filled() && chance(rng, eviction_probability))
        });
    }

    fn inject(&mut self, orders: &mut Vec<SimulatedOrder>, tick: u64, now: OffsetDateTime) {
        let headroom = self.config.max_population.saturating_sub(orders.len());
        if headroom > 0 && chance(&mut self.rng, self.config.injection_probability) {
            let count = self
                .rng
                .gen_range(1..=self.config.max_injections_per_tick.max(1))
                .min(headroom);
            for _ in 0..count {
                let order = self.new_order(tick, now);
                orders.push(order);
            }
        }

        while orders.len() < self.config.min_population {
            let order = self.new_order(tick, now);
            orders.push(order);
        }
    }
}

/// Trims `orders` to `max` entries, dropping the oldest filled orders first
/// and then the oldest of the rest.
pub fn enforce_max_population(orders: &mut Vec<SimulatedOrder>, max: usize) {
    while orders.len() > max {
        let victim = orders
            .iter()
            .position(SimulatedOrder::is_filled)
            .unwrap_or(0);
        orders.remove(victim);
    }
}

fn synthesize_order(rng: &mut StdRng, id: u64, tick: u64, now: OffsetDateTime) -> SimulatedOrder {
    let (symbol, exchange) = *pick(rng, &ORDER_SYMBOLS);
    let amount = uniform(rng, MIN_ORDER_AMOUNT, MAX_ORDER_AMOUNT).round();
    let filled_amount = if chance(rng, 0.5) {
        (amount * uniform(rng, 0.0, MAX_PREFILL_FRACTION)).floor()
    } else {
        0.0
    };
    let side = if chance(rng, 0.5) {
        OrderSide::Buy
    } else {
        OrderSide::Sell
    };

    let mut order = SimulatedOrder {
        id,
        symbol,
        side,
        amount,
        filled_amount,
        status: OrderStatus::Pending,
        entry_time: now,
        fill_time: None,
        latency_ms: latency_profile(exchange).sample(rng),
        order_type: *pick(rng, &ORDER_TYPES),
        exchange,
        entry_tick: tick,
    };
    order.status = OrderStatus::from_fraction(order.fraction());
    order
}

impl Simulator for OrderFlowSim {
    type Snapshot = OrderFlow;

    fn snapshot(&self) -> &OrderFlow {
        &self.current
    }

    fn tick(&mut self, now: OffsetDateTime) -> OrderFlow {
        let tick = self.current.tick + 1;
        let previous = std::mem::take(&mut self.current.orders);

        let mut orders: Vec<SimulatedOrder> = previous
            .iter()
            .map(|order| self.advance(order, now))
            .collect();
        self.evict(&mut orders, tick);
        self.inject(&mut orders, tick, now);
        enforce_max_population(&mut orders, self.config.max_population);

        self.current = OrderFlow { tick, orders };
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::generators::seeded_rng;

    fn now() -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH
    }

    fn order(amount: f64, filled_amount: f64) -> SimulatedOrder {
        SimulatedOrder {
            id: 1,
            symbol: "MTN",
            side: OrderSide::Buy,
            amount,
            filled_amount,
            status: OrderStatus::from_fraction(filled_amount / amount),
            entry_time: now(),
            fill_time: None,
            latency_ms: 10,
            order_type: OrderType::Market,
            exchange: Venue::Nse,
            entry_tick: 0,
        }
    }

    #[test]
    fn status_follows_fraction_thresholds() {
        assert_eq!(OrderStatus::from_fraction(0.0), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_fraction(0.4), OrderStatus::Partial);
        assert_eq!(OrderStatus::from_fraction(1.0), OrderStatus::Filled);
    }

    #[test]
    fn order_fills_only_once_amount_is_reached() {
        let mut order = order(100_000.0, 0.0);

        for _ in 0..4 {
            order.apply_fill(20_000.0, now());
            assert!(order.filled_amount < 100_000.0);
            assert_ne!(order.status, OrderStatus::Filled);
            assert!(order.fill_time.is_none());
        }

        order.apply_fill(30_000.0, now());

        assert_eq!(order.filled_amount, 100_000.0);
        assert_eq!(order.status, OrderStatus::Filled);
        assert_eq!(order.fill_time, Some(now()));
    }

    #[test]
    fn filled_orders_ignore_further_fills() {
        let mut order = order(1_000.0, 1_000.0);

        order.apply_fill(500.0, now());

        assert_eq!(order.filled_amount, 1_000.0);
    }

    #[test]
    fn fraction_and_status_stay_consistent_across_ticks() {
        let mut sim = OrderFlowSim::new(OrderFlowConfig::default(), seeded_rng(17), now());

        for _ in 0..2_000 {
            let flow = sim.tick(now());
            for order in &flow.orders {
                let fraction = order.fraction();
                assert!((0.0..=1.0).contains(&fraction));
                assert_eq!(order.is_filled(), fraction >= 1.0);
                assert!(order.amount > 0.0);
            }
        }
    }

    #[test]
    fn filled_amount_never_decreases() {
        let mut sim = OrderFlowSim::new(OrderFlowConfig::default(), seeded_rng(23), now());
        let mut previous = sim.snapshot().clone();

        for _ in 0..500 {
            let next = sim.tick(now());
            for order in &next.orders {
                if let Some(before) = previous.orders.iter().find(|o| o.id == order.id) {
                    assert!(order.filled_amount >= before.filled_amount);
                }
            }
            previous = next;
        }
    }

    #[test]
    fn population_stays_within_band() {
        let config = OrderFlowConfig::default();
        let mut sim = OrderFlowSim::new(config, seeded_rng(31), now());

        for _ in 0..3_000 {
            let flow = sim.tick(now());
            assert!(
                (config.min_population..=config.max_population).contains(&flow.orders.len()),
                "population {} out of band",
                flow.orders.len()
            );
        }
    }

    #[test]
    fn population_is_topped_up_when_everything_is_evicted() {
        let config = OrderFlowConfig {
            filled_eviction_probability: 1.0,
            min_fill_step: 1.0,
            max_fill_step: 1.0,
            fill_start_probability: 1.0,
            injection_probability: 0.0,
            ..OrderFlowConfig::default()
        };
        let mut sim = OrderFlowSim::new(config, seeded_rng(2), now());

        sim.tick(now());
        let flow = sim.tick(now());

        assert_eq!(flow.orders.len(), config.min_population);
    }

    #[test]
    fn stale_orders_are_evicted() {
        let config = OrderFlowConfig {
            stale_after_ticks: 3,
            fill_start_probability: 0.0,
            ..OrderFlowConfig::default()
        };
        let mut sim = OrderFlowSim::new(config, seeded_rng(9), now());

        let mut flow = sim.tick(now());
        for _ in 0..9 {
            flow = sim.tick(now());
        }

        assert!(flow.orders.iter().all(|order| order.age_ticks(flow.tick) <= 3));
    }

    #[test]
    fn max_population_drops_filled_orders_first() {
        let mut orders = vec![order(10.0, 0.0), order(10.0, 10.0), order(10.0, 5.0)];
        orders[0].id = 1;
        orders[1].id = 2;
        orders[2].id = 3;

        enforce_max_population(&mut orders, 2);

        let ids: Vec<u64> = orders.iter().map(|order| order.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn initial_orders_are_pending_or_partial() {
        let sim = OrderFlowSim::new(OrderFlowConfig::default(), seeded_rng(1), now());

        assert_eq!(sim.snapshot().orders.len(), 40);
        assert_eq!(sim.snapshot().count(OrderStatus::Filled), 0);
    }
}
