use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::PRICE_FLOOR;

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Uniform sample in `[-0.5, 0.5)`.
pub fn centered_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>() - 0.5
}

pub fn random_walk<R: Rng + ?Sized>(rng: &mut R, value: f64, scale: f64) -> f64 {
    value + centered_unit(rng) * scale
}

pub fn floored_walk<R: Rng + ?Sized>(rng: &mut R, value: f64, scale: f64, floor: f64) -> f64 {
    random_walk(rng, value, scale).max(floor)
}

/// One step of a price walk whose step size is proportional to the price.
pub fn perturb_price<R: Rng + ?Sized>(rng: &mut R, price: f64, volatility: f64) -> f64 {
    floored_walk(rng, price, volatility * price, PRICE_FLOOR)
}

pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

pub fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    rng.gen_bool(probability.clamp(0.0, 1.0))
}

pub fn pick<'a, R: Rng + ?Sized, T>(rng: &mut R, items: &'a [T]) -> &'a T {
    assert!(!items.is_empty(), "cannot pick from an empty table");
    &items[rng.gen_range(0..items.len())]
}

/// Latency sampled uniformly from `base ± jitter`, saturating at the u64 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyGenerator {
    base_ms: u64,
    jitter_ms: u64,
}

impl LatencyGenerator {
    pub const fn new(base_ms: u64, jitter_ms: u64) -> Self {
        Self { base_ms, jitter_ms }
    }

    /// Generator covering `min..=max`.
    pub const fn between(min_ms: u64, max_ms: u64) -> Self {
        let half = (max_ms - min_ms) / 2;
        Self::new(min_ms + half, half)
    }

    pub fn bounds(&self) -> (u64, u64) {
        (
            self.base_ms.saturating_sub(self.jitter_ms),
            self.base_ms.saturating_add(self.jitter_ms),
        )
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        if self.jitter_ms == 0 {
            return self.base_ms;
        }

        let (min, max) = self.bounds();
        rng.gen_range(min..=max)
    }
}
