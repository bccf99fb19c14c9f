use rand::{rngs::StdRng, Rng};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    generators::{chance, LatencyGenerator},
    venue::Venue,
    Simulator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueHealth {
    Active,
    Warning,
}

impl VenueHealth {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VenueProfile {
    pub latency: LatencyGenerator,
    pub warning_probability: f64,
    pub min_volume_step: u64,
    pub max_volume_step: u64,
}

pub fn venue_profile(venue: Venue) -> VenueProfile {
    match venue {
        Venue::Nse => VenueProfile {
            latency: LatencyGenerator::between(3, 23),
            warning_probability: 0.02,
            min_volume_step: 5_000_000,
            max_volume_step: 30_000_000,
        },
        Venue::Quidax => VenueProfile {
            latency: LatencyGenerator::between(8, 38),
            warning_probability: 0.04,
            min_volume_step: 3_000_000,
            max_volume_step: 18_000_000,
        },
    }
}

pub fn latency_profile(venue: Venue) -> LatencyGenerator {
    venue_profile(venue).latency
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExchangeStatus {
    pub venue: Venue,
    pub status: VenueHealth,
    pub latency_ms: u64,
    /// Cumulative volume since the feed started; only ever grows.
    pub volume: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub last_update: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExchangeBoard {
    pub equities: ExchangeStatus,
    pub crypto: ExchangeStatus,
}

impl ExchangeBoard {
    pub fn initial(now: OffsetDateTime) -> Self {
        let status = |venue, latency_ms| ExchangeStatus {
            venue,
            status: VenueHealth::Active,
            latency_ms,
            volume: 0,
            last_update: now,
        };

        Self {
            equities: status(Venue::Nse, 12),
            crypto: status(Venue::Quidax, 23),
        }
    }

    pub fn get(&self, venue: Venue) -> &ExchangeStatus {
        match venue {
            Venue::Nse => &self.equities,
            Venue::Quidax => &self.crypto,
        }
    }
}

fn next_status(rng: &mut StdRng, previous: &ExchangeStatus, now: OffsetDateTime) -> ExchangeStatus {
    let profile = venue_profile(previous.venue);
    let status = if chance(rng, profile.warning_probability) {
        VenueHealth::Warning
    } else {
        VenueHealth::Active
    };
    let volume_step = rng.gen_range(profile.min_volume_step..profile.max_volume_step);

    ExchangeStatus {
        venue: previous.venue,
        status,
        latency_ms: profile.latency.sample(rng),
        volume: previous.volume.saturating_add(volume_step),
        last_update: now,
    }
}

#[derive(Debug, Clone)]
pub struct ExchangeStatusSim {
    rng: StdRng,
    current: ExchangeBoard,
}

impl ExchangeStatusSim {
    pub fn new(rng: StdRng, now: OffsetDateTime) -> Self {
        Self {
            rng,
            current: ExchangeBoard::initial(now),
        }
    }
}

impl Simulator for ExchangeStatusSim {
    type Snapshot = ExchangeBoard;

    fn snapshot(&self) -> &ExchangeBoard {
        &self.current
    }

    fn tick(&mut self, now: OffsetDateTime) -> ExchangeBoard {
        self.current = ExchangeBoard {
            equities: next_status(&mut self.rng, &self.current.equities, now),
            crypto: next_status(&mut self.rng, &self.current.crypto, now),
        };
        self.current
    }
}
