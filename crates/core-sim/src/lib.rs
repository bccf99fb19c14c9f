pub mod charts;
pub mod config;
pub mod exchange;
pub mod generators;
pub mod holdings;
pub mod market;
pub mod orders;
pub mod portfolio;
pub mod positions;
mod state;
pub mod ticker;
pub mod venue;

use time::OffsetDateTime;

pub use config::{ProfitBias, SimConfig, ValueBand};
pub use state::SimulatorSet;
pub use venue::Venue;

/// A feed's generator: owns its current snapshot and replaces it on `tick`.
pub trait Simulator {
    type Snapshot: Clone;

    fn snapshot(&self) -> &Self::Snapshot;

    /// Produces the next snapshot. Total: never fails.
    fn tick(&mut self, now: OffsetDateTime) -> Self::Snapshot;
}
