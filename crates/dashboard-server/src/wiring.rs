use std::sync::Arc;

use api::AppState;
use axum::{routing::get, Router};
use core_sim::{ProfitBias, SimConfig, SimulatorSet};
use runtime::{DashboardStore, FeedMetrics, FeedSupervisor, FilePreferences, SessionFlags, ThemeStore};
use time::OffsetDateTime;
use tracing::info;

use crate::config::Config;

/// Builds the simulators, starts every feed and returns the router with the
/// supervisor that keeps those feeds alive.
pub fn build_app(config: &Config) -> (Router, FeedSupervisor) {
    let bias = if config.profit_bias {
        ProfitBias::always_profitable()
    } else {
        ProfitBias::Unbiased
    };
    let sims = SimulatorSet::new(
        &SimConfig::default().with_profit_bias(bias),
        config.seed,
        OffsetDateTime::now_utc(),
    );
    let (store, writers) = DashboardStore::new(&sims);

    let metrics = FeedMetrics::new();
    let supervisor = FeedSupervisor::start_all(sims, writers, metrics.clone());

    let theme = ThemeStore::open(FilePreferences::new(&config.preferences_path));
    info!(
        theme = theme.get_theme().theme.as_str(),
        preferences = %config.preferences_path.display(),
        "theme loaded"
    );

    let state = AppState::new(
        store,
        Arc::new(theme),
        Arc::new(SessionFlags::new()),
        metrics,
    );
    let app = api::app(state).route("/health", get(healthcheck));
    (app, supervisor)
}

async fn healthcheck() -> &'static str {
    "ok"
}
