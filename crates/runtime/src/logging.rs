use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Installs the global fmt subscriber. `RUST_LOG` overrides `default_level`.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing(default_level: LevelFilter) -> bool {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
