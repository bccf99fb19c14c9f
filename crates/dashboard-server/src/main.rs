mod config;
mod wiring;

use std::error::Error;

use runtime::logging::init_tracing;
use tokio::net::TcpListener;
use tracing::{info, level_filters::LevelFilter, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing(LevelFilter::INFO);

    let config = config::Config::from_env()?;
    info!(
        addr = %config.listen_addr,
        seed = ?config.seed,
        profit_bias = config.profit_bias,
        "starting dashboard server"
    );

    let (app, mut supervisor) = wiring::build_app(&config);
    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    supervisor.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
