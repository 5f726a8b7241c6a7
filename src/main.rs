//! multiswap-gateway server entry point.
//!
//! Loads configuration, restores or creates the ledger, and serves the
//! REST and WebSocket endpoints until Ctrl-C / SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use multiswap_gateway::app_state::AppState;
use multiswap_gateway::config::{ExchangeConfig, LogFormat};
use multiswap_gateway::domain::{Address, EventBus, Ledger};
use multiswap_gateway::persistence::{PostgresPersistence, recorder};
use multiswap_gateway::router::build_app;
use multiswap_gateway::service::ExchangeService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ExchangeConfig::from_env().context("invalid configuration")?;
    init_tracing(config.log_format);
    tracing::info!(addr = %config.listen_addr, "starting multiswap-gateway");

    // Persistence is optional; without it the ledger lives in memory only.
    let persistence = if config.persistence_enabled {
        let store = PostgresPersistence::connect(&config)
            .await
            .context("failed to open the database")?;
        Some(Arc::new(store))
    } else {
        None
    };

    let restored = match &persistence {
        Some(store) => recorder::load_ledger(store).await?,
        None => None,
    };
    let ledger = match restored {
        Some(ledger) => ledger,
        None => fresh_ledger(&config)?,
    };

    let event_bus = EventBus::new(config.event_bus_capacity);
    let app_state = AppState::new(ExchangeService::new(ledger, event_bus));

    let mut background = Vec::new();
    if let Some(store) = &persistence {
        if config.event_log_enabled {
            background.push(recorder::spawn_event_recorder(
                Arc::clone(store),
                app_state.event_bus.subscribe(),
            ));
        }
        background.push(recorder::spawn_snapshot_task(
            Arc::clone(store),
            Arc::clone(&app_state.exchange),
            Duration::from_secs(config.snapshot_interval_secs),
            config.cleanup_after_days,
        ));
    }

    let exchange = Arc::clone(&app_state.exchange);
    let app = build_app(app_state, Duration::from_secs(config.request_timeout_secs));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for task in background {
        task.abort();
    }
    if let Some(store) = &persistence {
        match recorder::write_snapshot(store.as_ref(), &exchange).await {
            Ok(()) => tracing::info!("final snapshot stored"),
            Err(e) => tracing::error!(error = %e, "final snapshot failed"),
        }
    }

    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn fresh_ledger(config: &ExchangeConfig) -> anyhow::Result<Ledger> {
    let custody = config.exchange_address.unwrap_or_else(Address::random);
    let mut ledger = Ledger::new(config.admin_address, custody)?;
    if !config.native_genesis_balance.is_zero() {
        ledger.credit_native(config.admin_address, config.native_genesis_balance)?;
    }
    tracing::info!(
        admin = %config.admin_address,
        custody = %custody,
        genesis = %config.native_genesis_balance,
        "created fresh ledger"
    );
    Ok(ledger)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
