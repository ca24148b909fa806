// Define data modules
mod models;  // Data structures (Alarm, Weekday, NewAlarm)
mod storage; // Durable key/value backends (file, memory)
mod store;   // Alarm store: canonical collection + persistence
mod logic;   // Derived views and time helpers
mod advice;  // Advice text provider and refresh guard
mod clock;   // Once-a-second clock ticker
mod settings; // Layered configuration
mod state;   // Shared application state
mod routes_alarms; // HTTP handlers for alarm APIs
mod routes_ui;     // HTTP handlers for advice, clock, theme, view
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Context;
// Import axum routing utilities and Router
use axum::{
    routing::{delete, get, post, put}, // HTTP method helpers
    Router, // Main router type
};

use crate::advice::{AdviceService, PhraseAdviceProvider};
use crate::clock::ClockTicker;
use crate::settings::Settings;
use crate::state::AppState;
use crate::storage::FileStorage;
use crate::store::AlarmStore;

fn router(state: AppState) -> Router {
    let api = Router::new()
        // alarms
        .route("/alarms", get(routes_alarms::get_alarms).post(routes_alarms::create_alarm))
        .route("/alarms/:id", delete(routes_alarms::delete_alarm))
        .route("/alarms/:id/toggle", post(routes_alarms::toggle_alarm))
        .route("/days/:day/alarms", get(routes_alarms::get_alarms_for_day))
        .route("/schedule", get(routes_alarms::get_schedule))
        .route("/sounds", get(routes_alarms::get_sounds))
        // advice & clock
        .route("/advice", get(routes_ui::get_advice))
        .route("/advice/refresh", post(routes_ui::refresh_advice))
        .route("/clock", get(routes_ui::get_clock))
        // transient ui state
        .route("/ui", get(routes_ui::get_ui))
        .route("/theme/toggle", post(routes_ui::toggle_theme))
        .route("/view", put(routes_ui::put_view))
        .with_state(state);

    Router::new().nest("/api", api)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for ctrl-c: {e}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        pretty_env_logger::formatted_builder()
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        pretty_env_logger::init();
    }

    let settings = Settings::load().context("failed to load settings")?;
    log::info!("Using data directory {}", settings.data_dir.display());

    let store = AlarmStore::initialize(Arc::new(FileStorage::new(settings.data_dir.clone())));
    let advice = AdviceService::new(Arc::new(PhraseAdviceProvider));

    let ticker = ClockTicker::start();
    let readings = ticker.subscribe();
    let clock = Arc::new(move || readings.borrow().clone());

    let mut changes = store.subscribe();
    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            log::debug!("Alarm collection now holds {} alarm(s)", changes.borrow_and_update().len());
        }
    });

    let app = router(AppState::new(store, advice, clock));

    // Print the link to the server
    println!("  Server running at http://{}", settings.bind_addr);
    println!("  API base:     http://{}/api", settings.bind_addr);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    ticker.stop().await;
    log::info!("Shut down");
    Ok(())
}
