// --------------------------------------------------
// Handles API endpoints for everything around the alarm list:
// advice text, clock face, theme and view selection.
// None of this is persisted.
// --------------------------------------------------

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::advice::{AdviceRequest, AdviceSnapshot};
use crate::clock::ClockReading;
use crate::state::{AppState, UiState, View};

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub accepted: bool,
    #[serde(flatten)]
    pub snapshot: AdviceSnapshot,
}

// -----------------------------
// GET /api/advice
// -----------------------------
pub async fn get_advice(State(state): State<AppState>) -> Json<AdviceSnapshot> {
    Json(state.advice.snapshot().await)
}

// -----------------------------
// POST /api/advice/refresh
// Starts a refresh for the time shown on the clock.
// Ignored (accepted = false) while another one is running.
// -----------------------------
pub async fn refresh_advice(State(state): State<AppState>) -> impl IntoResponse {
    let reading = (state.clock)();
    let request = AdviceRequest {
        time_label: reading.time_label(),
        is_morning: reading.is_morning,
    };

    let accepted = state.advice.spawn_refresh(request);
    let snapshot = state.advice.snapshot().await;

    let status = if accepted {
        StatusCode::ACCEPTED
    } else {
        StatusCode::OK
    };
    (status, Json(RefreshResponse { accepted, snapshot }))
}

// -----------------------------
// GET /api/clock
// Latest reading of the once-a-second clock
// -----------------------------
pub async fn get_clock(State(state): State<AppState>) -> Json<ClockReading> {
    Json((state.clock)())
}

// -----------------------------
// GET /api/ui
// Theme flag and selected view
// -----------------------------
pub async fn get_ui(State(state): State<AppState>) -> Json<UiState> {
    Json(*state.ui.read().await)
}

// -----------------------------
// POST /api/theme/toggle
// Switches between light and dark mode
// -----------------------------
pub async fn toggle_theme(State(state): State<AppState>) -> Json<UiState> {
    let mut ui = state.ui.write().await;
    ui.dark_mode = !ui.dark_mode;
    Json(*ui)
}

// -----------------------------
// PUT /api/view
// Selects the home list or the weekly schedule
// -----------------------------
pub async fn put_view(State(state): State<AppState>, Json(view): Json<View>) -> Json<UiState> {
    let mut ui = state.ui.write().await;
    ui.view = view;
    Json(*ui)
}
