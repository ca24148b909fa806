// --------------------------------------------------
// Handles API endpoints for the alarm collection.
//
// Responsibilities:
// - List / create / toggle / delete alarms
// - Day-filtered and weekly schedule views
// - Sound catalog for the add-alarm form
// --------------------------------------------------

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::logic;
use crate::models::{Alarm, AlarmId, NewAlarm, SOUNDS, Weekday};
use crate::state::AppState;

// -----------------------------
// GET /api/alarms
// Returns all alarms, ascending by time
// -----------------------------
pub async fn get_alarms(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock().await;
    Json(store.alarms().to_vec())
}

// -----------------------------
// POST /api/alarms
// Creates a new alarm and saves it
// -----------------------------
pub async fn create_alarm(
    State(state): State<AppState>,
    Json(input): Json<NewAlarm>,
) -> impl IntoResponse {
    if logic::parse_hhmm(&input.time).is_none() {
        return (StatusCode::BAD_REQUEST, "time must be HH:MM").into_response();
    }
    if input.snooze_enabled && !logic::is_valid_snooze(input.snooze_duration) {
        return (StatusCode::BAD_REQUEST, "snoozeDuration must be 1..=15").into_response();
    }

    let alarm = state.store.lock().await.add(input);

    (StatusCode::CREATED, Json(alarm)).into_response()
}

// -----------------------------
// POST /api/alarms/:id/toggle
// Flips isActive; unknown ids leave the collection as is
// -----------------------------
pub async fn toggle_alarm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Vec<Alarm>> {
    let mut store = state.store.lock().await;
    store.toggle(&AlarmId(id));
    Json(store.alarms().to_vec())
}

// -----------------------------
// DELETE /api/alarms/:id
// Removes an alarm permanently; unknown ids are ignored
// -----------------------------
pub async fn delete_alarm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Vec<Alarm>> {
    let mut store = state.store.lock().await;
    store.delete(&AlarmId(id));
    Json(store.alarms().to_vec())
}

// -----------------------------
// GET /api/days/:day/alarms
// Alarms repeating on one weekday ("Mon".."Sun")
// -----------------------------
pub async fn get_alarms_for_day(
    State(state): State<AppState>,
    Path(day): Path<String>,
) -> impl IntoResponse {
    let day: Weekday = match day.parse() {
        Ok(d) => d,
        Err(_) => return (StatusCode::BAD_REQUEST, "invalid day").into_response(),
    };

    let store = state.store.lock().await;
    let alarms: Vec<Alarm> = store.for_day(day).cloned().collect();
    Json(alarms).into_response()
}

// -----------------------------
// GET /api/schedule
// Every weekday with its alarms
// -----------------------------
pub async fn get_schedule(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock().await;
    Json(logic::weekly_schedule(store.alarms()))
}

// -----------------------------
// GET /api/sounds
// -----------------------------
pub async fn get_sounds() -> Json<Vec<&'static str>> {
    Json(SOUNDS.to_vec())
}
