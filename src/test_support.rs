use std::sync::Arc;

use chrono::NaiveDate;

use crate::advice::{AdviceProvider, AdviceService, PhraseAdviceProvider};
use crate::clock::ClockReading;
use crate::state::AppState;
use crate::storage::MemoryStorage;
use crate::store::AlarmStore;

// App state over in-memory storage holding only the seed alarm,
// with the clock frozen at Monday 2026-10-19 07:15
pub fn test_state() -> (AppState, MemoryStorage) {
    test_state_with_advice(Arc::new(PhraseAdviceProvider))
}

pub fn test_state_with_advice(provider: Arc<dyn AdviceProvider>) -> (AppState, MemoryStorage) {
    let storage = MemoryStorage::new();
    let store = AlarmStore::initialize(Arc::new(storage.clone()));
    let advice = AdviceService::new(provider);
    let clock = Arc::new(|| {
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .and_then(|d| d.and_hms_opt(7, 15, 0))
            .unwrap_or_default();
        ClockReading::at(now)
    });
    (AppState::new(store, advice, clock), storage)
}
