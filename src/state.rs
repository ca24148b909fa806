use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::advice::AdviceService;
use crate::clock::ClockReading;
use crate::store::AlarmStore;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Home,
    Schedule,
}

// Transient UI state, lost on restart
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub dark_mode: bool,
    pub view: View,
}

pub type ClockSource = Arc<dyn Fn() -> ClockReading + Send + Sync>;

// Shared by every handler. The store sits behind one mutex so each
// mutation and its persistence write happen as a unit.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<AlarmStore>>,
    pub advice: AdviceService,
    pub ui: Arc<RwLock<UiState>>,
    pub clock: ClockSource,
}

impl AppState {
    pub fn new(store: AlarmStore, advice: AdviceService, clock: ClockSource) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            advice,
            ui: Arc::new(RwLock::new(UiState::default())),
            clock,
        }
    }
}
