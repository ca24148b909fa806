use std::sync::Arc;

use tokio::sync::watch;

use crate::logic;
use crate::models::{Alarm, AlarmId, DEFAULT_LABEL, NewAlarm, Weekday};
use crate::storage::{KeyValueStorage, StorageError};

// Storage key the whole collection lives under
pub const STORAGE_KEY: &str = "deeprest_alarms";

/// Owns the canonical alarm collection.
///
/// Invariants: ids are unique, and the collection is sorted by `time` after every
/// insertion. Every mutation writes the full collection back to storage and publishes
/// it to subscribers.
pub struct AlarmStore {
    alarms: Vec<Alarm>,
    storage: Arc<dyn KeyValueStorage>,
    changes: watch::Sender<Vec<Alarm>>,
}

impl AlarmStore {
    /// Load the collection stored under [`STORAGE_KEY`].
    ///
    /// A missing or unparseable value falls back to the single seed alarm.
    /// Stored records are returned as they are, without re-validating fields.
    pub fn initialize(storage: Arc<dyn KeyValueStorage>) -> Self {
        let alarms = match load_alarms(storage.as_ref()) {
            Ok(Some(alarms)) => {
                log::info!("Loaded {} alarm(s) from storage", alarms.len());
                alarms
            }
            Ok(None) => {
                log::info!("No stored alarms, starting with the seed alarm");
                vec![Alarm::seed()]
            }
            Err(e) => {
                log::warn!("Stored alarms unreadable ({e}), starting with the seed alarm");
                vec![Alarm::seed()]
            }
        };
        let (changes, _) = watch::channel(alarms.clone());

        Self {
            alarms,
            storage,
            changes,
        }
    }

    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn get(&self, id: &AlarmId) -> Option<&Alarm> {
        self.alarms.iter().find(|a| &a.id == id)
    }

    /// Receiver that sees the whole collection after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Alarm>> {
        self.changes.subscribe()
    }

    pub fn for_day(&self, day: Weekday) -> impl Iterator<Item = &Alarm> + Clone {
        logic::alarms_for_day(&self.alarms, day)
    }

    // Time format and snooze range are taken as given; validation belongs to the caller
    pub fn add(&mut self, input: NewAlarm) -> Alarm {
        let NewAlarm {
            time,
            label,
            repeat,
            sound,
            snooze_enabled,
            snooze_duration,
        } = input;

        let alarm = Alarm {
            id: self.fresh_id(),
            time,
            label: if label.is_empty() {
                DEFAULT_LABEL.to_string()
            } else {
                label
            },
            is_active: true,
            repeat,
            sound,
            snooze_enabled,
            snooze_duration,
        };

        self.alarms.push(alarm.clone());
        logic::sort_by_time(&mut self.alarms);
        log::info!("Created alarm {} at {}", alarm.id, alarm.time);

        self.commit();
        alarm
    }

    /// Flip `is_active` of the matching alarm. Unknown ids are a no-op.
    /// Returns whether an alarm matched.
    pub fn toggle(&mut self, id: &AlarmId) -> bool {
        let found = match self.alarms.iter_mut().find(|a| &a.id == id) {
            Some(alarm) => {
                alarm.is_active = !alarm.is_active;
                log::info!("Alarm {} is now {}", id, if alarm.is_active { "on" } else { "off" });
                true
            }
            None => {
                log::debug!("Toggle ignored, no alarm {id}");
                false
            }
        };
        self.commit();
        found
    }

    /// Remove the matching alarm. Unknown ids are a no-op.
    /// Returns whether an alarm was removed.
    pub fn delete(&mut self, id: &AlarmId) -> bool {
        let before = self.alarms.len();
        self.alarms.retain(|a| &a.id != id);
        let removed = self.alarms.len() != before;
        if removed {
            log::info!("Deleted alarm {id}");
        } else {
            log::debug!("Delete ignored, no alarm {id}");
        }
        self.commit();
        removed
    }

    // Full-collection write. Failures are logged and swallowed so a lost write
    // never takes the caller down.
    pub fn persist(&self) {
        let result = serde_json::to_string(&self.alarms)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.write(STORAGE_KEY, &json));

        if let Err(e) = result {
            log::warn!("Failed to persist alarms: {e}");
        }
    }

    fn commit(&self) {
        self.persist();
        self.changes.send_replace(self.alarms.clone());
    }

    // UUIDs practically never collide, the loop keeps the uniqueness
    // invariant even against odd ids loaded from storage
    fn fresh_id(&self) -> AlarmId {
        loop {
            let id = AlarmId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

fn load_alarms(storage: &dyn KeyValueStorage) -> Result<Option<Vec<Alarm>>, StorageError> {
    let Some(text) = storage.read(STORAGE_KEY)? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&text)?))
}
