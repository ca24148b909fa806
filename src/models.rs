use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Label stored when the user leaves the label field empty
pub const DEFAULT_LABEL: &str = "Alarm";

// Sound catalog offered by the add-alarm form, first entry is the default
pub const SOUNDS: [&str; 4] = ["Birds", "Waves", "Flute", "Piano"];

pub const DEFAULT_SNOOZE_MIN: i64 = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub const WORKDAYS: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWeekday(pub String);

impl fmt::Display for UnknownWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown weekday '{}'", self.0)
    }
}

impl std::error::Error for UnknownWeekday {}

impl FromStr for Weekday {
    type Err = UnknownWeekday;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownWeekday(s.to_string()))
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
            chrono::Weekday::Sun => Weekday::Sun,
        }
    }
}

/// Opaque alarm identifier.
///
/// Kept as a string so records written with older id schemes (the seed uses `"1"`)
/// load unchanged. Fresh ids are UUID v4.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct AlarmId(pub String);

impl AlarmId {
    pub fn generate() -> Self {
        AlarmId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlarmId {
    fn from(s: &str) -> Self {
        AlarmId(s.to_string())
    }
}

fn default_true() -> bool {
    true
}

fn default_sound() -> String {
    SOUNDS[0].to_string()
}

fn default_snooze() -> i64 {
    DEFAULT_SNOOZE_MIN
}

// Stored record, field names match the persisted JSON (camelCase).
// Everything but id and time has a default so older records still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub id: AlarmId,
    pub time: String, // "HH:MM", not validated by the store
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub repeat: Vec<Weekday>,
    #[serde(default = "default_sound")]
    pub sound: String,
    #[serde(default)]
    pub snooze_enabled: bool,
    #[serde(default = "default_snooze")]
    pub snooze_duration: i64, // 1..=15 minutes when snooze is enabled
}

impl Alarm {
    /// The single alarm a fresh install starts with.
    pub fn seed() -> Self {
        Alarm {
            id: AlarmId::from("1"),
            time: "07:00".to_string(),
            label: "Drink a glass of water".to_string(),
            is_active: true,
            repeat: Weekday::WORKDAYS.to_vec(),
            sound: SOUNDS[0].to_string(),
            snooze_enabled: true,
            snooze_duration: DEFAULT_SNOOZE_MIN,
        }
    }

    pub fn repeats_on(&self, day: Weekday) -> bool {
        self.repeat.contains(&day)
    }
}

// Input of the add operation, mirrors the add-alarm form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewAlarm {
    pub time: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub repeat: Vec<Weekday>,
    #[serde(default = "default_sound")]
    pub sound: String,
    #[serde(default)]
    pub snooze_enabled: bool,
    #[serde(default = "default_snooze")]
    pub snooze_duration: i64,
}

impl Default for NewAlarm {
    fn default() -> Self {
        NewAlarm {
            time: "07:00".to_string(),
            label: String::new(),
            repeat: Weekday::WORKDAYS.to_vec(),
            sound: default_sound(),
            snooze_enabled: true,
            snooze_duration: DEFAULT_SNOOZE_MIN,
        }
    }
}
