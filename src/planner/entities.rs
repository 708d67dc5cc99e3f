use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    catalog::{BlockId, Mode},
    history::HistoryArchive,
};

pub const DEFAULT_QUOTE: &str = "Progress beats perfection.";
pub const DEFAULT_GREETING_NAME: &str = "Shubhangi";

/// Checked state of today's blocks. Only `true` values count as done.
pub type CompletionMap = BTreeMap<BlockId, bool>;

/// Frozen progress of one finished day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub completed: u32,
    pub total: u32,
}

impl DayRecord {
    pub fn new(completed: u32, total: u32) -> Self {
        Self { completed, total }
    }

    /// A day is fully completed when every block of a non-empty catalog was checked.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

/// User editable preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub mode: Mode,
    pub quote: String,
    pub greeting_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            quote: DEFAULT_QUOTE.into(),
            greeting_name: DEFAULT_GREETING_NAME.into(),
        }
    }
}

/// The day that is currently being filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayEntity {
    pub date: NaiveDate,
    #[serde(default)]
    pub done_map: CompletionMap,
}

/// Everything the planner persists, stored as one JSON document:
///
/// ```json
/// {
///   "mode": "core",
///   "quote": "Progress beats perfection.",
///   "greetingName": "Shubhangi",
///   "history": { "2025-10-27": { "completed": 3, "total": 14 } },
///   "today": { "date": "2025-10-28", "doneMap": { "1": true } }
/// }
/// ```
///
/// Missing fields fall back to their defaults, anything that doesn't parse makes the whole
/// payload unreadable.
// Fields are spelled out instead of flattening `Settings`, flattening buffers the document and
// breaks the integer keys of `doneMap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerPayload {
    pub mode: Mode,
    pub quote: String,
    pub greeting_name: String,
    pub history: HistoryArchive,
    pub today: Option<TodayEntity>,
}

impl Default for PlannerPayload {
    fn default() -> Self {
        Self::new(Settings::default(), HistoryArchive::default(), None)
    }
}

impl PlannerPayload {
    pub fn new(settings: Settings, history: HistoryArchive, today: Option<TodayEntity>) -> Self {
        let Settings {
            mode,
            quote,
            greeting_name,
        } = settings;
        Self {
            mode,
            quote,
            greeting_name,
            history,
            today,
        }
    }

    pub fn settings(&self) -> Settings {
        Settings {
            mode: self.mode,
            quote: self.quote.clone(),
            greeting_name: self.greeting_name.clone(),
        }
    }
}
