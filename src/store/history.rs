use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::utils::{clock::Clock, time::week_dates};

use super::{
    medium::StorageMedium,
    settings::{SettingsStore, SETTINGS_KEY},
};

pub const HISTORY_KEY: &str = "history";

/// Intake state for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    /// Count of logged glasses. Always equal to `timestamps.len()`.
    pub glasses: u32,
    /// Goal in effect when the record was written. Not recomputed when the
    /// settings goal changes later.
    pub goal: u32,
    /// One instant per logged glass, in insertion order.
    pub timestamps: Vec<DateTime<Utc>>,
}

impl DayRecord {
    /// Zero record for a day that has no stored data.
    pub fn empty(date: NaiveDate, goal: u32) -> Self {
        Self {
            date,
            glasses: 0,
            goal,
            timestamps: Vec::new(),
        }
    }

    pub fn goal_met(&self) -> bool {
        self.glasses >= self.goal
    }

    pub fn last_drink(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }
}

/// Day-record access over the persisted history mapping. Fresh reads of
/// unknown days take their goal from the current settings, so the store keeps
/// a settings view over the same medium.
pub struct HistoryStore<M> {
    medium: M,
    settings: SettingsStore<M>,
    date_provider: Box<dyn Clock>,
}

impl<M: StorageMedium + Clone> HistoryStore<M> {
    pub fn new(medium: M, date_provider: Box<dyn Clock>) -> Self {
        let settings = SettingsStore::new(medium.clone());
        Self {
            medium,
            settings,
            date_provider,
        }
    }

    /// Key of the current local calendar day.
    pub fn today_key(&self) -> NaiveDate {
        self.date_provider.today()
    }

    /// The entire persisted mapping. An unreadable payload resolves to an
    /// empty history.
    pub fn all(&self) -> HashMap<NaiveDate, DayRecord> {
        let Some(raw) = self.medium.get(HISTORY_KEY) else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("Stored history is not valid json, treating as empty: {e}");
                HashMap::new()
            }
        }
    }

    /// Returns the stored record for `date`, or a fresh zero record whose
    /// goal is the current settings goal. The fresh default is not persisted.
    pub fn read(&self, date: NaiveDate) -> DayRecord {
        self.all()
            .remove(&date)
            .unwrap_or_else(|| DayRecord::empty(date, self.settings.read().daily_goal))
    }

    /// Upserts `record` into the history mapping and persists the whole
    /// mapping. The read-modify-write of the full collection keeps the layout
    /// trivial; history grows by one entry per day used, so the cost stays
    /// small for its single writer.
    pub fn write(&self, record: &DayRecord) {
        let mut all = self.all();
        all.insert(record.date, record.clone());
        match serde_json::to_string(&all) {
            Ok(v) => self.medium.set(HISTORY_KEY, &v),
            Err(e) => warn!("Failed to serialize history: {e}"),
        }
    }

    /// Records for the 7 calendar days ending today inclusive, ascending, so
    /// today is always the last entry. Each day is resolved via [read](Self::read).
    pub fn week_window(&self) -> Vec<DayRecord> {
        week_dates(self.today_key())
            .into_iter()
            .map(|date| self.read(date))
            .collect()
    }

    /// Deletes settings and the entire history, returning the application to
    /// first-run state. Irreversible.
    pub fn reset(&self) {
        self.medium.remove(SETTINGS_KEY);
        self.medium.remove(HISTORY_KEY);
    }
}
