//! Increment/decrement logic over today's record. This is the only stateful
//! business logic in the application: everything else is plain reads.

use tracing::debug;

use crate::{
    store::{
        history::{DayRecord, HistoryStore},
        medium::StorageMedium,
        settings::{Settings, SettingsStore},
    },
    utils::clock::Clock,
};

/// Result of logging one glass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkOutcome {
    pub record: DayRecord,
    /// Set on the exact increment that brings the count to the daily goal.
    /// Increments past the goal do not set it again.
    pub goal_reached: bool,
}

/// Applies intake mutations to today's record and persists every change
/// immediately.
pub struct IntakeTracker<M> {
    history: HistoryStore<M>,
    settings: SettingsStore<M>,
    time_provider: Box<dyn Clock>,
}

impl<M: StorageMedium + Clone> IntakeTracker<M> {
    pub fn new(medium: M, clock: impl Clock + Clone) -> Self {
        Self {
            history: HistoryStore::new(medium.clone(), Box::new(clock.clone())),
            settings: SettingsStore::new(medium),
            time_provider: Box::new(clock),
        }
    }

    pub fn history(&self) -> &HistoryStore<M> {
        &self.history
    }

    pub fn settings(&self) -> Settings {
        self.settings.read()
    }

    pub fn today(&self) -> DayRecord {
        self.history.read(self.history.today_key())
    }

    /// Logs one glass for today: appends the current instant, increments the
    /// count and persists. Reports whether this increment crossed into the
    /// goal (`count == goal` exactly, so the signal fires once per crossing,
    /// not on every glass at or above the goal).
    pub fn drink(&self) -> DrinkOutcome {
        let settings = self.settings.read();
        let mut record = self.today();

        record.timestamps.push(self.time_provider.time());
        record.glasses += 1;
        self.history.write(&record);
        debug!("Logged glass {} of {}", record.glasses, settings.daily_goal);

        DrinkOutcome {
            goal_reached: record.glasses == settings.daily_goal,
            record,
        }
    }

    /// Removes the most recently logged glass of today and persists. A day
    /// with no glasses stays unchanged, the count never goes negative.
    pub fn undo(&self) -> DayRecord {
        let mut record = self.today();
        if record.glasses == 0 {
            return record;
        }

        record.timestamps.pop();
        record.glasses -= 1;
        self.history.write(&record);
        debug!("Removed last glass, {} remain", record.glasses);

        record
    }

    /// Commits new settings and aligns today's stored goal with them, so the
    /// current day reflects the change while past days keep the goal they
    /// were written with.
    pub fn save_settings(&self, settings: &Settings) {
        self.settings.write(settings);

        let mut today = self.today();
        today.goal = settings.daily_goal;
        self.history.write(&today);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use tokio::time::Instant;

    use crate::{
        store::{
            medium::MemoryMedium,
            settings::{Settings, SettingsStore},
        },
        utils::clock::Clock,
    };

    use super::IntakeTracker;

    /// Advances one minute per observed timestamp so every logged glass gets
    /// a distinct instant.
    #[derive(Clone)]
    struct TickingClock {
        start: DateTime<Utc>,
        ticks: std::sync::Arc<std::sync::atomic::AtomicU32>,
    }

    impl TickingClock {
        fn new() -> Self {
            Self {
                start: Utc.with_ymd_and_hms(2024, 1, 9, 8, 0, 0).unwrap(),
                ticks: std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0)),
            }
        }
    }

    #[async_trait]
    impl Clock for TickingClock {
        fn time(&self) -> DateTime<Utc> {
            let tick = self
                .ticks
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            self.start + chrono::Duration::minutes(i64::from(tick))
        }

        fn today(&self) -> NaiveDate {
            self.start.date_naive()
        }

        fn instant(&self) -> Instant {
            Instant::now()
        }

        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }

        async fn sleep_until(&self, instant: Instant) {
            tokio::time::sleep_until(instant).await;
        }
    }

    fn test_tracker() -> IntakeTracker<MemoryMedium> {
        IntakeTracker::new(MemoryMedium::new(), TickingClock::new())
    }

    #[test]
    fn count_always_matches_timestamps() {
        let tracker = test_tracker();

        for _ in 0..5 {
            tracker.drink();
        }
        tracker.undo();
        tracker.undo();
        tracker.drink();

        let record = tracker.today();
        assert_eq!(record.glasses, 4);
        assert_eq!(record.timestamps.len() as u32, record.glasses);
    }

    #[test]
    fn undo_at_zero_is_a_no_op() {
        let tracker = test_tracker();

        let before = tracker.today();
        let after = tracker.undo();

        assert_eq!(after, before);
        assert_eq!(tracker.today().glasses, 0);
    }

    #[test]
    fn undo_removes_exactly_the_last_timestamp() {
        let tracker = test_tracker();

        tracker.drink();
        let two = tracker.drink().record;
        tracker.drink();

        let record = tracker.undo();
        assert_eq!(record, two);
        assert_eq!(tracker.today(), two);
    }

    #[test]
    fn goal_signal_fires_on_the_exact_crossing_only() {
        let tracker = test_tracker();

        let mut crossings = 0;
        for i in 1..=10 {
            let outcome = tracker.drink();
            if outcome.goal_reached {
                crossings += 1;
                assert_eq!(i, 8);
            }
        }
        assert_eq!(crossings, 1);
    }

    #[test]
    fn goal_signal_respects_the_configured_goal() {
        let tracker = test_tracker();
        tracker.save_settings(&Settings {
            daily_goal: 3,
            ..Settings::default()
        });

        tracker.drink();
        tracker.drink();
        assert!(tracker.drink().goal_reached);
        assert!(!tracker.drink().goal_reached);
    }

    #[test]
    fn lowering_the_goal_below_the_count_does_not_fire_retroactively() {
        let tracker = test_tracker();

        for _ in 0..5 {
            tracker.drink();
        }
        tracker.save_settings(&Settings {
            daily_goal: 3,
            ..Settings::default()
        });

        // Already past the lowered goal, so no further increment equals it.
        assert!(!tracker.drink().goal_reached);
    }

    #[test]
    fn save_settings_updates_todays_goal_but_not_past_days() {
        let tracker = test_tracker();
        let yesterday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();

        let mut past = tracker.history().read(yesterday);
        past.goal = 8;
        tracker.history().write(&past);

        tracker.save_settings(&Settings {
            daily_goal: 12,
            ..Settings::default()
        });

        assert_eq!(tracker.today().goal, 12);
        assert_eq!(tracker.history().read(yesterday).goal, 8);
    }

    #[test]
    fn state_survives_a_new_tracker_over_the_same_files() {
        let dir = tempfile::tempdir().unwrap();
        let medium = crate::store::medium::JsonFileMedium::new(dir.path().to_owned());

        let tracker = IntakeTracker::new(medium.clone(), TickingClock::new());
        tracker.drink();
        tracker.drink();
        let written = tracker.today();

        let reopened = IntakeTracker::new(medium, TickingClock::new());
        assert_eq!(reopened.today(), written);
        assert_eq!(reopened.today().timestamps.len(), 2);
    }

    #[test]
    fn settings_survive_through_the_tracker() {
        let medium = MemoryMedium::new();
        let tracker = IntakeTracker::new(medium.clone(), TickingClock::new());

        tracker.save_settings(&Settings {
            daily_goal: 10,
            glass_size_ml: 500,
            reminder_enabled: true,
            reminder_interval_minutes: 90,
        });

        let reread = SettingsStore::new(medium).read();
        assert_eq!(reread.daily_goal, 10);
        assert_eq!(reread.glass_size_ml, 500);
        assert!(reread.reminder_enabled);
        assert_eq!(reread.reminder_interval_minutes, 90);
    }
}
