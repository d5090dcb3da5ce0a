use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    reminder::{
        notify::{DesktopNotifier, Notifier},
        scheduler::{self, ReminderFired, TimerHandle},
    },
    store::{
        medium::{JsonFileMedium, StorageMedium},
        settings::{Settings, SettingsStore},
    },
    utils::clock::{Clock, DefaultClock},
};

pub mod args;
pub mod shutdown;

/// How often the consumer re-reads settings to notice interval or enabled
/// changes committed by the cli process. Well below the smallest reminder
/// interval.
const SETTINGS_POLL_INTERVAL: Duration = Duration::from_secs(60);

pub const REMINDER_TITLE: &str = "💧 Time to hydrate!";
pub const REMINDER_BODY: &str = "Don't forget to drink water and stay healthy!";

/// Represents the starting point for the reminder daemon.
pub async fn start_daemon(dir: PathBuf) -> Result<()> {
    std::env::set_current_dir("/")?;

    let settings = SettingsStore::new(JsonFileMedium::new(dir.join("store")));
    let shutdown_token = CancellationToken::new();

    let (_, loop_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        reminder_loop(settings, DesktopNotifier, DefaultClock, shutdown_token.clone()),
    );

    loop_result
}

fn reminder_period(settings: &Settings) -> Duration {
    Duration::from_secs(u64::from(settings.reminder_interval_minutes) * 60)
}

/// Consumer half of the reminder pipeline. Owns the settings state: the timer
/// only reports elapsed periods, and this loop decides on every firing
/// whether a notification should go out, re-arming the timer whenever the
/// configured interval or the enabled flag changes.
pub async fn reminder_loop<M: StorageMedium>(
    settings: SettingsStore<M>,
    notifier: impl Notifier,
    clock: impl Clock + Clone,
    shutdown: CancellationToken,
) -> Result<()> {
    let (sender, mut receiver) = mpsc::channel::<ReminderFired>(4);

    let mut current = settings.read();
    let mut timer = arm(&current, &notifier, &sender, clock.clone()).await;

    loop {
        tokio::select! {
            // Cancelation stops the event loop. Dropping the timer handle
            // aborts the scheduler task with it.
            _ = shutdown.cancelled() => {
                info!("Shutting down reminder loop");
                return Ok(());
            }
            // The firing only reports an elapsed period. Whether to act is
            // decided here, against the settings as they are right now.
            Some(ReminderFired) = receiver.recv() => {
                if settings.read().reminder_enabled {
                    debug!("Dispatching reminder notification");
                    notifier.notify(REMINDER_TITLE, REMINDER_BODY);
                } else {
                    debug!("Reminders disabled, suppressing notification");
                }
            }
            _ = clock.sleep(SETTINGS_POLL_INTERVAL) => {
                let fresh = settings.read();
                let changed = fresh.reminder_enabled != current.reminder_enabled
                    || fresh.reminder_interval_minutes != current.reminder_interval_minutes;
                if changed {
                    info!(
                        "Reminder configuration changed (enabled: {}, every {}m), re-arming",
                        fresh.reminder_enabled, fresh.reminder_interval_minutes
                    );
                    if let Some(old) = timer.take() {
                        old.cancel();
                    }
                    timer = arm(&fresh, &notifier, &sender, clock.clone()).await;
                }
                current = fresh;
            }
        }
    }
}

/// Starts a timer for the configured interval, gated on notification
/// permission. Returns no handle when reminders are off or dispatch is not
/// permitted.
async fn arm(
    settings: &Settings,
    notifier: &impl Notifier,
    sender: &mpsc::Sender<ReminderFired>,
    clock: impl Clock,
) -> Option<TimerHandle> {
    if !settings.reminder_enabled {
        return None;
    }
    if !notifier.request_permission().await {
        info!("Notification permission not granted, reminders stay silent");
        return None;
    }

    debug!(
        "Arming reminder timer every {}m",
        settings.reminder_interval_minutes
    );
    Some(scheduler::schedule(
        reminder_period(settings),
        sender.clone(),
        clock,
    ))
}
