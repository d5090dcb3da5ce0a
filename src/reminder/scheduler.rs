use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::utils::clock::Clock;

/// Marker event sent for every elapsed reminder period. It carries no
/// payload: the consumer owns the settings and re-reads them on every firing,
/// so nothing configured at schedule time can go stale in the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderFired;

/// Handle of a scheduled reminder timer.
pub struct TimerHandle {
    cancellation: CancellationToken,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Stops future firings. Idempotent.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }
}

impl Drop for TimerHandle {
    // A dropped handle must not leave a timer firing into a dead consumer.
    fn drop(&mut self) {
        self.cancellation.cancel();
        self.task.abort();
    }
}

/// Arranges for a [ReminderFired] event on `events` every `period`, starting
/// one period from now. There is no immediate first fire.
pub fn schedule(
    period: Duration,
    events: mpsc::Sender<ReminderFired>,
    clock: impl Clock,
) -> TimerHandle {
    let cancellation = CancellationToken::new();
    let task_token = cancellation.clone();

    let task = tokio::spawn(async move {
        let mut fire_point = clock.instant() + period;
        loop {
            tokio::select! {
                _ = task_token.cancelled() => return,
                _ = clock.sleep_until(fire_point) => ()
            }
            fire_point += period;

            debug!("Reminder period elapsed");
            if events.send(ReminderFired).await.is_err() {
                // Receiver is gone, nobody left to remind.
                return;
            }
        }
    });

    TimerHandle { cancellation, task }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::{sync::mpsc, time::Instant};

    use crate::utils::clock::DefaultClock;

    use super::{schedule, ReminderFired};

    const PERIOD: Duration = Duration::from_secs(30 * 60);

    #[tokio::test(start_paused = true)]
    async fn first_fire_happens_one_period_after_scheduling() {
        let (sender, mut receiver) = mpsc::channel::<ReminderFired>(4);
        let scheduled_at = Instant::now();
        let _handle = schedule(PERIOD, sender, DefaultClock);

        receiver.recv().await.unwrap();
        assert!(scheduled_at.elapsed() >= PERIOD);
        assert!(scheduled_at.elapsed() < PERIOD * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_period() {
        let (sender, mut receiver) = mpsc::channel::<ReminderFired>(4);
        let scheduled_at = Instant::now();
        let _handle = schedule(PERIOD, sender, DefaultClock);

        for i in 1..=3u32 {
            receiver.recv().await.unwrap();
            assert!(scheduled_at.elapsed() >= PERIOD * i);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_future_firings() {
        let (sender, mut receiver) = mpsc::channel::<ReminderFired>(4);
        let handle = schedule(PERIOD, sender, DefaultClock);

        receiver.recv().await.unwrap();
        handle.cancel();
        handle.cancel();

        // The timer task exits on cancellation and drops the sender.
        assert_eq!(receiver.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_timer() {
        let (sender, mut receiver) = mpsc::channel::<ReminderFired>(4);
        let handle = schedule(PERIOD, sender, DefaultClock);
        drop(handle);

        assert_eq!(receiver.recv().await, None);
    }
}
