use std::time::Duration;

use chrono::{Datelike, Local, NaiveDateTime};
use serde::Serialize;
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::logic;
use crate::models::Weekday;

const TICK: Duration = Duration::from_secs(1);

// What the clock face displays
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClockReading {
    pub hours: String,
    pub minutes: String,
    pub date: String, // e.g. "Sunday, 18 October"
    pub weekday: Weekday,
    pub is_morning: bool,
}

impl ClockReading {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            hours: now.format("%H").to_string(),
            minutes: now.format("%M").to_string(),
            date: now.format("%A, %-d %B").to_string(),
            weekday: now.weekday().into(),
            is_morning: logic::is_morning(now.time()),
        }
    }

    pub fn now() -> Self {
        Self::at(Local::now().naive_local())
    }

    // "HH:MM"
    pub fn time_label(&self) -> String {
        format!("{}:{}", self.hours, self.minutes)
    }
}

/// Once-a-second tick refreshing the displayed time of day.
///
/// Purely cosmetic. Stopped explicitly with [`ClockTicker::stop`] or when dropped.
pub struct ClockTicker {
    task: JoinHandle<()>,
    cancellation_token: CancellationToken,
    readings: watch::Receiver<ClockReading>,
}

impl ClockTicker {
    pub fn start() -> Self {
        Self::start_with(ClockReading::now)
    }

    pub fn start_with<F>(read_clock: F) -> Self
    where
        F: Fn() -> ClockReading + Send + 'static,
    {
        let (tx, readings) = watch::channel(read_clock());
        let cancellation_token = CancellationToken::new();
        let token = cancellation_token.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        tx.send_replace(read_clock());
                    }
                }
            }
            log::debug!("Clock ticker stopped");
        });

        Self {
            task,
            cancellation_token,
            readings,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ClockReading> {
        self.readings.clone()
    }

    pub async fn stop(mut self) {
        self.cancellation_token.cancel();
        let _ = (&mut self.task).await;
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    #[test]
    fn reading_formats_clock_face() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(6, 5, 42)
            .unwrap();
        let reading = ClockReading::at(now);
        assert_eq!(reading.hours, "06");
        assert_eq!(reading.minutes, "05");
        assert_eq!(reading.time_label(), "06:05");
        assert_eq!(reading.date, "Sunday, 18 October");
        assert_eq!(reading.weekday, Weekday::Sun);
        assert!(reading.is_morning);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_every_second_until_stopped() {
        let counter = Arc::new(AtomicU32::new(0));
        let ticks = counter.clone();
        let ticker = ClockTicker::start_with(move || {
            let n = ticks.fetch_add(1, Ordering::SeqCst);
            let now = NaiveDate::from_ymd_opt(2026, 1, 5)
                .unwrap()
                .and_hms_opt(12, n % 60, 0)
                .unwrap();
            ClockReading::at(now)
        });
        let mut rx = ticker.subscribe();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        rx.changed().await.unwrap();
        let seen = counter.load(Ordering::SeqCst);
        // initial reading, immediate first tick, then one per second
        assert_eq!(seen, 5);
        assert_eq!(rx.borrow().minutes, "04");

        ticker.stop().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), seen);
    }
}
