use std::{fmt::Display, future::Future, time::Duration};

use tokio::time::{sleep, sleep_until, Instant};

use crate::error::{Error, Result};

/// First fire time, in epoch seconds.
///
/// Without an explicit start the schedule begins right away. A start time in
/// the past is pushed forward by whole intervals to the first grid point
/// strictly after `now`, so the sampling grid stays anchored to it.
pub fn align_start(start_at: Option<u64>, now: f64, interval: Duration) -> f64 {
    let start = match start_at {
        Some(start) => start as f64,
        None => return now,
    };

    if start >= now {
        return start;
    }

    let interval = interval.as_secs_f64();
    let intervals = ((now - start) / interval).floor() + 1.0;
    start + intervals * interval
}

/// How long to wait before firing at `first_fire`, both in epoch seconds.
/// Saturates at `Duration::MAX` so an unrepresentable start is caught later
/// instead of firing right away.
pub fn initial_delay(first_fire: f64, now: f64) -> Duration {
    let seconds = first_fire - now;
    if seconds <= 0.0 {
        return Duration::ZERO;
    }

    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}

/// Delay until the tick after the one intended for `intended`, compensating
/// for the time the tick itself took. Zero when the tick overran.
pub fn next_delay(intended: Instant, now: Instant, interval: Duration) -> Duration {
    interval.saturating_sub(now.saturating_duration_since(intended))
}

/// Latest grid point at or before `now`, for a tick intended at `intended`.
///
/// Grid points missed while a tick overran are skipped; the catch-up tick
/// stands in for the latest of them.
pub fn latest_grid_point(intended: Instant, now: Instant, interval: Duration) -> Instant {
    let elapsed = now.saturating_duration_since(intended);
    let missed = elapsed.as_nanos() / interval.as_nanos().max(1);

    u32::try_from(missed)
        .ok()
        .and_then(|missed| interval.checked_mul(missed))
        .and_then(|skipped| intended.checked_add(skipped))
        .unwrap_or(now)
}

/// Converts a delay from `now` into the instant of the first tick.
pub fn first_fire_instant(now: Instant, delay: Duration) -> Result<Instant> {
    now.checked_add(delay).ok_or_else(|| {
        Error::ConfigError(format!(
            "start time is too far in the future ({:.0} seconds away)",
            delay.as_secs_f64()
        ))
    })
}

/// Fires `tick` at `first_fire` and then on every `interval` after it, forever.
///
/// Ticks never overlap. A failed tick is logged and the schedule carries on.
pub async fn run<F, Fut, T, E>(first_fire: Instant, interval: Duration, mut tick: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Display,
{
    let mut intended = first_fire;
    sleep_until(intended).await;

    loop {
        if let Err(error) = tick().await {
            tracing::warn!("Sampling failed: {}. Retrying on the next tick", error);
        }

        let now = Instant::now();
        let delay = next_delay(intended, now, interval);
        intended = if delay.is_zero() {
            tracing::warn!(
                "Tick overran the {:?} sampling interval. Firing the next one immediately",
                interval
            );
            latest_grid_point(intended, now, interval)
        } else {
            intended + interval
        };

        sleep(delay).await;
    }
}
