//! Leading and trailing edge throttle.
//!
//! The first call in an idle window runs immediately. Calls arriving while
//! the window is open are coalesced into a single deferred call carrying the
//! latest arguments, due when the window closes. The throttle never sleeps
//! itself: the owner asks for [`Throttle::next_deadline`], waits however it
//! likes and then calls [`Throttle::poll`].

use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Interval used when a throttle is configured with a zero interval.
/// Non-zero intervals are rounded up to whole milliseconds.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

/// Monotonic milliseconds since an arbitrary origin.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Clock advanced by hand, for deterministic tests and simulations.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: u64) {
        self.0.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
struct Pending<T> {
    due_ms: u64,
    args: T,
}

#[derive(Debug)]
pub struct Throttle<T, C: Clock> {
    clock: C,
    interval_ms: u64,
    last_fire_ms: Option<u64>,
    pending: Option<Pending<T>>,
}

impl<T, C: Clock> Throttle<T, C> {
    pub fn new(interval: Duration, clock: C) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_INTERVAL
        } else {
            interval
        };
        Self {
            clock,
            interval_ms: u64::try_from(interval.as_nanos().div_ceil(1_000_000))
                .unwrap_or(u64::MAX),
            last_fire_ms: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Requests a call with `args`.
    ///
    /// Returns the arguments back when the call should run right away.
    /// Otherwise they replace any earlier deferred arguments and `None` is
    /// returned.
    pub fn trigger(&mut self, args: T) -> Option<T> {
        let now = self.clock.now_ms();
        match self.last_fire_ms {
            Some(last) if now.saturating_sub(last) < self.interval_ms => {
                self.pending = Some(Pending {
                    due_ms: last.saturating_add(self.interval_ms),
                    args,
                });
                None
            }
            _ => {
                if self.pending.take().is_some() {
                    debug!(target: "BotClient/Throttle", "Superseding overdue deferred call");
                }
                self.last_fire_ms = Some(now);
                Some(args)
            }
        }
    }

    /// Releases the deferred call once it is due.
    pub fn poll(&mut self) -> Option<T> {
        let now = self.clock.now_ms();
        if self.pending.as_ref()?.due_ms > now {
            return None;
        }
        let pending = self.pending.take()?;
        self.last_fire_ms = Some(now);
        Some(pending.args)
    }

    /// When the deferred call becomes due, on the clock's timeline.
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.due_ms)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the deferred call, returning its arguments.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.args)
    }

    /// Tears the throttle down; a deferred call is discarded.
    pub fn dispose(mut self) {
        if self.cancel().is_some() {
            debug!(target: "BotClient/Throttle", "Disposed with a deferred call pending");
        }
    }
}
