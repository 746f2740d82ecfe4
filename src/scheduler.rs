use std::time::Duration;
use std::time::Instant;

/// A repeating timer the simulation can start, rearm and cancel.
///
/// The scheduler never calls back into its owner. Whoever drives the simulation asks it whether a
/// tick has come due with [`Scheduler::fire`], which keeps every step on the owner's own call
/// stack. After a tick fires the request is parked until [`Scheduler::rearm`] picks the period of
/// the next cycle.
pub trait Scheduler {
    /// Register a repeating request. The first tick is due `period` from now.
    fn start(&mut self, period: Duration);

    /// Consume the pending tick if it has come due.
    fn fire(&mut self) -> bool;

    /// Schedule the next tick `period` after the one that just fired. A tick that fired late
    /// drops the missed cycles: the next one is then due `period` from now.
    fn rearm(&mut self, period: Duration);

    /// Drop any pending request. No tick fires after this returns.
    fn cancel(&mut self);

    /// Whether a request is registered, either waiting for its tick or parked after one.
    fn is_active(&self) -> bool;
}

/// Where a request stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request<T> {
    Idle,
    Waiting { due: T },
    Fired { at: T },
}

/// Scheduler following the monotonic wall clock.
#[derive(Debug)]
pub struct ClockScheduler {
    request: Request<Instant>,
}

impl ClockScheduler {
    pub fn new() -> Self {
        Self {
            request: Request::Idle,
        }
    }

    /// Time left until the pending tick, if one is waiting. Useful as an event poll timeout.
    pub fn until_due(&self) -> Option<Duration> {
        match self.request {
            Request::Waiting { due } => Some(due.saturating_duration_since(Instant::now())),
            _ => None,
        }
    }
}

impl Default for ClockScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ClockScheduler {
    fn start(&mut self, period: Duration) {
        self.request = Request::Waiting {
            due: Instant::now() + period,
        };
    }

    fn fire(&mut self) -> bool {
        match self.request {
            Request::Waiting { due } if due <= Instant::now() => {
                self.request = Request::Fired { at: due };
                true
            }
            _ => false,
        }
    }

    fn rearm(&mut self, period: Duration) {
        if let Request::Fired { at } = self.request {
            self.request = Request::Waiting {
                due: next_due(at, Instant::now(), period),
            };
        }
    }

    fn cancel(&mut self) {
        self.request = Request::Idle;
    }

    fn is_active(&self) -> bool {
        self.request != Request::Idle
    }
}

/// Scheduler on a virtual clock that only moves when told to.
///
/// Deterministic stand-in for [`ClockScheduler`]: nothing is due until [`ManualScheduler::advance`]
/// moves the clock past it.
#[derive(Debug)]
pub struct ManualScheduler {
    now: Duration,
    request: Request<Duration>,
    started: usize,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            request: Request::Idle,
            started: 0,
            cancelled: 0,
        }
    }

    /// Move the virtual clock forward.
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
    }

    /// When the pending tick is due, on the virtual clock.
    pub fn due(&self) -> Option<Duration> {
        match self.request {
            Request::Waiting { due } => Some(due),
            _ => None,
        }
    }

    /// How many requests have been started
    pub fn started(&self) -> usize {
        self.started
    }

    /// How many active requests have been cancelled
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, period: Duration) {
        self.started += 1;
        self.request = Request::Waiting {
            due: self.now + period,
        };
    }

    fn fire(&mut self) -> bool {
        match self.request {
            Request::Waiting { due } if due <= self.now => {
                self.request = Request::Fired { at: due };
                true
            }
            _ => false,
        }
    }

    fn rearm(&mut self, period: Duration) {
        if let Request::Fired { at } = self.request {
            self.request = Request::Waiting {
                due: next_due(at, self.now, period),
            };
        }
    }

    fn cancel(&mut self) {
        if self.request != Request::Idle {
            self.cancelled += 1;
        }

        self.request = Request::Idle;
    }

    fn is_active(&self) -> bool {
        self.request != Request::Idle
    }
}

/// Keep the cadence while on time, restart it from `now` once behind.
fn next_due<T>(at: T, now: T, period: Duration) -> T
where
    T: Copy + Ord + std::ops::Add<Duration, Output = T>,
{
    let due = at + period;

    if due <= now { now + period } else { due }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn nothing_due_before_period() {
        let mut s = ManualScheduler::new();
        s.start(MS_100);

        s.advance(Duration::from_millis(99));
        assert!(!s.fire());

        s.advance(Duration::from_millis(1));
        assert!(s.fire());
        assert!(!s.fire(), "a tick fires once");
    }

    #[test]
    fn rearm_keeps_cadence() {
        let mut s = ManualScheduler::new();
        s.start(MS_100);

        // Polled late: the next tick is still counted from when this one was due
        s.advance(Duration::from_millis(150));
        assert!(s.fire());
        s.rearm(MS_100);
        assert_eq!(s.due(), Some(Duration::from_millis(200)));
    }

    #[test]
    fn rearm_after_stall_drops_missed_ticks() {
        let mut s = ManualScheduler::new();
        s.start(MS_100);

        s.advance(Duration::from_secs(3600));
        assert!(s.fire());
        s.rearm(MS_100);

        // One period from now, not from the tick that was due an hour ago
        assert_eq!(s.due(), Some(Duration::from_millis(3_600_100)));
        assert!(!s.fire());
    }

    #[test]
    fn rearm_without_fire_is_ignored() {
        let mut s = ManualScheduler::new();
        s.rearm(MS_100);
        assert!(!s.is_active());

        s.start(MS_100);
        s.rearm(Duration::from_secs(5));
        assert_eq!(s.due(), Some(MS_100));
    }

    #[test]
    fn cancel_suppresses_due_tick() {
        let mut s = ManualScheduler::new();
        s.start(MS_100);
        s.advance(Duration::from_secs(1));

        s.cancel();
        assert!(!s.fire());
        assert!(!s.is_active());
        assert_eq!(s.cancelled(), 1);

        s.cancel();
        assert_eq!(s.cancelled(), 1, "cancelling nothing is not counted");
    }

    #[test]
    fn clock_scheduler_fires_after_period() {
        let mut s = ClockScheduler::new();
        s.start(Duration::ZERO);

        assert!(s.is_active());
        assert!(s.fire());

        s.rearm(Duration::from_secs(3600));
        assert!(!s.fire());
        assert!(s.until_due().is_some());

        s.cancel();
        assert!(!s.is_active());
        assert_eq!(s.until_due(), None);
    }

    #[test]
    fn clock_scheduler_late_tick_restarts_cadence() {
        let mut s = ClockScheduler::new();
        s.start(Duration::ZERO);

        // Polled well past the next period
        std::thread::sleep(Duration::from_millis(50));
        assert!(s.fire());
        s.rearm(Duration::from_millis(30));

        assert!(!s.fire());
        assert!(s.until_due().is_some_and(|left| left > Duration::ZERO));
    }
}
