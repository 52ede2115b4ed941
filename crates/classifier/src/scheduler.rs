//! Timer scheduling.
//!
//! The classifier needs two timers: a repeating hold scan and a one-shot
//! single-tap timeout. Both are requested through [`Scheduler`] and
//! identified by a [`TimerToken`]; the host hands fired timers back via
//! `GestureClassifier::on_timer`. A token that was cancelled or replaced
//! is ignored when it comes back, which makes cancellation race-free.

use tapwise_common::clock::MonotonicClock;

/// Handle for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// What a timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    HoldPoll,
    TapTimeout,
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredTimer {
    pub token: TimerToken,
    pub kind: TimerKind,
    /// Clock time the timer was due.
    pub due: f64,
}

/// Host-side timer service used by the classifier.
pub trait Scheduler {
    /// Fire once, `delay` seconds from now.
    fn schedule_once(&mut self, kind: TimerKind, delay: f64) -> TimerToken;

    /// Fire every `interval` seconds, starting one interval from now.
    fn schedule_repeating(&mut self, kind: TimerKind, interval: f64) -> TimerToken;

    /// Stop a timer. Unknown or already-fired tokens are ignored.
    fn cancel(&mut self, token: TimerToken);
}

#[derive(Debug, Clone)]
struct Timer {
    token: TimerToken,
    kind: TimerKind,
    anchor: f64,
    interval: f64,
    repeating: bool,
    fires: u64,
}

impl Timer {
    fn due(&self) -> f64 {
        self.anchor + self.interval * (self.fires + 1) as f64
    }
}

/// A deterministic scheduler: timers sit in a queue until the host asks
/// which ones are due.
///
/// Repeating timers are spaced from their anchor (`anchor + n * interval`)
/// so they never accumulate rounding drift.
#[derive(Debug)]
pub struct TimerQueue<C> {
    clock: C,
    next_token: u64,
    timers: Vec<Timer>,
}

impl<C: MonotonicClock> TimerQueue<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_token: 1,
            timers: Vec::new(),
        }
    }

    /// Earliest due time of any armed timer.
    pub fn next_due(&self) -> Option<f64> {
        self.timers.iter().map(Timer::due).min_by(f64::total_cmp)
    }

    /// Pop the earliest timer due at or before `now`.
    ///
    /// Ties go to the timer scheduled first. Repeating timers are re-armed
    /// for their next period.
    pub fn pop_due(&mut self, now: f64) -> Option<FiredTimer> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due() <= now)
            .min_by(|(_, a), (_, b)| a.due().total_cmp(&b.due()).then(a.token.cmp(&b.token)))
            .map(|(index, _)| index)?;

        let timer = &mut self.timers[index];
        let fired = FiredTimer {
            token: timer.token,
            kind: timer.kind,
            due: timer.due(),
        };

        if timer.repeating {
            timer.fires += 1;
        } else {
            self.timers.remove(index);
        }
        Some(fired)
    }

    /// Move every repeating timer of `kind` past `now` without firing the
    /// periods in between. Returns how many periods were skipped.
    pub fn skip_until(&mut self, kind: TimerKind, now: f64) -> u64 {
        let mut skipped = 0;
        for timer in self
            .timers
            .iter_mut()
            .filter(|timer| timer.repeating && timer.kind == kind)
        {
            if timer.due() > now {
                continue;
            }
            let before = timer.fires;
            let periods = ((now - timer.anchor) / timer.interval).floor() as u64;
            timer.fires = timer.fires.max(periods.saturating_sub(1));
            while timer.due() <= now {
                timer.fires += 1;
            }
            skipped += timer.fires - before;
        }
        skipped
    }

    /// Whether `token` is still armed.
    pub fn is_armed(&self, token: TimerToken) -> bool {
        self.timers.iter().any(|timer| timer.token == token)
    }

    /// Number of armed timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    fn push(&mut self, kind: TimerKind, interval: f64, repeating: bool) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.timers.push(Timer {
            token,
            kind,
            anchor: self.clock.now_secs(),
            interval: interval.max(0.0),
            repeating,
            fires: 0,
        });
        token
    }
}

impl<C: MonotonicClock> Scheduler for TimerQueue<C> {
    fn schedule_once(&mut self, kind: TimerKind, delay: f64) -> TimerToken {
        self.push(kind, delay, false)
    }

    fn schedule_repeating(&mut self, kind: TimerKind, interval: f64) -> TimerToken {
        // A zero period would fire forever at the same instant.
        self.push(kind, interval.max(f64::EPSILON), true)
    }

    fn cancel(&mut self, token: TimerToken) {
        self.timers.retain(|timer| timer.token != token);
    }
}
