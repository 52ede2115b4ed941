//! Single-tap / double-tap disambiguation.
//!
//! A tap cannot be reported as a single tap until the double-tap window
//! has passed without a second tap. The first tap is parked as pending and
//! a one-shot timeout is armed; either a matching second tap resolves it
//! into a double tap (and cancels the timeout), or the timeout fires and
//! it becomes a single tap. Never both.

use tapwise_gesture_model::point::Point;
use tapwise_gesture_model::touch::TouchId;

use crate::scheduler::{Scheduler, TimerKind, TimerToken};

/// A tap waiting for a possible second tap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingTap {
    pub id: TouchId,
    /// Clock time of the tap (seconds).
    pub time: f64,
    pub point: Point,
}

/// What a new tap turned into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapResolution {
    /// It completed a double tap.
    DoubleTap(Point),
    /// It is now the pending tap.
    Pending,
}

#[derive(Debug, Clone)]
pub struct TapDisambiguator {
    window: f64,
    tolerance: f64,
    pending: Option<PendingTap>,
    timeout: Option<TimerToken>,
}

impl TapDisambiguator {
    /// `window` is the maximum gap between taps, `tolerance` the maximum
    /// distance between them.
    pub fn new(window: f64, tolerance: f64) -> Self {
        Self {
            window,
            tolerance,
            pending: None,
            timeout: None,
        }
    }

    pub fn pending(&self) -> Option<&PendingTap> {
        self.pending.as_ref()
    }

    /// Feed a completed tap.
    ///
    /// Only the same identifier can complete a double tap. A tap from a
    /// different finger replaces the pending one, which is dropped without
    /// ever becoming a single tap.
    pub fn on_tap<S: Scheduler>(
        &mut self,
        id: TouchId,
        point: Point,
        now: f64,
        scheduler: &mut S,
    ) -> TapResolution {
        if let Some(token) = self.timeout.take() {
            scheduler.cancel(token);
        }

        if let Some(first) = self.pending.take() {
            if self.completes(&first, id, point, now) {
                return TapResolution::DoubleTap(point);
            }
            if first.id != id {
                tracing::debug!(
                    dropped = first.id,
                    replacement = id,
                    "pending tap replaced by another finger"
                );
            }
        }

        self.pending = Some(PendingTap {
            id,
            time: now,
            point,
        });
        self.timeout = Some(scheduler.schedule_once(TimerKind::TapTimeout, self.window));
        TapResolution::Pending
    }

    /// Handle a fired timeout. Returns the tap that became a single tap, or
    /// `None` when `token` is stale or nothing is pending.
    pub fn on_timeout(&mut self, token: TimerToken) -> Option<PendingTap> {
        if self.timeout != Some(token) {
            return None;
        }
        self.timeout = None;
        self.pending.take()
    }

    fn completes(&self, first: &PendingTap, id: TouchId, point: Point, now: f64) -> bool {
        first.id == id
            && now - first.time <= self.window
            && first.point.distance(&point) <= self.tolerance
    }
}
