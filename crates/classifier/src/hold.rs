//! Periodic hold detection.

use tapwise_gesture_model::point::Point;
use tapwise_gesture_model::touch::TouchId;

use crate::pinch::PinchTracker;
use crate::record::TouchRecord;
use crate::scheduler::{Scheduler, TimerKind, TimerToken};
use crate::table::TouchTable;

/// Promotes touches that stay down without moving into holds.
#[derive(Debug, Clone)]
pub struct HoldMonitor {
    poll_interval: f64,
    trigger: f64,
    token: Option<TimerToken>,
}

impl HoldMonitor {
    pub fn new(poll_interval: f64, trigger: f64) -> Self {
        Self {
            poll_interval,
            trigger,
            token: None,
        }
    }

    /// Arm the repeating scan. Restarting replaces the previous timer.
    pub fn start<S: Scheduler>(&mut self, scheduler: &mut S) {
        self.stop(scheduler);
        self.token = Some(scheduler.schedule_repeating(TimerKind::HoldPoll, self.poll_interval));
    }

    pub fn stop<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(token) = self.token.take() {
            scheduler.cancel(token);
        }
    }

    /// Whether `token` is this monitor's scan timer.
    pub fn owns(&self, token: TimerToken) -> bool {
        self.token == Some(token)
    }

    /// Mark every eligible touch that has been down longer than the
    /// trigger time as held, returning the newly held touches.
    ///
    /// Eligible touches are live, unmoved, not yet held, and not part of
    /// an active pinch pair.
    pub fn scan(
        &self,
        now: f64,
        table: &mut TouchTable,
        pinch: &PinchTracker,
    ) -> Vec<(Point, TouchId)> {
        let mut held = Vec::new();
        for record in table.records_mut() {
            if !is_candidate(record, pinch) {
                continue;
            }
            if now - record.start_time > self.trigger {
                record.has_hold = true;
                held.push((record.last_point(), record.id));
            }
        }
        held
    }

    /// Whether any touch could still become a hold. When none can, scans
    /// are no-ops until the next begin.
    pub fn has_candidates(&self, table: &TouchTable, pinch: &PinchTracker) -> bool {
        table.records().any(|record| is_candidate(record, pinch))
    }
}

fn is_candidate(record: &TouchRecord, pinch: &PinchTracker) -> bool {
    !(record.has_moved || record.has_ended || record.has_hold) && !pinch.is_pinching(record.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TimerQueue;
    use tapwise_common::clock::ManualClock;

    #[test]
    fn test_idle_touch_becomes_hold_once() {
        let monitor = HoldMonitor::new(0.1, 1.0);
        let mut table = TouchTable::new();
        let pinch = PinchTracker::new();
        table.insert(0, TouchRecord::new(0, Point::new(5.0, 5.0), 0.0));

        assert!(monitor.scan(1.0, &mut table, &pinch).is_empty());
        assert!(monitor.has_candidates(&table, &pinch));
        let held = monitor.scan(1.05, &mut table, &pinch);
        assert_eq!(held, vec![(Point::new(5.0, 5.0), 0)]);
        assert!(table.get(0).unwrap().has_hold);
        assert!(!monitor.has_candidates(&table, &pinch));
        assert!(monitor.scan(2.0, &mut table, &pinch).is_empty());
    }

    #[test]
    fn test_moved_and_ended_touches_are_skipped() {
        let monitor = HoldMonitor::new(0.1, 1.0);
        let mut table = TouchTable::new();
        let pinch = PinchTracker::new();

        let mut moved = TouchRecord::new(0, Point::ZERO, 0.0);
        moved.has_moved = true;
        let mut ended = TouchRecord::new(2, Point::ZERO, 0.0);
        ended.has_ended = true;
        table.insert(0, moved);
        table.insert(2, ended);

        assert!(!monitor.has_candidates(&table, &pinch));
        assert!(monitor.scan(5.0, &mut table, &pinch).is_empty());
    }

    #[test]
    fn test_start_and_stop_manage_timer() {
        let mut queue = TimerQueue::new(ManualClock::new());
        let mut monitor = HoldMonitor::new(0.1, 1.0);
        monitor.start(&mut queue);
        monitor.start(&mut queue);
        assert_eq!(queue.len(), 1);

        let fired = queue.pop_due(0.1).unwrap();
        assert!(monitor.owns(fired.token));

        monitor.stop(&mut queue);
        assert!(queue.is_empty());
        assert!(!monitor.owns(fired.token));
    }
}
