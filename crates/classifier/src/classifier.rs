//! The gesture classifier.
//!
//! # Classification order
//!
//! 1. **Begin:** record the touch, report `down`, offer it to the pinch
//!    tracker so a second finger can form a pair.
//! 2. **Move:** mark the touch moved once it leaves the movement radius
//!    around its first sample. Pinching fingers report pinch motion only;
//!    other moved fingers report `drag` if held, `scroll` otherwise.
//! 3. **End:** a held finger reports `drag_ended` (followed by
//!    `pinch_ended` if it was part of an active pair); a finger breaking an
//!    active pinch reports `pinch_ended`; a moved finger reports `flick`
//!    or `swipe` depending on how long it was down; anything else is a
//!    `tap` and goes on to single/double tap resolution.
//! 4. **Cancel:** report `cancelled` and release any pinch slot.
//!
//! Holds and single taps are timer driven and arrive through
//! [`GestureClassifier::on_timer`].

use tapwise_common::clock::MonotonicClock;
use tapwise_gesture_model::direction::Direction;
use tapwise_gesture_model::gesture::GestureEvent;
use tapwise_gesture_model::point::Point;
use tapwise_gesture_model::touch::{TouchId, TouchPhase, TouchSample, MAX_TOUCH_ID};

use crate::handler::{dispatch, GestureHandler};
use crate::hold::HoldMonitor;
use crate::pinch::{PinchMotion, PinchRelease, PinchTracker, PinchUpdate};
use crate::record::TouchRecord;
use crate::scheduler::{FiredTimer, Scheduler, TimerKind, TimerToken};
use crate::table::TouchTable;
use crate::tap::{TapDisambiguator, TapResolution};
use crate::thresholds::Thresholds;

/// Classifies raw touch batches into gestures.
///
/// `C` supplies time, `S` runs the hold scan and tap timeout timers, and
/// `H` receives the results.
pub struct GestureClassifier<C, S, H> {
    thresholds: Thresholds,
    clock: C,
    scheduler: S,
    handler: H,
    table: TouchTable,
    pinch: PinchTracker,
    taps: TapDisambiguator,
    hold: HoldMonitor,
}

impl<C, S, H> GestureClassifier<C, S, H>
where
    C: MonotonicClock,
    S: Scheduler,
    H: GestureHandler,
{
    /// Create a classifier and arm its hold scan.
    pub fn new(thresholds: Thresholds, clock: C, mut scheduler: S, handler: H) -> Self {
        let mut hold = HoldMonitor::new(thresholds.hold_poll_interval, thresholds.hold_trigger);
        hold.start(&mut scheduler);
        let taps = TapDisambiguator::new(
            thresholds.double_tap_window,
            thresholds.double_tap_distance,
        );

        tracing::debug!(
            movement = thresholds.movement,
            multitap = thresholds.multitap,
            pinch = thresholds.pinch,
            "Gesture classifier created"
        );

        Self {
            thresholds,
            clock,
            scheduler,
            handler,
            table: TouchTable::new(),
            pinch: PinchTracker::new(),
            taps,
            hold,
        }
    }

    /// Deliver a batch of any phase.
    pub fn deliver(&mut self, phase: TouchPhase, touches: &[TouchSample]) {
        match phase {
            TouchPhase::Begin => self.deliver_begin(touches),
            TouchPhase::Move => self.deliver_move(touches),
            TouchPhase::End => self.deliver_end(touches),
            TouchPhase::Cancel => self.deliver_cancel(touches),
        }
    }

    pub fn deliver_begin(&mut self, touches: &[TouchSample]) {
        let now = self.clock.now_secs();
        for touch in touches {
            if !self.accepts(touch.id) {
                continue;
            }
            if !self
                .table
                .insert(touch.id, TouchRecord::new(touch.id, touch.point(), now))
            {
                tracing::warn!(
                    id = touch.id,
                    max = MAX_TOUCH_ID,
                    "begin for a touch identifier above the supported range"
                );
                continue;
            }
            tracing::trace!(id = touch.id, x = touch.x, y = touch.y, "touch began");
            self.emit(GestureEvent::Down {
                point: touch.point(),
                id: touch.id,
            });
            if self.thresholds.pinch {
                self.offer_pinch_update(touch.id);
            }
        }
        self.pass_through(TouchPhase::Begin, touches);
    }

    pub fn deliver_move(&mut self, touches: &[TouchSample]) {
        for touch in touches {
            if !self.accepts(touch.id) {
                continue;
            }
            let point = touch.point();
            let Some(record) = self.table.get_mut(touch.id) else {
                tracing::warn!(id = touch.id, "move for a touch that never began");
                continue;
            };
            if !record.has_moved
                && record.exceeds_origin_distance(point, self.thresholds.movement)
            {
                record.has_moved = true;
            }
            record.push(point);
            let (has_moved, has_hold) = (record.has_moved, record.has_hold);

            if self.thresholds.pinch && self.offer_pinch_update(touch.id) {
                continue;
            }
            if has_moved {
                let id = touch.id;
                self.emit(if has_hold {
                    GestureEvent::Drag { point, id }
                } else {
                    GestureEvent::Scroll { point, id }
                });
            }
        }
        self.pass_through(TouchPhase::Move, touches);
    }

    pub fn deliver_end(&mut self, touches: &[TouchSample]) {
        let now = self.clock.now_secs();
        for touch in touches {
            if !self.accepts(touch.id) {
                continue;
            }
            let (point, id) = (touch.point(), touch.id);
            let Some(record) = self.table.get_mut(id) else {
                tracing::warn!(id, "end for a touch that never began");
                continue;
            };
            record.push(point);
            record.has_ended = true;
            let (has_hold, has_moved) = (record.has_hold, record.has_moved);
            let elapsed = now - record.start_time;
            let direction = record.direction(self.thresholds.movement);

            if has_hold {
                self.emit(GestureEvent::DragEnded { point, id });
                if self.thresholds.pinch {
                    self.offer_pinch_end(id);
                }
                continue;
            }
            if self.thresholds.pinch && self.offer_pinch_end(id) {
                continue;
            }
            if has_moved {
                self.emit(if elapsed < self.thresholds.flick_boundary {
                    GestureEvent::Flick {
                        point,
                        id,
                        direction,
                    }
                } else {
                    GestureEvent::Swipe {
                        point,
                        id,
                        direction,
                    }
                });
                continue;
            }

            self.emit(GestureEvent::Tap { point, id });
            let resolution = self.taps.on_tap(id, point, now, &mut self.scheduler);
            if let TapResolution::DoubleTap(point) = resolution {
                self.emit(GestureEvent::DoubleTap { point });
            }
        }
        self.pass_through(TouchPhase::End, touches);
    }

    pub fn deliver_cancel(&mut self, touches: &[TouchSample]) {
        for touch in touches {
            if !self.accepts(touch.id) {
                continue;
            }
            let (point, id) = (touch.point(), touch.id);
            let Some(record) = self.table.get_mut(id) else {
                tracing::warn!(id, "cancel for a touch that never began");
                continue;
            };
            record.push(point);
            record.has_ended = true;

            self.emit(GestureEvent::Cancelled { point, id });
            if self.thresholds.pinch {
                self.offer_pinch_end(id);
            }
        }
        self.pass_through(TouchPhase::Cancel, touches);
    }

    /// Route a timer fired by the host's scheduler.
    pub fn on_timer(&mut self, fired: FiredTimer) {
        match fired.kind {
            TimerKind::HoldPoll if self.hold.owns(fired.token) => self.on_hold_tick(),
            TimerKind::HoldPoll => {
                tracing::trace!(token = fired.token.raw(), "stale hold timer ignored");
            }
            TimerKind::TapTimeout => self.on_tap_timeout(fired.token),
        }
    }

    /// Promote idle touches to holds.
    pub fn on_hold_tick(&mut self) {
        let now = self.clock.now_secs();
        for (point, id) in self.hold.scan(now, &mut self.table, &self.pinch) {
            self.emit(GestureEvent::Hold { point, id });
        }
    }

    /// Resolve a pending tap into a single tap, unless `token` is stale.
    pub fn on_tap_timeout(&mut self, token: TimerToken) {
        let Some(tap) = self.taps.on_timeout(token) else {
            tracing::trace!(token = token.raw(), "stale tap timeout ignored");
            return;
        };
        let point = self.table.last_point(tap.id).unwrap_or(tap.point);
        self.emit(GestureEvent::SingleTap { point });
    }

    /// Every sample recorded for `id`; empty for unknown identifiers.
    pub fn touch_history(&self, id: TouchId) -> &[Point] {
        self.table.history(id)
    }

    /// Path length travelled by `id`; zero for unknown identifiers.
    pub fn total_distance(&self, id: TouchId) -> f64 {
        self.table
            .get(id)
            .map(TouchRecord::total_distance)
            .unwrap_or(0.0)
    }

    /// Start-to-end direction of `id`, with the movement threshold as the
    /// noise threshold; empty for unknown identifiers.
    pub fn direction(&self, id: TouchId) -> Direction {
        self.table
            .get(id)
            .map(|record| record.direction(self.thresholds.movement))
            .unwrap_or_default()
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn table(&self) -> &TouchTable {
        &self.table
    }

    pub fn pinch(&self) -> &PinchTracker {
        &self.pinch
    }

    /// Whether some live touch could still become a hold. While this is
    /// false, hold polls have nothing to do until the next begin.
    pub fn awaiting_hold(&self) -> bool {
        self.hold.has_candidates(&self.table, &self.pinch)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Stop the hold scan and hand back the handler.
    pub fn into_handler(mut self) -> H {
        self.hold.stop(&mut self.scheduler);
        self.handler
    }

    fn accepts(&self, id: TouchId) -> bool {
        self.thresholds.multitap || id == 0
    }

    /// Returns whether the pinch tracker claimed the touch.
    fn offer_pinch_update(&mut self, id: TouchId) -> bool {
        match self.pinch.on_touch_update(id, &self.table) {
            PinchUpdate::Unclaimed => false,
            PinchUpdate::Formed { ids } => {
                tracing::debug!(?ids, base = self.pinch.base_distance(), "pinch pair formed");
                true
            }
            PinchUpdate::Moved(PinchMotion {
                magnification,
                ids,
                closing,
            }) => {
                self.emit(GestureEvent::PinchAction { magnification, ids });
                self.emit(if closing {
                    GestureEvent::PinchIn { magnification, ids }
                } else {
                    GestureEvent::PinchOut { magnification, ids }
                });
                true
            }
        }
    }

    /// Returns whether the touch broke up an active pair.
    fn offer_pinch_end(&mut self, id: TouchId) -> bool {
        match self.pinch.on_touch_end(id, &self.table) {
            PinchRelease::Ended { magnification, ids } => {
                self.emit(GestureEvent::PinchEnded { magnification, ids });
                true
            }
            PinchRelease::Released | PinchRelease::NotRegistered => false,
        }
    }

    fn pass_through(&mut self, phase: TouchPhase, touches: &[TouchSample]) {
        let primary = if self.thresholds.multitap {
            None
        } else {
            touches.iter().find(|touch| touch.id == 0)
        };

        match (phase, primary) {
            (TouchPhase::Begin, Some(touch)) => self.handler.on_touch_began(touch),
            (TouchPhase::Move, Some(touch)) => self.handler.on_touch_moved(touch),
            (TouchPhase::End, Some(touch)) => self.handler.on_touch_ended(touch),
            (TouchPhase::Cancel, Some(touch)) => self.handler.on_touch_cancelled(touch),
            (TouchPhase::Begin, None) => self.handler.on_touches_began(touches),
            (TouchPhase::Move, None) => self.handler.on_touches_moved(touches),
            (TouchPhase::End, None) => self.handler.on_touches_ended(touches),
            (TouchPhase::Cancel, None) => self.handler.on_touches_cancelled(touches),
        }
    }

    fn emit(&mut self, event: GestureEvent) {
        tracing::debug!(gesture = event.name(), ?event, "gesture recognized");
        dispatch(&mut self.handler, event);
    }
}
