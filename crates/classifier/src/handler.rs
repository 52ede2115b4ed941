//! Gesture output.
//!
//! [`GestureHandler`] has one method per gesture, each a no-op by default,
//! so an application implements only what it cares about. The raw
//! passthrough methods receive the untouched input batches after the
//! classifier has processed them.

use tapwise_common::clock::MonotonicClock;
use tapwise_gesture_model::direction::Direction;
use tapwise_gesture_model::gesture::{GestureEvent, GestureRecord};
use tapwise_gesture_model::point::Point;
use tapwise_gesture_model::touch::{TouchId, TouchPhase, TouchSample};

/// Receiver of classified gestures.
#[allow(unused_variables)]
pub trait GestureHandler {
    fn on_down(&mut self, point: Point, id: TouchId) {}
    fn on_tap(&mut self, point: Point, id: TouchId) {}
    fn on_single_tap(&mut self, point: Point) {}
    fn on_double_tap(&mut self, point: Point) {}
    fn on_hold(&mut self, point: Point, id: TouchId) {}
    fn on_cancelled(&mut self, point: Point, id: TouchId) {}

    fn on_scroll(&mut self, point: Point, id: TouchId) {}
    fn on_flick(&mut self, point: Point, id: TouchId, direction: Direction) {}
    fn on_swipe(&mut self, point: Point, id: TouchId, direction: Direction) {}
    fn on_drag(&mut self, point: Point, id: TouchId) {}
    fn on_drag_ended(&mut self, point: Point, id: TouchId) {}

    fn on_pinch_action(&mut self, magnification: f64, id1: TouchId, id2: TouchId) {}
    fn on_pinch_in(&mut self, magnification: f64, id1: TouchId, id2: TouchId) {}
    fn on_pinch_out(&mut self, magnification: f64, id1: TouchId, id2: TouchId) {}
    fn on_pinch_ended(&mut self, magnification: f64, id1: TouchId, id2: TouchId) {}

    // Raw passthrough in single-identifier mode: identifier 0 only.
    fn on_touch_began(&mut self, touch: &TouchSample) {}
    fn on_touch_moved(&mut self, touch: &TouchSample) {}
    fn on_touch_ended(&mut self, touch: &TouchSample) {}
    fn on_touch_cancelled(&mut self, touch: &TouchSample) {}

    // Raw passthrough in multi-touch mode: the whole batch.
    fn on_touches_began(&mut self, touches: &[TouchSample]) {}
    fn on_touches_moved(&mut self, touches: &[TouchSample]) {}
    fn on_touches_ended(&mut self, touches: &[TouchSample]) {}
    fn on_touches_cancelled(&mut self, touches: &[TouchSample]) {}
}

/// Route a gesture to the matching handler method.
pub fn dispatch<H: GestureHandler + ?Sized>(handler: &mut H, event: GestureEvent) {
    match event {
        GestureEvent::Down { point, id } => handler.on_down(point, id),
        GestureEvent::Tap { point, id } => handler.on_tap(point, id),
        GestureEvent::SingleTap { point } => handler.on_single_tap(point),
        GestureEvent::DoubleTap { point } => handler.on_double_tap(point),
        GestureEvent::Hold { point, id } => handler.on_hold(point, id),
        GestureEvent::Cancelled { point, id } => handler.on_cancelled(point, id),
        GestureEvent::Scroll { point, id } => handler.on_scroll(point, id),
        GestureEvent::Drag { point, id } => handler.on_drag(point, id),
        GestureEvent::DragEnded { point, id } => handler.on_drag_ended(point, id),
        GestureEvent::Flick {
            point,
            id,
            direction,
        } => handler.on_flick(point, id, direction),
        GestureEvent::Swipe {
            point,
            id,
            direction,
        } => handler.on_swipe(point, id, direction),
        GestureEvent::PinchAction { magnification, ids } => {
            handler.on_pinch_action(magnification, ids[0], ids[1])
        }
        GestureEvent::PinchIn { magnification, ids } => {
            handler.on_pinch_in(magnification, ids[0], ids[1])
        }
        GestureEvent::PinchOut { magnification, ids } => {
            handler.on_pinch_out(magnification, ids[0], ids[1])
        }
        GestureEvent::PinchEnded { magnification, ids } => {
            handler.on_pinch_ended(magnification, ids[0], ids[1])
        }
    }
}

/// One raw passthrough delivery seen by an [`EventLog`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawDelivery {
    pub phase: TouchPhase,
    /// Delivered through the single-identifier methods.
    pub single: bool,
    pub touches: Vec<TouchSample>,
}

/// A handler that records every gesture with the time it arrived.
#[derive(Debug, Clone)]
pub struct EventLog<C> {
    clock: C,
    records: Vec<GestureRecord>,
    raw: Vec<RawDelivery>,
}

impl<C: MonotonicClock> EventLog<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            records: Vec::new(),
            raw: Vec::new(),
        }
    }

    pub fn records(&self) -> &[GestureRecord] {
        &self.records
    }

    pub fn events(&self) -> impl Iterator<Item = &GestureEvent> {
        self.records.iter().map(|record| &record.event)
    }

    /// Gestures with the given serialized name (e.g. `"single_tap"`).
    pub fn named(&self, name: &str) -> Vec<GestureEvent> {
        self.events()
            .filter(|event| event.name() == name)
            .copied()
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events().filter(|event| event.name() == name).count()
    }

    pub fn raw(&self) -> &[RawDelivery] {
        &self.raw
    }

    /// Take the recorded gestures, leaving the log empty.
    pub fn drain(&mut self) -> Vec<GestureRecord> {
        self.raw.clear();
        std::mem::take(&mut self.records)
    }

    pub fn into_records(self) -> Vec<GestureRecord> {
        self.records
    }

    fn push(&mut self, event: GestureEvent) {
        self.records.push(GestureRecord {
            t: self.clock.now_secs(),
            event,
        });
    }

    fn push_raw(&mut self, phase: TouchPhase, single: bool, touches: &[TouchSample]) {
        self.raw.push(RawDelivery {
            phase,
            single,
            touches: touches.to_vec(),
        });
    }
}

impl<C: MonotonicClock> GestureHandler for EventLog<C> {
    fn on_down(&mut self, point: Point, id: TouchId) {
        self.push(GestureEvent::Down { point, id });
    }

    fn on_tap(&mut self, point: Point, id: TouchId) {
        self.push(GestureEvent::Tap { point, id });
    }

    fn on_single_tap(&mut self, point: Point) {
        self.push(GestureEvent::SingleTap { point });
    }

    fn on_double_tap(&mut self, point: Point) {
        self.push(GestureEvent::DoubleTap { point });
    }

    fn on_hold(&mut self, point: Point, id: TouchId) {
        self.push(GestureEvent::Hold { point, id });
    }

    fn on_cancelled(&mut self, point: Point, id: TouchId) {
        self.push(GestureEvent::Cancelled { point, id });
    }

    fn on_scroll(&mut self, point: Point, id: TouchId) {
        self.push(GestureEvent::Scroll { point, id });
    }

    fn on_flick(&mut self, point: Point, id: TouchId, direction: Direction) {
        self.push(GestureEvent::Flick {
            point,
            id,
            direction,
        });
    }

    fn on_swipe(&mut self, point: Point, id: TouchId, direction: Direction) {
        self.push(GestureEvent::Swipe {
            point,
            id,
            direction,
        });
    }

    fn on_drag(&mut self, point: Point, id: TouchId) {
        self.push(GestureEvent::Drag { point, id });
    }

    fn on_drag_ended(&mut self, point: Point, id: TouchId) {
        self.push(GestureEvent::DragEnded { point, id });
    }

    fn on_pinch_action(&mut self, magnification: f64, id1: TouchId, id2: TouchId) {
        self.push(GestureEvent::PinchAction {
            magnification,
            ids: [id1, id2],
        });
    }

    fn on_pinch_in(&mut self, magnification: f64, id1: TouchId, id2: TouchId) {
        self.push(GestureEvent::PinchIn {
            magnification,
            ids: [id1, id2],
        });
    }

    fn on_pinch_out(&mut self, magnification: f64, id1: TouchId, id2: TouchId) {
        self.push(GestureEvent::PinchOut {
            magnification,
            ids: [id1, id2],
        });
    }

    fn on_pinch_ended(&mut self, magnification: f64, id1: TouchId, id2: TouchId) {
        self.push(GestureEvent::PinchEnded {
            magnification,
            ids: [id1, id2],
        });
    }

    fn on_touch_began(&mut self, touch: &TouchSample) {
        self.push_raw(TouchPhase::Begin, true, std::slice::from_ref(touch));
    }

    fn on_touch_moved(&mut self, touch: &TouchSample) {
        self.push_raw(TouchPhase::Move, true, std::slice::from_ref(touch));
    }

    fn on_touch_ended(&mut self, touch: &TouchSample) {
        self.push_raw(TouchPhase::End, true, std::slice::from_ref(touch));
    }

    fn on_touch_cancelled(&mut self, touch: &TouchSample) {
        self.push_raw(TouchPhase::Cancel, true, std::slice::from_ref(touch));
    }

    fn on_touches_began(&mut self, touches: &[TouchSample]) {
        self.push_raw(TouchPhase::Begin, false, touches);
    }

    fn on_touches_moved(&mut self, touches: &[TouchSample]) {
        self.push_raw(TouchPhase::Move, false, touches);
    }

    fn on_touches_ended(&mut self, touches: &[TouchSample]) {
        self.push_raw(TouchPhase::End, false, touches);
    }

    fn on_touches_cancelled(&mut self, touches: &[TouchSample]) {
        self.push_raw(TouchPhase::Cancel, false, touches);
    }
}

impl<H: GestureHandler + ?Sized> GestureHandler for &mut H {
    fn on_down(&mut self, point: Point, id: TouchId) {
        (**self).on_down(point, id)
    }
    fn on_tap(&mut self, point: Point, id: TouchId) {
        (**self).on_tap(point, id)
    }
    fn on_single_tap(&mut self, point: Point) {
        (**self).on_single_tap(point)
    }
    fn on_double_tap(&mut self, point: Point) {
        (**self).on_double_tap(point)
    }
    fn on_hold(&mut self, point: Point, id: TouchId) {
        (**self).on_hold(point, id)
    }
    fn on_cancelled(&mut self, point: Point, id: TouchId) {
        (**self).on_cancelled(point, id)
    }
    fn on_scroll(&mut self, point: Point, id: TouchId) {
        (**self).on_scroll(point, id)
    }
    fn on_flick(&mut self, point: Point, id: TouchId, direction: Direction) {
        (**self).on_flick(point, id, direction)
    }
    fn on_swipe(&mut self, point: Point, id: TouchId, direction: Direction) {
        (**self).on_swipe(point, id, direction)
    }
    fn on_drag(&mut self, point: Point, id: TouchId) {
        (**self).on_drag(point, id)
    }
    fn on_drag_ended(&mut self, point: Point, id: TouchId) {
        (**self).on_drag_ended(point, id)
    }
    fn on_pinch_action(&mut self, magnification: f64, id1: TouchId, id2: TouchId) {
        (**self).on_pinch_action(magnification, id1, id2)
    }
    fn on_pinch_in(&mut self, magnification: f64, id1: TouchId, id2: TouchId) {
        (**self).on_pinch_in(magnification, id1, id2)
    }
    fn on_pinch_out(&mut self, magnification: f64, id1: TouchId, id2: TouchId) {
        (**self).on_pinch_out(magnification, id1, id2)
    }
    fn on_pinch_ended(&mut self, magnification: f64, id1: TouchId, id2: TouchId) {
        (**self).on_pinch_ended(magnification, id1, id2)
    }
    fn on_touch_began(&mut self, touch: &TouchSample) {
        (**self).on_touch_began(touch)
    }
    fn on_touch_moved(&mut self, touch: &TouchSample) {
        (**self).on_touch_moved(touch)
    }
    fn on_touch_ended(&mut self, touch: &TouchSample) {
        (**self).on_touch_ended(touch)
    }
    fn on_touch_cancelled(&mut self, touch: &TouchSample) {
        (**self).on_touch_cancelled(touch)
    }
    fn on_touches_began(&mut self, touches: &[TouchSample]) {
        (**self).on_touches_began(touches)
    }
    fn on_touches_moved(&mut self, touches: &[TouchSample]) {
        (**self).on_touches_moved(touches)
    }
    fn on_touches_ended(&mut self, touches: &[TouchSample]) {
        (**self).on_touches_ended(touches)
    }
    fn on_touches_cancelled(&mut self, touches: &[TouchSample]) {
        (**self).on_touches_cancelled(touches)
    }
}
