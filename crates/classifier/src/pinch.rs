//! Two-finger pinch tracking.
//!
//! The first two fingers to touch down are registered into two slots.
//! While both slots are occupied the pair is active: it claims those
//! fingers' moves so they are not reported as scrolls or drags, and the
//! distance between them is compared against the distance at the moment
//! the pair formed. Whenever the pair changes (a finger lifts and another
//! takes its slot) the base distance is measured again.

use tapwise_gesture_model::touch::TouchId;

use crate::table::TouchTable;

/// Coarse state of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinchState {
    Idle,
    OneRegistered,
    Active,
}

/// Magnification of an active pair after a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchMotion {
    /// Current distance over the base distance.
    pub magnification: f64,
    pub ids: [TouchId; 2],
    /// The fingers got closer since the previous update.
    pub closing: bool,
}

/// Result of offering a begin or move to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PinchUpdate {
    /// The touch is not part of an active pair.
    Unclaimed,
    /// This touch completed a new pair; distances were re-baselined.
    Formed { ids: [TouchId; 2] },
    /// The active pair moved.
    Moved(PinchMotion),
}

impl PinchUpdate {
    pub fn is_claimed(&self) -> bool {
        !matches!(self, PinchUpdate::Unclaimed)
    }
}

/// Result of offering an end or cancel to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PinchRelease {
    /// The touch held no slot.
    NotRegistered,
    /// The touch held a slot but the pair was not active.
    Released,
    /// The touch broke up an active pair.
    Ended { magnification: f64, ids: [TouchId; 2] },
}

impl PinchRelease {
    pub fn is_claimed(&self) -> bool {
        matches!(self, PinchRelease::Ended { .. })
    }
}

#[derive(Debug, Default, Clone)]
pub struct PinchTracker {
    slots: [Option<TouchId>; 2],
    base_distance: f64,
    previous_distance: f64,
}

impl PinchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PinchState {
        match self.slots {
            [Some(_), Some(_)] => PinchState::Active,
            [None, None] => PinchState::Idle,
            _ => PinchState::OneRegistered,
        }
    }

    /// Identifiers of the active pair.
    pub fn active_pair(&self) -> Option<[TouchId; 2]> {
        match self.slots {
            [Some(a), Some(b)] => Some([a, b]),
            _ => None,
        }
    }

    /// Whether `id` is one of the two fingers of an active pair.
    pub fn is_pinching(&self, id: TouchId) -> bool {
        self.active_pair().is_some_and(|pair| pair.contains(&id))
    }

    pub fn is_registered(&self, id: TouchId) -> bool {
        self.slots.contains(&Some(id))
    }

    pub fn base_distance(&self) -> f64 {
        self.base_distance
    }

    /// Offer a begin or move of `id`. The touch's latest sample must
    /// already be in `table`.
    pub fn on_touch_update(&mut self, id: TouchId, table: &TouchTable) -> PinchUpdate {
        let mut newly_registered = false;
        if !self.is_registered(id) {
            if let Some(slot) = self.slots.iter_mut().find(|slot| slot.is_none()) {
                *slot = Some(id);
                newly_registered = true;
            }
        }

        let Some(ids) = self.active_pair() else {
            return PinchUpdate::Unclaimed;
        };
        if !ids.contains(&id) {
            return PinchUpdate::Unclaimed;
        }

        let distance = pair_distance(table, ids);
        if newly_registered {
            self.base_distance = distance;
            self.previous_distance = distance;
            return PinchUpdate::Formed { ids };
        }

        let motion = PinchMotion {
            magnification: self.magnification(distance),
            ids,
            closing: distance < self.previous_distance,
        };
        self.previous_distance = distance;
        PinchUpdate::Moved(motion)
    }

    /// Offer an end or cancel of `id`. The touch's final sample must
    /// already be in `table`.
    pub fn on_touch_end(&mut self, id: TouchId, table: &TouchTable) -> PinchRelease {
        let Some(slot) = self.slots.iter().position(|slot| *slot == Some(id)) else {
            return PinchRelease::NotRegistered;
        };

        let release = match self.active_pair() {
            Some(ids) => PinchRelease::Ended {
                magnification: self.magnification(pair_distance(table, ids)),
                ids,
            },
            None => PinchRelease::Released,
        };

        self.slots[slot] = None;
        self.base_distance = 0.0;
        self.previous_distance = 0.0;
        release
    }

    fn magnification(&self, distance: f64) -> f64 {
        if self.base_distance == 0.0 {
            1.0
        } else {
            distance / self.base_distance
        }
    }
}

fn pair_distance(table: &TouchTable, [a, b]: [TouchId; 2]) -> f64 {
    match (table.last_point(a), table.last_point(b)) {
        (Some(pa), Some(pb)) => pa.distance(&pb),
        _ => 0.0,
    }
}
