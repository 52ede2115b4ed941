//! Per-touch state.

use tapwise_gesture_model::direction::Direction;
use tapwise_gesture_model::point::{path_length, Point};
use tapwise_gesture_model::touch::TouchId;

/// Everything the classifier remembers about one finger.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchRecord {
    pub id: TouchId,

    /// Clock time of the begin event (seconds).
    pub start_time: f64,

    /// Travelled beyond the movement threshold at some point. Sticky.
    pub has_moved: bool,

    /// Promoted to a hold by the hold scan.
    pub has_hold: bool,

    /// Received its end or cancel event.
    pub has_ended: bool,

    /// Every sample seen for this finger, oldest first. Never empty.
    history: Vec<Point>,
}

impl TouchRecord {
    /// A fresh record whose history starts with `point`.
    pub fn new(id: TouchId, point: Point, start_time: f64) -> Self {
        Self {
            id,
            start_time,
            has_moved: false,
            has_hold: false,
            has_ended: false,
            history: vec![point],
        }
    }

    pub fn push(&mut self, point: Point) {
        self.history.push(point);
    }

    pub fn history(&self) -> &[Point] {
        &self.history
    }

    pub fn first_point(&self) -> Point {
        self.history[0]
    }

    pub fn last_point(&self) -> Point {
        self.history[self.history.len() - 1]
    }

    /// Whether `point` lies farther than `threshold` from the first sample.
    pub fn exceeds_origin_distance(&self, point: Point, threshold: f64) -> bool {
        self.first_point().distance(&point) > threshold
    }

    /// Length of the whole path travelled.
    pub fn total_distance(&self) -> f64 {
        path_length(&self.history)
    }

    /// Direction from the first to the last sample, ignoring axes that
    /// moved less than `correction`.
    pub fn direction(&self, correction: f64) -> Direction {
        Direction::between(self.first_point(), self.last_point(), correction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_has_one_sample() {
        let record = TouchRecord::new(2, Point::new(1.0, 1.0), 0.5);
        assert_eq!(record.history().len(), 1);
        assert_eq!(record.first_point(), record.last_point());
        assert_eq!(record.total_distance(), 0.0);
        assert!(record.direction(5.0).is_empty());
    }

    #[test]
    fn test_metrics_follow_history() {
        let mut record = TouchRecord::new(0, Point::new(0.0, 0.0), 0.0);
        record.push(Point::new(0.0, 30.0));
        record.push(Point::new(40.0, 30.0));
        assert!((record.total_distance() - 70.0).abs() < 1e-12);
        assert_eq!(record.direction(5.0), Direction::UP | Direction::RIGHT);
        assert!(record.exceeds_origin_distance(Point::new(40.0, 30.0), 49.0));
        assert!(!record.exceeds_origin_distance(Point::new(40.0, 30.0), 50.0));
    }
}
