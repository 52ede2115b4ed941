//! Index-stable storage of touch records.
//!
//! A touch identifier is also its slot index, so identifiers handed out in
//! callbacks can be looked up directly. Identifiers may arrive sparsely
//! (e.g. 2 before 0); the gaps are filled with empty placeholder slots.
//! Identifiers above [`MAX_TOUCH_ID`] are refused so the table stays small.

use tapwise_gesture_model::point::Point;
use tapwise_gesture_model::touch::{TouchId, MAX_TOUCH_ID};

use crate::record::TouchRecord;

#[derive(Debug, Default, Clone)]
pub struct TouchTable {
    slots: Vec<Option<TouchRecord>>,
}

impl TouchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record` at slot `id`, replacing whatever was there and
    /// growing the table with placeholders when `id` is past the end.
    /// Returns `false`, leaving the table untouched, when `id` exceeds
    /// [`MAX_TOUCH_ID`].
    pub fn insert(&mut self, id: TouchId, record: TouchRecord) -> bool {
        if id > MAX_TOUCH_ID {
            return false;
        }
        let index = id as usize;
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index] = Some(record);
        true
    }

    /// The record at `id`, or `None` for out-of-range ids and placeholders.
    pub fn get(&self, id: TouchId) -> Option<&TouchRecord> {
        self.slots.get(id as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: TouchId) -> Option<&mut TouchRecord> {
        self.slots.get_mut(id as usize).and_then(Option::as_mut)
    }

    /// Whether `id` is within bounds but holds no record.
    pub fn is_placeholder(&self, id: TouchId) -> bool {
        matches!(self.slots.get(id as usize), Some(None))
    }

    /// Number of slots, placeholders included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// History of `id`; empty when there is no record.
    pub fn history(&self, id: TouchId) -> &[Point] {
        self.get(id).map(TouchRecord::history).unwrap_or(&[])
    }

    pub fn last_point(&self, id: TouchId) -> Option<Point> {
        self.get(id).map(TouchRecord::last_point)
    }

    /// All real records, in identifier order.
    pub fn records(&self) -> impl Iterator<Item = &TouchRecord> {
        self.slots.iter().flatten()
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut TouchRecord> {
        self.slots.iter_mut().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: TouchId) -> TouchRecord {
        TouchRecord::new(id, Point::new(id as f64, 0.0), 0.0)
    }

    #[test]
    fn test_sparse_arrival_fills_placeholders() {
        let mut table = TouchTable::new();
        table.insert(2, record(2));
        table.insert(0, record(0));

        assert_eq!(table.len(), 3);
        assert!(table.get(0).is_some());
        assert!(table.is_placeholder(1));
        assert!(table.get(1).is_none());
        assert!(table.history(1).is_empty());
        assert_eq!(table.get(2).map(|r| r.id), Some(2));
    }

    #[test]
    fn test_insert_overwrites_existing_slot() {
        let mut table = TouchTable::new();
        table.insert(0, record(0));
        table.get_mut(0).unwrap().push(Point::new(9.0, 9.0));
        table.insert(0, TouchRecord::new(0, Point::new(5.0, 5.0), 1.0));

        assert_eq!(table.len(), 1);
        assert_eq!(table.history(0), &[Point::new(5.0, 5.0)]);
    }

    #[test]
    fn test_identifier_above_limit_is_refused() {
        let mut table = TouchTable::new();
        assert!(!table.insert(3_000_000_000, record(3_000_000_000)));
        assert!(table.is_empty());
        assert!(table.get(3_000_000_000).is_none());

        assert!(table.insert(MAX_TOUCH_ID, record(MAX_TOUCH_ID)));
        assert_eq!(table.len(), MAX_TOUCH_ID as usize + 1);
    }

    #[test]
    fn test_out_of_range_reads_are_neutral() {
        let table = TouchTable::new();
        assert!(table.get(7).is_none());
        assert!(!table.is_placeholder(7));
        assert!(table.history(7).is_empty());
        assert!(table.last_point(7).is_none());
    }

    #[test]
    fn test_records_skip_placeholders() {
        let mut table = TouchTable::new();
        table.insert(3, record(3));
        table.insert(1, record(1));
        let ids: Vec<TouchId> = table.records().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
