//! Tapwise Gesture Model
//!
//! Defines the data contracts shared by the classifier and its hosts:
//! - **Geometry:** [`Point`] and [`Direction`] flags
//! - **Touch input:** samples, batches, and the JSONL touch-script format
//! - **Gestures:** the semantic [`GestureEvent`] set and timestamped records
//!
//! Coordinates are in display units with y growing upward.

pub mod direction;
pub mod gesture;
pub mod point;
pub mod touch;

pub use direction::*;
pub use gesture::*;
pub use point::*;
pub use touch::*;
