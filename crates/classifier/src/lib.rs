//! Tapwise Classifier
//!
//! Turns batches of raw touch samples into semantic gestures:
//! - **Taps:** tap, single tap, double tap
//! - **Holds:** hold, drag, drag ended
//! - **Moves:** scroll, flick, swipe
//! - **Pinch:** action, in, out, ended
//!
//! This crate is pure computation: time comes from an injected
//! [`MonotonicClock`](tapwise_common::clock::MonotonicClock), timers from
//! an injected [`Scheduler`], and results go to a [`GestureHandler`].
//! Nothing here blocks or performs I/O.

pub mod classifier;
pub mod handler;
pub mod hold;
pub mod pinch;
pub mod record;
pub mod scheduler;
pub mod table;
pub mod tap;
pub mod thresholds;

pub use classifier::GestureClassifier;
pub use handler::{EventLog, GestureHandler, RawDelivery};
pub use scheduler::{FiredTimer, Scheduler, TimerKind, TimerQueue, TimerToken};
pub use thresholds::Thresholds;
