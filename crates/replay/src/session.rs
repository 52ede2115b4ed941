//! Deterministic replay of touch scripts.
//!
//! Time is taken from the script rather than the wall clock. Before each
//! batch is delivered, every timer due at or before the batch time fires
//! with the clock set to its own due time, so hold and single-tap
//! timestamps match what a live run would have produced.

use serde::Serialize;

use tapwise_classifier::{EventLog, GestureClassifier, Thresholds, TimerKind, TimerQueue};
use tapwise_common::clock::{ManualClock, MonotonicClock};
use tapwise_common::config::GestureSettings;
use tapwise_common::error::{TapwiseError, TapwiseResult};
use tapwise_gesture_model::gesture::GestureRecord;
use tapwise_gesture_model::touch::{TouchBatch, TouchScript};

use crate::settings_for_script;

type ReplayClassifier =
    GestureClassifier<ManualClock, TimerQueue<ManualClock>, EventLog<ManualClock>>;

/// Options for a replay run.
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// How long to keep time running after the last batch. Defaults to
    /// the double-tap window plus one hold poll, enough for a trailing
    /// tap to resolve.
    pub settle_secs: Option<f64>,
}

/// Counts describing a finished replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub batches: usize,
    pub samples: usize,
    pub gestures: usize,
    pub timers_fired: usize,
    /// Clock time when the replay stopped.
    pub end_time: f64,
}

/// Runs a classifier over a touch script on a manual clock.
pub struct ReplaySession {
    clock: ManualClock,
    classifier: ReplayClassifier,
    batches: usize,
    samples: usize,
    timers_fired: usize,
}

impl ReplaySession {
    pub fn new(thresholds: Thresholds) -> Self {
        let clock = ManualClock::new();
        let classifier = GestureClassifier::new(
            thresholds,
            clock.clone(),
            TimerQueue::new(clock.clone()),
            EventLog::new(clock.clone()),
        );
        Self {
            clock,
            classifier,
            batches: 0,
            samples: 0,
            timers_fired: 0,
        }
    }

    /// Build a session for `script`, taking the display size from its
    /// header when present.
    pub fn for_script(settings: &GestureSettings, script: &TouchScript) -> TapwiseResult<Self> {
        let settings = settings_for_script(settings, script.header.as_ref());
        Ok(Self::new(Thresholds::from_settings(&settings)?))
    }

    /// Replay a whole script and settle. Returns every gesture in order.
    pub fn run(
        settings: &GestureSettings,
        script: &TouchScript,
        options: &ReplayOptions,
    ) -> TapwiseResult<(Vec<GestureRecord>, ReplaySummary)> {
        let mut session = Self::for_script(settings, script)?;
        tracing::info!(
            batches = script.batches.len(),
            duration = script.duration_secs(),
            "Replay started"
        );

        for batch in &script.batches {
            session.feed(batch)?;
        }
        let settle = options
            .settle_secs
            .unwrap_or_else(|| session.default_settle());
        session.settle(settle)?;

        let summary = session.summary();
        tracing::info!(
            gestures = summary.gestures,
            timers = summary.timers_fired,
            "Replay finished"
        );
        Ok((session.finish(), summary))
    }

    /// Fire timers up to the batch time, then deliver the batch.
    ///
    /// A batch stamped earlier than the clock is delivered at the current
    /// clock time.
    pub fn feed(&mut self, batch: &TouchBatch) -> TapwiseResult<()> {
        if !batch.t.is_finite() {
            return Err(TapwiseError::replay(format!(
                "batch {} has a non-finite timestamp",
                self.batches
            )));
        }
        if batch.t < self.clock.now_secs() {
            tracing::warn!(
                t = batch.t,
                clock = self.clock.now_secs(),
                "batch timestamp went backwards"
            );
        }

        self.advance_to(batch.t);
        self.classifier.deliver(batch.phase, &batch.touches);
        self.batches += 1;
        self.samples += batch.touches.len();
        Ok(())
    }

    /// Move the clock to `t`, firing every timer that comes due on the way.
    ///
    /// Hold polls are skipped while no touch can become a hold, so a long
    /// gap between batches costs no more than a short one.
    pub fn advance_to(&mut self, t: f64) {
        loop {
            if !self.classifier.awaiting_hold() {
                let skipped = self
                    .classifier
                    .scheduler_mut()
                    .skip_until(TimerKind::HoldPoll, t);
                if skipped > 0 {
                    tracing::trace!(skipped, until = t, "idle hold polls skipped");
                }
            }
            let Some(due) = self
                .classifier
                .scheduler()
                .next_due()
                .filter(|due| *due <= t)
            else {
                break;
            };
            self.clock.set(due);
            let Some(fired) = self.classifier.scheduler_mut().pop_due(due) else {
                break;
            };
            self.classifier.on_timer(fired);
            self.timers_fired += 1;
        }
        self.clock.set(t);
    }

    /// Keep time running for `secs` past the current clock time.
    pub fn settle(&mut self, secs: f64) -> TapwiseResult<()> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(TapwiseError::replay(format!(
                "settle time must be a non-negative number of seconds, got {secs}"
            )));
        }
        let target = self.clock.now_secs() + secs;
        self.advance_to(target);
        Ok(())
    }

    pub fn default_settle(&self) -> f64 {
        let thresholds = self.classifier.thresholds();
        thresholds.double_tap_window + thresholds.hold_poll_interval
    }

    pub fn now(&self) -> f64 {
        self.clock.now_secs()
    }

    pub fn thresholds(&self) -> &Thresholds {
        self.classifier.thresholds()
    }

    /// Gestures recognized so far.
    pub fn records(&self) -> &[GestureRecord] {
        self.classifier.handler().records()
    }

    pub fn summary(&self) -> ReplaySummary {
        ReplaySummary {
            batches: self.batches,
            samples: self.samples,
            gestures: self.records().len(),
            timers_fired: self.timers_fired,
            end_time: self.now(),
        }
    }

    /// Stop the hold scan and take the recorded gestures.
    pub fn finish(self) -> Vec<GestureRecord> {
        self.classifier.into_handler().into_records()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapwise_gesture_model::touch::TouchSample;

    fn thresholds() -> Thresholds {
        Thresholds {
            movement: 10.0,
            double_tap_distance: 10.0,
            ..Thresholds::default()
        }
    }

    fn tap_at(t: f64) -> [TouchBatch; 2] {
        [
            TouchBatch::begin(t, vec![TouchSample::new(0, 50.0, 50.0)]),
            TouchBatch::end(t + 0.05, vec![TouchSample::new(0, 50.0, 50.0)]),
        ]
    }

    #[test]
    fn test_trailing_tap_needs_settle() {
        let mut session = ReplaySession::new(thresholds());
        for batch in tap_at(0.0) {
            session.feed(&batch).unwrap();
        }
        assert!(session.records().iter().all(|r| r.event.name() != "single_tap"));

        let settle = session.default_settle();
        session.settle(settle).unwrap();
        let single = session
            .records()
            .iter()
            .find(|r| r.event.name() == "single_tap")
            .copied()
            .unwrap();
        assert!((single.t - 0.30).abs() < 1e-9);
    }

    #[test]
    fn test_timers_fire_at_their_due_time() {
        let mut session = ReplaySession::new(thresholds());
        session
            .feed(&TouchBatch::begin(0.0, vec![TouchSample::new(0, 0.0, 0.0)]))
            .unwrap();
        session
            .feed(&TouchBatch::end(3.0, vec![TouchSample::new(0, 0.0, 0.0)]))
            .unwrap();

        let hold = session
            .records()
            .iter()
            .find(|r| r.event.name() == "hold")
            .copied()
            .unwrap();
        assert!(hold.t > 1.0 && hold.t < 1.2);
        // Polls stop firing once the only touch is held.
        assert_eq!(session.summary().timers_fired, 11);
    }

    #[test]
    fn test_long_gap_skips_idle_hold_polls() {
        let mut session = ReplaySession::new(thresholds());
        for batch in tap_at(0.0).into_iter().chain(tap_at(1e7)) {
            session.feed(&batch).unwrap();
        }
        let settle = session.default_settle();
        session.settle(settle).unwrap();

        let names: Vec<&str> = session.records().iter().map(|r| r.event.name()).collect();
        assert_eq!(
            names,
            vec!["down", "tap", "single_tap", "down", "tap", "single_tap"]
        );
        assert!(session.summary().timers_fired < 10);
    }

    #[test]
    fn test_backwards_batch_is_delivered_at_clock_time() {
        let mut session = ReplaySession::new(thresholds());
        session
            .feed(&TouchBatch::begin(1.0, vec![TouchSample::new(0, 0.0, 0.0)]))
            .unwrap();
        session
            .feed(&TouchBatch::end(0.5, vec![TouchSample::new(0, 0.0, 0.0)]))
            .unwrap();
        assert_eq!(session.now(), 1.0);
        assert_eq!(session.records().last().map(|r| r.t), Some(1.0));
    }

    #[test]
    fn test_invalid_times_are_rejected() {
        let mut session = ReplaySession::new(thresholds());
        let batch = TouchBatch::begin(f64::NAN, vec![TouchSample::new(0, 0.0, 0.0)]);
        assert!(session.feed(&batch).is_err());
        assert!(session.settle(-1.0).is_err());
        assert_eq!(session.summary().batches, 0);
    }

    #[test]
    fn test_run_uses_header_display_size() {
        let script = TouchScript {
            header: Some(tapwise_gesture_model::touch::ScriptHeader::now(30.0, 40.0)),
            batches: Vec::new(),
        };
        let session = ReplaySession::for_script(&GestureSettings::default(), &script).unwrap();
        assert!((session.thresholds().movement - 5.0).abs() < 1e-12);

        let (records, summary) =
            ReplaySession::run(&GestureSettings::default(), &script, &ReplayOptions::default())
                .unwrap();
        assert!(records.is_empty());
        assert_eq!(summary.batches, 0);
    }
}
