//! Real-time classification loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tapwise_classifier::{EventLog, GestureClassifier, Thresholds, TimerQueue};
use tapwise_common::clock::{MonotonicClock, SystemClock};
use tapwise_common::error::TapwiseResult;
use tapwise_gesture_model::gesture::GestureRecord;

use crate::writer::GestureWriter;
use crate::TouchSource;

type LiveClassifier =
    GestureClassifier<SystemClock, TimerQueue<SystemClock>, EventLog<SystemClock>>;

/// Couples a touch source with a classifier running on the system clock.
pub struct LiveSession {
    source: Box<dyn TouchSource>,
    clock: SystemClock,
    classifier: LiveClassifier,
    writer: Option<GestureWriter>,
    collected: Vec<GestureRecord>,
    stop_flag: Arc<AtomicBool>,
    settle_secs: f64,
    gestures_emitted: u64,
}

impl LiveSession {
    /// Create a session. Gestures go to `writer` when given, otherwise
    /// they are kept in memory.
    pub fn new(
        source: Box<dyn TouchSource>,
        thresholds: Thresholds,
        writer: Option<GestureWriter>,
    ) -> Self {
        let clock = SystemClock::start();
        let settle_secs = thresholds.double_tap_window + thresholds.hold_poll_interval;
        let classifier = GestureClassifier::new(
            thresholds,
            clock.clone(),
            TimerQueue::new(clock.clone()),
            EventLog::new(clock.clone()),
        );

        Self {
            source,
            clock,
            classifier,
            writer,
            collected: Vec::new(),
            stop_flag: Arc::new(AtomicBool::new(false)),
            settle_secs,
            gestures_emitted: 0,
        }
    }

    /// How long to keep running once the source is finished.
    pub fn with_settle(mut self, secs: f64) -> Self {
        self.settle_secs = secs.max(0.0);
        self
    }

    /// Run until the stop flag is set, or until the source is finished
    /// and the settle time has passed. Returns the number of gestures.
    pub async fn run(&mut self) -> TapwiseResult<u64> {
        tracing::info!(
            source = %self.source.name(),
            epoch = %self.clock.epoch_wall(),
            "Live session started"
        );

        let mut finished_at: Option<f64> = None;
        while !self.stop_flag.load(Ordering::Relaxed) {
            let now = self.clock.now_secs();
            self.fire_due(now);

            match self.source.poll(now) {
                Ok(Some(batch)) => {
                    tracing::trace!(t = batch.t, phase = ?batch.phase, "batch delivered");
                    self.classifier.deliver(batch.phase, &batch.touches);
                    self.collect()?;
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Touch source error");
                }
            }
            self.collect()?;

            if self.source.is_finished() {
                let done = *finished_at.get_or_insert(now);
                if now - done >= self.settle_secs {
                    break;
                }
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
        }

        self.collect()?;
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        tracing::info!(gestures = self.gestures_emitted, "Live session stopped");
        Ok(self.gestures_emitted)
    }

    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// The stop flag, for external coordination (e.g. a Ctrl-C handler).
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    pub fn gestures_emitted(&self) -> u64 {
        self.gestures_emitted
    }

    /// Gestures kept in memory (empty when writing to a file).
    pub fn records(&self) -> &[GestureRecord] {
        &self.collected
    }

    fn fire_due(&mut self, now: f64) {
        while let Some(fired) = self.classifier.scheduler_mut().pop_due(now) {
            self.classifier.on_timer(fired);
        }
    }

    fn collect(&mut self) -> TapwiseResult<()> {
        let records = self.classifier.handler_mut().drain();
        self.gestures_emitted += records.len() as u64;
        match self.writer.as_mut() {
            Some(writer) => writer.write_all(&records)?,
            None => self.collected.extend(records),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScriptSource;
    use tapwise_gesture_model::touch::{TouchBatch, TouchSample, TouchScript};

    fn thresholds() -> Thresholds {
        Thresholds {
            movement: 10.0,
            double_tap_distance: 10.0,
            ..Thresholds::default()
        }
    }

    fn tap_script() -> TouchScript {
        TouchScript {
            header: None,
            batches: vec![
                TouchBatch::begin(0.0, vec![TouchSample::new(0, 20.0, 20.0)]),
                TouchBatch::end(0.02, vec![TouchSample::new(0, 20.0, 20.0)]),
            ],
        }
    }

    #[tokio::test]
    async fn test_live_tap_resolves_to_single_tap() {
        let source = ScriptSource::new("tap", tap_script());
        let mut session = LiveSession::new(Box::new(source), thresholds(), None).with_settle(0.4);

        let emitted = session.run().await.unwrap();
        let names: Vec<&str> = session.records().iter().map(|r| r.event.name()).collect();
        assert_eq!(names, vec!["down", "tap", "single_tap"]);
        assert_eq!(emitted, 3);
    }

    #[tokio::test]
    async fn test_stop_flag_ends_session() {
        let source = ScriptSource::new("tap", tap_script());
        let mut session = LiveSession::new(Box::new(source), thresholds(), None);
        session.stop();

        assert_eq!(session.run().await.unwrap(), 0);
        assert!(session.records().is_empty());
    }

    #[tokio::test]
    async fn test_live_session_writes_stream() {
        let dir = std::env::temp_dir().join("tapwise_test_live");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("gestures.jsonl");

        let header = tapwise_gesture_model::gesture::GestureStreamHeader::new("tap");
        let writer = GestureWriter::create(&path, &header).unwrap();
        let source = ScriptSource::new("tap", tap_script());
        let mut session =
            LiveSession::new(Box::new(source), thresholds(), Some(writer)).with_settle(0.0);

        let emitted = session.run().await.unwrap();
        assert!(emitted >= 2);
        assert!(session.records().is_empty());

        let content = std::fs::read_to_string(&path).unwrap();
        let records = tapwise_gesture_model::gesture::parse_gestures(&content).unwrap();
        assert_eq!(records.len() as u64, emitted);

        std::fs::remove_dir_all(&dir).ok();
    }
}
