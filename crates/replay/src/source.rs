//! Touch sources.

use std::collections::VecDeque;

use tapwise_common::error::TapwiseResult;
use tapwise_gesture_model::touch::{TouchBatch, TouchScript};

use crate::TouchSource;

/// Plays a touch script back at the pace it was recorded.
///
/// Batch times are taken relative to the first batch, so a script that
/// starts at `t = 12.0` is replayed from the first poll onwards.
#[derive(Debug)]
pub struct ScriptSource {
    name: String,
    pending: VecDeque<TouchBatch>,
    script_origin: f64,
    origin: Option<f64>,
}

impl ScriptSource {
    pub fn new(name: impl Into<String>, script: TouchScript) -> Self {
        let script_origin = script.batches.first().map(|b| b.t).unwrap_or(0.0);
        Self {
            name: name.into(),
            pending: script.batches.into(),
            script_origin,
            origin: None,
        }
    }

    /// Batches not yet delivered.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl TouchSource for ScriptSource {
    fn poll(&mut self, now: f64) -> TapwiseResult<Option<TouchBatch>> {
        let origin = *self.origin.get_or_insert(now);
        let elapsed = now - origin;

        match self.pending.front() {
            Some(batch) if batch.t - self.script_origin <= elapsed => Ok(self.pending.pop_front()),
            _ => Ok(None),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}
