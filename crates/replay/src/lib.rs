//! Tapwise Replay
//!
//! Host glue around the classifier. Feeds it touch batches from a
//! pluggable source and collects the recognized gestures:
//!
//! - **Deterministic:** [`ReplaySession`] drives a manual clock from the
//!   script's own timestamps, so the same script always yields the same
//!   gestures.
//! - **Live:** [`LiveSession`] polls a [`TouchSource`] against the system
//!   clock and fires timers as real time passes.
//!
//! Gesture streams are written in append-only JSONL format.

pub mod live;
pub mod session;
pub mod source;
pub mod writer;

pub use live::LiveSession;
pub use session::{ReplayOptions, ReplaySession, ReplaySummary};
pub use source::ScriptSource;
pub use writer::GestureWriter;

use std::path::Path;

use tapwise_common::config::GestureSettings;
use tapwise_common::error::{TapwiseError, TapwiseResult};
use tapwise_gesture_model::touch::{parse_script, ScriptHeader, TouchBatch, TouchScript};

/// Trait for touch input sources.
pub trait TouchSource: Send {
    /// Poll for the next batch due at `now` (seconds since the session
    /// started). Returns `None` if nothing is ready yet.
    fn poll(&mut self, now: f64) -> TapwiseResult<Option<TouchBatch>>;

    /// Source name for logging.
    fn name(&self) -> &str;

    /// Whether the source will never produce another batch.
    fn is_finished(&self) -> bool;
}

/// Read and parse a touch script file.
pub fn load_script(path: &Path) -> TapwiseResult<TouchScript> {
    if !path.exists() {
        return Err(TapwiseError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let script = parse_script(&content)
        .map_err(|e| TapwiseError::script(e.line, e.source.to_string()))?;
    tracing::debug!(
        path = %path.display(),
        batches = script.batches.len(),
        "Touch script loaded"
    );
    Ok(script)
}

/// Settings adjusted to the display a script was recorded on.
///
/// A header display size replaces the configured one; explicit overrides
/// in `settings` are kept.
pub fn settings_for_script(
    settings: &GestureSettings,
    header: Option<&ScriptHeader>,
) -> GestureSettings {
    let mut adjusted = settings.clone();
    if let Some(header) = header {
        if let (Some(width), Some(height)) = (header.display_width, header.display_height) {
            adjusted.display_width = width;
            adjusted.display_height = height;
        }
    }
    adjusted
}
