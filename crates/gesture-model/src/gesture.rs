//! Semantic gesture events.

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::point::Point;
use crate::touch::TouchId;

/// Current gesture-stream schema version.
pub const GESTURE_SCHEMA_VERSION: &str = "1.0";

/// A recognized gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    /// A finger touched down.
    Down { point: Point, id: TouchId },

    /// An unmoved, unheld finger lifted.
    Tap { point: Point, id: TouchId },

    /// A tap that was not followed by a second one in time.
    SingleTap { point: Point },

    /// Two taps of the same finger close in time and space.
    DoubleTap { point: Point },

    /// A finger stayed down without moving long enough.
    Hold { point: Point, id: TouchId },

    /// The host cancelled a touch.
    Cancelled { point: Point, id: TouchId },

    /// A moving finger that was not held first.
    Scroll { point: Point, id: TouchId },

    /// A moving finger that was held first.
    Drag { point: Point, id: TouchId },

    /// A held finger lifted.
    DragEnded { point: Point, id: TouchId },

    /// A quick moving release.
    Flick {
        point: Point,
        id: TouchId,
        direction: Direction,
    },

    /// A slow moving release.
    Swipe {
        point: Point,
        id: TouchId,
        direction: Direction,
    },

    /// The pinch pair moved. Magnification is relative to the distance
    /// when the pair formed.
    PinchAction {
        magnification: f64,
        ids: [TouchId; 2],
    },

    /// The pinch pair moved closer together.
    PinchIn {
        magnification: f64,
        ids: [TouchId; 2],
    },

    /// The pinch pair moved apart (or held its distance).
    PinchOut {
        magnification: f64,
        ids: [TouchId; 2],
    },

    /// One finger of the pinch pair lifted.
    PinchEnded {
        magnification: f64,
        ids: [TouchId; 2],
    },
}

impl GestureEvent {
    /// Short snake_case name, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Down { .. } => "down",
            Self::Tap { .. } => "tap",
            Self::SingleTap { .. } => "single_tap",
            Self::DoubleTap { .. } => "double_tap",
            Self::Hold { .. } => "hold",
            Self::Cancelled { .. } => "cancelled",
            Self::Scroll { .. } => "scroll",
            Self::Drag { .. } => "drag",
            Self::DragEnded { .. } => "drag_ended",
            Self::Flick { .. } => "flick",
            Self::Swipe { .. } => "swipe",
            Self::PinchAction { .. } => "pinch_action",
            Self::PinchIn { .. } => "pinch_in",
            Self::PinchOut { .. } => "pinch_out",
            Self::PinchEnded { .. } => "pinch_ended",
        }
    }

    /// The single finger this gesture belongs to, if any.
    pub fn touch_id(&self) -> Option<TouchId> {
        match *self {
            Self::Down { id, .. }
            | Self::Tap { id, .. }
            | Self::Hold { id, .. }
            | Self::Cancelled { id, .. }
            | Self::Scroll { id, .. }
            | Self::Drag { id, .. }
            | Self::DragEnded { id, .. }
            | Self::Flick { id, .. }
            | Self::Swipe { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Pinch magnification, for pinch events.
    pub fn magnification(&self) -> Option<f64> {
        match *self {
            Self::PinchAction { magnification, .. }
            | Self::PinchIn { magnification, .. }
            | Self::PinchOut { magnification, .. }
            | Self::PinchEnded { magnification, .. } => Some(magnification),
            _ => None,
        }
    }
}

/// A gesture stamped with the time it was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureRecord {
    /// Seconds on the classifier's clock.
    pub t: f64,

    #[serde(flatten)]
    pub event: GestureEvent,
}

/// Metadata written as the first line of a gesture stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureStreamHeader {
    pub schema_version: String,

    /// Wall-clock time the stream was produced (ISO 8601).
    pub produced_at: String,

    /// Name of the touch source that fed the classifier.
    pub source: String,
}

impl GestureStreamHeader {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            schema_version: GESTURE_SCHEMA_VERSION.to_string(),
            produced_at: chrono::Utc::now().to_rfc3339(),
            source: source.into(),
        }
    }
}

/// Parse gesture records from JSONL content, skipping comments.
pub fn parse_gestures(jsonl: &str) -> Result<Vec<GestureRecord>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}
