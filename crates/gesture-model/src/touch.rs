//! Raw touch input and the touch-script format.
//!
//! A touch script is JSONL: an optional header comment line
//! (`# {"schema_version":"1.0",...}`) followed by one [`TouchBatch`] per
//! line. Batches mirror what a host delivers to the classifier: every
//! touch in a batch shares a phase and a timestamp.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// Per-finger identifier assigned by the host.
pub type TouchId = u32;

/// Largest identifier the classifier accepts. Identifiers double as table
/// indices, so this bounds the touch table.
pub const MAX_TOUCH_ID: TouchId = 4095;

/// Current touch-script schema version.
pub const SCRIPT_SCHEMA_VERSION: &str = "1.0";

/// One finger's position inside a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    pub id: TouchId,
    pub x: f64,
    pub y: f64,
}

impl TouchSample {
    pub fn new(id: TouchId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Lifecycle phase shared by every touch in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Begin,
    Move,
    End,
    Cancel,
}

/// A batch of touches delivered together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchBatch {
    /// Seconds since the start of the script.
    pub t: f64,
    pub phase: TouchPhase,
    pub touches: Vec<TouchSample>,
}

impl TouchBatch {
    pub fn new(t: f64, phase: TouchPhase, touches: Vec<TouchSample>) -> Self {
        Self { t, phase, touches }
    }

    pub fn begin(t: f64, touches: Vec<TouchSample>) -> Self {
        Self::new(t, TouchPhase::Begin, touches)
    }

    pub fn moved(t: f64, touches: Vec<TouchSample>) -> Self {
        Self::new(t, TouchPhase::Move, touches)
    }

    pub fn end(t: f64, touches: Vec<TouchSample>) -> Self {
        Self::new(t, TouchPhase::End, touches)
    }

    pub fn cancel(t: f64, touches: Vec<TouchSample>) -> Self {
        Self::new(t, TouchPhase::Cancel, touches)
    }
}

/// Metadata written as the first (comment) line of a touch script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptHeader {
    pub schema_version: String,

    /// Display size the script was recorded on, if known.
    #[serde(default)]
    pub display_width: Option<f64>,
    #[serde(default)]
    pub display_height: Option<f64>,

    /// Wall-clock recording time (ISO 8601).
    #[serde(default)]
    pub recorded_at: Option<String>,
}

impl ScriptHeader {
    /// Header for a script recorded now on a display of the given size.
    pub fn now(display_width: f64, display_height: f64) -> Self {
        Self {
            schema_version: SCRIPT_SCHEMA_VERSION.to_string(),
            display_width: Some(display_width),
            display_height: Some(display_height),
            recorded_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }
}

/// A parsed touch script.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TouchScript {
    pub header: Option<ScriptHeader>,
    pub batches: Vec<TouchBatch>,
}

impl TouchScript {
    /// Timestamp of the last batch, or zero for an empty script.
    pub fn duration_secs(&self) -> f64 {
        self.batches.last().map(|b| b.t).unwrap_or(0.0)
    }

    /// Total number of touch samples across all batches.
    pub fn sample_count(&self) -> usize {
        self.batches.iter().map(|b| b.touches.len()).sum()
    }
}

/// A line of a touch script that failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct ScriptParseError {
    /// One-based line number.
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parse a touch script from JSONL content.
///
/// The first `#` comment line is read as the header when it holds JSON;
/// other comments and blank lines are skipped.
pub fn parse_script(jsonl: &str) -> Result<TouchScript, ScriptParseError> {
    let mut script = TouchScript::default();

    for (index, raw) in jsonl.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if script.header.is_none() && script.batches.is_empty() {
                script.header = serde_json::from_str(comment.trim()).ok();
            }
            continue;
        }
        let batch = serde_json::from_str(line).map_err(|source| ScriptParseError {
            line: index + 1,
            source,
        })?;
        script.batches.push(batch);
    }

    Ok(script)
}

/// Serialize a touch script to JSONL, header first.
pub fn serialize_script(script: &TouchScript) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    if let Some(header) = &script.header {
        output.push_str("# ");
        output.push_str(&serde_json::to_string(header)?);
        output.push('\n');
    }
    for batch in &script.batches {
        output.push_str(&serde_json::to_string(batch)?);
        output.push('\n');
    }
    Ok(output)
}

/// A causality problem found in a touch script.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptIssue {
    /// Zero-based batch index.
    pub batch: usize,
    pub message: String,
}

impl fmt::Display for ScriptIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch {}: {}", self.batch, self.message)
    }
}

/// Check that a script respects the host contract: timestamps never go
/// backwards, identifiers stay within [`MAX_TOUCH_ID`], and every
/// move/end/cancel refers to a touch that began and has not ended yet.
pub fn validate_script(script: &TouchScript) -> Vec<ScriptIssue> {
    let mut issues = Vec::new();
    let mut live: HashSet<TouchId> = HashSet::new();
    let mut last_t = f64::NEG_INFINITY;

    for (index, batch) in script.batches.iter().enumerate() {
        if !batch.t.is_finite() {
            issues.push(ScriptIssue {
                batch: index,
                message: format!("timestamp {} is not finite", batch.t),
            });
        } else if batch.t < last_t {
            issues.push(ScriptIssue {
                batch: index,
                message: format!("timestamp {:.3}s precedes {:.3}s", batch.t, last_t),
            });
        } else {
            last_t = batch.t;
        }

        if batch.touches.is_empty() {
            issues.push(ScriptIssue {
                batch: index,
                message: "batch has no touches".to_string(),
            });
        }

        for touch in &batch.touches {
            match batch.phase {
                TouchPhase::Begin if touch.id > MAX_TOUCH_ID => {
                    issues.push(ScriptIssue {
                        batch: index,
                        message: format!(
                            "touch {} exceeds the largest identifier {MAX_TOUCH_ID}",
                            touch.id
                        ),
                    });
                }
                TouchPhase::Begin => {
                    if !live.insert(touch.id) {
                        issues.push(ScriptIssue {
                            batch: index,
                            message: format!("touch {} began twice without ending", touch.id),
                        });
                    }
                }
                TouchPhase::Move => {
                    if !live.contains(&touch.id) {
                        issues.push(ScriptIssue {
                            batch: index,
                            message: format!("touch {} moved before it began", touch.id),
                        });
                    }
                }
                TouchPhase::End | TouchPhase::Cancel => {
                    if !live.remove(&touch.id) {
                        issues.push(ScriptIssue {
                            batch: index,
                            message: format!("touch {} ended without a live begin", touch.id),
                        });
                    }
                }
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tap_script() -> TouchScript {
        TouchScript {
            header: Some(ScriptHeader {
                schema_version: SCRIPT_SCHEMA_VERSION.to_string(),
                display_width: Some(960.0),
                display_height: Some(640.0),
                recorded_at: None,
            }),
            batches: vec![
                TouchBatch::begin(0.0, vec![TouchSample::new(0, 100.0, 100.0)]),
                TouchBatch::end(0.05, vec![TouchSample::new(0, 100.0, 100.0)]),
            ],
        }
    }

    #[test]
    fn test_script_jsonl_roundtrip() {
        let script = tap_script();
        let jsonl = serialize_script(&script).unwrap();
        assert!(jsonl.starts_with("# "));
        assert_eq!(parse_script(&jsonl).unwrap(), script);
    }

    #[test]
    fn test_batch_json_format() {
        let batch = TouchBatch::moved(0.5, vec![TouchSample::new(3, 1.0, 2.0)]);
        let json = serde_json::to_string(&batch).unwrap();
        assert!(json.contains("\"phase\":\"move\""));
        assert!(json.contains("\"id\":3"));
    }

    #[test]
    fn test_parse_reports_line_number() {
        let jsonl = "# header that is not json\n\n{\"t\":0.0,\"phase\":\"begin\",\"touches\":[]}\n{\"t\":0.1,\"phase\":\"wiggle\",\"touches\":[]}\n";
        let err = parse_script(jsonl).unwrap_err();
        assert_eq!(err.line, 4);
    }

    #[test]
    fn test_parse_tolerates_non_json_header() {
        let jsonl = "# recorded by hand\n{\"t\":0.0,\"phase\":\"begin\",\"touches\":[{\"id\":0,\"x\":1.0,\"y\":2.0}]}\n";
        let script = parse_script(jsonl).unwrap();
        assert!(script.header.is_none());
        assert_eq!(script.batches.len(), 1);
        assert_eq!(script.sample_count(), 1);
    }

    #[test]
    fn test_validate_clean_script() {
        assert!(validate_script(&tap_script()).is_empty());
    }

    #[test]
    fn test_validate_flags_causality_problems() {
        let script = TouchScript {
            header: None,
            batches: vec![
                TouchBatch::moved(0.2, vec![TouchSample::new(1, 0.0, 0.0)]),
                TouchBatch::begin(0.1, vec![TouchSample::new(0, 0.0, 0.0)]),
                TouchBatch::end(0.3, vec![TouchSample::new(2, 0.0, 0.0)]),
            ],
        };
        let issues = validate_script(&script);
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].batch, 0);
        assert!(issues[1].message.contains("precedes"));
        assert!(issues[2].to_string().starts_with("batch 2:"));
    }

    #[test]
    fn test_validate_flags_oversized_identifier() {
        let script = TouchScript {
            header: None,
            batches: vec![
                TouchBatch::begin(0.0, vec![TouchSample::new(3_000_000_000, 1.0, 1.0)]),
                TouchBatch::end(0.1, vec![TouchSample::new(3_000_000_000, 1.0, 1.0)]),
                TouchBatch::begin(0.2, vec![TouchSample::new(MAX_TOUCH_ID, 1.0, 1.0)]),
            ],
        };
        let issues = validate_script(&script);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].batch, 0);
        assert!(issues[0].message.contains("exceeds"));
        assert_eq!(issues[1].batch, 1);
        assert!(issues[1].message.contains("without a live begin"));
    }
}
