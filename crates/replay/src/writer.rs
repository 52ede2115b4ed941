//! Append-only gesture stream writer.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tapwise_common::error::{TapwiseError, TapwiseResult};
use tapwise_gesture_model::gesture::{GestureRecord, GestureStreamHeader};

const FLUSH_EVERY: u64 = 256;

/// Writes gesture records to a JSONL file, one record per line.
pub struct GestureWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    records_written: u64,
}

impl GestureWriter {
    /// Create the file (truncating any previous one) and write the header
    /// as a `#` comment line.
    pub fn create(path: impl Into<PathBuf>, header: &GestureStreamHeader) -> TapwiseResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);

        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| TapwiseError::output(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            path,
            records_written: 0,
        })
    }

    pub fn write_record(&mut self, record: &GestureRecord) -> TapwiseResult<()> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| TapwiseError::output(format!("Failed to write gesture: {e}")))?;
        self.records_written += 1;

        if self.records_written % FLUSH_EVERY == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn write_all(&mut self, records: &[GestureRecord]) -> TapwiseResult<()> {
        records.iter().try_for_each(|record| self.write_record(record))
    }

    pub fn flush(&mut self) -> TapwiseResult<()> {
        self.writer
            .flush()
            .map_err(|e| TapwiseError::output(format!("Failed to flush gestures: {e}")))
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for GestureWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapwise_gesture_model::gesture::{parse_gestures, GestureEvent};
    use tapwise_gesture_model::point::Point;

    #[test]
    fn test_writer_output_parses_back() {
        let dir = std::env::temp_dir().join("tapwise_test_writer");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("gestures.jsonl");

        let records = vec![
            GestureRecord {
                t: 0.0,
                event: GestureEvent::Down {
                    point: Point::new(1.0, 2.0),
                    id: 0,
                },
            },
            GestureRecord {
                t: 0.05,
                event: GestureEvent::Tap {
                    point: Point::new(1.0, 2.0),
                    id: 0,
                },
            },
        ];

        {
            let mut writer =
                GestureWriter::create(&path, &GestureStreamHeader::new("test")).unwrap();
            writer.write_all(&records).unwrap();
            assert_eq!(writer.records_written(), 2);
            assert_eq!(writer.path(), path.as_path());
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("# "));
        assert!(lines[0].contains("\"source\":\"test\""));
        assert_eq!(parse_gestures(&content).unwrap(), records);

        std::fs::remove_dir_all(&dir).ok();
    }
}
