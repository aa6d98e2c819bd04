//! CSV sample source
//!
//! Reads (timestamp, value) rows from an append-only CSV file. Polls are
//! incremental: the source remembers its byte offset and only parses the
//! appended tail. A file that shrank (rotated or rewritten) is re-read from
//! the start and flagged as a reset.
//!
//! Rows that do not parse are dropped and counted, never fatal. That covers
//! header lines, half-written rows, and collector glitches alike.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::{IngestError, LoadStats, SampleSource, SourceBatch};
use crate::series::Sample;

/// Append-only CSV file source
pub struct CsvSource {
    path: PathBuf,
    /// Byte offset of the first unconsumed byte
    offset: u64,
}

impl CsvSource {
    /// Create a source for the given CSV path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
        }
    }

    /// Path being watched
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse CSV text into samples, dropping malformed rows.
    ///
    /// Each row's first field is the timestamp, the second the value;
    /// extra fields are ignored.
    pub fn parse_str(data: &str) -> (Vec<Sample>, LoadStats) {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_bytes());

        let mut samples = Vec::new();
        let mut stats = LoadStats::default();

        for record in reader.records() {
            let record = match record {
                Ok(r) => r,
                Err(_) => {
                    stats.rows_dropped += 1;
                    continue;
                }
            };

            // Blank separator lines are not data rows; skip without counting.
            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }

            let parsed = record
                .get(0)
                .and_then(|ts| parse_timestamp(ts.trim()))
                .zip(
                    record
                        .get(1)
                        .and_then(|v| v.trim().parse::<f64>().ok())
                        .filter(|v| v.is_finite()),
                );

            match parsed {
                Some((timestamp, value)) => {
                    samples.push(Sample::at(timestamp, value));
                    stats.rows_parsed += 1;
                }
                None => stats.rows_dropped += 1,
            }
        }

        (samples, stats)
    }

    /// Read everything new past the current offset.
    ///
    /// Only complete lines are consumed; a trailing partial line (a row
    /// mid-append) stays in the file for the next poll.
    fn read_tail(&mut self) -> Result<(String, bool), IngestError> {
        let mut file = std::fs::File::open(&self.path)?;
        let len = file.metadata()?.len();

        // Shrunk file means it was rotated or rewritten; start over.
        let reset = len < self.offset;
        if reset {
            self.offset = 0;
        }

        if len == self.offset {
            return Ok((String::new(), reset));
        }

        file.seek(SeekFrom::Start(self.offset))?;
        let mut buf = Vec::with_capacity((len - self.offset) as usize);
        file.read_to_end(&mut buf)?;

        let consumed = match buf.iter().rposition(|&b| b == b'\n') {
            Some(pos) => pos + 1,
            None => 0,
        };
        buf.truncate(consumed);
        self.offset += consumed as u64;

        Ok((String::from_utf8_lossy(&buf).into_owned(), reset))
    }
}

#[async_trait]
impl SampleSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }

    async fn poll(&mut self) -> Result<SourceBatch, IngestError> {
        let (chunk, reset) = self.read_tail()?;
        let (samples, stats) = Self::parse_str(&chunk);

        Ok(SourceBatch {
            samples,
            stats,
            reset,
        })
    }
}

/// Parse a timestamp in any of the formats collectors actually write.
fn parse_timestamp(s: &str) -> Option<i64> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
    ];

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    // Date-only rows anchor at midnight UTC.
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }

    // Bare epoch numbers: magnitudes of 1e10 and up are milliseconds.
    if let Ok(epoch) = s.parse::<i64>() {
        if epoch.abs() >= 10_000_000_000 {
            return Some(epoch);
        }
        return Some(epoch * 1000);
    }

    None
}
