//! In-memory series frame
//!
//! The single table at the heart of the system: samples sorted by timestamp
//! and deduplicated. All chart queries, daily reports, and nearest-time
//! lookups read from here.
//!
//! Invariants:
//! - Timestamps are strictly increasing (duplicates collapse, later wins)
//! - All values are finite

use chrono::NaiveDate;

use crate::series::types::{Sample, TimeRange};

/// Sorted, deduplicated collection of samples.
#[derive(Debug, Clone, Default)]
pub struct SeriesFrame {
    samples: Vec<Sample>,
}

impl SeriesFrame {
    /// Create an empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from an arbitrary batch of samples
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        let mut frame = Self::new();
        frame.merge(samples);
        frame
    }

    /// Number of samples in the frame
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the frame holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples, oldest first
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Drop everything; used when the backing file is replaced
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Merge a batch of samples into the frame.
    ///
    /// Non-finite values are discarded. Duplicate timestamps collapse with
    /// the incoming sample winning, both against the existing frame and
    /// within the batch itself (last occurrence wins). Returns the number
    /// of samples that are new or replaced an existing one.
    pub fn merge(&mut self, batch: Vec<Sample>) -> usize {
        let mut incoming: Vec<Sample> = batch
            .into_iter()
            .filter(|s| s.value.is_finite())
            .collect();
        if incoming.is_empty() {
            return 0;
        }

        // Stable sort keeps batch order among equal timestamps, so after
        // dedup-keep-last the final row of the batch wins.
        incoming.sort_by_key(|s| s.timestamp);
        let mut deduped: Vec<Sample> = Vec::with_capacity(incoming.len());
        for sample in incoming {
            match deduped.last_mut() {
                Some(last) if last.timestamp == sample.timestamp => *last = sample,
                _ => deduped.push(sample),
            }
        }
        let merged = deduped.len();

        // Fast path: strictly appending past the current tail.
        if self
            .samples
            .last()
            .map(|last| deduped[0].timestamp > last.timestamp)
            .unwrap_or(true)
        {
            self.samples.extend(deduped);
            return merged;
        }

        // General path: merge two sorted runs, incoming wins on collision.
        let mut result = Vec::with_capacity(self.samples.len() + deduped.len());
        let mut existing = self.samples.iter().copied().peekable();
        let mut incoming = deduped.into_iter().peekable();

        loop {
            match (existing.peek(), incoming.peek()) {
                (Some(e), Some(i)) => {
                    if e.timestamp < i.timestamp {
                        result.push(*e);
                        existing.next();
                    } else if e.timestamp > i.timestamp {
                        result.push(*i);
                        incoming.next();
                    } else {
                        result.push(*i);
                        existing.next();
                        incoming.next();
                    }
                }
                (Some(_), None) => {
                    result.extend(existing);
                    break;
                }
                (None, Some(_)) => {
                    result.extend(incoming);
                    break;
                }
                (None, None) => break,
            }
        }

        self.samples = result;
        merged
    }

    /// The newest sample, if any
    pub fn latest(&self) -> Option<Sample> {
        self.samples.last().copied()
    }

    /// The oldest sample, if any
    pub fn earliest(&self) -> Option<Sample> {
        self.samples.first().copied()
    }

    /// Sample whose timestamp is closest to `target` (minimal absolute
    /// difference). Equidistant neighbors resolve to the earlier sample.
    pub fn nearest(&self, target: i64) -> Option<Sample> {
        if self.samples.is_empty() {
            return None;
        }

        let idx = self.samples.partition_point(|s| s.timestamp < target);
        if idx == 0 {
            return Some(self.samples[0]);
        }
        if idx == self.samples.len() {
            return Some(self.samples[idx - 1]);
        }

        let before = self.samples[idx - 1];
        let after = self.samples[idx];
        if (target - before.timestamp) <= (after.timestamp - target) {
            Some(before)
        } else {
            Some(after)
        }
    }

    /// Samples falling within the half-open range [start, end)
    pub fn range(&self, range: TimeRange) -> &[Sample] {
        let lo = self.samples.partition_point(|s| s.timestamp < range.start);
        let hi = self.samples.partition_point(|s| s.timestamp < range.end);
        &self.samples[lo..hi]
    }

    /// Samples falling on the given UTC day, oldest first
    pub fn day_slice(&self, date: NaiveDate) -> &[Sample] {
        match TimeRange::day(date) {
            Some(range) => self.range(range),
            None => &[],
        }
    }

    /// Distinct UTC days that have at least one sample, ascending
    pub fn available_days(&self) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        for sample in &self.samples {
            let date = sample.date();
            if days.last() != Some(&date) {
                days.push(date);
            }
        }
        days
    }
}
