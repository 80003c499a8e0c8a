//! Exposure windows and their per-patient union.

use chrono::TimeDelta;

use crate::error::{ModelError, Result};
use crate::observation::Timestamp;

/// Half-open interval `[start, end)` during which an exposure indicator was active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExposureWindow {
    start: Timestamp,
    end: Timestamp,
}

impl ExposureWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if end <= start {
            return Err(ModelError::EmptyWindow);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.start <= timestamp && timestamp < self.end
    }
}

/// Sorted, pairwise disjoint windows of one patient.
///
/// Overlapping and touching windows are coalesced on construction, so the
/// set is the interval union of its inputs regardless of their order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowSet {
    windows: Vec<ExposureWindow>,
}

impl WindowSet {
    pub fn from_windows(windows: impl IntoIterator<Item = ExposureWindow>) -> Self {
        let mut sorted: Vec<ExposureWindow> = windows.into_iter().collect();
        sorted.sort();
        let mut merged: Vec<ExposureWindow> = Vec::with_capacity(sorted.len());
        for window in sorted {
            match merged.last_mut() {
                Some(last) if window.start <= last.end => {
                    if window.end > last.end {
                        last.end = window.end;
                    }
                }
                _ => merged.push(window),
            }
        }
        Self { windows: merged }
    }

    /// Union with another set.
    pub fn union(&self, other: &WindowSet) -> WindowSet {
        Self::from_windows(self.windows.iter().chain(other.windows.iter()).copied())
    }

    pub fn contains(&self, timestamp: Timestamp) -> bool {
        // First window whose end lies after the timestamp is the only candidate.
        let idx = self.windows.partition_point(|w| w.end <= timestamp);
        self.windows
            .get(idx)
            .is_some_and(|window| window.contains(timestamp))
    }

    pub fn windows(&self) -> &[ExposureWindow] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
