//! Exposure-state tracking over indicator streams.

use tracing::debug;

use icubias_model::{ExposureWindow, ObservationStream, PatientStreams, WindowSet};

/// How the tracker treats a window still open when the stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExposureOptions {
    /// Close a trailing open window at the last observed timestamp instead
    /// of dropping it.
    pub close_open_windows_at_stream_end: bool,
}

/// Scans one indicator stream and returns its exposure windows in order.
///
/// A window opens at the first positive value seen while closed and closes
/// at the first zero seen while open. Every other sample is a no-op. A
/// window still open at the end of the stream is dropped unless
/// [`ExposureOptions::close_open_windows_at_stream_end`] is set, in which
/// case it ends at the last sample (and is kept only if that is after its
/// start).
pub fn track_exposure(stream: &ObservationStream, options: ExposureOptions) -> Vec<ExposureWindow> {
    let mut windows = Vec::new();
    let mut open = None;
    for obs in stream.iter() {
        match open {
            None if obs.value > 0.0 => open = Some(obs.timestamp),
            Some(start) if obs.value == 0.0 => {
                if let Ok(window) = ExposureWindow::new(start, obs.timestamp) {
                    windows.push(window);
                }
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        let closed = stream
            .last()
            .filter(|_| options.close_open_windows_at_stream_end)
            .and_then(|last| ExposureWindow::new(start, last.timestamp).ok());
        match closed {
            Some(window) => windows.push(window),
            None => debug!(window_start = %start, "dropped exposure window open at stream end"),
        }
    }
    windows
}

/// Union of the exposure windows of every indicator variable of one patient.
pub fn track_patient_exposure(
    patient: &PatientStreams,
    exposure_variables: &[String],
    options: ExposureOptions,
) -> WindowSet {
    exposure_variables
        .iter()
        .filter_map(|variable| patient.stream(variable))
        .map(|stream| WindowSet::from_windows(track_exposure(stream, options)))
        .fold(WindowSet::default(), |exposed, set| exposed.union(&set))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use icubias_model::{Observation, Timestamp};

    fn at(seconds: i64) -> Timestamp {
        DateTime::from_timestamp(seconds, 0).unwrap().naive_utc()
    }

    fn stream(samples: &[(i64, f64)]) -> ObservationStream {
        samples
            .iter()
            .map(|(t, v)| Observation::new(at(*t), *v))
            .collect()
    }

    fn window(start: i64, end: i64) -> ExposureWindow {
        ExposureWindow::new(at(start), at(end)).unwrap()
    }

    const DROP: ExposureOptions = ExposureOptions {
        close_open_windows_at_stream_end: false,
    };
    const CLOSE: ExposureOptions = ExposureOptions {
        close_open_windows_at_stream_end: true,
    };

    #[test]
    fn single_window_between_zeros() {
        let s = stream(&[(0, 0.0), (1, 5.0), (2, 5.0), (3, 0.0)]);
        assert_eq!(track_exposure(&s, DROP), vec![window(1, 3)]);
    }

    #[test]
    fn window_open_from_first_sample() {
        let s = stream(&[(0, 5.0), (5, 0.0)]);
        assert_eq!(track_exposure(&s, DROP), vec![window(0, 5)]);
    }

    #[test]
    fn trailing_open_window_is_dropped_by_default() {
        assert!(track_exposure(&stream(&[(0, 5.0)]), DROP).is_empty());
        let s = stream(&[(0, 1.0), (4, 0.0), (6, 2.0), (9, 3.0)]);
        assert_eq!(track_exposure(&s, DROP), vec![window(0, 4)]);
    }

    #[test]
    fn trailing_open_window_closes_at_last_sample_when_enabled() {
        let s = stream(&[(0, 1.0), (4, 0.0), (6, 2.0), (9, 3.0)]);
        assert_eq!(track_exposure(&s, CLOSE), vec![window(0, 4), window(6, 9)]);
        // A single sample cannot span anything.
        assert!(track_exposure(&stream(&[(0, 5.0)]), CLOSE).is_empty());
    }

    #[test]
    fn repeated_zeros_and_negatives_are_no_ops() {
        let s = stream(&[(0, 0.0), (1, 0.0), (2, -1.0), (3, 2.0), (4, -1.0), (5, 0.0), (6, 0.0)]);
        assert_eq!(track_exposure(&s, DROP), vec![window(3, 5)]);
    }

    #[test]
    fn patient_windows_are_unioned_across_variables() {
        let patient = PatientStreams::new("P1")
            .with_stream("pm39", stream(&[(0, 1.0), (10, 0.0)]))
            .with_stream("pm40", stream(&[(5, 2.0), (20, 0.0), (30, 1.0), (40, 0.0)]))
            .with_stream("vm1", stream(&[(0, 80.0), (50, 0.0)]));
        let variables = vec!["pm39".to_string(), "pm40".to_string(), "pm41".to_string()];
        let set = track_patient_exposure(&patient, &variables, DROP);
        assert_eq!(set.windows(), &[window(0, 20), window(30, 40)]);
    }
}
