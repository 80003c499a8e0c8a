//! Quantified properties of the gap detector, tracker, partition and merge.

use chrono::{DateTime, TimeDelta};
use proptest::collection::{btree_set, vec};
use proptest::prelude::{Strategy, prop_assert, prop_assert_eq, proptest};

use icubias_core::{
    ExposureOptions, SummaryTable, detect_gaps, partition_by_exposure, track_exposure,
};
use icubias_model::{
    ExposureWindow, Observation, ObservationStream, PatientSummary, Timestamp, WindowSet,
};

fn at(seconds: i64) -> Timestamp {
    DateTime::from_timestamp(seconds, 0).unwrap().naive_utc()
}

/// Streams with strictly ascending, distinct timestamps.
fn streams(values: impl Strategy<Value = f64> + Clone) -> impl Strategy<Value = ObservationStream> {
    btree_set(0i64..20_000, 0..40).prop_flat_map(move |times| {
        let n = times.len();
        vec(values.clone(), n).prop_map(move |vals| {
            times
                .iter()
                .zip(vals)
                .map(|(t, v)| Observation::new(at(*t), v))
                .collect::<ObservationStream>()
        })
    })
}

fn indicator() -> impl Strategy<Value = f64> + Clone {
    proptest::prop_oneof![
        proptest::strategy::Just(0.0),
        proptest::strategy::Just(0.0),
        0.01f64..5.0,
        -1.0f64..0.0,
    ]
}

fn summaries() -> impl Strategy<Value = Vec<PatientSummary>> {
    let keys = ["start_time", "end_time", "nb_msrt_vm1", "min_vm1", "max_vm1", "mean_vm1"];
    vec((0usize..3, vec(0u32..4, keys.len())), 0..8).prop_map(move |rows| {
        rows.into_iter()
            .map(|(patient, values)| {
                let mut summary = PatientSummary::new(format!("P{patient}"));
                for (key, value) in keys.iter().zip(values) {
                    summary.insert(*key, f64::from(value)).unwrap();
                }
                summary
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn strict_exceeds_adjusted_by_number_of_overlong_gaps(
        stream in streams(0.0f64..200.0),
        period in 1i64..600,
    ) {
        let expected = TimeDelta::seconds(period);
        let report = detect_gaps(&stream, expected);
        let overlong = report.gaps.iter().filter(|gap| **gap > expected).count() as u64;
        prop_assert_eq!(report.missed.strict - report.missed.adjusted, overlong);
        prop_assert_eq!(report.gaps.len(), stream.len().saturating_sub(1));
    }

    #[test]
    fn compliant_stream_has_no_missed_measurements(count in 0usize..30, step in 1i64..=120) {
        let stream: ObservationStream = (0..count as i64)
            .map(|i| Observation::new(at(i * step), 1.0))
            .collect();
        let report = detect_gaps(&stream, TimeDelta::seconds(120));
        prop_assert_eq!(report.missed.strict, 0);
        prop_assert_eq!(report.missed.adjusted, 0);
    }

    #[test]
    fn tracked_windows_are_ordered_and_open_on_positive_samples(
        stream in streams(indicator()),
        close in proptest::bool::ANY,
    ) {
        let options = ExposureOptions { close_open_windows_at_stream_end: close };
        let windows = track_exposure(&stream, options);
        for pair in windows.windows(2) {
            prop_assert!(pair[0].end() <= pair[1].start());
        }
        for window in &windows {
            let opening = stream.iter().find(|obs| obs.timestamp == window.start());
            prop_assert!(opening.is_some_and(|obs| obs.value > 0.0));
        }
    }

    #[test]
    fn partition_is_exhaustive(
        stream in streams(0.0f64..200.0),
        raw_windows in vec((0i64..20_000, 1i64..2_000), 0..6),
    ) {
        let exposure = WindowSet::from_windows(
            raw_windows
                .into_iter()
                .map(|(start, len)| ExposureWindow::new(at(start), at(start + len)).unwrap()),
        );
        let partition = partition_by_exposure(&stream, &exposure);
        prop_assert_eq!(partition.exposed.len() + partition.unexposed.len(), stream.len());
        let expected_exposed = stream.iter().filter(|obs| exposure.contains(obs.timestamp)).count();
        prop_assert_eq!(partition.exposed.len(), expected_exposed);
    }

    #[test]
    fn merge_ignores_input_order(input in summaries(), split in 0usize..8) {
        let split = split.min(input.len());
        let forward = input
            .iter()
            .cloned()
            .map(|s| SummaryTable::from_summaries([s]))
            .fold(SummaryTable::new(), SummaryTable::merge);
        let backward = input
            .iter()
            .rev()
            .cloned()
            .map(|s| SummaryTable::from_summaries([s]))
            .fold(SummaryTable::new(), SummaryTable::merge);
        let (left, right) = input.split_at(split);
        let grouped = SummaryTable::from_summaries(right.to_vec())
            .merge(SummaryTable::from_summaries(left.to_vec()));
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(&forward, &grouped);
    }
}

#[test]
fn trailing_window_closes_at_last_sample_when_enabled() {
    let stream: ObservationStream = [(0, 1.0), (60, 2.0), (300, 3.0)]
        .into_iter()
        .map(|(t, v)| Observation::new(at(t), v))
        .collect();
    let options = ExposureOptions {
        close_open_windows_at_stream_end: true,
    };
    assert_eq!(
        track_exposure(&stream, options),
        vec![ExposureWindow::new(at(0), at(300)).unwrap()]
    );
    assert!(track_exposure(&stream, ExposureOptions::default()).is_empty());
}

#[test]
fn merged_rows_render_stably() {
    let mut a = PatientSummary::new("P1");
    a.insert("start_time", 0.0).unwrap();
    a.insert("end_time", 43_200.0).unwrap();
    a.insert("nb_msrt_vm1", 3.0).unwrap();
    a.insert("mean_vm1", 80.0).unwrap();
    let mut b = PatientSummary::new("P1");
    b.insert("start_time", 21_600.0).unwrap();
    b.insert("end_time", 86_400.0).unwrap();
    b.insert("nb_msrt_vm1", 4.0).unwrap();
    b.insert("mean_vm1", 82.0).unwrap();
    let table = SummaryTable::from_summaries([a, b]);

    let rendered = table
        .column_names()
        .iter()
        .map(|name| {
            let cell = table.get(&"P1".into(), name).unwrap();
            match cell.resolved() {
                Some(value) => format!("{name}={value}"),
                None => format!("{name}=<unresolved>"),
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(rendered, @r"
    end_time=86400
    length_of_stay_days=1
    mean_vm1=<unresolved>
    nb_msrt_vm1=7
    start_time=0
    ");
}
